// =============================================================================
// Data Sources
// =============================================================================
//
// External collaborators that produce a complete raw series for the core:
//   - `csv_load`: the historical observation table from disk.
//   - `coingecko`: live price/volume history for the single-token view.
//
// All fetch/parse failure handling lives here; the pipeline only ever sees a
// complete series or nothing.

pub mod coingecko;
pub mod csv_load;

pub use coingecko::{CoinGeckoClient, MarketHistory};
pub use csv_load::{load_csv, parse_csv};
