// =============================================================================
// API Module
// =============================================================================

pub mod rest;

pub use rest::router;
