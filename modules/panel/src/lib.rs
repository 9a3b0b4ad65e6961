// === PUBLIC CONTRACT ===
// Entity models and the error type consumers are expected to match on
pub mod contract;

// Re-export the public contract components
pub use contract::{error, model};

// === INTERNAL MODULES ===
// Exposed for integration tests and for the application wiring in
// apps/seedboard; the `contract` module is the stable surface.
pub mod config;
pub mod domain;
pub mod infra;
