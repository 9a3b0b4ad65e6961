pub mod dto;
mod http_seed_client;

pub use http_seed_client::{HttpSeedClient, SeedError};
