pub mod config;
pub mod currency;
pub mod errors;
pub mod kernel;
pub mod markets;
pub mod precision;
pub mod time;
pub mod traits;
pub mod types;
