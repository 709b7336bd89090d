//! Schema module - Beat, configuration and search result types.

mod beat;
mod config;
mod evolution;

pub use beat::*;
pub use config::*;
pub use evolution::*;
