pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{LocalStorage, OzonClient, RemnantsFetcher};
pub use config::SyncConfig;
pub use core::sync::{SyncEngine, SyncOptions};
pub use utils::error::{Result, SyncError};
