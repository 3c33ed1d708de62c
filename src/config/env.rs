use crate::config::toml_config::TomlConfig;
use crate::config::SyncConfig;
use crate::utils::error::{Result, SyncError};
use std::env::VarError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Loads configuration: defaults, then the optional TOML file, then environment variables.
///
/// Calls `dotenvy::dotenv().ok()` first so a local `.env` file can supply credentials.
///
/// # Errors
///
/// Fails when `CLIENT_ID` or `SELLER_TOKEN` is absent, or a numeric variable does not parse.
pub fn load_sync_config(config_file: Option<&Path>) -> Result<SyncConfig> {
    dotenvy::dotenv().ok();

    let base = match config_file {
        Some(path) => {
            tracing::debug!("Reading configuration file {}", path.display());
            TomlConfig::from_file(path)?.apply_to(SyncConfig::default())
        }
        None => SyncConfig::default(),
    };

    build_sync_config(base, |key| std::env::var(key))
}

/// Applies environment overrides on top of `base` using the given lookup.
pub fn build_sync_config<F>(base: SyncConfig, lookup: F) -> Result<SyncConfig>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    let require = |var: &str| -> Result<String> {
        lookup(var).map_err(|_| SyncError::MissingConfigError {
            field: var.to_string(),
        })
    };

    fn parse_or<T: FromStr>(
        raw: std::result::Result<String, VarError>,
        var: &str,
        default: T,
    ) -> Result<T>
    where
        T::Err: std::fmt::Display,
    {
        match raw {
            Ok(value) => value
                .trim()
                .parse::<T>()
                .map_err(|e| SyncError::InvalidConfigValueError {
                    field: var.to_string(),
                    value,
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }

    let client_id = require("CLIENT_ID")?;
    let seller_token = require("SELLER_TOKEN")?;

    Ok(SyncConfig {
        client_id,
        seller_token,
        api_url: lookup("OZON_API_URL").unwrap_or(base.api_url),
        remnants_url: lookup("REMNANTS_URL").unwrap_or(base.remnants_url),
        remnants_file: lookup("REMNANTS_FILE").unwrap_or(base.remnants_file),
        work_dir: lookup("SYNC_WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or(base.work_dir),
        header_row: base.header_row,
        stock_batch_size: parse_or(
            lookup("SYNC_STOCK_BATCH_SIZE"),
            "SYNC_STOCK_BATCH_SIZE",
            base.stock_batch_size,
        )?,
        price_batch_size: parse_or(
            lookup("SYNC_PRICE_BATCH_SIZE"),
            "SYNC_PRICE_BATCH_SIZE",
            base.price_batch_size,
        )?,
        request_timeout_secs: parse_or(
            lookup("SYNC_REQUEST_TIMEOUT_SECS"),
            "SYNC_REQUEST_TIMEOUT_SECS",
            base.request_timeout_secs,
        )?,
        max_list_pages: parse_or(
            lookup("SYNC_MAX_LIST_PAGES"),
            "SYNC_MAX_LIST_PAGES",
            base.max_list_pages,
        )?,
    })
}
