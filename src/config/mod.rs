pub mod env;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_name, validate_positive_number, validate_range, validate_secret, validate_url,
    Validate,
};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api-seller.ozon.ru";
pub const DEFAULT_REMNANTS_URL: &str = "https://timeworld.ru/upload/files/ostatki.zip";
pub const DEFAULT_REMNANTS_FILE: &str = "ostatki.xls";
pub const DEFAULT_HEADER_ROW: usize = 17;
pub const DEFAULT_STOCK_BATCH_SIZE: usize = 100;
pub const DEFAULT_PRICE_BATCH_SIZE: usize = 900;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_LIST_PAGES: usize = 10_000;

/// Marketplace caps per import request.
pub const MAX_STOCKS_PER_REQUEST: usize = 100;
pub const MAX_PRICES_PER_REQUEST: usize = 1000;

/// Everything a sync run needs. Built once at startup and handed to each component.
#[derive(Clone)]
pub struct SyncConfig {
    pub client_id: String,
    pub seller_token: String,
    pub api_url: String,
    pub remnants_url: String,
    pub remnants_file: String,
    pub work_dir: PathBuf,
    pub header_row: usize,
    pub stock_batch_size: usize,
    pub price_batch_size: usize,
    pub request_timeout_secs: u64,
    pub max_list_pages: usize,
}

impl SyncConfig {
    pub fn new(client_id: impl Into<String>, seller_token: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            seller_token: seller_token.into(),
            ..Self::default()
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            seller_token: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            remnants_url: DEFAULT_REMNANTS_URL.to_string(),
            remnants_file: DEFAULT_REMNANTS_FILE.to_string(),
            work_dir: PathBuf::from("."),
            header_row: DEFAULT_HEADER_ROW,
            stock_batch_size: DEFAULT_STOCK_BATCH_SIZE,
            price_batch_size: DEFAULT_PRICE_BATCH_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_list_pages: DEFAULT_MAX_LIST_PAGES,
        }
    }
}

// Manual impl keeps the token out of logs.
impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("client_id", &self.client_id)
            .field("seller_token", &"****")
            .field("api_url", &self.api_url)
            .field("remnants_url", &self.remnants_url)
            .field("remnants_file", &self.remnants_file)
            .field("work_dir", &self.work_dir)
            .field("header_row", &self.header_row)
            .field("stock_batch_size", &self.stock_batch_size)
            .field("price_batch_size", &self.price_batch_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_list_pages", &self.max_list_pages)
            .finish()
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validate_secret("CLIENT_ID", &self.client_id)?;
        validate_secret("SELLER_TOKEN", &self.seller_token)?;
        validate_url("api_url", &self.api_url)?;
        validate_url("remnants_url", &self.remnants_url)?;
        validate_file_name("remnants_file", &self.remnants_file)?;
        validate_range(
            "stock_batch_size",
            self.stock_batch_size,
            1,
            MAX_STOCKS_PER_REQUEST,
        )?;
        validate_range(
            "price_batch_size",
            self.price_batch_size,
            1,
            MAX_PRICES_PER_REQUEST,
        )?;
        validate_positive_number("request_timeout_secs", self.request_timeout_secs as usize, 1)?;
        validate_positive_number("max_list_pages", self.max_list_pages, 1)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "watch-stock-sync")]
#[command(about = "Push supplier watch stock and prices to the Ozon catalog")]
pub struct CliArgs {
    #[arg(long, help = "TOML file with endpoint and batching overrides")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Compute updates without sending them")]
    pub dry_run: bool,

    #[arg(long, help = "Write stocks.csv and prices.csv into this directory")]
    pub report_dir: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}
