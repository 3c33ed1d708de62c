use crate::config::SyncConfig;
use crate::utils::error::{Result, SyncError};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional file layer. Credentials are not read from here; they come from the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub marketplace: Option<MarketplaceSection>,
    pub remnants: Option<RemnantsSection>,
    pub batching: Option<BatchingSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketplaceSection {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_list_pages: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemnantsSection {
    pub url: Option<String>,
    pub file_name: Option<String>,
    pub header_row: Option<usize>,
    pub work_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchingSection {
    pub stock_batch_size: Option<usize>,
    pub price_batch_size: Option<usize>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| SyncError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SyncError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Overlays the values present in the file onto `base`.
    pub fn apply_to(&self, mut base: SyncConfig) -> SyncConfig {
        if let Some(marketplace) = &self.marketplace {
            if let Some(api_url) = &marketplace.api_url {
                base.api_url = api_url.clone();
            }
            if let Some(timeout) = marketplace.request_timeout_secs {
                base.request_timeout_secs = timeout;
            }
            if let Some(pages) = marketplace.max_list_pages {
                base.max_list_pages = pages;
            }
        }

        if let Some(remnants) = &self.remnants {
            if let Some(url) = &remnants.url {
                base.remnants_url = url.clone();
            }
            if let Some(file_name) = &remnants.file_name {
                base.remnants_file = file_name.clone();
            }
            if let Some(header_row) = remnants.header_row {
                base.header_row = header_row;
            }
            if let Some(work_dir) = &remnants.work_dir {
                base.work_dir = work_dir.clone();
            }
        }

        if let Some(batching) = &self.batching {
            if let Some(size) = batching.stock_batch_size {
                base.stock_batch_size = size;
            }
            if let Some(size) = batching.price_batch_size {
                base.price_batch_size = size;
            }
        }

        base
    }
}
