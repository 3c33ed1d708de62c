use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Request timed out: {0}")]
    TimeoutError(#[source] reqwest::Error),

    #[error("Connection failed: {0}")]
    ConnectionError(#[source] reqwest::Error),

    #[error("API request failed: {0}")]
    NetworkError(#[source] reqwest::Error),

    #[error("HTTP {status} returned by {url}: {body}")]
    HttpError {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Archive is corrupted: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    #[error("Spreadsheet parsing failed: {message}")]
    SpreadsheetError { message: String },

    #[error("Invalid {field} {value:?} for offer {offer_id}")]
    DataFormatError {
        offer_id: String,
        field: String,
        value: String,
    },

    #[error("Expected file not found after extraction: {path}")]
    MissingFileError { path: String },

    #[error("Catalog pagination stalled at cursor {cursor:?}: collected {collected} of {total} offers")]
    PaginationStalled {
        cursor: String,
        collected: usize,
        total: usize,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::TimeoutError(err)
        } else if err.is_connect() {
            SyncError::ConnectionError(err)
        } else {
            SyncError::NetworkError(err)
        }
    }
}

impl From<calamine::Error> for SyncError {
    fn from(err: calamine::Error) -> Self {
        SyncError::SpreadsheetError {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Remote,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::TimeoutError(_)
            | SyncError::ConnectionError(_)
            | SyncError::NetworkError(_) => ErrorCategory::Network,
            SyncError::HttpError { .. } | SyncError::PaginationStalled { .. } => {
                ErrorCategory::Remote
            }
            SyncError::ArchiveError(_)
            | SyncError::SpreadsheetError { .. }
            | SyncError::DataFormatError { .. }
            | SyncError::MissingFileError { .. }
            | SyncError::CsvError(_)
            | SyncError::SerializationError(_) => ErrorCategory::Data,
            SyncError::ConfigError { .. }
            | SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SyncError::IoError(_) => ErrorCategory::System,
        }
    }

    /// Transient failures are `Medium`: running again later may succeed.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SyncError::TimeoutError(_)
            | SyncError::ConnectionError(_)
            | SyncError::NetworkError(_) => ErrorSeverity::Medium,
            SyncError::HttpError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            SyncError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SyncError::TimeoutError(_))
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, SyncError::ConnectionError(_))
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::TimeoutError(_) => {
                "The server did not answer in time; retry later or raise SYNC_REQUEST_TIMEOUT_SECS"
            }
            SyncError::ConnectionError(_) | SyncError::NetworkError(_) => {
                "Check network connectivity and the configured endpoints"
            }
            SyncError::HttpError { status, .. } => match *status {
                401 | 403 => "Check CLIENT_ID and SELLER_TOKEN",
                429 => "The marketplace is rate limiting requests; retry later",
                s if s >= 500 => "The remote server failed; retry later",
                _ => "Inspect the response body for the rejected request",
            },
            SyncError::ArchiveError(_) => "The downloaded archive is broken; retry the download",
            SyncError::SpreadsheetError { .. } | SyncError::MissingFileError { .. } => {
                "The supplier file layout may have changed; check REMNANTS_FILE and the header row"
            }
            SyncError::DataFormatError { .. } => {
                "Fix the offending row in the supplier spreadsheet"
            }
            SyncError::PaginationStalled { .. } => {
                "The catalog listing did not advance; retry later or raise SYNC_MAX_LIST_PAGES"
            }
            SyncError::CsvError(_) | SyncError::IoError(_) => {
                "Check that the working and report directories are writable"
            }
            SyncError::SerializationError(_) => "The marketplace returned an unexpected payload",
            SyncError::ConfigError { .. }
            | SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. } => {
                "Review environment variables and the configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SyncError::TimeoutError(_) => "Timed out waiting for the server".to_string(),
            SyncError::ConnectionError(err) => format!("Connection error: {}", err),
            _ => format!("Sync failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
