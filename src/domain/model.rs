use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const SKU_COLUMN: &str = "Код";
pub const QUANTITY_COLUMN: &str = "Количество";
pub const PRICE_COLUMN: &str = "Цена";

/// One supplier spreadsheet row keyed by header text. Missing cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemnantRecord {
    pub data: HashMap<String, String>,
}

impl RemnantRecord {
    pub fn field(&self, column: &str) -> &str {
        self.data.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn sku(&self) -> &str {
        self.field(SKU_COLUMN)
    }

    pub fn quantity(&self) -> &str {
        self.field(QUANTITY_COLUMN)
    }

    pub fn price(&self) -> &str {
        self.field(PRICE_COLUMN)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RemnantRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub offer_id: String,
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub auto_action_enabled: String,
    pub currency_code: String,
    pub offer_id: String,
    pub old_price: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub product_id: i64,
    pub offer_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListPage {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub last_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub offer_id: String,
    #[serde(default)]
    pub updated: bool,
    #[serde(default)]
    pub errors: Vec<ImportError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    #[serde(default)]
    pub result: Vec<ImportResult>,
}

impl ImportResponse {
    pub fn rejected(&self) -> impl Iterator<Item = &ImportResult> {
        self.result.iter().filter(|r| !r.updated || !r.errors.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub remnant_rows: usize,
    pub catalog_offers: usize,
    pub stocks: Vec<StockUpdate>,
    pub prices: Vec<PriceUpdate>,
    pub stock_batches: usize,
    pub price_batches: usize,
    pub dry_run: bool,
}

impl SyncReport {
    pub fn in_stock(&self) -> impl Iterator<Item = &StockUpdate> {
        self.stocks.iter().filter(|s| s.stock != 0)
    }
}
