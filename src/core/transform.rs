use crate::domain::model::{PriceUpdate, RemnantRecord, StockUpdate};
use crate::utils::error::{Result, SyncError};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Supplier marker for "more than ten on hand".
pub const PLENTY_MARKER: &str = ">10";
pub const PLENTY_STOCK: u32 = 100;
/// A single unit is held back as a display piece.
pub const LAST_UNIT_MARKER: &str = "1";

pub const DEFAULT_CURRENCY: &str = "RUB";
pub const DEFAULT_OLD_PRICE: &str = "0";
pub const DEFAULT_AUTO_ACTION: &str = "UNKNOWN";

static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("NON_DIGITS is a valid pattern"));

/// Maps a supplier quantity cell to a marketplace stock level.
pub fn stock_from_quantity(offer_id: &str, quantity: &str) -> Result<u32> {
    match quantity {
        PLENTY_MARKER => Ok(PLENTY_STOCK),
        LAST_UNIT_MARKER => Ok(0),
        other => other
            .trim()
            .parse::<u32>()
            .map_err(|_| SyncError::DataFormatError {
                offer_id: offer_id.to_string(),
                field: "quantity".to_string(),
                value: other.to_string(),
            }),
    }
}

/// Builds one stock update per catalog offer.
///
/// Rows whose SKU is in `offer_ids` come first, in row order; each catalog entry is
/// consumed by the first row that names it. Entries with no row follow with stock 0,
/// in catalog order.
pub fn create_stocks(records: &[RemnantRecord], offer_ids: &[String]) -> Result<Vec<StockUpdate>> {
    let mut available: HashMap<&str, usize> = HashMap::with_capacity(offer_ids.len());
    for id in offer_ids {
        *available.entry(id.as_str()).or_default() += 1;
    }
    let mut matched: HashMap<&str, usize> = HashMap::new();
    let mut stocks = Vec::with_capacity(offer_ids.len());

    for record in records {
        let sku = record.sku();
        match available.get_mut(sku) {
            Some(left) if *left > 0 => *left -= 1,
            _ => continue,
        }

        let stock = stock_from_quantity(sku, record.quantity())?;
        stocks.push(StockUpdate {
            offer_id: sku.to_string(),
            stock,
        });
        *matched.entry(sku).or_default() += 1;
    }

    // Matched rows consumed the earliest catalog entries for their SKU.
    for offer_id in offer_ids {
        if let Some(count) = matched.get_mut(offer_id.as_str()).filter(|count| **count > 0) {
            *count -= 1;
            continue;
        }
        stocks.push(StockUpdate {
            offer_id: offer_id.clone(),
            stock: 0,
        });
    }

    Ok(stocks)
}

/// Builds price updates for every row whose SKU is a catalog offer. Duplicate rows all pass.
pub fn create_prices(records: &[RemnantRecord], offer_ids: &[String]) -> Vec<PriceUpdate> {
    let known: HashSet<&str> = offer_ids.iter().map(String::as_str).collect();

    records
        .iter()
        .filter(|record| known.contains(record.sku()))
        .map(|record| PriceUpdate {
            auto_action_enabled: DEFAULT_AUTO_ACTION.to_string(),
            currency_code: DEFAULT_CURRENCY.to_string(),
            offer_id: record.sku().to_string(),
            old_price: DEFAULT_OLD_PRICE.to_string(),
            price: normalize_price(record.price()),
        })
        .collect()
}

/// Drops everything from the first `.` on, then every non-digit.
pub fn normalize_price(text: &str) -> String {
    let integer_part = text.split('.').next().unwrap_or_default();
    NON_DIGITS.replace_all(integer_part, "").into_owned()
}
