use crate::domain::model::SyncReport;
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SyncError};
use serde::Serialize;

pub const STOCKS_FILE: &str = "stocks.csv";
pub const PRICES_FILE: &str = "prices.csv";
pub const SUMMARY_FILE: &str = "summary.json";

fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| SyncError::IoError(e.into_error()))
}

/// Writes the computed payloads and a run summary; returns the written paths.
pub async fn write_report<S: Storage>(storage: &S, report: &SyncReport) -> Result<Vec<String>> {
    let summary = serde_json::json!({
        "started_at": report.started_at,
        "finished_at": report.finished_at,
        "dry_run": report.dry_run,
        "remnant_rows": report.remnant_rows,
        "catalog_offers": report.catalog_offers,
        "stock_updates": report.stocks.len(),
        "in_stock": report.in_stock().count(),
        "price_updates": report.prices.len(),
        "stock_batches": report.stock_batches,
        "price_batches": report.price_batches,
    });

    let written = vec![
        storage
            .write_file(STOCKS_FILE, &to_csv(&report.stocks)?)
            .await?,
        storage
            .write_file(PRICES_FILE, &to_csv(&report.prices)?)
            .await?,
        storage
            .write_file(SUMMARY_FILE, serde_json::to_string_pretty(&summary)?.as_bytes())
            .await?,
    ];

    tracing::debug!("Report files written: {:?}", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PriceUpdate, StockUpdate};
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(path.to_string())
        }
    }

    fn sample_report() -> SyncReport {
        SyncReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            remnant_rows: 2,
            catalog_offers: 2,
            stocks: vec![
                StockUpdate { offer_id: "123".into(), stock: 100 },
                StockUpdate { offer_id: "126".into(), stock: 0 },
            ],
            prices: vec![PriceUpdate {
                auto_action_enabled: "UNKNOWN".into(),
                currency_code: "RUB".into(),
                offer_id: "123".into(),
                old_price: "0".into(),
                price: "5000".into(),
            }],
            stock_batches: 1,
            price_batches: 1,
            dry_run: true,
        }
    }

    #[tokio::test]
    async fn test_write_report_produces_csv_and_summary() {
        let storage = MockStorage::default();

        let written = write_report(&storage, &sample_report()).await.unwrap();

        assert_eq!(written, vec!["stocks.csv", "prices.csv", "summary.json"]);
        let files = storage.files.lock().await;

        let stocks = String::from_utf8(files["stocks.csv"].clone()).unwrap();
        assert_eq!(stocks, "offer_id,stock\n123,100\n126,0\n");

        let prices = String::from_utf8(files["prices.csv"].clone()).unwrap();
        assert!(prices.starts_with("auto_action_enabled,currency_code,offer_id,old_price,price\n"));
        assert!(prices.contains("UNKNOWN,RUB,123,0,5000"));

        let summary: serde_json::Value = serde_json::from_slice(&files["summary.json"]).unwrap();
        assert_eq!(summary["in_stock"], 1);
        assert_eq!(summary["dry_run"], true);
    }
}
