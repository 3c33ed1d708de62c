use anyhow::Result;
use httpmock::prelude::*;
use std::io::Write;
use tempfile::TempDir;
use watch_stock_sync::core::report::write_report;
use watch_stock_sync::{
    LocalStorage, OzonClient, RemnantsFetcher, SyncConfig, SyncEngine, SyncError, SyncOptions,
};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Supplier sheet: 17 preamble lines, then the header, then data rows.
fn remnants_csv(rows: &[(&str, &str, &str)]) -> String {
    let mut lines: Vec<String> = (0..17).map(|i| format!("Прайс-лист строка {}", i)).collect();
    lines.push("Код,Наименование,Количество,Цена".to_string());
    for (sku, quantity, price) in rows {
        lines.push(format!("{},Часы {},{},{}", sku, sku, quantity, price));
    }
    lines.join("\n")
}

fn zip_with(name: &str, content: &[u8]) -> Vec<u8> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file(name, SimpleFileOptions::default()).unwrap();
    zip.write_all(content).unwrap();
    zip.finish().unwrap().into_inner()
}

fn config_for(server: &MockServer, work_dir: &TempDir) -> SyncConfig {
    let mut config = SyncConfig::new("client-42", "token-42");
    config.api_url = server.base_url();
    config.remnants_url = server.url("/upload/files/ostatki.zip");
    config.remnants_file = "ostatki.csv".to_string();
    config.work_dir = work_dir.path().to_path_buf();
    config.request_timeout_secs = 10;
    config
}

#[tokio::test]
async fn test_end_to_end_sync_against_mock_marketplace() -> Result<()> {
    let work_dir = TempDir::new()?;
    let server = MockServer::start();

    let archive = zip_with(
        "ostatki.csv",
        remnants_csv(&[
            ("123", ">10", "5000.00"),
            ("124", "1", "7000.50 руб."),
            ("125", "5", "1200.00"),
        ])
        .as_bytes(),
    );
    let download_mock = server.mock(|when, then| {
        when.method(GET).path("/upload/files/ostatki.zip");
        then.status(200)
            .header("Content-Type", "application/zip")
            .body(archive);
    });

    let list_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2/product/list")
            .header("Client-Id", "client-42")
            .header("Api-Key", "token-42");
        then.status(200).json_body(serde_json::json!({
            "result": {
                "items": [
                    {"product_id": 1, "offer_id": "123"},
                    {"product_id": 2, "offer_id": "124"},
                    {"product_id": 3, "offer_id": "126"}
                ],
                "total": 3,
                "last_id": "end"
            }
        }));
    });

    let stocks_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/product/import/stocks")
            .header("Client-Id", "client-42")
            .json_body(serde_json::json!({
                "stocks": [
                    {"offer_id": "123", "stock": 100},
                    {"offer_id": "124", "stock": 0},
                    {"offer_id": "126", "stock": 0}
                ]
            }));
        then.status(200).json_body(serde_json::json!({
            "result": [
                {"product_id": 1, "offer_id": "123", "updated": true, "errors": []},
                {"product_id": 2, "offer_id": "124", "updated": true, "errors": []},
                {"product_id": 3, "offer_id": "126", "updated": false,
                 "errors": [{"code": "NOT_FOUND", "message": "offer archived"}]}
            ]
        }));
    });

    let prices_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/product/import/prices").json_body(serde_json::json!({
            "prices": [
                {"auto_action_enabled": "UNKNOWN", "currency_code": "RUB",
                 "offer_id": "123", "old_price": "0", "price": "5000"},
                {"auto_action_enabled": "UNKNOWN", "currency_code": "RUB",
                 "offer_id": "124", "old_price": "0", "price": "7000"}
            ]
        }));
        then.status(200).json_body(serde_json::json!({"result": []}));
    });

    let config = config_for(&server, &work_dir);
    let engine = SyncEngine::new(
        OzonClient::new(&config)?,
        RemnantsFetcher::new(&config)?,
        SyncOptions::from_config(&config),
    );

    let report = engine.run().await?;

    download_mock.assert();
    list_mock.assert();
    stocks_mock.assert();
    prices_mock.assert();

    assert_eq!(report.remnant_rows, 3);
    assert_eq!(report.catalog_offers, 3);
    assert_eq!(report.stock_batches, 1);
    assert_eq!(report.price_batches, 1);

    // The extracted sheet is gone after the run.
    assert!(!work_dir.path().join("ostatki.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_dry_run_writes_report_without_uploading() -> Result<()> {
    let work_dir = TempDir::new()?;
    let report_dir = TempDir::new()?;
    let server = MockServer::start();

    let archive = zip_with(
        "ostatki.csv",
        remnants_csv(&[("A1", "3", "990.00")]).as_bytes(),
    );
    server.mock(|when, then| {
        when.method(GET).path("/upload/files/ostatki.zip");
        then.status(200).body(archive);
    });
    server.mock(|when, then| {
        when.method(POST).path("/v2/product/list");
        then.status(200).json_body(serde_json::json!({
            "result": {"items": [{"product_id": 9, "offer_id": "A1"}], "total": 1, "last_id": "x"}
        }));
    });
    let stocks_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/product/import/stocks");
        then.status(200).json_body(serde_json::json!({"result": []}));
    });
    let prices_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/product/import/prices");
        then.status(200).json_body(serde_json::json!({"result": []}));
    });

    let config = config_for(&server, &work_dir);
    let engine = SyncEngine::new(
        OzonClient::new(&config)?,
        RemnantsFetcher::new(&config)?,
        SyncOptions::from_config(&config).with_dry_run(true),
    );

    let report = engine.run().await?;
    let storage = LocalStorage::new(report_dir.path().to_str().unwrap().to_string());
    let written = write_report(&storage, &report).await?;

    stocks_mock.assert_hits(0);
    prices_mock.assert_hits(0);
    assert_eq!(written.len(), 3);

    let stocks = std::fs::read_to_string(report_dir.path().join("stocks.csv"))?;
    assert_eq!(stocks, "offer_id,stock\nA1,3\n");
    let prices = std::fs::read_to_string(report_dir.path().join("prices.csv"))?;
    assert!(prices.contains("A1,0,990"));
    Ok(())
}

#[tokio::test]
async fn test_catalog_failure_stops_before_uploads() -> Result<()> {
    let work_dir = TempDir::new()?;
    let server = MockServer::start();

    let archive = zip_with("ostatki.csv", remnants_csv(&[("1", "2", "3")]).as_bytes());
    server.mock(|when, then| {
        when.method(GET).path("/upload/files/ostatki.zip");
        then.status(200).body(archive);
    });
    server.mock(|when, then| {
        when.method(POST).path("/v2/product/list");
        then.status(401).body("unauthorized");
    });
    let stocks_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/product/import/stocks");
        then.status(200).json_body(serde_json::json!({"result": []}));
    });

    let config = config_for(&server, &work_dir);
    let engine = SyncEngine::new(
        OzonClient::new(&config)?,
        RemnantsFetcher::new(&config)?,
        SyncOptions::from_config(&config),
    );

    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, SyncError::HttpError { status: 401, .. }));
    assert_eq!(err.recovery_suggestion(), "Check CLIENT_ID and SELLER_TOKEN");
    stocks_mock.assert_hits(0);
    Ok(())
}
