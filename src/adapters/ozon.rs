use crate::config::SyncConfig;
use crate::domain::model::{ImportResponse, PriceUpdate, ProductListPage, StockUpdate};
use crate::domain::ports::Catalog;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PRODUCT_LIST_PATH: &str = "/v2/product/list";
pub const IMPORT_PRICES_PATH: &str = "/v1/product/import/prices";
pub const IMPORT_STOCKS_PATH: &str = "/v1/product/import/stocks";
pub const PRODUCT_LIST_LIMIT: u32 = 1000;

#[derive(Debug, Serialize)]
struct ProductListFilter<'a> {
    visibility: &'a str,
}

#[derive(Debug, Serialize)]
struct ProductListRequest<'a> {
    filter: ProductListFilter<'a>,
    last_id: &'a str,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct ProductListResponse {
    result: ProductListPage,
}

#[derive(Debug, Serialize)]
struct PricesRequest<'a> {
    prices: &'a [PriceUpdate],
}

#[derive(Debug, Serialize)]
struct StocksRequest<'a> {
    stocks: &'a [StockUpdate],
}

/// HTTP client for the Ozon Seller API.
pub struct OzonClient {
    client: Client,
    base_url: String,
    client_id: String,
    api_key: String,
    max_list_pages: usize,
}

impl OzonClient {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            api_key: config.seller_token.clone(),
            max_list_pages: config.max_list_pages,
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Ozon API request to {} failed with {}: {}", path, status, body);
            return Err(SyncError::HttpError {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn log_rejections(kind: &str, response: &ImportResponse) {
        for rejected in response.rejected() {
            let reasons: Vec<&str> = rejected.errors.iter().map(|e| e.code.as_str()).collect();
            tracing::warn!(
                "⚠️ {} update for offer {} was not applied: {}",
                kind,
                rejected.offer_id,
                reasons.join(", ")
            );
        }
    }
}

#[async_trait]
impl Catalog for OzonClient {
    async fn list_products(&self, last_id: &str) -> Result<ProductListPage> {
        let request = ProductListRequest {
            filter: ProductListFilter { visibility: "ALL" },
            last_id,
            limit: PRODUCT_LIST_LIMIT,
        };

        let response: ProductListResponse = self.post(PRODUCT_LIST_PATH, &request).await?;
        tracing::debug!(
            "Fetched {} products (total {}, next cursor {:?})",
            response.result.items.len(),
            response.result.total,
            response.result.last_id
        );
        Ok(response.result)
    }

    async fn collect_all_offer_ids(&self) -> Result<Vec<String>> {
        let mut offer_ids = Vec::new();
        let mut cursor = String::new();
        let mut pages = 0usize;

        loop {
            let page = self.list_products(&cursor).await?;
            pages += 1;

            let received = page.items.len();
            offer_ids.extend(page.items.into_iter().map(|item| item.offer_id));

            if offer_ids.len() >= page.total {
                break;
            }

            // The listing must make progress on every call, otherwise we would loop forever.
            if received == 0 || page.last_id == cursor || pages >= self.max_list_pages {
                return Err(SyncError::PaginationStalled {
                    cursor: page.last_id,
                    collected: offer_ids.len(),
                    total: page.total,
                });
            }

            cursor = page.last_id;
        }

        tracing::info!("📦 Catalog lists {} offers ({} pages)", offer_ids.len(), pages);
        Ok(offer_ids)
    }

    async fn update_prices(&self, prices: &[PriceUpdate]) -> Result<ImportResponse> {
        let response: ImportResponse = self
            .post(IMPORT_PRICES_PATH, &PricesRequest { prices })
            .await?;
        Self::log_rejections("Price", &response);
        Ok(response)
    }

    async fn update_stocks(&self, stocks: &[StockUpdate]) -> Result<ImportResponse> {
        let response: ImportResponse = self
            .post(IMPORT_STOCKS_PATH, &StocksRequest { stocks })
            .await?;
        Self::log_rejections("Stock", &response);
        Ok(response)
    }
}
