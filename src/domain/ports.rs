use crate::domain::model::{
    ImportResponse, PriceUpdate, ProductListPage, RemnantRecord, StockUpdate,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Marketplace catalog operations.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_products(&self, last_id: &str) -> Result<ProductListPage>;
    async fn collect_all_offer_ids(&self) -> Result<Vec<String>>;
    async fn update_prices(&self, prices: &[PriceUpdate]) -> Result<ImportResponse>;
    async fn update_stocks(&self, stocks: &[StockUpdate]) -> Result<ImportResponse>;
}

#[async_trait]
pub trait RemnantsSource: Send + Sync {
    async fn download_remnants(&self) -> Result<Vec<RemnantRecord>>;
}
