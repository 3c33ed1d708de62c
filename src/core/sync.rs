use crate::config::{SyncConfig, MAX_PRICES_PER_REQUEST, MAX_STOCKS_PER_REQUEST};
use crate::core::batch::{chunk_count, divide};
use crate::core::transform::{create_prices, create_stocks};
use crate::domain::model::{PriceUpdate, RemnantRecord, StockUpdate, SyncReport};
use crate::domain::ports::{Catalog, RemnantsSource};
use crate::utils::error::Result;
use crate::utils::validation::validate_positive_number;
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub stock_batch_size: usize,
    pub price_batch_size: usize,
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            stock_batch_size: config.stock_batch_size,
            price_batch_size: config.price_batch_size,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

/// Runs one synchronization: remnants, catalog, stocks, prices.
///
/// The first failing step aborts the run. Batches already accepted by the
/// marketplace stay applied.
pub struct SyncEngine<C: Catalog, R: RemnantsSource> {
    catalog: C,
    remnants: R,
    options: SyncOptions,
}

impl<C: Catalog, R: RemnantsSource> SyncEngine<C, R> {
    pub fn new(catalog: C, remnants: R, options: SyncOptions) -> Self {
        Self {
            catalog,
            remnants,
            options,
        }
    }

    pub async fn run(&self) -> Result<SyncReport> {
        let started_at = Utc::now();
        tracing::info!("Starting stock sync{}", if self.options.dry_run { " (dry run)" } else { "" });

        tracing::info!("Fetching supplier remnants...");
        let records = self.remnants.download_remnants().await?;

        tracing::info!("Fetching catalog offers...");
        let offer_ids = self.catalog.collect_all_offer_ids().await?;

        let stocks = create_stocks(&records, &offer_ids)?;
        tracing::info!(
            "Computed {} stock updates ({} in stock)",
            stocks.len(),
            stocks.iter().filter(|s| s.stock != 0).count()
        );
        let stock_batches = self
            .push_stocks(&stocks, self.options.stock_batch_size)
            .await?;

        let prices = create_prices(&records, &offer_ids);
        tracing::info!("Computed {} price updates", prices.len());
        let price_batches = self
            .push_prices(&prices, self.options.price_batch_size)
            .await?;

        Ok(SyncReport {
            started_at,
            finished_at: Utc::now(),
            remnant_rows: records.len(),
            catalog_offers: offer_ids.len(),
            stocks,
            prices,
            stock_batches,
            price_batches,
            dry_run: self.options.dry_run,
        })
    }

    /// Fetches the catalog, pushes stocks in marketplace-sized batches and returns
    /// `(in_stock, all)`.
    pub async fn upload_stocks(
        &self,
        records: &[RemnantRecord],
    ) -> Result<(Vec<StockUpdate>, Vec<StockUpdate>)> {
        let offer_ids = self.catalog.collect_all_offer_ids().await?;
        let stocks = create_stocks(records, &offer_ids)?;
        self.push_stocks(&stocks, MAX_STOCKS_PER_REQUEST).await?;

        let in_stock = stocks.iter().filter(|s| s.stock != 0).cloned().collect();
        Ok((in_stock, stocks))
    }

    /// Fetches the catalog, pushes prices in marketplace-sized batches and returns them.
    pub async fn upload_prices(&self, records: &[RemnantRecord]) -> Result<Vec<PriceUpdate>> {
        let offer_ids = self.catalog.collect_all_offer_ids().await?;
        let prices = create_prices(records, &offer_ids);
        self.push_prices(&prices, MAX_PRICES_PER_REQUEST).await?;
        Ok(prices)
    }

    async fn push_stocks(&self, stocks: &[StockUpdate], chunk_size: usize) -> Result<usize> {
        validate_positive_number("stock_batch_size", chunk_size, 1)?;
        let total = chunk_count(stocks.len(), chunk_size);

        if self.options.dry_run {
            tracing::info!("Dry run: skipping {} stock batches", total);
            return Ok(0);
        }

        for (i, batch) in divide(stocks, chunk_size).enumerate() {
            tracing::debug!("Sending stock batch {}/{} ({} items)", i + 1, total, batch.len());
            self.catalog.update_stocks(batch).await?;
        }
        tracing::info!("✅ Sent {} stock batches", total);
        Ok(total)
    }

    async fn push_prices(&self, prices: &[PriceUpdate], chunk_size: usize) -> Result<usize> {
        validate_positive_number("price_batch_size", chunk_size, 1)?;
        let total = chunk_count(prices.len(), chunk_size);

        if self.options.dry_run {
            tracing::info!("Dry run: skipping {} price batches", total);
            return Ok(0);
        }

        for (i, batch) in divide(prices, chunk_size).enumerate() {
            tracing::debug!("Sending price batch {}/{} ({} items)", i + 1, total, batch.len());
            self.catalog.update_prices(batch).await?;
        }
        tracing::info!("✅ Sent {} price batches", total);
        Ok(total)
    }
}
