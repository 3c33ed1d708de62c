pub mod batch;
pub mod report;
pub mod sync;
pub mod transform;

pub use crate::domain::model::{PriceUpdate, RemnantRecord, StockUpdate, SyncReport};
pub use crate::domain::ports::{Catalog, RemnantsSource, Storage};
pub use crate::utils::error::Result;
