// Adapters layer: concrete implementations of the domain ports (marketplace HTTP, supplier file, local disk).

pub mod ozon;
pub mod remnants;
pub mod storage;

pub use ozon::OzonClient;
pub use remnants::RemnantsFetcher;
pub use storage::LocalStorage;
