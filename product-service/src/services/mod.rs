pub mod metrics;
pub mod store;

pub use metrics::{get_metrics, init_metrics, record_product_created, record_products_listed};
pub use store::{DocumentStore, StoreError};
