pub mod diagnostics;
pub mod products;
pub mod root;

pub use diagnostics::diagnostics;
pub use products::{create_product, list_products};
pub use root::{health_check, hello, metrics_endpoint, not_found, readiness_check, root};
