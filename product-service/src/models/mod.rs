pub mod product;

pub use product::{Product, ValidationError, KNOWN_CATEGORIES, PRODUCT_COLLECTION};
