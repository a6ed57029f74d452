pub mod products;

pub use products::{
    item_from_document, CreateProductResponse, ListProductsParams, ListProductsResponse,
    DEFAULT_LIST_LIMIT,
};
