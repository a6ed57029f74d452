use mongodb::bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Store-assigned fields rendered as text before leaving the service.
const TEXT_FIELDS: [&str; 3] = ["_id", "created_at", "updated_at"];

#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub id: String,
    pub status: &'static str,
}

impl CreateProductResponse {
    pub fn created(id: String) -> Self {
        Self {
            id,
            status: "created",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsParams {
    pub category: Option<String>,
    pub limit: Option<i64>,
}

impl ListProductsParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }

    /// Exact, case-sensitive match on `category`; empty when no category is given.
    pub fn filter(&self) -> Document {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => doc! { "category": category },
            _ => Document::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    pub items: Vec<Value>,
}

/// Converts a stored document to JSON, with identifier and timestamps as text.
pub fn item_from_document(mut document: Document) -> Value {
    for field in TEXT_FIELDS {
        if let Some(value) = document.get(field) {
            let text = bson_to_text(value);
            document.insert(field, text);
        }
    }
    Bson::Document(document).into_relaxed_extjson()
}

fn bson_to_text(value: &Bson) -> String {
    match value {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .unwrap_or_else(|_| dt.to_string()),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}
