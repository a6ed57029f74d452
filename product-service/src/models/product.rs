use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use validator::Validate;

/// Collection holding product documents.
pub const PRODUCT_COLLECTION: &str = "product";

/// Labels the storefront groups products under. Not enforced on input.
pub const KNOWN_CATEGORIES: [&str; 3] = ["Minimal", "Anime", "Christian"];

/// Input that failed to produce a [`Product`], with the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        fields
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    ValidationError::new(field.to_string(), message)
                })
            })
            .unwrap_or_else(|| ValidationError::new("body", errors.to_string()))
    }
}

/// A product as persisted. Identifier and timestamps belong to the store and
/// are not part of this record.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct Product {
    #[validate(length(min = 1, message = "ensure this value has at least 1 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "ensure this value is greater than or equal to 0"))]
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
}

impl Product {
    /// Builds a validated product from an untyped JSON body.
    ///
    /// Fields are checked in declaration order and the first failure is
    /// returned. Unknown fields (including `_id` and timestamps) are ignored.
    pub fn parse(value: Value) -> Result<Self, ValidationError> {
        let Value::Object(fields) = value else {
            return Err(ValidationError::new("body", "value is not a valid object"));
        };

        let product = Product {
            title: required(&fields, "title")?,
            description: optional(&fields, "description")?,
            price: required_number(&fields, "price")?,
            category: required(&fields, "category")?,
            in_stock: flag(&fields, "in_stock", true)?,
            image_url: optional(&fields, "image_url")?,
            tags: optional(&fields, "tags")?.unwrap_or_default(),
        };

        product.validate()?;
        Ok(product)
    }

    pub fn has_known_category(&self) -> bool {
        KNOWN_CATEGORIES.contains(&self.category.as_str())
    }
}

fn required<'a, T: Deserialize<'a>>(
    fields: &'a Map<String, Value>,
    name: &str,
) -> Result<T, ValidationError> {
    optional(fields, name)?.ok_or_else(|| ValidationError::new(name, "field required"))
}

/// Like [`required`], but numeric text such as `"9.99"` is read as a number.
fn required_number(fields: &Map<String, Value>, name: &str) -> Result<f64, ValidationError> {
    let number = match fields.get(name) {
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| ValidationError::new(name, "value is not a valid float"))?,
        _ => optional(fields, name)?,
    };
    number.ok_or_else(|| ValidationError::new(name, "field required"))
}

/// Boolean with a default when absent. Accepts `true`/`false`, `0`/`1` and the
/// usual textual spellings; an explicit null is rejected.
fn flag(fields: &Map<String, Value>, name: &str, default: bool) -> Result<bool, ValidationError> {
    let invalid = || ValidationError::new(name, "value could not be parsed to a boolean");
    match fields.get(name) {
        None => Ok(default),
        Some(Value::Null) => Err(ValidationError::new(name, "none is not an allowed value")),
        Some(Value::Bool(value)) => Ok(*value),
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Ok(true),
            "false" | "f" | "no" | "n" | "off" | "0" => Ok(false),
            _ => Err(invalid()),
        },
        Some(Value::Number(n)) => match n.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(invalid()),
        },
        Some(_) => Err(invalid()),
    }
}

// Absent and null are treated alike.
fn optional<'a, T: Deserialize<'a>>(
    fields: &'a Map<String, Value>,
    name: &str,
) -> Result<Option<T>, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|e| ValidationError::new(name, e.to_string())),
    }
}
