//! Best-effort environment report behind `GET /test`.
//!
//! Each check yields a plain value; [`DiagnosticReport::build`] folds them into
//! the response and has no failure path, so the endpoint always answers 200.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::StoreConfig;
use crate::services::{DocumentStore, StoreError};
use crate::startup::AppState;

const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

/// Outcome of probing the document store.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseCheck {
    /// No store handle was constructed.
    NotInitialized,
    Working { collections: Vec<String> },
    Failed { error: String },
}

impl DatabaseCheck {
    pub async fn run(store: &DocumentStore) -> Self {
        if !store.is_available() {
            return DatabaseCheck::NotInitialized;
        }
        match store.list_collections().await {
            Ok(collections) => DatabaseCheck::Working { collections },
            Err(e) => {
                tracing::warn!("Diagnostic collection listing failed: {}", e);
                // Report the driver's own message, without the store's prefix.
                let error = match e {
                    StoreError::Query(source) => source.to_string(),
                    other => other.to_string(),
                };
                DatabaseCheck::Failed { error }
            }
        }
    }
}

/// Whether the two store settings were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigCheck {
    pub database_url: bool,
    pub database_name: bool,
}

impl ConfigCheck {
    pub fn run(store: &StoreConfig) -> Self {
        Self {
            database_url: store.is_uri_set(),
            database_name: store.is_database_set(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

impl DiagnosticReport {
    pub fn build(database: DatabaseCheck, config: ConfigCheck) -> Self {
        let (database, connection_status, collections) = match database {
            DatabaseCheck::NotInitialized => (
                "⚠️  Available but not initialized".to_string(),
                "Not Connected",
                Vec::new(),
            ),
            DatabaseCheck::Working { mut collections } => {
                collections.truncate(MAX_COLLECTIONS);
                ("✅ Connected & Working".to_string(), "Connected", collections)
            }
            DatabaseCheck::Failed { error } => (
                format!(
                    "⚠️  Connected but Error: {}",
                    truncate_chars(&error, MAX_ERROR_CHARS)
                ),
                "Connected",
                Vec::new(),
            ),
        };

        Self {
            backend: "✅ Running".to_string(),
            database,
            database_url: set_marker(config.database_url),
            database_name: set_marker(config.database_name),
            connection_status: connection_status.to_string(),
            collections,
        }
    }
}

fn set_marker(is_set: bool) -> String {
    let marker = if is_set { "✅ Set" } else { "❌ Not Set" };
    marker.to_string()
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticReport> {
    let database = DatabaseCheck::run(&state.store).await;
    let config = ConfigCheck::run(&state.config.store);
    Json(DiagnosticReport::build(database, config))
}
