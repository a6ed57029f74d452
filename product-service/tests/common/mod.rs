#![allow(dead_code)]

use product_service::config::{ProductConfig, StoreConfig};
use product_service::services::DocumentStore;
use product_service::Application;
use service_core::config::Config as CoreConfig;
use uuid::Uuid;

pub const TEST_MONGODB_URI: &str = "mongodb://localhost:27017";

/// Nothing listens on port 1, so every store operation fails after a short
/// server selection wait.
pub const UNREACHABLE_MONGODB_URI: &str = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: DocumentStore,
    pub db_name: Option<String>,
    client: reqwest::Client,
}

impl TestApp {
    /// App with no store configured, as when DATABASE_URL is unset.
    pub async fn spawn_without_store() -> Self {
        Self::spawn(StoreConfig::default()).await
    }

    /// App bound to a fresh database on a local MongoDB.
    pub async fn spawn_with_store() -> Self {
        let db_name = format!("product_test_{}", Uuid::new_v4().simple());
        Self::spawn(StoreConfig {
            uri: Some(TEST_MONGODB_URI.to_string()),
            database: Some(db_name),
        })
        .await
    }

    /// App whose store handle exists but cannot reach a server.
    pub async fn spawn_with_unreachable_store() -> Self {
        Self::spawn(StoreConfig {
            uri: Some(UNREACHABLE_MONGODB_URI.to_string()),
            database: Some("product_unreachable".to_string()),
        })
        .await
    }

    async fn spawn(store: StoreConfig) -> Self {
        let db_name = store.database.clone();
        let config = ProductConfig {
            common: CoreConfig { port: 0 }, // Random port for testing
            store,
            otlp_endpoint: None,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let store = app.store().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            db_name,
            client,
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Drop the per-test database.
    pub async fn cleanup(&self) {
        if let Some(db) = self.store.database() {
            let _ = db.drop(None).await;
        }
    }
}
