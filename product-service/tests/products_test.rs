mod common;

use common::TestApp;
use serde_json::{json, Value};

async fn list(app: &TestApp, query: &str) -> Vec<Value> {
    let response = app.get(&format!("/api/products{}", query)).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["items"].as_array().expect("items array").clone()
}

#[tokio::test]
async fn create_without_title_is_rejected() {
    let app = TestApp::spawn_without_store().await;

    let response = app
        .post_json("/api/products", &json!({ "price": 9.99, "category": "Minimal" }))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "title: field required");
}

#[tokio::test]
async fn create_with_non_numeric_price_is_rejected() {
    let app = TestApp::spawn_without_store().await;

    let response = app
        .post_json(
            "/api/products",
            &json!({ "title": "T", "price": "free", "category": "Minimal" }),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().starts_with("price: "));
}

#[tokio::test]
async fn malformed_json_is_rejected_with_detail() {
    let app = TestApp::spawn_without_store().await;

    let response = app
        .client()
        .post(format!("{}/api/products", app.address))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn create_without_store_is_a_client_error() {
    let app = TestApp::spawn_without_store().await;

    let response = app
        .post_json(
            "/api/products",
            &json!({ "title": "T", "price": 9.99, "category": "Minimal" }),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Database not available");
}

#[tokio::test]
async fn list_without_store_is_a_server_error() {
    let app = TestApp::spawn_without_store().await;

    let response = app.get("/api/products").await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Database not available");
}

#[tokio::test]
async fn create_against_unreachable_store_is_a_client_error() {
    let app = TestApp::spawn_with_unreachable_store().await;

    let response = app
        .post_json(
            "/api/products",
            &json!({ "title": "T", "price": 9.99, "category": "Minimal" }),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    let detail = body["detail"].as_str().expect("detail text");
    assert!(detail.starts_with("Failed to persist document"), "{}", detail);
}

#[tokio::test]
async fn list_against_unreachable_store_is_a_server_error() {
    let app = TestApp::spawn_with_unreachable_store().await;

    let response = app.get("/api/products?category=Anime").await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    let detail = body["detail"].as_str().expect("detail text");
    assert!(detail.starts_with("Failed to query documents"), "{}", detail);
}

#[tokio::test]
async fn lax_scalar_fields_are_coerced_before_the_store_is_reached() {
    let app = TestApp::spawn_without_store().await;

    // A coerced payload gets past parsing and fails only on the missing store.
    let response = app
        .post_json(
            "/api/products",
            &json!({ "title": "T", "price": "9.99", "category": "Minimal", "in_stock": "false" }),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Database not available");
}

#[tokio::test]
async fn null_stock_flag_is_rejected() {
    let app = TestApp::spawn_without_store().await;

    let response = app
        .post_json(
            "/api/products",
            &json!({ "title": "T", "price": 1, "category": "Minimal", "in_stock": null }),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "in_stock: none is not an allowed value");
}

#[tokio::test]
async fn non_integer_limit_is_rejected() {
    let app = TestApp::spawn_without_store().await;

    let response = app.get("/api/products?limit=many").await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn created_product_round_trips() {
    let app = TestApp::spawn_with_store().await;

    let response = app
        .post_json(
            "/api/products",
            &json!({ "title": "T", "price": 9.99, "category": "Minimal" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["status"], "created");
    let id = created["id"].as_str().expect("id as text").to_string();

    let items = list(&app, "").await;
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item["_id"], id.as_str());
    assert_eq!(item["title"], "T");
    assert_eq!(item["price"], 9.99);
    assert_eq!(item["category"], "Minimal");
    assert_eq!(item["in_stock"], true);
    assert_eq!(item["tags"], json!([]));
    assert!(item["created_at"].is_string());
    assert!(item["updated_at"].is_string());

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn rejected_payloads_persist_nothing() {
    let app = TestApp::spawn_with_store().await;

    for payload in [
        json!({ "price": 1.0, "category": "Minimal" }),
        json!({ "title": "T", "category": "Minimal" }),
        json!({ "title": "T", "price": -1.0, "category": "Minimal" }),
    ] {
        let response = app.post_json("/api/products", &payload).await;
        assert_eq!(response.status(), 400, "payload {} accepted", payload);
    }

    assert!(list(&app, "").await.is_empty());

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn category_filter_is_exact_and_case_sensitive() {
    let app = TestApp::spawn_with_store().await;

    for (title, category) in [("A", "Anime"), ("B", "anime"), ("C", "Minimal"), ("D", "Anime")] {
        let response = app
            .post_json(
                "/api/products",
                &json!({ "title": title, "price": 5, "category": category }),
            )
            .await;
        assert_eq!(response.status(), 200);
    }

    let items = list(&app, "?category=Anime").await;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item["category"] == "Anime"));

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn limit_caps_the_result_size() {
    let app = TestApp::spawn_with_store().await;

    for i in 0..5 {
        app.post_json(
            "/api/products",
            &json!({ "title": format!("P{}", i), "price": i, "category": "Christian" }),
        )
        .await;
    }

    assert_eq!(list(&app, "?limit=2").await.len(), 2);
    assert_eq!(list(&app, "").await.len(), 5);

    app.cleanup().await;
}
