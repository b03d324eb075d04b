use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use marketplace_insights::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Nothing listens here; product routes never reach the model backend.
const UNUSED_BACKEND: &str = "http://127.0.0.1:9";

async fn spawn_app(ollama_url: &str) -> Router {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config.ollama.base_url = ollama_url.to_string();

    let state = marketplace_insights::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    marketplace_insights::api::router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create_product(app: &Router, body: Value) -> Value {
    let (status, product) = send(app, "POST", "/api/v1/products", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    product
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    serde_json::from_value(value.clone()).unwrap()
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "model": "llama3.2",
        "message": {"role": "assistant", "content": content},
        "done": true
    }))
}

#[tokio::test]
async fn test_product_crud_round_trip() {
    let app = spawn_app(UNUSED_BACKEND).await;

    let created = create_product(&app, json!({"name": "Widget", "marketplace": "Acme"})).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["marketplace"], "Acme");
    assert_eq!(created["created_at"], created["updated_at"]);

    let (status, fetched) = send(&app, "GET", &format!("/api/v1/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, deleted) = send(&app, "DELETE", &format!("/api/v1/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["success"], true);
    assert_eq!(deleted["message"], "Product deleted successfully");

    let (status, body) = send(&app, "GET", &format!("/api/v1/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Product not found");

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_merges_supplied_fields() {
    let app = spawn_app(UNUSED_BACKEND).await;

    let created = create_product(
        &app,
        json!({
            "name": "Widget",
            "marketplace": "Acme",
            "description": "Small widget",
            "category": "Tools",
            "metadata": {"color": "red"}
        }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/v1/products/{id}"),
        Some(json!({"price": 12.5, "description": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["price"], 12.5);
    assert!(updated["description"].is_null());
    assert_eq!(updated["category"], "Tools");
    assert_eq!(updated["metadata"], json!({"color": "red"}));
    assert_eq!(updated["created_at"], created["created_at"]);
    assert!(timestamp(&updated["updated_at"]) > timestamp(&created["updated_at"]));

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/products/{}", uuid::Uuid::new_v4()),
        Some(json!({"price": 1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Product not found");
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let app = spawn_app(UNUSED_BACKEND).await;

    let (status, body) = send(&app, "GET", "/api/v1/products/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid product identifier: 'not-an-id'");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/products",
        Some(json!({"name": "  ", "marketplace": "Acme"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/products",
        Some(json!({"name": "Widget", "marketplace": "Acme", "price": -3.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/products",
        Some(json!({"name": "Widget"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_filters_and_limits() {
    let app = spawn_app(UNUSED_BACKEND).await;

    let first = create_product(
        &app,
        json!({"name": "A", "marketplace": "Acme", "category": "Tools"}),
    )
    .await;
    create_product(
        &app,
        json!({"name": "B", "marketplace": "Other", "category": "Tools"}),
    )
    .await;
    let third = create_product(
        &app,
        json!({"name": "C", "marketplace": "Acme", "category": "Home"}),
    )
    .await;

    let (status, all) = send(&app, "GET", "/api/v1/products", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);

    let (_, acme) = send(&app, "GET", "/api/v1/products?marketplace=Acme", None).await;
    let acme = acme.as_array().unwrap();
    assert_eq!(acme.len(), 2);
    assert!(acme.iter().all(|p| p["marketplace"] == "Acme"));

    let (_, filtered) = send(
        &app,
        "GET",
        "/api/v1/products?marketplace=Acme&category=Home",
        None,
    )
    .await;
    assert_eq!(filtered.as_array().unwrap(), &vec![third]);

    let (_, limited) = send(&app, "GET", "/api/v1/products?skip=0&limit=1", None).await;
    assert_eq!(limited.as_array().unwrap(), &vec![first]);

    let (_, skipped) = send(&app, "GET", "/api/v1/products?skip=2", None).await;
    assert_eq!(skipped.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/api/v1/products?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/v1/products?limit=1001", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_insight_for_stored_product() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"model": "llama3.2", "stream": false})))
        .and(body_string_contains("Analyze the pricing strategy for this product:"))
        .and(body_string_contains("Price: $9.50"))
        .respond_with(chat_reply("Lower the price slightly."))
        .expect(1)
        .mount(&backend)
        .await;

    let app = spawn_app(&backend.uri()).await;
    let product = create_product(
        &app,
        json!({"name": "Widget", "marketplace": "Acme", "price": 9.5, "category": "Tools"}),
    )
    .await;
    let id = product["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/insights/generate",
        Some(json!({"product_id": id, "insight_type": "pricing_insight"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["product_id"], id);
    assert_eq!(body["insight"]["insight_type"], "pricing_insight");
    assert_eq!(body["insight"]["insight_content"], "Lower the price slightly.");
    assert_eq!(body["insight"]["product_name"], "Widget");
    assert_eq!(body["insight"]["metadata"]["model_used"], "llama3.2");
    assert_eq!(body["insight"]["metadata"]["price"], 9.5);
    assert_eq!(body["insight"]["metadata"]["category"], "Tools");
    assert_eq!(body["insight"]["metadata"]["marketplace"], "Acme");

    let (status, stored) = send(
        &app,
        "GET",
        &format!("/api/v1/insights/product/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["success"], true);
    assert_eq!(stored["product_id"], id);
    assert_eq!(stored["count"], 1);
    assert_eq!(
        stored["insights"][0]["insight_content"],
        "Lower the price slightly."
    );
    assert_eq!(stored["insights"][0]["metadata"]["model_used"], "llama3.2");
}

#[tokio::test]
async fn test_uppercase_product_id_finds_its_insights() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(chat_reply("Demand is steady."))
        .expect(1)
        .mount(&backend)
        .await;

    let app = spawn_app(&backend.uri()).await;
    let product = create_product(&app, json!({"name": "Widget", "marketplace": "Acme"})).await;
    let id = product["id"].as_str().unwrap();
    let upper = id.to_uppercase();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/insights/generate",
        Some(json!({"product_id": upper, "insight_type": "trend_analysis"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product_id"], id);

    let (status, stored) = send(
        &app,
        "GET",
        &format!("/api/v1/insights/product/{upper}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["product_id"], id);
    assert_eq!(stored["count"], 1);
    assert_eq!(stored["insights"][0]["insight_content"], "Demand is steady.");
}

#[tokio::test]
async fn test_generate_without_product_is_not_persisted() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("Provide comprehensive insights about this product:"))
        .and(body_string_contains("Product: Gadget"))
        .respond_with(chat_reply("Looks promising."))
        .expect(1)
        .mount(&backend)
        .await;

    let app = spawn_app(&backend.uri()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/insights/generate",
        Some(json!({"product_name": "Gadget", "insight_type": "mystery"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["product_id"].is_null());
    assert_eq!(body["insight"]["insight_type"], "mystery");
    assert_eq!(body["insight"]["product_name"], "Gadget");
    assert!(body["insight"]["metadata"]["price"].is_null());

    let (_, stored) = send(&app, "GET", "/api/v1/insights/product/Gadget", None).await;
    assert_eq!(stored["count"], 0);
}

#[tokio::test]
async fn test_generate_for_unknown_product_is_404() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(chat_reply("unused"))
        .expect(0)
        .mount(&backend)
        .await;

    let app = spawn_app(&backend.uri()).await;
    let missing = uuid::Uuid::new_v4().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/insights/generate",
        Some(json!({"product_id": missing})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Product not found");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/insights/generate",
        Some(json!({"product_id": "12345"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_backend_failure_surfaces_as_500_and_stores_nothing() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .expect(1)
        .mount(&backend)
        .await;

    let app = spawn_app(&backend.uri()).await;
    let product = create_product(&app, json!({"name": "Widget", "marketplace": "Acme"})).await;
    let id = product["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/insights/generate",
        Some(json!({"product_id": id})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error generating insight: "));
    assert!(detail.contains("model crashed"));

    let (_, stored) = send(
        &app,
        "GET",
        &format!("/api/v1/insights/product/{id}"),
        None,
    )
    .await;
    assert_eq!(stored["count"], 0);
}

#[tokio::test]
async fn test_compare_requires_two_products_and_calls_backend_once() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains(
            "Compare the following products focusing on: price, features, quality, value",
        ))
        .and(body_string_contains("Product 2:\\nname: B"))
        .respond_with(chat_reply("B is the better deal."))
        .expect(1)
        .mount(&backend)
        .await;

    let app = spawn_app(&backend.uri()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/insights/compare",
        Some(json!([{"name": "A"}])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "At least 2 products required for comparison");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/insights/compare",
        Some(json!([{"name": "A", "price": 10}, {"name": "B", "price": 8}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["comparison"], "B is the better deal.");
    assert_eq!(body["products_count"], 2);
}

#[tokio::test]
async fn test_compare_with_custom_aspects() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("focusing on: durability, warranty"))
        .respond_with(chat_reply("A lasts longer."))
        .expect(1)
        .mount(&backend)
        .await;

    let app = spawn_app(&backend.uri()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/insights/compare?aspects=durability,warranty",
        Some(json!([{"name": "A"}, {"name": "B"}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comparison"], "A lasts longer.");
}

#[tokio::test]
async fn test_list_models() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{"name": "llama3.2:latest"}, {"name": "mistral:7b"}]
        })))
        .expect(1)
        .mount(&backend)
        .await;

    let app = spawn_app(&backend.uri()).await;

    let (status, body) = send(&app, "GET", "/api/v1/insights/models", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["models"], json!(["llama3.2:latest", "mistral:7b"]));
    assert_eq!(body["current_model"], "llama3.2");
}

#[tokio::test]
async fn test_list_models_backend_down() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&backend)
        .await;

    let app = spawn_app(&backend.uri()).await;

    let (status, body) = send(&app, "GET", "/api/v1/insights/models", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Error fetching models: ")
    );
}

#[tokio::test]
async fn test_root_and_health() {
    let app = spawn_app(UNUSED_BACKEND).await;

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Agentic Marketplace Insights API",
            "version": "1.0.0",
            "status": "running"
        })
    );

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));

    let (status, body) = send(&app, "GET", "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["checks"]["database"], true);
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let app = spawn_app(UNUSED_BACKEND).await;

    let (status, _) = send(&app, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
