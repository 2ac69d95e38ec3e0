// catalog-client/tests/remote_catalog.rs
// 集成测试: RemoteCatalog 对接本地 axum 服务

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use catalog_client::{CatalogApi, ClientConfig, ClientError, ProductUpdate};
use rust_decimal::Decimal;
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
}

async fn list_products() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": [
            {
                "_id": "p1",
                "name": "Rice",
                "description": "Long grain",
                "price": 100,
                "category": {"_id": "c1", "name": "Grain"}
            },
            {
                "_id": "p2",
                "name": "Oil",
                "price": 200.5,
                "shippingCharge": 40,
                "category": {"_id": "c2", "name": "Pantry"},
                "subcategory": "s9"
            }
        ]
    }))
}

async fn list_categories() -> Json<Value> {
    Json(json!({"success": false, "message": "Categories unavailable"}))
}

async fn list_subcategories(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let category = params.get("category").cloned().unwrap_or_default();
    Json(json!({
        "success": true,
        "data": [{"_id": "s1", "name": format!("Sub of {category}"), "category": category}]
    }))
}

async fn remove_product(State(rec): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    rec.bodies.lock().unwrap().push(("remove".into(), body));
    Json(json!({"success": true, "message": "Food Removed"}))
}

async fn update_product(
    State(rec): State<Recorded>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    rec.bodies.lock().unwrap().push((format!("update:{id}"), body));
    if id == "missing" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": "Product not found"})),
        );
    }
    (StatusCode::OK, Json(json!({"success": true})))
}

async fn spawn_server() -> (String, Recorded) {
    let rec = Recorded::default();
    let app = Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/remove", post(remove_product))
        .route("/api/products/{id}", put(update_product))
        .route("/api/categories", get(list_categories))
        .route("/api/subcategories", get(list_subcategories))
        .route("/api/broken", get(|| async { (StatusCode::NOT_FOUND, "nothing here") }))
        .with_state(rec.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), rec)
}

fn sample_update() -> ProductUpdate {
    ProductUpdate {
        name: "Rice".into(),
        description: "Long grain".into(),
        price: Decimal::from_str("120.5").unwrap(),
        shipping_charge: Decimal::from(550),
        category: "c1".into(),
        subcategory: Some("s1".into()),
    }
}

#[tokio::test]
async fn test_list_products() {
    let (base, _) = spawn_server().await;
    let catalog = ClientConfig::new(base).build_catalog().unwrap();

    let products = catalog.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].category_name(), Some("Grain"));
    assert_eq!(products[1].price, Some(Decimal::from_str("200.5").unwrap()));
    assert_eq!(products[1].subcategory_id(), Some("s9"));
    assert_eq!(products[1].subcategory_name(), None);
}

#[tokio::test]
async fn test_application_failure_becomes_api_error() {
    let (base, _) = spawn_server().await;
    let catalog = ClientConfig::new(base).build_catalog().unwrap();

    let err = catalog.list_categories().await.unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(err.user_message(), "Categories unavailable");
}

#[tokio::test]
async fn test_subcategories_pass_category_query() {
    let (base, _) = spawn_server().await;
    let catalog = ClientConfig::new(base).build_catalog().unwrap();

    let subs = catalog.list_subcategories("c 7").await.unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].name, "Sub of c 7");
}

#[tokio::test]
async fn test_remove_posts_id() {
    let (base, rec) = spawn_server().await;
    let catalog = ClientConfig::new(base).build_catalog().unwrap();

    let message = catalog.remove_product("p1").await.unwrap();
    assert_eq!(message.as_deref(), Some("Food Removed"));

    let bodies = rec.bodies.lock().unwrap();
    assert_eq!(bodies[0], ("remove".to_string(), json!({"id": "p1"})));
}

#[tokio::test]
async fn test_update_sends_numeric_payload() {
    let (base, rec) = spawn_server().await;
    let catalog = ClientConfig::new(base).build_catalog().unwrap();

    let echoed = catalog.update_product("p1", &sample_update()).await.unwrap();
    assert!(echoed.is_none());

    let bodies = rec.bodies.lock().unwrap();
    let (route, body) = &bodies[0];
    assert_eq!(route, "update:p1");
    assert_eq!(body["price"].as_f64(), Some(120.5));
    assert_eq!(body["shippingCharge"].as_f64(), Some(550.0));
    assert_eq!(body["subcategory"], "s1");
}

#[tokio::test]
async fn test_error_status_with_envelope_keeps_message() {
    let (base, _) = spawn_server().await;
    let catalog = ClientConfig::new(base).build_catalog().unwrap();

    let err = catalog
        .update_product("missing", &sample_update())
        .await
        .unwrap_err();
    match err {
        ClientError::Api { message, status } => {
            assert_eq!(message, "Product not found");
            assert_eq!(status, Some(500));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_status_without_envelope() {
    use catalog_client::HttpClient;

    let (base, _) = spawn_server().await;
    let http = ClientConfig::new(base).build_http_client().unwrap();

    let err = http.get::<Value>(&["broken"], &[]).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(ref body) if body == "nothing here"));
}

#[tokio::test]
async fn test_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let catalog = ClientConfig::new(format!("http://{addr}"))
        .with_timeout(2)
        .build_catalog()
        .unwrap();
    let err = catalog.list_products().await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert!(!err.is_rejection());
}
