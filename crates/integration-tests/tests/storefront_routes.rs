//! Integration tests for the storefront HTTP router.
//!
//! Requests go through the full middleware stack (sessions, request IDs,
//! tracing) via `tower::ServiceExt::oneshot`, backed by in-memory stores.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use tower::ServiceExt;

use greengrocer_core::{Price, UserId};
use greengrocer_integration_tests::{
    APPLE, CountingPayments, SHOPPER_UID, cart_json, seeded_store, test_config,
};
use greengrocer_storefront::db::MemoryStore;
use greengrocer_storefront::middleware::{REQUEST_ID_HEADER, session_layer};
use greengrocer_storefront::routes;
use greengrocer_storefront::services::suggestions::{
    CategorySuggester, SuggestionError, SuggestionRequest,
};
use greengrocer_storefront::state::AppState;

const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgo=";

struct FixedSuggester;

#[async_trait]
impl CategorySuggester for FixedSuggester {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, SuggestionError> {
        Ok(vec![format!("{} produce", request.description), "Fresh".to_owned()])
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn app_with(store: &MemoryStore, suggester: Option<Arc<dyn CategorySuggester>>) -> Router {
    let state = AppState::builder(test_config(), Arc::new(store.clone()))
        .payments(CountingPayments::approving())
        .suggester(suggester)
        .build();
    routes::router(
        state,
        session_layer(tower_sessions::MemoryStore::default(), false),
    )
}

fn app(store: &MemoryStore) -> Router {
    app_with(store, None)
}

fn form_body(pairs: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn get(uri: &str) -> axum::http::request::Builder {
    Request::builder().method("GET").uri(uri)
}

fn post(uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` part of the session cookie, if the response set one.
fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}

// =============================================================================
// Health and Middleware
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = app(&seeded_store());

    let response = send(&app, get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/health/ready").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let app = app(&seeded_store());

    let response = send(
        &app,
        get("/health")
            .header(REQUEST_ID_HEADER, "edge-42")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(),
        "edge-42"
    );

    let response = send(&app, get("/health").body(Body::empty()).unwrap()).await;
    let generated = response.headers().get(REQUEST_ID_HEADER).unwrap();
    assert!(!generated.is_empty());
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_product_listing_filters() {
    let app = app(&seeded_store());

    let response = send(&app, get("/products").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await.as_array().unwrap().len(), 12);

    let response = send(
        &app,
        get("/products?category=fruits&subcategory=citrus")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let products = json(response).await;
    let names: Vec<&str> = products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Orange"]);

    let response = send(
        &app,
        get("/products?category=dairy").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_detail() {
    let app = app(&seeded_store());

    let response = send(&app, get("/products/1").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let product = json(response).await;
    assert_eq!(product["name"], "Apple");
    assert_eq!(product["price"], "2.50");

    let response = send(&app, get("/products/999").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(response).await["success"], false);
}

#[tokio::test]
async fn test_category_detail() {
    let app = app(&seeded_store());

    let response = send(&app, get("/categories").body(Body::empty()).unwrap()).await;
    assert_eq!(json(response).await.as_array().unwrap().len(), 2);

    let response = send(&app, get("/categories/vegetables").body(Body::empty()).unwrap()).await;
    let category = json(response).await;
    assert_eq!(category["name"], "Vegetables");
    assert!(
        category["products"]
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["category"] == "vegetables")
    );
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_cart_lives_in_session() {
    let app = app(&seeded_store());

    let response = send(
        &app,
        post("/cart/add")
            .body(Body::from(form_body(&[("productId", APPLE), ("quantity", "3")])))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).unwrap();

    let response = send(
        &app,
        post("/cart/add")
            .header(header::COOKIE, &cookie)
            .body(Body::from(form_body(&[("productId", APPLE)])))
            .unwrap(),
    )
    .await;
    let cart = json(response).await;
    assert_eq!(cart["itemCount"], 4);
    assert_eq!(cart["total"], "10.00");

    let response = send(
        &app,
        post("/cart/update")
            .header(header::COOKIE, &cookie)
            .body(Body::from(form_body(&[("productId", APPLE), ("quantity", "0")])))
            .unwrap(),
    )
    .await;
    assert_eq!(json(response).await["itemCount"], 0);

    // A fresh session starts empty.
    let response = send(&app, get("/cart").body(Body::empty()).unwrap()).await;
    assert_eq!(json(response).await["items"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_cart_rejects_unknown_product() {
    let app = app(&seeded_store());

    let response = send(
        &app,
        post("/cart/add")
            .body(Body::from(form_body(&[("productId", "999")])))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_places_order_and_clears_cart() {
    let store = seeded_store();
    let app = app(&store);

    let response = send(
        &app,
        post("/cart/add")
            .body(Body::from(form_body(&[("productId", APPLE), ("quantity", "4")])))
            .unwrap(),
    )
    .await;
    let cookie = session_cookie(&response).unwrap();

    let cart = cart_json(&[(APPLE, 4)]);
    let response = send(
        &app,
        post("/checkout")
            .header(header::COOKIE, &cookie)
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::from(form_body(&[
                ("userId", SHOPPER_UID),
                ("cartItems", cart.as_str()),
                ("shippingAddress", "addr1"),
                ("paymentMethod", "cod"),
                // Client-computed totals are ignored.
                ("total", "0.01"),
            ])))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["success"], true);
    assert!(body.get("error").is_none());

    let orders = store.orders().await;
    assert_eq!(orders.len(), 1);
    let order = orders.first().unwrap();
    assert_eq!(body["orderId"], order.id.as_str());
    assert_eq!(order.total, Price::from_cents(1000));

    let response = send(
        &app,
        get("/cart")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(json(response).await["itemCount"], 0);
}

#[tokio::test]
async fn test_checkout_requires_identity() {
    let store = seeded_store();
    let app = app(&store);

    let cart = cart_json(&[(APPLE, 1)]);
    let response = send(
        &app,
        post("/checkout")
            .body(Body::from(form_body(&[
                ("userId", SHOPPER_UID),
                ("cartItems", cart.as_str()),
                ("shippingAddress", "addr1"),
                ("paymentMethod", "cod"),
            ])))
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "You must be logged in to place an order.");
    assert!(body.get("orderId").is_none());
    assert!(store.orders().await.is_empty());
}

#[tokio::test]
async fn test_checkout_error_statuses() {
    let app = app(&seeded_store());
    let cart = cart_json(&[(APPLE, 1)]);

    let cases: [(&[(&str, &str)], StatusCode, &str); 4] = [
        (
            &[
                ("userId", SHOPPER_UID),
                ("cartItems", "[]"),
                ("shippingAddress", "addr1"),
                ("paymentMethod", "cod"),
            ],
            StatusCode::BAD_REQUEST,
            "Your cart is empty.",
        ),
        (
            &[
                ("userId", SHOPPER_UID),
                ("cartItems", cart.as_str()),
                ("shippingAddress", "addr9"),
                ("paymentMethod", "cod"),
            ],
            StatusCode::NOT_FOUND,
            "Shipping address not found.",
        ),
        (
            &[
                ("userId", SHOPPER_UID),
                ("cartItems", cart.as_str()),
                ("shippingAddress", "new"),
                ("newAddress.street", "1 Elm St"),
                ("newAddress.city", "Salem"),
                ("newAddress.state", "OR"),
                ("newAddress.zip", "973"),
                ("paymentMethod", "cod"),
            ],
            StatusCode::BAD_REQUEST,
            "Zip code must be 5 digits.",
        ),
        (
            &[
                ("userId", SHOPPER_UID),
                (
                    "cartItems",
                    r#"[{"id":"1","name":"Apple","price":"79228162514264337593543950335","quantity":2}]"#,
                ),
                ("shippingAddress", "addr1"),
                ("paymentMethod", "cod"),
            ],
            StatusCode::BAD_REQUEST,
            "Cart total is too large.",
        ),
    ];

    for (fields, status, message) in cases {
        let response = send(
            &app,
            post("/checkout")
                .header("x-forwarded-user", SHOPPER_UID)
                .body(Body::from(form_body(fields)))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), status, "{message}");
        assert_eq!(json(response).await["error"], message);
    }
}

#[tokio::test]
async fn test_checkout_unreadable_body_keeps_response_shape() {
    let store = seeded_store();
    let app = app(&store);
    let cart = cart_json(&[(APPLE, 1)]);

    let duplicate_user = send(
        &app,
        post("/checkout")
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::from(form_body(&[
                ("userId", SHOPPER_UID),
                ("userId", "someone-else"),
                ("cartItems", cart.as_str()),
                ("shippingAddress", "addr1"),
                ("paymentMethod", "cod"),
            ])))
            .unwrap(),
    )
    .await;
    let wrong_content_type = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/checkout")
            .header(header::CONTENT_TYPE, "text/plain")
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::from("userId=u1"))
            .unwrap(),
    )
    .await;

    for response in [duplicate_user, wrong_content_type] {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["error"],
            "Your order details could not be read. Please try again."
        );
        assert!(body.get("orderId").is_none());
    }
    assert!(store.orders().await.is_empty());
}

#[tokio::test]
async fn test_placed_order_can_be_fetched_by_owner_only() {
    let store = seeded_store();
    let app = app(&store);
    let cart = cart_json(&[(APPLE, 2)]);

    let response = send(
        &app,
        post("/checkout")
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::from(form_body(&[
                ("userId", SHOPPER_UID),
                ("cartItems", cart.as_str()),
                ("shippingAddress", "addr1"),
                ("paymentMethod", "cod"),
            ])))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let order_id = json(response).await["orderId"]
        .as_str()
        .unwrap()
        .to_owned();

    let response = send(
        &app,
        get(&format!("/account/orders/{order_id}"))
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let order = json(response).await;
    assert_eq!(order["id"], order_id.as_str());
    assert_eq!(order["paymentMethod"], "Cash on Delivery");

    let response = send(
        &app,
        get(&format!("/account/orders/{order_id}"))
            .header("x-forwarded-user", "u9")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        get("/account/orders/no-such-order")
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Account
// =============================================================================

#[tokio::test]
async fn test_account_requires_auth() {
    let app = app(&seeded_store());

    let response = send(&app, get("/account").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_account_created_on_first_visit() {
    let store = seeded_store();
    let app = app(&store);

    let response = send(
        &app,
        get("/account")
            .header("x-forwarded-user", "u9")
            .header("x-forwarded-email", "u9@example.com")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let account = json(response).await;
    assert_eq!(account["profile"]["displayName"], "New User");
    assert_eq!(account["orders"]["state"], "empty");

    assert!(store.profile(&UserId::new("u9")).await.is_some());
}

#[tokio::test]
async fn test_account_addresses_and_orders() {
    let app = app(&seeded_store());

    let response = send(
        &app,
        get("/account/addresses")
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let addresses = json(response).await;
    let ids: Vec<&str> = addresses
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["addr1", "addr2"]);

    let response = send(
        &app,
        get("/account/orders")
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(json(response).await, serde_json::json!({"state": "empty"}));
}

#[tokio::test]
async fn test_update_display_name() {
    let store = seeded_store();
    let app = app(&store);

    let response = send(
        &app,
        post("/account/profile")
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::from(form_body(&[("displayName", " J ")])))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json(response).await["error"],
        "Name must be at least 2 characters."
    );

    let response = send(
        &app,
        post("/account/profile")
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::from(form_body(&[("displayName", "Jo Green")])))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["success"], true);
    assert_eq!(
        store
            .profile(&UserId::new(SHOPPER_UID))
            .await
            .unwrap()
            .display_name,
        "Jo Green"
    );
}

// =============================================================================
// Admin
// =============================================================================

#[tokio::test]
async fn test_categorize_unconfigured() {
    let app = app(&seeded_store());

    let response = send(
        &app,
        post("/admin/categorize")
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::from(form_body(&[
                ("photoDataUri", PNG_DATA_URI),
                ("description", "Red apples"),
            ])))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_categorize_with_suggester() {
    let app = app_with(&seeded_store(), Some(Arc::new(FixedSuggester)));

    let response = send(
        &app,
        post("/admin/categorize")
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::from(form_body(&[
                ("photoDataUri", PNG_DATA_URI),
                ("description", "Red apples"),
            ])))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["categories"], serde_json::json!(["Red apples produce", "Fresh"]));

    let response = send(
        &app,
        post("/admin/categorize")
            .header("x-forwarded-user", SHOPPER_UID)
            .body(Body::from(form_body(&[
                ("photoDataUri", "not-a-data-uri"),
                ("description", "Red apples"),
            ])))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
