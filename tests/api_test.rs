//! Router-level tests.
//!
//! Requests go through the real router, middleware and services; storage is
//! the in-memory repositories from `common` and the database handle is a
//! disconnected placeholder only the health endpoint touches.

mod common;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{test_config, InMemoryUnitOfWork};
use food_truck_api::api::{create_router, AppState};
use food_truck_api::domain::UserRole;
use food_truck_api::infra::{CacheStore, Database, MemoryCache};
use food_truck_api::services::Services;

const PASSWORD: &str = "secret123";

struct TestApp {
    router: Router,
    uow: InMemoryUnitOfWork,
}

struct TestResponse {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    body: Value,
}

impl TestApp {
    fn new() -> Self {
        let uow = InMemoryUnitOfWork::default();
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
        let services = Services::from_parts(Arc::new(uow.clone()), cache.clone(), test_config());
        let database = Arc::new(Database::from_connection(DatabaseConnection::Disconnected));

        let state = AppState::new(Arc::new(services), cache, database);
        Self {
            router: create_router(state),
            uow,
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn login(&self, username: &str, password: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "username={}&password={}",
                username, password
            )))
            .unwrap();
        self.send(request).await
    }

    /// Seed a user with `role` and return a bearer token for it.
    async fn token_for(&self, username: &str, role: UserRole) -> String {
        self.uow.seed_user(username, PASSWORD, role).await;
        let response = self.login(username, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["access_token"].as_str().unwrap().to_string()
    }

    async fn create_product(&self, token: &str, name: &str, price: &str) -> String {
        let response = self
            .call(
                "POST",
                "/api/v1/products",
                Some(token),
                Some(json!({ "name": name, "price": price, "category": "food" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["id"].as_str().unwrap().to_string()
    }
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn token_endpoint_issues_bearer_tokens() {
    let app = TestApp::new();
    app.uow.seed_user("maria", PASSWORD, UserRole::Attendant).await;

    let response = app.login("maria", PASSWORD).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token_type"], "bearer");
    assert_eq!(response.body["expires_in"], 30 * 60);
    assert_eq!(response.body["user"]["username"], "maria");
    assert_eq!(response.body["user"]["role"], "attendant");
}

#[tokio::test]
async fn wrong_password_is_unauthorized_with_challenge() {
    let app = TestApp::new();
    app.uow.seed_user("maria", PASSWORD, UserRole::Attendant).await;

    let response = app.login("maria", "not-the-password").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(error_message(&response.body), "Incorrect username or password");

    let unknown = app.login("nobody", PASSWORD).await;
    assert_eq!(error_message(&unknown.body), "Incorrect username or password");
}

#[tokio::test]
async fn blank_credentials_are_unprocessable() {
    let app = TestApp::new();

    let response = app.login("", "").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = TestApp::new();

    let missing = app.call("GET", "/api/v1/orders", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&missing.body), "Not authenticated");

    let forged = app
        .call("GET", "/api/v1/orders", Some("not-a-jwt"), None)
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&forged.body), "Could not validate credentials");
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn only_admins_manage_users() {
    let app = TestApp::new();
    let kitchen = app.token_for("cook", UserRole::Kitchen).await;

    let response = app.call("GET", "/api/v1/users", Some(&kitchen), None).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_user_lifecycle() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;

    let created = app
        .call(
            "POST",
            "/api/v1/users",
            Some(&admin),
            Some(json!({
                "username": "joao",
                "email": "joao@foodtruck.test",
                "password": "hunter22",
                "role": "kitchen"
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["action"], "created");
    let id = created.body["id"].as_str().unwrap().to_string();

    let updated = app
        .call(
            "PATCH",
            &format!("/api/v1/users/{}", id),
            Some(&admin),
            Some(json!({ "full_name": "João Souza" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["full_name"], "João Souza");
    assert_eq!(updated.body["role"], "kitchen");
    assert!(updated.body.get("password_hash").is_none());

    let list = app.call("GET", "/api/v1/users", Some(&admin), None).await;
    assert_eq!(list.body["pagination"]["total_count"], 2);

    // The new account can log in with its own password
    assert_eq!(app.login("joao", "hunter22").await.status, StatusCode::OK);

    let deleted = app
        .call("DELETE", &format!("/api/v1/users/{}", id), Some(&admin), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({ "id": id, "action": "deleted" }));

    let gone = app
        .call("GET", &format!("/api/v1/users/{}", id), Some(&admin), None)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&gone.body), "User not found");
}

#[tokio::test]
async fn invalid_user_payload_is_unprocessable() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;

    let response = app
        .call(
            "POST",
            "/api/v1/users",
            Some(&admin),
            Some(json!({
                "username": "x",
                "email": "not-an-email",
                "password": "123",
                "role": "admin"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn product_names_are_unique() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;
    app.create_product(&admin, "X-Burger", "25.90").await;

    let duplicate = app
        .call(
            "POST",
            "/api/v1/products",
            Some(&admin),
            Some(json!({ "name": "X-Burger", "price": "19.90", "category": "food" })),
        )
        .await;

    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(error_message(&duplicate.body), "Product already exists");
}

#[tokio::test]
async fn staff_read_but_cannot_change_products() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;
    let attendant = app.token_for("ana", UserRole::Attendant).await;
    let id = app.create_product(&admin, "Soda", "6.00").await;

    let list = app
        .call("GET", "/api/v1/products", Some(&attendant), None)
        .await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body["items"][0]["name"], "Soda");

    let update = app
        .call(
            "PATCH",
            &format!("/api/v1/products/{}", id),
            Some(&attendant),
            Some(json!({ "price": "1.00" })),
        )
        .await;
    assert_eq!(update.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn product_update_is_visible_on_next_read() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;
    let id = app.create_product(&admin, "Fries", "12.00").await;
    let uri = format!("/api/v1/products/{}", id);

    // Prime the cache
    let before = app.call("GET", &uri, Some(&admin), None).await;
    assert_eq!(decimal(&before.body["price"]), Decimal::new(1200, 2));

    let put = app
        .call("PUT", &uri, Some(&admin), Some(json!({ "price": "14.50" })))
        .await;
    assert_eq!(put.status, StatusCode::OK);
    assert_eq!(put.body, json!({ "id": id, "action": "updated" }));

    let after = app.call("GET", &uri, Some(&admin), None).await;
    assert_eq!(decimal(&after.body["price"]), Decimal::new(1450, 2));
    assert_eq!(after.body["name"], "Fries");
}

#[tokio::test]
async fn non_positive_price_is_rejected() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;

    let response = app
        .call(
            "POST",
            "/api/v1/products",
            Some(&admin),
            Some(json!({ "name": "Free lunch", "price": "0", "category": "food" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn prices_that_do_not_fit_the_money_column_are_rejected() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;

    let fractional = app
        .call(
            "POST",
            "/api/v1/products",
            Some(&admin),
            Some(json!({ "name": "Gum", "price": "0.004", "category": "food" })),
        )
        .await;
    assert_eq!(fractional.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        error_message(&fractional.body),
        "Price must have at most 2 decimal places"
    );

    let huge = app
        .call(
            "POST",
            "/api/v1/products",
            Some(&admin),
            Some(json!({ "name": "Truck", "price": "100000000", "category": "food" })),
        )
        .await;
    assert_eq!(huge.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_message(&huge.body), "Price must be less than 100000000");
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn order_lifecycle() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;
    let attendant = app.token_for("ana", UserRole::Attendant).await;
    let kitchen = app.token_for("cook", UserRole::Kitchen).await;

    let burger = app.create_product(&admin, "X-Burger", "25.90").await;
    let soda = app.create_product(&admin, "Soda", "6.00").await;

    let created = app
        .call(
            "POST",
            "/api/v1/orders",
            Some(&attendant),
            Some(json!({
                "items": [
                    { "product_id": burger, "quantity": 2 },
                    { "product_id": soda, "quantity": 3 }
                ],
                "notes": "No onions"
            })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/orders/{}", id);

    let order = app.call("GET", &uri, Some(&kitchen), None).await;
    assert_eq!(order.status, StatusCode::OK);
    assert_eq!(order.body["status"], "pending");
    assert_eq!(decimal(&order.body["total"]), Decimal::new(6980, 2));
    assert_eq!(order.body["items"].as_array().unwrap().len(), 2);

    let locator = order.body["locator"].as_str().unwrap();
    assert_eq!(locator.len(), 4);
    assert!(locator.chars().next().unwrap().is_ascii_uppercase());
    assert!(locator[1..].chars().all(|c| c.is_ascii_digit()));

    let items = app
        .call("GET", &format!("{}/items?limit=1", uri), Some(&kitchen), None)
        .await;
    assert_eq!(items.status, StatusCode::OK);
    assert_eq!(items.body["items"].as_array().unwrap().len(), 1);
    assert_eq!(items.body["pagination"]["total_count"], 2);
    assert_eq!(items.body["pagination"]["total_pages"], 2);

    let processing = app
        .call(
            "PATCH",
            &uri,
            Some(&kitchen),
            Some(json!({ "status": "processing" })),
        )
        .await;
    assert_eq!(processing.status, StatusCode::OK);
    assert_eq!(processing.body["action"], "updated");

    let kitchen_delete = app.call("DELETE", &uri, Some(&kitchen), None).await;
    assert_eq!(kitchen_delete.status, StatusCode::FORBIDDEN);

    let in_progress = app.call("DELETE", &uri, Some(&attendant), None).await;
    assert_eq!(in_progress.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&in_progress.body), "Order is not pending");

    // Any status may follow any other, including back to pending
    let reopened = app
        .call(
            "PATCH",
            &uri,
            Some(&attendant),
            Some(json!({ "status": "pending" })),
        )
        .await;
    assert_eq!(reopened.status, StatusCode::OK);

    let deleted = app.call("DELETE", &uri, Some(&attendant), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["action"], "deleted");

    let gone = app.call("GET", &uri, Some(&admin), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&gone.body), "Order not found");
}

#[tokio::test]
async fn kitchen_cannot_place_orders() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;
    let kitchen = app.token_for("cook", UserRole::Kitchen).await;
    let soda = app.create_product(&admin, "Soda", "6.00").await;

    let response = app
        .call(
            "POST",
            "/api/v1/orders",
            Some(&kitchen),
            Some(json!({ "items": [{ "product_id": soda, "quantity": 1 }] })),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_orders_are_unprocessable() {
    let app = TestApp::new();
    let attendant = app.token_for("ana", UserRole::Attendant).await;

    let unknown = app
        .call(
            "POST",
            "/api/v1/orders",
            Some(&attendant),
            Some(json!({ "items": [{ "product_id": "missing", "quantity": 1 }] })),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_message(&unknown.body), "Product not found");

    let empty = app
        .call(
            "POST",
            "/api/v1/orders",
            Some(&attendant),
            Some(json!({ "items": [] })),
        )
        .await;
    assert_eq!(empty.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_message(&empty.body), "Order must have at least one item");

    let bad_rating = app
        .call(
            "PATCH",
            "/api/v1/orders/anything",
            Some(&attendant),
            Some(json!({ "rating": 9 })),
        )
        .await;
    assert_eq!(bad_rating.status, StatusCode::UNPROCESSABLE_ENTITY);

    let too_many = app
        .call(
            "POST",
            "/api/v1/orders",
            Some(&attendant),
            Some(json!({ "items": [{ "product_id": "missing", "quantity": 1001 }] })),
        )
        .await;
    assert_eq!(too_many.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_message(&too_many.body), "Quantity must be between 1 and 1000");
}

#[tokio::test]
async fn order_total_beyond_the_money_column_is_rejected() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;
    let caviar = app.create_product(&admin, "Caviar", "99999999.99").await;

    let response = app
        .call(
            "POST",
            "/api/v1/orders",
            Some(&admin),
            Some(json!({ "items": [{ "product_id": caviar, "quantity": 2 }] })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_message(&response.body), "Order total is too large");

    let listed = app.call("GET", "/api/v1/orders", Some(&admin), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert!(listed.body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_limit_is_clamped() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;

    let response = app
        .call("GET", "/api/v1/orders?offset=0&limit=500", Some(&admin), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["pagination"]["limit"], 100);
    assert_eq!(response.body["pagination"]["total_count"], 0);
    assert_eq!(response.body["pagination"]["page"], 1);
}

// =============================================================================
// Public feeds and setup
// =============================================================================

#[tokio::test]
async fn public_feeds_need_no_token() {
    let app = TestApp::new();
    let admin = app.token_for("boss", UserRole::Admin).await;
    let soda = app.create_product(&admin, "Soda", "6.00").await;
    app.create_product(&admin, "Brownie", "9.00").await;

    let created = app
        .call(
            "POST",
            "/api/v1/orders",
            Some(&admin),
            Some(json!({ "items": [{ "product_id": soda, "quantity": 2 }] })),
        )
        .await;
    let order_id = created.body["id"].as_str().unwrap().to_string();

    let unrated = app.call("GET", "/api/v1/public/orders", None, None).await;
    assert_eq!(unrated.status, StatusCode::OK);
    assert_eq!(unrated.body, json!([]));

    app.call(
        "PATCH",
        &format!("/api/v1/orders/{}", order_id),
        Some(&admin),
        Some(json!({ "rating": 5 })),
    )
    .await;

    let rated = app.call("GET", "/api/v1/public/orders", None, None).await;
    assert_eq!(
        rated.body,
        json!([{ "product_id": soda, "quantity": 2, "rating": 5 }])
    );

    let catalogue = app.call("GET", "/api/v1/public/products", None, None).await;
    assert_eq!(catalogue.status, StatusCode::OK);
    let names: Vec<&str> = catalogue
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Brownie", "Soda"]);
}

#[tokio::test]
async fn setup_runs_once_and_returns_working_passwords() {
    let app = TestApp::new();

    let first = app.call("POST", "/api/v1/setup", None, None).await;
    assert_eq!(first.status, StatusCode::CREATED);
    let accounts = first.body.as_array().unwrap();
    assert_eq!(accounts.len(), 2);

    let admin = accounts
        .iter()
        .find(|a| a["username"] == "admin")
        .unwrap();
    assert_eq!(admin["role"], "admin");
    let password = admin["password"].as_str().unwrap();
    assert_eq!(app.login("admin", password).await.status, StatusCode::OK);

    let second = app.call("POST", "/api/v1/setup", None, None).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(error_message(&second.body), "Setup already completed");
}

// =============================================================================
// Cross-cutting
// =============================================================================

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = TestApp::new();

    let response = app.call("GET", "/", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert_eq!(response.headers["x-xss-protection"], "1; mode=block");
}

#[tokio::test]
async fn health_reports_each_dependency() {
    let app = TestApp::new();

    let response = app.call("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "degraded");
    assert_eq!(response.body["services"]["cache"]["status"], "healthy");
    assert_eq!(response.body["services"]["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new();

    let response = app.call("GET", "/api-docs/openapi.json", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["info"]["title"], "Food Truck API");
    assert!(response.body["paths"]["/api/v1/orders/{id}/items"].is_object());
}
