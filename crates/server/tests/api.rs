use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::ServerState;

async fn test_app() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::app(ServerState::new(engine, 3))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header("x-account-id", caller);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_account(app: &Router, name: &str, balance_minor: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/account/create",
        None,
        Some(json!({ "name": name, "balance_minor": balance_minor })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn account_create_read_list() {
    let app = test_app().await;
    let id = create_account(&app, "Alice", 100_00).await;

    let (status, body) = send(&app, "GET", &format!("/account/read/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["balance_minor"], 100_00);

    let (status, body) = send(&app, "GET", "/account/list", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accounts"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/account/read/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn account_create_rejects_empty_name() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/account/create",
        None,
        Some(json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn caller_scoped_routes_require_header() {
    let app = test_app().await;
    create_account(&app, "Alice", 0).await;

    for uri in ["/account/my", "/account/balance", "/account/mutation"] {
        let (status, _) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        let (status, _) = send(&app, "GET", uri, Some("alice"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }

    let (status, _) = send(
        &app,
        "POST",
        "/account/transfer",
        None,
        Some(json!({ "to_account_id": 1, "amount_minor": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn transfer_flow_end_to_end() {
    let app = test_app().await;
    let a = create_account(&app, "A", 100_00).await;
    let b = create_account(&app, "B", 50_00).await;
    let caller = a.to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/account/transfer",
        Some(&caller),
        Some(json!({ "to_account_id": b, "amount_minor": 30_00 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["from_account_id"], a);
    assert_eq!(body["to_account_id"], b);
    assert_eq!(body["amount_minor"], 30_00);

    let (status, body) = send(&app, "GET", "/account/balance", Some(&caller), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance_minor"], 70_00);

    let (_, body) = send(&app, "GET", &format!("/account/read/{b}"), None, None).await;
    assert_eq!(body["balance_minor"], 80_00);

    let (status, body) = send(&app, "GET", "/account/mutation", Some(&caller), None).await;
    assert_eq!(status, StatusCode::OK);
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["to_account_id"], b);

    let (status, body) = send(&app, "GET", "/account/my", Some(&caller), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], a);
}

#[tokio::test]
async fn transfer_errors_map_to_statuses() {
    let app = test_app().await;
    let a = create_account(&app, "A", 10_00).await;
    let b = create_account(&app, "B", 0).await;
    let caller = a.to_string();

    let cases = [
        (json!({ "to_account_id": b, "amount_minor": 10_01 }), StatusCode::UNPROCESSABLE_ENTITY),
        (json!({ "to_account_id": b, "amount_minor": 0 }), StatusCode::BAD_REQUEST),
        (json!({ "to_account_id": a, "amount_minor": 1 }), StatusCode::BAD_REQUEST),
        (json!({ "to_account_id": 999, "amount_minor": 1 }), StatusCode::NOT_FOUND),
    ];
    for (payload, expected) in cases {
        let (status, body) = send(
            &app,
            "POST",
            "/account/transfer",
            Some(&caller),
            Some(payload),
        )
        .await;
        assert_eq!(status, expected);
        assert!(body["error"].is_string());
    }

    let (_, body) = send(&app, "GET", "/account/balance", Some(&caller), None).await;
    assert_eq!(body["balance_minor"], 10_00);
}

#[tokio::test]
async fn top_up_returns_new_balance() {
    let app = test_app().await;
    let a = create_account(&app, "A", 1_00).await;

    let (status, body) = send(
        &app,
        "POST",
        "/account/topup",
        None,
        Some(json!({ "account_id": a, "amount_minor": 2_50 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance_minor"], 3_50);

    let (status, _) = send(
        &app,
        "POST",
        "/account/topup",
        None,
        Some(json!({ "account_id": a, "amount_minor": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn categories_and_admin_transactions() {
    let app = test_app().await;
    let a = create_account(&app, "A", 10_00).await;

    let (status, body) = send(
        &app,
        "POST",
        "/transaction-category/create",
        None,
        Some(json!({ "name": "Food" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/transaction-category/read/{category_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Food");

    let (_, body) = send(&app, "GET", "/transaction-category/list", None, None).await;
    assert_eq!(body["categories"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "POST",
        "/transaction/new",
        None,
        Some(json!({
            "account_id": a,
            "amount_minor": -4_00,
            "category_id": category_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["category_id"], category_id);

    let (status, _) = send(
        &app,
        "POST",
        "/transaction/new",
        None,
        Some(json!({ "account_id": a, "amount_minor": 1, "category_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/transaction/list?account_id={a}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["amount_minor"], -4_00);

    let (_, body) = send(&app, "GET", &format!("/account/read/{a}"), None, None).await;
    assert_eq!(body["balance_minor"], 6_00);
}

#[tokio::test]
async fn money_movements_are_stamped_by_the_server() {
    let app = test_app().await;
    let a = create_account(&app, "A", 10_00).await;
    let b = create_account(&app, "B", 0).await;
    let caller = a.to_string();
    let before = Utc::now();

    let (status, _) = send(
        &app,
        "POST",
        "/account/topup",
        None,
        Some(json!({ "account_id": a, "amount_minor": 1_00, "occurred_at": "2099-01-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, transfer) = send(
        &app,
        "POST",
        "/account/transfer",
        Some(&caller),
        Some(json!({ "to_account_id": b, "amount_minor": 2_00, "occurred_at": "2000-01-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/account/mutation", Some(&caller), None).await;
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    // The later request is listed first, whatever the client sent.
    assert_eq!(transactions[0]["id"], transfer["id"]);
    for tx in transactions {
        let occurred_at: DateTime<Utc> =
            serde_json::from_value(tx["occurred_at"].clone()).unwrap();
        assert!(occurred_at >= before);
        assert!(occurred_at <= Utc::now());
    }
}
