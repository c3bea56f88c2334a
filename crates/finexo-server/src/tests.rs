//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Datelike, Utc};
use finexo_core::db::Database;
use http_body_util::BodyExt;
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret";

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: false,
        allowed_origins: vec![],
        ..Default::default()
    };
    create_router(db, None, config)
}

fn setup_auth_app() -> Router {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: true,
        jwt_secret: Some(TEST_SECRET.to_string()),
        allowed_origins: vec![],
    };
    create_router(db, None, config)
}

fn make_token(sub: &str, secret: &str, expires_in: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: sub.to_string(),
        exp: (Utc::now().timestamp() + expires_in) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_as(uri: &str, user: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(USER_ID_HEADER, user)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_income(app: &Router, amount: f64, source: &str, date: &str) -> i64 {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/income",
            serde_json::json!({ "amount": amount, "source": source, "date": date }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    get_body_json(response).await["id"].as_i64().unwrap()
}

async fn create_expense(
    app: &Router,
    amount: f64,
    category: &str,
    intent: &str,
    date: &str,
) -> i64 {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/expense",
            serde_json::json!({
                "amount": amount,
                "category": category,
                "intent": intent,
                "date": date
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    get_body_json(response).await["id"].as_i64().unwrap()
}

// ========== Health and Identity ==========

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app();

    let response = send(&app, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"Finexo API is running");
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = send(&app, get("/api/me")).await;

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn test_me_without_auth() {
    let app = setup_test_app();

    let json = get_body_json(send(&app, get("/api/me")).await).await;
    assert_eq!(json["userId"], "local-dev");
    assert_eq!(json["authMethod"], "none");

    let json = get_body_json(send(&app, get_as("/api/me", "alice")).await).await;
    assert_eq!(json["userId"], "alice");
}

#[tokio::test]
async fn test_missing_token_rejected() {
    let app = setup_auth_app();

    let response = send(&app, get("/api/me")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Token is missing");
}

#[tokio::test]
async fn test_invalid_tokens_rejected() {
    let app = setup_auth_app();

    let tokens = [
        "not-a-jwt".to_string(),
        make_token("alice", "wrong-secret", 3600),
        make_token("alice", TEST_SECRET, -3600),
    ];

    for token in tokens {
        let response = send(
            &app,
            Request::builder()
                .uri("/api/me")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = get_body_json(response).await;
        assert_eq!(json["error"], "Token is invalid or expired");
    }
}

#[tokio::test]
async fn test_valid_token_identifies_user() {
    let app = setup_auth_app();
    let token = make_token("user-123", TEST_SECRET, 3600);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/me")
            .header("authorization", format!("Bearer {}", token))
            // Ignored once authentication is on
            .header(USER_ID_HEADER, "someone-else")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["userId"], "user-123");
    assert_eq!(json["authMethod"], "jwt");
}

#[tokio::test]
async fn test_health_check_needs_no_token() {
    let app = setup_auth_app();
    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ========== Income API ==========

#[tokio::test]
async fn test_create_income() {
    let app = setup_test_app();

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/income",
            serde_json::json!({
                "amount": 2500.0,
                "source": "Salary",
                "date": "2024-03-01",
                "isRecurring": true
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Income added successfully");
    assert!(json["id"].as_i64().unwrap() > 0);

    let list = get_body_json(send(&app, get("/api/income")).await).await;
    let incomes = list.as_array().unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0]["source"], "Salary");
    assert_eq!(incomes[0]["isRecurring"], true);
    assert_eq!(incomes[0]["date"], "2024-03-01");
}

#[tokio::test]
async fn test_create_income_missing_fields() {
    let app = setup_test_app();

    let bodies = [
        serde_json::json!({ "source": "Salary", "date": "2024-03-01" }),
        serde_json::json!({ "amount": 0, "source": "Salary", "date": "2024-03-01" }),
        serde_json::json!({ "amount": 10, "source": "", "date": "2024-03-01" }),
        serde_json::json!({ "amount": 10, "source": "Salary" }),
    ];

    for body in bodies {
        let response = send(&app, json_request("POST", "/api/income", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_body_json(response).await;
        assert_eq!(json["error"], "Missing required fields");
    }
}

#[tokio::test]
async fn test_create_income_rejects_bad_values() {
    let app = setup_test_app();

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/income",
            serde_json::json!({ "amount": -20, "source": "Refund", "date": "2024-03-01" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/income",
            serde_json::json!({ "amount": 20, "source": "Refund", "date": "03/01/2024" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_incomes_by_month() {
    let app = setup_test_app();
    create_income(&app, 100.0, "Feb", "2024-02-10").await;
    create_income(&app, 200.0, "Mar", "2024-03-10").await;

    let json = get_body_json(send(&app, get("/api/income?month=3&year=2024")).await).await;
    let incomes = json.as_array().unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0]["source"], "Mar");

    // A lone month is not a filter
    let json = get_body_json(send(&app, get("/api/income?month=3")).await).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_and_delete_income() {
    let app = setup_test_app();
    let id = create_income(&app, 100.0, "Salary", "2024-03-01").await;

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/income/{}", id),
            serde_json::json!({ "amount": 150.0 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Income updated successfully");
    assert_eq!(json["income"]["amount"], 150.0);
    assert_eq!(json["income"]["source"], "Salary");

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/income/{}", id),
            serde_json::json!({}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "No fields to update");

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/income/{}", id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Income deleted successfully");

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/income/{}", id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Income not found or unauthorized");
}

#[tokio::test]
async fn test_other_users_records_are_invisible() {
    let app = setup_test_app();
    let id = create_income(&app, 100.0, "Salary", "2024-03-01").await;

    let response = send(
        &app,
        Request::builder()
            .method("PUT")
            .uri(format!("/api/income/{}", id))
            .header("content-type", "application/json")
            .header(USER_ID_HEADER, "mallory")
            .body(Body::from(r#"{"amount": 1}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = get_body_json(send(&app, get_as("/api/income", "mallory")).await).await;
    assert!(json.as_array().unwrap().is_empty());

    let json = get_body_json(
        send(&app, get_as("/api/analytics/monthly?month=3&year=2024", "mallory")).await,
    )
    .await;
    assert_eq!(json["totalIncome"], 0.0);
    assert!(json["healthScore"].is_null());
}

// ========== Expense API ==========

#[tokio::test]
async fn test_create_expense_invalid_intent() {
    let app = setup_test_app();

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/expense",
            serde_json::json!({
                "amount": 10,
                "category": "Food",
                "intent": "luxury",
                "date": "2024-03-01"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(
        json["error"],
        "Invalid intent. Must be one of need,want,emergency,impulse"
    );
}

#[tokio::test]
async fn test_expense_lifecycle() {
    let app = setup_test_app();
    let id = create_expense(&app, 40.0, "Food", "want", "2024-03-05").await;

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/expense/{}", id),
            serde_json::json!({ "intent": "impulse", "note": "late-night snack" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["expense"]["intent"], "impulse");
    assert_eq!(json["expense"]["note"], "late-night snack");
    assert_eq!(json["expense"]["category"], "Food");

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/expense/{}", id),
            serde_json::json!({ "intent": "whim" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let list = get_body_json(send(&app, get("/api/expense?month=3&year=2024")).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/expense/{}", id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/expense/{}", id),
            serde_json::json!({ "amount": 1 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Expense not found or unauthorized");
}

// ========== Analytics API ==========

#[tokio::test]
async fn test_monthly_summary() {
    let app = setup_test_app();
    create_income(&app, 2000.0, "Salary", "2024-03-01").await;
    create_expense(&app, 500.0, "Rent", "need", "2024-03-02").await;
    create_expense(&app, 300.0, "Gadgets", "impulse", "2024-03-15").await;

    let response = send(&app, get("/api/analytics/monthly?month=3&year=2024")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["month"], 3);
    assert_eq!(json["year"], 2024);
    assert_eq!(json["totalIncome"], 2000.0);
    assert_eq!(json["totalExpense"], 800.0);
    assert_eq!(json["savings"], 1200.0);
    assert_eq!(json["savingsPercentage"], 60.0);
    assert_eq!(json["healthScore"], 60);
    assert_eq!(json["healthScoreDetails"]["impulsePercentage"], 37.5);
    assert_eq!(json["categoryBreakdown"][0]["category"], "Rent");
    assert_eq!(json["intentBreakdown"][1]["intent"], "impulse");
    assert_eq!(
        json["highlights"][0],
        "Be careful! 37.5% of spending was on Impulse items."
    );
    assert_eq!(json["comparison"]["incomeChangePercentage"], 100.0);
}

#[tokio::test]
async fn test_monthly_summary_month_rollover() {
    let app = setup_test_app();

    let json =
        get_body_json(send(&app, get("/api/analytics/monthly?month=13&year=2024")).await).await;
    assert_eq!(json["month"], 1);
    assert_eq!(json["year"], 2025);
}

#[tokio::test]
async fn test_monthly_summary_defaults_to_current_month() {
    let app = setup_test_app();
    let today = Utc::now().date_naive();

    let json = get_body_json(send(&app, get("/api/analytics/monthly")).await).await;
    assert_eq!(json["month"], today.month());
    assert_eq!(json["year"], today.year());
    assert!(json["healthScore"].is_null());
    assert!(json["highlights"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_monthly_summary_rejects_unparsable_month() {
    let app = setup_test_app();

    let response = send(&app, get("/api/analytics/monthly?month=March&year=2024")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_timeline() {
    let app = setup_test_app();
    let today = Utc::now().date_naive();
    create_income(&app, 75.0, "Tips", &today.format("%Y-%m-%d").to_string()).await;

    let json = get_body_json(send(&app, get("/api/analytics/timeline")).await).await;
    let points = json.as_array().unwrap();

    assert_eq!(points.len(), 6);
    let last = &points[5];
    assert_eq!(last["date"], today.format("%Y-%m").to_string());
    assert_eq!(last["income"], 75.0);
    assert_eq!(points[0]["income"], 0.0);
}

#[tokio::test]
async fn test_daily_requires_month_and_year() {
    let app = setup_test_app();

    for uri in ["/api/analytics/daily", "/api/analytics/daily?month=3"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_body_json(response).await;
        assert_eq!(json["error"], "Month and Year are required");
    }
}

#[tokio::test]
async fn test_daily_breakdown() {
    let app = setup_test_app();
    create_income(&app, 100.0, "Salary", "2024-04-01").await;
    create_expense(&app, 25.0, "Food", "need", "2024-04-03").await;

    let json =
        get_body_json(send(&app, get("/api/analytics/daily?month=4&year=2024")).await).await;
    let days = json.as_array().unwrap();

    assert_eq!(days.len(), 30);
    assert_eq!(days[0]["balance"], 100.0);
    assert_eq!(days[2]["expense"], 25.0);
    assert_eq!(days[29]["balance"], 75.0);
}

#[tokio::test]
async fn test_search() {
    let app = setup_test_app();
    create_income(&app, 3000.0, "Salary", "2024-03-01").await;
    create_expense(&app, 60.0, "Food", "want", "2024-03-04").await;
    create_expense(&app, 900.0, "Rent", "need", "2024-03-02").await;

    let json = get_body_json(
        send(&app, get("/api/analytics/search?category=Income&intent=All")).await,
    )
    .await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["type"], "income");
    assert_eq!(rows[0]["category"], "Income");
    assert_eq!(rows[0]["source"], "Salary");

    let json = get_body_json(
        send(
            &app,
            get("/api/analytics/search?month=3&year=2024&min_amount=50&max_amount=1000"),
        )
        .await,
    )
    .await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["date"], "2024-03-04");
    assert_eq!(rows[1]["category"], "Rent");

    let json = get_body_json(send(&app, get("/api/analytics/search?q=FOOD")).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let json =
        get_body_json(send(&app, get("/api/analytics/search?intent=need")).await).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["intent"], "need");
}

#[tokio::test]
async fn test_search_rejects_bad_filters() {
    let app = setup_test_app();

    let response = send(&app, get("/api/analytics/search?min_amount=lots")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, get("/api/analytics/search?intent=whim")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Audit API ==========

#[tokio::test]
async fn test_audit_log_records_writes() {
    let app = setup_test_app();
    let id = create_income(&app, 10.0, "Gift", "2024-03-01").await;

    let json = get_body_json(send(&app, get("/api/audit?limit=10")).await).await;
    let entries = json.as_array().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "create");
    assert_eq!(entries[0]["entityType"], "income");
    assert_eq!(entries[0]["entityId"], id);
    assert_eq!(entries[0]["userId"], "local-dev");

    let json = get_body_json(send(&app, get_as("/api/audit", "someone-else")).await).await;
    assert!(json.as_array().unwrap().is_empty());
}
