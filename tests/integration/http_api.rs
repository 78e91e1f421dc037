/// HTTP API tests driving the axum router in-process
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use nutrition_tracker::http::create_router;
use nutrition_tracker::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    user: UserProfile,
}

/// Build a router over an in-memory database with one user and the given
/// (date, iron) history
fn app_with_history(stage: Stage, history: &[(&str, f64)]) -> TestApp {
    let server = NutritionTrackerServer::from_storage(SqliteStorage::in_memory().unwrap());
    let user = UserProfile::new("Test".to_string(), stage).unwrap();
    server.storage().create_user(&user).unwrap();

    for (date, iron) in history {
        let mut totals = BTreeMap::new();
        totals.insert("iron".to_string(), *iron);
        server
            .storage()
            .put_daily_record(&user.id, &DailyNutrientRecord::new(date.parse().unwrap(), totals))
            .unwrap();
    }

    TestApp {
        router: create_router(server.into_http_state()),
        user,
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

#[tokio::test]
async fn test_short_history_is_not_padded() {
    let app = app_with_history(
        Stage::SecondTrimester,
        &[("2024-07-03", 12.0), ("2024-07-01", 30.0), ("2024-07-02", 28.0)],
    );

    let uri = format!("/api/analytics?userId={}&period=7d", app.user.id);
    let (status, body) = get(&app.router, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["period"], "7d");
    assert_eq!(data["nutrient"], "iron");

    let series = data["data"].as_array().unwrap();
    assert_eq!(series.len(), 3);
    let dates: Vec<&str> = series.iter().map(|p| p["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2024-07-01", "2024-07-02", "2024-07-03"]);

    // Latest day (12) is under the 27 target
    assert_eq!(data["streak"], 0);
    assert_eq!(data["target"], 27.0);
    assert!(data["insights"].as_array().unwrap().len() <= 3);
}

#[tokio::test]
async fn test_week_over_week_change() {
    let mut history = Vec::new();
    let dates: Vec<String> = (1..=14).map(|d| format!("2024-08-{:02}", d)).collect();
    for (i, date) in dates.iter().enumerate() {
        history.push((date.as_str(), if i < 7 { 5.0 } else { 10.0 }));
    }
    // Postpartum iron target is 9
    let app = app_with_history(Stage::Postpartum, &history);

    let uri = format!("/api/analytics?userId={}&period=30d&nutrient=iron", app.user.id);
    let (status, body) = get(&app.router, &uri).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["average"], 10.0);
    assert_eq!(data["change"], 100.0);
    assert_eq!(data["streak"], 7);
    assert_eq!(data["targetPercentage"], 111);
    assert_eq!(data["insights"][0]["type"], "success");
    assert_eq!(data["insights"][1]["type"], "improvement");
}

#[tokio::test]
async fn test_missing_user_id_is_bad_request() {
    let app = app_with_history(Stage::FirstTrimester, &[]);
    let (status, body) = get(&app.router, "/api/analytics?period=7d").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("userId"));
}

#[tokio::test]
async fn test_invalid_period_is_bad_request() {
    let app = app_with_history(Stage::FirstTrimester, &[]);
    let uri = format!("/api/analytics?userId={}&period=1y", app.user.id);
    let (status, _) = get(&app.router, &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = app_with_history(Stage::FirstTrimester, &[]);

    let uri = format!("/api/analytics?userId={}", UserId::new());
    let (status, body) = get(&app.router, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = get(&app.router, "/api/analytics?userId=not-a-user").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_store_data_is_internal_error_without_detail() {
    let app = app_with_history(Stage::FirstTrimester, &[("2024-09-01", -3.0)]);

    let uri = format!("/api/analytics?userId={}", app.user.id);
    let (status, body) = get(&app.router, &uri).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Internal server error");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_onboard_log_meal_and_read_back() {
    let app = app_with_history(Stage::FirstTrimester, &[]);

    let (status, created) = send(
        &app.router,
        Method::POST,
        "/api/users",
        Some(json!({"name": "Fay", "stage": "third-trimester"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["stage"], "third_trimester");

    for _ in 0..2 {
        let (status, logged) = send(
            &app.router,
            Method::POST,
            "/api/meals",
            Some(json!({
                "userId": user_id,
                "mealType": "breakfast",
                "description": "Fortified oats",
                "nutrients": {"iron": 14.0, "folate": 200.0}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(logged["success"], true);
    }

    let (status, daily) = get(&app.router, &format!("/api/daily?userId={}", user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(daily["data"]["totalNutrients"]["iron"], 28.0);
    assert_eq!(daily["data"]["meals"].as_array().unwrap().len(), 2);

    let (status, analytics) = get(&app.router, &format!("/api/analytics?userId={}&period=7d", user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analytics["data"]["data"].as_array().unwrap().len(), 1);
    assert_eq!(analytics["data"]["streak"], 1);
}

#[tokio::test]
async fn test_meal_validation_errors() {
    let app = app_with_history(Stage::FirstTrimester, &[]);

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/meals",
        Some(json!({"userId": app.user.id.to_string(), "mealType": "lunch", "nutrients": {"iron": -2}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/meals",
        Some(json!({"userId": app.user.id.to_string(), "mealType": "lunch", "nutrients": "lots"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let app = app_with_history(Stage::FirstTrimester, &[]);
    let (status, body) = get(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}
