use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use meal_prep_cell::meal_prep_routes;
use shared_utils::test_utils::{test_state, TestConfig, TestUser};

fn app() -> Router {
    meal_prep_routes(test_state())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>, user: Option<&TestUser>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::COOKIE, user.cookie(&TestConfig::default().jwt_secret));
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
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn meal_prep_payload(title: &str, scheduled: &str) -> Value {
    json!({
        "title": title,
        "description": "Grain bowls for the week",
        "totalTime": "90 min",
        "scheduledDate": scheduled,
        "steps": [
            { "step": "Cook grains", "duration": "30 min", "tasks": ["Rinse rice", "Simmer"], "tips": "Salt the water", "icon": "pot" },
            { "step": "Portion", "duration": "15 min", "tasks": ["Fill containers"], "tips": "", "icon": "box" }
        ]
    })
}

#[tokio::test]
async fn test_requires_session() {
    let (status, body) = send(&app(), "POST", "/", Some(meal_prep_payload("Bowls", "2030-01-05")), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not authenticated");
}

#[tokio::test]
async fn test_create_meal_prep() {
    let app = app();
    let user = TestUser::patient("cook@example.com");

    let (status, body) = send(&app, "POST", "/", Some(meal_prep_payload("Bowls", "2030-01-05")), Some(&user)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"], user.id);
    assert_eq!(body["status"], "planned");
    assert_eq!(body["totalTime"], "90 min");
    assert_eq!(body["steps"][0]["tasks"], json!(["Rinse rice", "Simmer"]));
}

#[tokio::test]
async fn test_create_meal_prep_validation() {
    let app = app();
    let user = TestUser::patient("cook@example.com");

    let mut payload = meal_prep_payload("Bowls", "2030-01-05");
    payload["status"] = json!("burnt");
    payload.as_object_mut().unwrap().remove("totalTime");
    let (status, body) = send(&app, "POST", "/", Some(payload), Some(&user)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["totalTime"], "Total time is required");
    assert_eq!(body["details"]["status"], "Status must be one of: planned, in_progress, completed");

    let (status, body) = send(&app, "POST", "/", Some(json!({ "title": "Bowls" })), Some(&user)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["steps"], "Steps are required");
}

#[tokio::test]
async fn test_list_orders_by_scheduled_date() {
    let app = app();
    let user = TestUser::patient("cook@example.com");

    send(&app, "POST", "/", Some(meal_prep_payload("January", "2030-01-05")), Some(&user)).await;
    send(&app, "POST", "/", Some(meal_prep_payload("March", "2030-03-02")), Some(&user)).await;
    send(&app, "POST", "/", Some(meal_prep_payload("February", "2030-02-09")), Some(&user)).await;

    let (status, body) = send(&app, "GET", "/", None, Some(&user)).await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body.as_array().unwrap().iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["March", "February", "January"]);
}

#[tokio::test]
async fn test_list_status_filter() {
    let app = app();
    let user = TestUser::patient("cook@example.com");
    let (_, created) = send(&app, "POST", "/", Some(meal_prep_payload("Soup", "2030-01-05")), Some(&user)).await;
    send(&app, "POST", "/", Some(meal_prep_payload("Salad", "2030-01-06")), Some(&user)).await;
    let uri = format!("/{}", created["_id"].as_str().unwrap());
    send(&app, "PUT", &uri, Some(json!({ "status": "in_progress" })), Some(&user)).await;

    let (status, body) = send(&app, "GET", "/?status=in_progress", None, Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Soup");

    let (status, body) = send(&app, "GET", "/?status=eaten", None, Some(&user)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("status").is_some());
}

#[tokio::test]
async fn test_update_and_delete_meal_prep() {
    let app = app();
    let user = TestUser::patient("cook@example.com");
    let intruder = TestUser::patient("hungry@example.com");
    let (_, created) = send(&app, "POST", "/", Some(meal_prep_payload("Stew", "2030-01-05")), Some(&user)).await;
    let uri = format!("/{}", created["_id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "title": "Beef stew", "status": "completed" })), Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Beef stew");
    assert_eq!(body["status"], "completed");
    assert_eq!(body["steps"], created["steps"]);

    let (status, body) = send(&app, "GET", &uri, None, Some(&intruder)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorized to access this meal preparation");

    let (status, body) = send(&app, "DELETE", &uri, None, Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Beef stew");

    let (status, body) = send(&app, "DELETE", &uri, None, Some(&user)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Meal preparation not found");
}
