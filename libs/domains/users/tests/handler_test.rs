//! Handler tests for the Users domain
//!
//! Drive the domain routers over in-memory repositories:
//! - status codes and message bodies
//! - uniqueness and the skill-profile delete guard
//! - password never leaving the service

use argon2::Params;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()

struct TestApp {
    router: Router,
    users: Arc<InMemoryUserRepository>,
}

fn test_app() -> TestApp {
    let users = Arc::new(InMemoryUserRepository::new());
    let profiles = Arc::new(InMemorySkillProfileRepository::new());
    let skills = Arc::new(InMemorySkillRepository::new());
    let hasher = Arc::new(Argon2PasswordHasher::with_params(Params::MIN_M_COST, 1, 1).unwrap());

    let user_service = UserService::new(users.clone(), profiles.clone(), hasher);
    let skill_service = SkillService::new(users.clone(), profiles, skills);

    let router = Router::new()
        .nest("/users", handlers::router(user_service))
        .nest(
            "/skill-profiles",
            skill_handlers::profiles_router(skill_service.clone()),
        )
        .nest("/skills", skill_handlers::skills_router(skill_service));

    TestApp { router, users }
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &TestApp, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, json_body(response.into_body()).await)
}

async fn create_alice(app: &TestApp) -> User {
    let (status, _) = send(
        app,
        "POST",
        "/users",
        Some(json!({ "username": "alice", "password": "s3cret", "roles": ["Employee"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    app.users.find_by_username("alice").await.unwrap().unwrap()
}

#[tokio::test]
async fn test_user_lifecycle_scenario() {
    let app = test_app();

    // create
    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "username": "alice", "password": "s3cret", "roles": ["Employee"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "New user alice created");

    // duplicate
    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "username": "alice", "password": "other", "roles": ["Employee"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Duplicate username");

    let alice = app.users.find_by_username("alice").await.unwrap().unwrap();

    // update roles, keeping the same username
    let (status, body) = send(
        &app,
        "PATCH",
        "/users",
        Some(json!({
            "id": alice.id,
            "username": "alice",
            "roles": ["Employee", "Manager"],
            "active": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "alice updated");

    let (_, listed) = send(&app, "GET", "/users", None).await;
    assert_eq!(listed[0]["roles"].as_array().unwrap().len(), 2);

    // attach a skill profile
    let (status, profile) = send(
        &app,
        "POST",
        "/skill-profiles",
        Some(json!({ "user": alice.id, "licenses": ["Forklift"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(profile["user"], json!(alice.id));

    // delete is blocked while the profile exists
    let (status, body) = send(&app, "DELETE", "/users", Some(json!({ "id": alice.id }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User has assigned skill profile");
    assert!(app.users.find_by_id(alice.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_then_lookup_is_not_found() {
    let app = test_app();
    let alice = create_alice(&app).await;

    let (status, body) = send(&app, "DELETE", "/users", Some(json!({ "id": alice.id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Username alice with ID {} deleted", alice.id)
    );

    let (status, body) = send(&app, "GET", &format!("/users/{}", alice.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = send(&app, "DELETE", "/users", Some(json!({ "id": alice.id }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_never_contains_password() {
    let app = test_app();
    create_alice(&app).await;

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);

    let first = body[0].as_object().unwrap();
    assert!(!first.contains_key("password"));
    assert!(!first.contains_key("password_hash"));
    assert!(!body.to_string().contains("$argon2"));
}

#[tokio::test]
async fn test_empty_directory_lists_as_bad_request() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No users found");
}

#[tokio::test]
async fn test_create_missing_fields() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "username": "alice", "password": "pw", "roles": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn test_update_to_taken_username_conflicts() {
    let app = test_app();
    create_alice(&app).await;
    send(
        &app,
        "POST",
        "/users",
        Some(json!({ "username": "bob", "password": "pw", "roles": ["Employee"] })),
    )
    .await;
    let bob = app.users.find_by_username("bob").await.unwrap().unwrap();

    let (status, _) = send(
        &app,
        "PATCH",
        "/users",
        Some(json!({ "id": bob.id, "username": "alice", "roles": ["Employee"], "active": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_password_only_when_supplied() {
    let app = test_app();
    let alice = create_alice(&app).await;
    let original_hash = alice.password_hash.clone();

    let base = json!({
        "id": alice.id,
        "username": "alice",
        "roles": ["Employee"],
        "active": false
    });

    send(&app, "PATCH", "/users", Some(base.clone())).await;
    let unchanged = app.users.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(unchanged.password_hash, original_hash);
    assert!(!unchanged.active);

    let mut with_password = base;
    with_password["password"] = json!("n3w-secret");
    send(&app, "PATCH", "/users", Some(with_password)).await;
    let changed = app.users.find_by_id(alice.id).await.unwrap().unwrap();
    assert_ne!(changed.password_hash, original_hash);
}

#[tokio::test]
async fn test_update_requires_boolean_active() {
    let app = test_app();
    let alice = create_alice(&app).await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/users",
        Some(json!({ "id": alice.id, "username": "alice", "roles": ["Employee"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn test_update_with_non_boolean_active_is_validation_error() {
    let app = test_app();
    let alice = create_alice(&app).await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/users",
        Some(json!({ "id": alice.id, "username": "alice", "roles": ["Employee"], "active": "yes" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn test_update_with_roles_string_is_validation_error() {
    let app = test_app();
    let alice = create_alice(&app).await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/users",
        Some(json!({ "id": alice.id, "username": "alice", "roles": "Employee", "active": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn test_create_with_roles_string_is_validation_error() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "username": "bob", "password": "pw", "roles": "Employee" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "All fields are required");
    assert!(app.users.find_by_username("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_with_numeric_id_is_validation_error() {
    let app = test_app();

    let (status, body) = send(&app, "DELETE", "/users", Some(json!({ "id": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User ID required");
}

#[tokio::test]
async fn test_delete_without_id() {
    let app = test_app();

    let (status, body) = send(&app, "DELETE", "/users", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User ID required");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_skills_are_numbered_in_order() {
    let app = test_app();

    for name in ["Welding", "Forklift"] {
        let (status, _) = send(
            &app,
            "POST",
            "/skills",
            Some(json!({ "skill_name": name, "skill_level": "Expert" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, skills) = send(&app, "GET", "/skills", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(skills[0]["count"], 1);
    assert_eq!(skills[0]["skill_name"], "Welding");
    assert_eq!(skills[1]["count"], 2);
}

#[tokio::test]
async fn test_profile_for_unknown_user_is_not_found() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/skill-profiles",
        Some(json!({ "user": uuid::Uuid::now_v7() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}
