mod common;

use axum::http::StatusCode;
use common::{json_body, spawn_app};
use matricule_admin::entities::users::Role;

#[tokio::test]
async fn register_then_authenticate_scenario() {
    let app = spawn_app().await;

    let (id, register_token) = app.register("alice", "alice@x.com", "pw1").await;
    assert!(id > 0);
    assert!(!register_token.is_empty());

    let response = app
        .request(
            "POST",
            "/api/v1/auth/authenticate",
            None,
            Some(serde_json::json!({ "email": "alice@x.com", "password": "pw1" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["email"], "alice@x.com");
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["role"], "Technicien");
    assert_eq!(body["data"]["id"], id);

    let token = body["data"]["token"].as_str().unwrap();
    let claims = app.state.auth_service().verify_token(token).unwrap();
    assert_eq!(claims.role, Role::Technicien);
    assert_eq!(claims.sub, "alice@x.com");
}

#[tokio::test]
async fn register_ignores_caller_supplied_role() {
    let app = spawn_app().await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(serde_json::json!({
                "username": "mallory",
                "email": "mallory@x.com",
                "password": "pw",
                "role": "Admin"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["role"], "Technicien");

    let id = i32::try_from(body["data"]["id"].as_i64().unwrap()).unwrap();
    let stored = app.state.store().get_user(id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Technicien);
}

#[tokio::test]
async fn wrong_password_is_unauthorized_without_token() {
    let app = spawn_app().await;
    app.register("alice", "alice@x.com", "pw1").await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/authenticate",
            None,
            Some(serde_json::json!({ "email": "alice@x.com", "password": "nope" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let app = spawn_app().await;
    app.register("alice", "alice@x.com", "pw1").await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(serde_json::json!({
                "username": "alice-again",
                "email": "alice@x.com",
                "password": "pw2"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn empty_registration_fields_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(serde_json::json!({ "username": "", "email": "e@x.com", "password": "pw" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn me_requires_token_and_returns_profile() {
    let app = spawn_app().await;

    let response = app.request("GET", "/api/v1/auth/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/v1/auth/me", Some("garbage.token.value"), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (_, token) = app.register("alice", "alice@x.com", "pw1").await;
    let response = app.request("GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["email"], "alice@x.com");
    assert_eq!(body["data"]["role"], "Technicien");
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn health_is_public() {
    let app = spawn_app().await;

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "ok");
}
