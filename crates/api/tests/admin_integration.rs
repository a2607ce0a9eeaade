//! Integration tests for admin moderation: dashboard, user management,
//! and contact message triage.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use docker-compose.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_admin_user, create_authenticated_user, create_test_campaign, create_test_pool,
    delete_request_with_auth, get_request_with_auth, json_request, json_request_with_auth,
    parse_response_body, run_migrations, test_config, TestUser,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn submit_contact_message(app: &axum::Router, subject: &str) {
    let request = json_request(
        Method::POST,
        "/api/v1/contact",
        json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "subject": subject,
            "body": "How do brand subscriptions work?"
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Contact messages are global rows, so tests find their own by a
/// unique subject instead of asserting inbox counts.
async fn find_message_by_subject(app: &axum::Router, token: &str, subject: &str) -> Value {
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            "/api/v1/admin/messages?perPage=100",
            token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["subject"] == subject)
        .cloned()
        .expect("submitted message not in inbox")
}

// ============================================================================
// Access Control Tests
// ============================================================================

#[tokio::test]
async fn test_admin_routes_reject_non_admin() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;

    for uri in [
        "/api/v1/admin/dashboard",
        "/api/v1/admin/users",
        "/api/v1/admin/messages",
    ] {
        let response = app
            .clone()
            .oneshot(get_request_with_auth(uri, &brand.access_token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "uri: {}", uri);

        let body = parse_response_body(response).await;
        assert_eq!(body["message"], "Admin privileges required");
    }
}

#[tokio::test]
async fn test_admin_routes_reject_anonymous() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());

    let response = app
        .oneshot(common::get_request("/api/v1/admin/dashboard"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Dashboard Tests
// ============================================================================

#[tokio::test]
async fn test_admin_dashboard_aggregates() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;
    create_test_campaign(&app, &brand, "Dashboard fixture").await;

    let response = app
        .oneshot(get_request_with_auth(
            "/api/v1/admin/dashboard",
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert!(body["stats"]["totalUsers"].as_i64().unwrap() >= 2);
    assert!(body["stats"]["brandCount"].as_i64().unwrap() >= 1);
    assert!(body["stats"]["campaignsLast30Days"].as_i64().unwrap() >= 1);
    assert!(body["recentUsers"].is_array());
    assert!(body["recentCampaigns"].is_array());
    assert!(!body["recentUsers"].as_array().unwrap().is_empty());
}

// ============================================================================
// User Management Tests
// ============================================================================

#[tokio::test]
async fn test_list_users_search_by_username() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;

    let uri = format!("/api/v1/admin/users?search={}", brand.username);
    let response = app
        .oneshot(get_request_with_auth(&uri, &admin.access_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], brand.username);
    assert!(users[0].get("passwordHash").is_none());
    assert_eq!(body["pagination"]["total"], 1);
    assert!(body["stats"]["total"].as_i64().unwrap() >= 2);
}

#[tokio::test]
async fn test_list_users_unknown_status_filter() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;

    let response = app
        .oneshot(get_request_with_auth(
            "/api/v1/admin/users?status=starred",
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ban_and_unban_user() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;
    let target = create_authenticated_user(&app, &TestUser::influencer()).await;

    let uri = format!("/api/v1/admin/users/{}/ban", target.user_id);
    let request = json_request_with_auth(
        Method::POST,
        &uri,
        json!({ "reason": "Spamming campaign boards" }),
        &admin.access_token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["isBanned"], true);
    assert_eq!(body["bannedReason"], "Spamming campaign boards");
    assert!(!body["bannedAt"].is_null());

    // Banned accounts cannot log in
    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        json!({ "identifier": target.email, "password": "sunny1234" }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/v1/admin/users/{}/unban", target.user_id);
    let request = json_request_with_auth(Method::POST, &uri, json!({}), &admin.access_token);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["isBanned"], false);
    assert!(body["bannedReason"].is_null());

    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        json!({ "identifier": target.email, "password": "sunny1234" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_ban_self_unprocessable() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;

    let uri = format!("/api/v1/admin/users/{}/ban", admin.user_id);
    let request = json_request_with_auth(
        Method::POST,
        &uri,
        json!({ "reason": "Oops" }),
        &admin.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_ban_admin_unprocessable() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;
    let other_admin = create_admin_user(&app, &pool).await;

    let uri = format!("/api/v1/admin/users/{}/ban", other_admin.user_id);
    let request = json_request_with_auth(
        Method::POST,
        &uri,
        json!({ "reason": "Power struggle" }),
        &admin.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_ban_twice_conflicts() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;
    let target = create_authenticated_user(&app, &TestUser::influencer()).await;

    let uri = format!("/api/v1/admin/users/{}/ban", target.user_id);
    let request = json_request_with_auth(
        Method::POST,
        &uri,
        json!({ "reason": "First strike" }),
        &admin.access_token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = json_request_with_auth(
        Method::POST,
        &uri,
        json!({ "reason": "Second strike" }),
        &admin.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unban_not_banned_conflicts() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;
    let target = create_authenticated_user(&app, &TestUser::influencer()).await;

    let uri = format!("/api/v1/admin/users/{}/unban", target.user_id);
    let request = json_request_with_auth(Method::POST, &uri, json!({}), &admin.access_token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_ban_missing_user() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;

    let uri = format!("/api/v1/admin/users/{}/ban", uuid::Uuid::new_v4());
    let request = json_request_with_auth(
        Method::POST,
        &uri,
        json!({ "reason": "Ghost" }),
        &admin.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Contact Message Triage Tests
// ============================================================================

#[tokio::test]
async fn test_contact_message_triage_flow() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;

    let subject = format!("Question {}", uuid::Uuid::new_v4().simple());
    submit_contact_message(&app, &subject).await;

    let message = find_message_by_subject(&app, &admin.access_token, &subject).await;
    assert_eq!(message["isRead"], false);
    assert_eq!(message["email"], "jane@example.com");
    let message_id = message["id"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/admin/messages/{}/read", message_id);
    let request = json_request_with_auth(Method::POST, &uri, json!({}), &admin.access_token);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["isRead"], true);

    let uri = format!("/api/v1/admin/messages/{}", message_id);
    let response = app
        .clone()
        .oneshot(delete_request_with_auth(&uri, &admin.access_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(delete_request_with_auth(&uri, &admin.access_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_form_rejects_bad_email() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());

    let request = json_request(
        Method::POST,
        "/api/v1/contact",
        json!({
            "name": "Jane",
            "email": "not-an-email",
            "subject": "Hi",
            "body": "Hello"
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_messages_unknown_status_filter() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;

    let response = app
        .oneshot(get_request_with_auth(
            "/api/v1/admin/messages?status=starred",
            &admin.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mark_read_missing_message() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let admin = create_admin_user(&app, &pool).await;

    let uri = format!("/api/v1/admin/messages/{}/read", uuid::Uuid::new_v4());
    let request = json_request_with_auth(Method::POST, &uri, json!({}), &admin.access_token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
