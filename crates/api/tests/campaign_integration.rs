//! Integration tests for campaign browsing and management.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use docker-compose.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_authenticated_user, create_test_campaign, create_test_pool, delete_request_with_auth,
    get_request, get_request_with_auth, json_request_with_auth, parse_response_body,
    run_migrations, test_config, TestUser,
};
use serde_json::json;
use tower::ServiceExt;

// ============================================================================
// Creation Tests
// ============================================================================

#[tokio::test]
async fn test_create_campaign_as_brand() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/campaigns",
        json!({
            "title": "Summer launch",
            "description": "Product placement for our summer line",
            "budgetCents": 250_000,
            "category": "fashion",
            "platform": "instagram"
        }),
        &brand.access_token,
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert!(body.get("id").is_some());
    assert_eq!(body["title"], "Summer launch");
    assert_eq!(body["budgetCents"], 250_000);
    assert_eq!(body["category"], "fashion");
    assert_eq!(body["platform"], "instagram");
    assert_eq!(body["creatorId"], brand.user_id);
}

#[tokio::test]
async fn test_create_campaign_as_influencer_forbidden() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let influencer = create_authenticated_user(&app, &TestUser::influencer()).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/campaigns",
        json!({
            "title": "Not allowed",
            "description": "Influencers cannot post campaigns",
            "budgetCents": 1000,
            "category": "tech",
            "platform": "youtube"
        }),
        &influencer.access_token,
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_campaign_requires_authentication() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());

    let request = common::json_request(
        Method::POST,
        "/api/v1/campaigns",
        json!({
            "title": "Anonymous",
            "description": "No token attached",
            "budgetCents": 1000,
            "category": "tech",
            "platform": "youtube"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_campaign_unknown_category() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/campaigns",
        json!({
            "title": "Typo category",
            "description": "Should be rejected",
            "budgetCents": 1000,
            "category": "gaming",
            "platform": "youtube"
        }),
        &brand.access_token,
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Browse and Detail Tests
// ============================================================================

#[tokio::test]
async fn test_browse_finds_campaign_by_search() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;

    let tag = uuid::Uuid::new_v4().simple().to_string();
    let title = format!("Search target {}", &tag[..10]);
    create_test_campaign(&app, &brand, &title).await;

    let uri = format!("/api/v1/campaigns?search={}", &tag[..10]);
    let response = app.oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let campaigns = body["campaigns"].as_array().unwrap();
    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0]["title"], title);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["page"], 1);
}

#[tokio::test]
async fn test_browse_rejects_unknown_platform_filter() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());

    let response = app
        .oneshot(get_request("/api/v1/campaigns?platform=myspace"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_browse_pagination_clamps_page_size() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());

    let response = app
        .oneshot(get_request("/api/v1/campaigns?perPage=10000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert!(body["pagination"]["perPage"].as_i64().unwrap() <= 100);
}

#[tokio::test]
async fn test_featured_sections() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;
    create_test_campaign(&app, &brand, "Featured fixture").await;

    let response = app
        .oneshot(get_request("/api/v1/campaigns/featured"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert!(body["newest"].is_array());
    assert!(body["instagram"].is_array());
    assert!(body["tiktok"].is_array());
    assert!(!body["newest"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_campaign_detail_anonymous() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;
    let campaign = create_test_campaign(&app, &brand, "Public detail").await;

    let uri = format!("/api/v1/campaigns/{}", campaign["id"].as_str().unwrap());
    let response = app.oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["title"], "Public detail");
    // Application counts are reserved for the creator or an admin
    assert!(body.get("applicationCount").is_none());
}

#[tokio::test]
async fn test_get_campaign_detail_shows_count_to_creator() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;
    let campaign = create_test_campaign(&app, &brand, "Creator detail").await;

    let uri = format!("/api/v1/campaigns/{}", campaign["id"].as_str().unwrap());
    let response = app
        .oneshot(get_request_with_auth(&uri, &brand.access_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["applicationCount"], 0);
}

#[tokio::test]
async fn test_get_campaign_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());

    let uri = format!("/api/v1/campaigns/{}", uuid::Uuid::new_v4());
    let response = app.oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Update and Delete Tests
// ============================================================================

#[tokio::test]
async fn test_update_campaign_by_creator() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;
    let campaign = create_test_campaign(&app, &brand, "Before rename").await;

    let uri = format!("/api/v1/campaigns/{}", campaign["id"].as_str().unwrap());
    let request = json_request_with_auth(
        Method::PUT,
        &uri,
        json!({ "title": "After rename", "budgetCents": 300_000 }),
        &brand.access_token,
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["title"], "After rename");
    assert_eq!(body["budgetCents"], 300_000);
    // Untouched fields survive a partial update
    assert_eq!(body["category"], "fashion");
}

#[tokio::test]
async fn test_update_campaign_by_other_brand_forbidden() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::brand()).await;
    let rival = create_authenticated_user(&app, &TestUser::brand()).await;
    let campaign = create_test_campaign(&app, &owner, "Owned campaign").await;

    let uri = format!("/api/v1/campaigns/{}", campaign["id"].as_str().unwrap());
    let request = json_request_with_auth(
        Method::PUT,
        &uri,
        json!({ "title": "Hijacked" }),
        &rival.access_token,
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_campaign_by_creator() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;
    let campaign = create_test_campaign(&app, &brand, "Doomed campaign").await;
    let id = campaign["id"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/campaigns/{}", id);
    let response = app
        .clone()
        .oneshot(delete_request_with_auth(&uri, &brand.access_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_campaign_by_influencer_forbidden() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let brand = create_authenticated_user(&app, &TestUser::brand()).await;
    let influencer = create_authenticated_user(&app, &TestUser::influencer()).await;
    let campaign = create_test_campaign(&app, &brand, "Protected campaign").await;

    let uri = format!("/api/v1/campaigns/{}", campaign["id"].as_str().unwrap());
    let response = app
        .oneshot(delete_request_with_auth(&uri, &influencer.access_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
