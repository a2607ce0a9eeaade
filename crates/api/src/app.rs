//! Router assembly and shared application state.

use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use shared::jwt::{JwtConfig, JwtError};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, optional_user_auth, rate_limit_middleware,
    require_user_auth, security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    admin, applications, auth, campaigns, contact, dashboard, health, offers, payments, users,
};
use crate::services::{AuthService, EmailService, PaymentGatewayClient};

/// Shared handles cloned into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub auth: Arc<AuthService>,
    pub gateway: Arc<PaymentGatewayClient>,
    pub email: Arc<EmailService>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

/// An empty origin list keeps the permissive development policy; listing
/// origins switches to an allow-list.
fn cors_layer(config: &Config) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.security.cors_origins.is_empty() {
        return base.allow_origin(Any);
    }

    let origins: Vec<_> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

/// Builds the full router with state, route groups and the middleware
/// stack. Fails only when the configured JWT key material is unusable.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let config = Arc::new(config);

    let mut jwt = JwtConfig::new(
        &config.jwt.private_key,
        &config.jwt.public_key,
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
        config.jwt.session_refresh_expiry_secs,
    )?;
    jwt.leeway_secs = config.jwt.leeway_secs;
    let jwt = Arc::new(jwt);

    let limiting_on =
        config.security.rate_limit_enabled && config.security.rate_limit_per_minute > 0;
    let rate_limiter = limiting_on.then(|| {
        Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        ))
    });

    let auth_service = Arc::new(AuthService::new(
        pool.clone(),
        jwt.clone(),
        config.jwt.access_token_expiry_secs,
    ));
    let gateway = Arc::new(PaymentGatewayClient::new(config.gateway.clone()));
    let email = Arc::new(EmailService::new(config.email.clone()));

    let cors = cors_layer(&config);

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        auth: auth_service,
        gateway,
        email,
        rate_limiter,
    };

    // Auth endpoints: anonymous clients drive password hashing, so these
    // are rate limited per client key.
    let auth_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/forgot-password", post(auth::forgot_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Gateway webhook: anonymous but signature-checked; rate limited.
    let webhook_routes = Router::new()
        .route("/api/v1/payments/webhook", post(payments::webhook))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Catalog and public profile views. Auth is optional here: anonymous
    // visitors browse, while a token unlocks creator-only detail fields.
    // Write handlers in this group load and authorize the account themselves.
    let catalog_routes = Router::new()
        .route(
            "/api/v1/campaigns",
            get(campaigns::browse).post(campaigns::create_campaign),
        )
        .route("/api/v1/campaigns/featured", get(campaigns::featured))
        .route(
            "/api/v1/campaigns/:id",
            get(campaigns::get_campaign)
                .put(campaigns::update_campaign)
                .delete(campaigns::delete_campaign),
        )
        .route("/api/v1/campaigns/:id/apply", post(applications::apply))
        .route(
            "/api/v1/campaigns/:id/applications",
            get(applications::list_for_campaign),
        )
        .route("/api/v1/users/:id", get(users::get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_user_auth,
        ));

    // Account routes: every endpoint in this group requires a valid token.
    let account_routes = Router::new()
        .route("/api/v1/users/me", get(users::me))
        .route("/api/v1/users/me/profile", put(users::update_profile))
        .route("/api/v1/applications/mine", get(applications::mine))
        .route(
            "/api/v1/applications/:id/approve",
            post(applications::approve),
        )
        .route("/api/v1/applications/:id/reject", post(applications::reject))
        .route("/api/v1/offers", post(offers::create_offer))
        .route("/api/v1/offers/mine", get(offers::mine))
        .route("/api/v1/offers/:id", get(offers::get_offer))
        .route("/api/v1/offers/:id/accept", post(offers::accept))
        .route("/api/v1/offers/:id/reject", post(offers::reject))
        .route(
            "/api/v1/payments/checkout/:plan_type/:billing_cycle",
            post(payments::checkout),
        )
        .route("/api/v1/payments/history", get(payments::history))
        .route("/api/v1/subscriptions/me", get(payments::my_subscription))
        .route("/api/v1/dashboard/brand", get(dashboard::brand))
        .route("/api/v1/dashboard/influencer", get(dashboard::influencer))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Admin moderation panel. The AdminUser extractor enforces the role;
    // the middleware rejects unauthenticated requests up front.
    let admin_routes = Router::new()
        .route("/api/v1/admin/dashboard", get(admin::dashboard))
        .route("/api/v1/admin/users", get(admin::list_users))
        .route("/api/v1/admin/users/:id/ban", post(admin::ban_user))
        .route("/api/v1/admin/users/:id/unban", post(admin::unban_user))
        .route("/api/v1/admin/messages", get(admin::list_messages))
        .route(
            "/api/v1/admin/messages/:id/read",
            post(admin::mark_message_read),
        )
        .route("/api/v1/admin/messages/:id", delete(admin::delete_message))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // No authentication here. The checkout redirect endpoints identify the
    // purchase by session id, not bearer token.
    let public_routes = Router::new()
        .route("/api/v1/payments/success", get(payments::success))
        .route("/api/v1/payments/cancel", post(payments::cancel))
        .route("/api/v1/contact", post(contact::submit))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    // Layers run bottom-up on requests: trace id and metrics wrap
    // everything, the timeout bounds handler work, and the security
    // headers land on every response including error bodies.
    let router = Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(webhook_routes)
        .merge(catalog_routes)
        .merge(account_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
