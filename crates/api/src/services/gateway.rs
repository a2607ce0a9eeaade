//! Payment gateway client for creating checkout sessions.
//!
//! In mock mode (the default for development and tests) sessions are
//! fabricated locally and the checkout URL points straight at the
//! success callback. In real mode the gateway API is called over HTTPS.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use domain::models::Plan;

use crate::config::GatewayConfig;

/// Error type for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Gateway API error: {0}")]
    ApiError(String),
}

/// A checkout session created at the gateway.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub session_id: String,
    pub checkout_url: String,
}

/// Request body for the gateway checkout session endpoint.
#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    amount_cents: i64,
    currency: &'a str,
    plan_name: &'a str,
    recurring: bool,
    success_url: &'a str,
    cancel_url: &'a str,
    client_reference_id: String,
}

/// Response body from the gateway checkout session endpoint.
#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    id: String,
    url: String,
}

/// Client for the payment gateway.
pub struct PaymentGatewayClient {
    client: Client,
    config: GatewayConfig,
}

impl PaymentGatewayClient {
    /// Creates a new gateway client from configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    /// Shared secret used to verify incoming webhook signatures.
    pub fn webhook_secret(&self) -> &str {
        &self.config.webhook_secret
    }

    /// Create a checkout session for the given user and plan.
    pub async fn create_checkout_session(
        &self,
        user_id: Uuid,
        plan: &Plan,
    ) -> Result<CheckoutSession, GatewayError> {
        if self.config.mock {
            return Ok(self.mock_session());
        }

        let request = CreateSessionRequest {
            amount_cents: plan.amount_cents,
            currency: "usd",
            plan_name: plan.name(),
            recurring: plan.is_recurring,
            success_url: &self.config.success_url,
            cancel_url: &self.config.cancel_url,
            client_reference_id: user_id.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.config.api_url))
            .bearer_auth(&self.config.secret_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::ApiError(format!(
                "checkout session creation failed with {}: {}",
                status, body
            )));
        }

        let session: CreateSessionResponse = response.json().await?;

        Ok(CheckoutSession {
            session_id: session.id,
            checkout_url: session.url,
        })
    }

    /// Fabricate a local session whose checkout URL lands directly on
    /// the success callback, so the full payment flow can be exercised
    /// without gateway credentials.
    fn mock_session(&self) -> CheckoutSession {
        let session_id = format!("cs_mock_{}", Uuid::new_v4().simple());
        let checkout_url = format!("{}?session_id={}", self.config.success_url, session_id);

        CheckoutSession {
            session_id,
            checkout_url,
        }
    }
}
