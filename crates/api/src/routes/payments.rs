//! Payment and subscription reconciliation routes.
//!
//! Entitlement state is reconciled from two directions: the browser's
//! success redirect and the gateway's signed webhooks. Both paths funnel
//! through the status-guarded payment update and the user-keyed
//! subscription upsert, so any interleaving settles to one completed
//! payment and one subscription row. The webhook path is authoritative.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use domain::models::{Payment, Plan, Subscription, SubscriptionStatus};
use persistence::entities::PaymentEntity;
use persistence::repositories::{
    PaymentRepository, SubscriptionRepository, SubscriptionUpsert, WebhookEventRepository,
};
use shared::crypto::{verify_signature_header, DEFAULT_SIGNATURE_TOLERANCE_SECS};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::{record_payment_completed, record_webhook_event};
use crate::services::gateway::GatewayError;

/// Header carrying the gateway's `t={ts},v1={hex}` webhook signature.
pub const GATEWAY_SIGNATURE_HEADER: &str = "Gateway-Signature";

/// Response body for checkout session creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
    pub session_id: String,
}

/// Query parameters for the success redirect.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SuccessQuery {
    pub session_id: String,
}

/// Request body for the cancel acknowledgement.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub session_id: Option<String>,
}

/// Generic acknowledgement body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AckResponse {
    pub message: String,
}

/// Webhook acknowledgement body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WebhookAck {
    pub received: bool,
}

/// Payment history response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistoryResponse {
    pub payments: Vec<Payment>,
}

/// Signed event envelope delivered by the gateway.
#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: WebhookData,
}

#[derive(Debug, Deserialize)]
struct WebhookData {
    object: serde_json::Value,
}

/// Typed view of the gateway events this service reconciles.
#[derive(Debug)]
enum GatewayEvent {
    CheckoutCompleted {
        session_id: String,
        subscription_id: Option<String>,
        customer_id: Option<String>,
    },
    InvoicePaid {
        subscription_id: String,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    },
    InvoiceFailed {
        subscription_id: String,
    },
    SubscriptionDeleted {
        subscription_id: String,
    },
    Unknown,
}

fn map_gateway_error(error: GatewayError) -> ApiError {
    match error {
        GatewayError::HttpError(e) => {
            warn!(error = %e, "Payment gateway request failed");
            ApiError::ServiceUnavailable("Payment gateway is unavailable".to_string())
        }
        GatewayError::ApiError(msg) => {
            warn!(error = %msg, "Payment gateway rejected request");
            ApiError::ServiceUnavailable("Payment gateway rejected the request".to_string())
        }
    }
}

/// Create a hosted checkout session for a plan.
///
/// POST /api/v1/payments/checkout/:plan_type/:billing_cycle
pub async fn checkout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((plan_type, billing_cycle)): Path<(String, String)>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let plan_type = plan_type
        .parse()
        .map_err(|e: String| ApiError::UnprocessableEntity(e))?;
    let billing_cycle = billing_cycle
        .parse()
        .map_err(|e: String| ApiError::UnprocessableEntity(e))?;
    let plan = Plan::lookup(plan_type, billing_cycle);

    let session = state
        .gateway
        .create_checkout_session(user.id, &plan)
        .await
        .map_err(map_gateway_error)?;

    let payments = PaymentRepository::new(state.pool.clone());
    payments
        .create_pending(
            user.id,
            &session.session_id,
            plan.amount_cents,
            "usd",
            plan.name(),
            plan.plan_type.as_str(),
            plan.billing_cycle.as_str(),
            plan.is_recurring,
        )
        .await?;

    info!(
        user_id = %user.id,
        session_id = %session.session_id,
        plan = %plan.name(),
        "Checkout session created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            checkout_url: session.checkout_url,
            session_id: session.session_id,
        }),
    ))
}

/// Confirmation landing for the browser redirect after checkout.
///
/// Completion is idempotent: a session already settled by the webhook
/// acknowledges without changing state.
///
/// GET /api/v1/payments/success?session_id=...
pub async fn success(
    State(state): State<AppState>,
    Query(query): Query<SuccessQuery>,
) -> Result<Json<AckResponse>, ApiError> {
    let payments = PaymentRepository::new(state.pool.clone());

    match payments
        .complete_by_checkout_session(&query.session_id, None)
        .await?
    {
        Some(payment) => {
            settle_completed_payment(&state, &payment, None, None).await?;
            Ok(Json(AckResponse {
                message: "Payment completed".to_string(),
            }))
        }
        None => {
            // Either already completed (webhook won the race) or unknown
            match payments.find_by_checkout_session(&query.session_id).await? {
                Some(_) => Ok(Json(AckResponse {
                    message: "Payment already processed".to_string(),
                })),
                None => Err(ApiError::NotFound("Unknown checkout session".to_string())),
            }
        }
    }
}

/// Acknowledge a cancelled checkout.
///
/// POST /api/v1/payments/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Json(request): Json<CancelRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    if let Some(ref session_id) = request.session_id {
        let payments = PaymentRepository::new(state.pool.clone());
        payments
            .mark_by_checkout_session(session_id, "cancelled")
            .await?;
    }

    Ok(Json(AckResponse {
        message: "Checkout cancelled".to_string(),
    }))
}

/// Gateway webhook receiver.
///
/// Signature and payload shape are validated before any state change;
/// the event id is then claimed in the idempotency ledger, so redelivery
/// of a processed event acknowledges without touching payment state.
///
/// POST /api/v1/payments/webhook
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookAck>, ApiError> {
    let signature = headers
        .get(GATEWAY_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing webhook signature".to_string()))?;

    verify_signature_header(
        state.gateway.webhook_secret(),
        signature,
        &body,
        Utc::now().timestamp(),
        DEFAULT_SIGNATURE_TOLERANCE_SECS,
    )
    .map_err(|e| {
        warn!(error = %e, "Webhook signature rejected");
        ApiError::BadRequest("Invalid webhook signature".to_string())
    })?;

    let envelope: WebhookEnvelope = serde_json::from_str(&body)
        .map_err(|_| ApiError::BadRequest("Malformed webhook payload".to_string()))?;
    let event = parse_event(&envelope)?;

    let payload: serde_json::Value = serde_json::from_str(&body)
        .map_err(|_| ApiError::BadRequest("Malformed webhook payload".to_string()))?;

    let ledger = WebhookEventRepository::new(state.pool.clone());
    let claimed = ledger
        .claim(&envelope.id, &envelope.event_type, &payload)
        .await?;
    if !claimed {
        info!(event_id = %envelope.id, "Webhook event already processed");
        return Ok(Json(WebhookAck { received: true }));
    }

    record_webhook_event(&envelope.event_type);

    match event {
        GatewayEvent::CheckoutCompleted {
            session_id,
            subscription_id,
            customer_id,
        } => {
            let payments = PaymentRepository::new(state.pool.clone());
            if let Some(payment) = payments
                .complete_by_checkout_session(&session_id, None)
                .await?
            {
                settle_completed_payment(
                    &state,
                    &payment,
                    subscription_id.as_deref(),
                    customer_id.as_deref(),
                )
                .await?;
            }
        }
        GatewayEvent::InvoicePaid {
            subscription_id,
            period_start,
            period_end,
        } => {
            let subscriptions = SubscriptionRepository::new(state.pool.clone());
            subscriptions
                .renew_by_gateway_id(&subscription_id, period_start, period_end)
                .await?;
            info!(subscription_id = %subscription_id, "Subscription renewed");
        }
        GatewayEvent::InvoiceFailed { subscription_id } => {
            let subscriptions = SubscriptionRepository::new(state.pool.clone());
            subscriptions
                .set_status_by_gateway_id(
                    &subscription_id,
                    SubscriptionStatus::PastDue.as_str(),
                )
                .await?;
            info!(subscription_id = %subscription_id, "Subscription marked past due");
        }
        GatewayEvent::SubscriptionDeleted { subscription_id } => {
            let subscriptions = SubscriptionRepository::new(state.pool.clone());
            subscriptions.cancel_by_gateway_id(&subscription_id).await?;
            info!(subscription_id = %subscription_id, "Subscription cancelled");
        }
        GatewayEvent::Unknown => {
            info!(event_type = %envelope.event_type, "Ignoring unhandled webhook event");
        }
    }

    Ok(Json(WebhookAck { received: true }))
}

/// The authenticated user's payment history, newest first.
///
/// GET /api/v1/payments/history
pub async fn history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<PaymentHistoryResponse>, ApiError> {
    let payments = PaymentRepository::new(state.pool.clone());
    let entities = payments.list_by_user(user.id).await?;

    Ok(Json(PaymentHistoryResponse {
        payments: entities.into_iter().map(Payment::from).collect(),
    }))
}

/// The authenticated user's subscription.
///
/// GET /api/v1/subscriptions/me
pub async fn my_subscription(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Subscription>, ApiError> {
    let subscriptions = SubscriptionRepository::new(state.pool.clone());
    let entity = subscriptions
        .find_by_user(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No subscription found".to_string()))?;

    Ok(Json(entity.into()))
}

/// Post-completion bookkeeping shared by the redirect and webhook paths:
/// a counter for the completed charge and the subscription upsert that
/// grants the entitlement.
async fn settle_completed_payment(
    state: &AppState,
    entity: &PaymentEntity,
    gateway_subscription_id: Option<&str>,
    gateway_customer_id: Option<&str>,
) -> Result<(), ApiError> {
    record_payment_completed(entity.amount_cents);

    let payment: Payment = entity.clone().into();
    let now = Utc::now();
    let period_end = now + Duration::days(payment.billing_cycle.period_days());

    let subscriptions = SubscriptionRepository::new(state.pool.clone());
    subscriptions
        .upsert(&SubscriptionUpsert {
            user_id: payment.user_id,
            gateway_subscription_id,
            gateway_customer_id,
            plan_name: &payment.plan_name,
            plan_type: payment.plan_type.as_str(),
            billing_cycle: payment.billing_cycle.as_str(),
            amount_cents: payment.amount_cents,
            currency: &payment.currency,
            status: SubscriptionStatus::Active.as_str(),
            current_period_start: now,
            current_period_end: period_end,
        })
        .await?;

    info!(
        user_id = %payment.user_id,
        session_id = %payment.checkout_session_id,
        amount_cents = payment.amount_cents,
        "Payment completed and subscription reconciled"
    );

    Ok(())
}

fn parse_event(envelope: &WebhookEnvelope) -> Result<GatewayEvent, ApiError> {
    let object = &envelope.data.object;
    let malformed = || ApiError::BadRequest("Malformed webhook payload".to_string());

    match envelope.event_type.as_str() {
        "checkout.session.completed" => {
            let session_id = object
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(malformed)?
                .to_string();
            Ok(GatewayEvent::CheckoutCompleted {
                session_id,
                subscription_id: object
                    .get("subscription")
                    .and_then(|v| v.as_str())
                    .map(String::from),
                customer_id: object
                    .get("customer")
                    .and_then(|v| v.as_str())
                    .map(String::from),
            })
        }
        "invoice.payment_succeeded" => {
            let subscription_id = object
                .get("subscription")
                .and_then(|v| v.as_str())
                .ok_or_else(malformed)?
                .to_string();
            let period = object
                .get("lines")
                .and_then(|lines| lines.get("data"))
                .and_then(|data| data.get(0))
                .and_then(|line| line.get("period"))
                .ok_or_else(malformed)?;
            let period_start = unix_timestamp(period.get("start")).ok_or_else(malformed)?;
            let period_end = unix_timestamp(period.get("end")).ok_or_else(malformed)?;
            Ok(GatewayEvent::InvoicePaid {
                subscription_id,
                period_start,
                period_end,
            })
        }
        "invoice.payment_failed" => {
            let subscription_id = object
                .get("subscription")
                .and_then(|v| v.as_str())
                .ok_or_else(malformed)?
                .to_string();
            Ok(GatewayEvent::InvoiceFailed { subscription_id })
        }
        "customer.subscription.deleted" => {
            let subscription_id = object
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(malformed)?
                .to_string();
            Ok(GatewayEvent::SubscriptionDeleted { subscription_id })
        }
        _ => Ok(GatewayEvent::Unknown),
    }
}

fn unix_timestamp(value: Option<&serde_json::Value>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| v.as_i64())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}
