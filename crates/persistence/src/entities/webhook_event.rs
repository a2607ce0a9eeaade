//! Webhook event entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the webhook_events table.
///
/// Acts as an idempotency ledger for gateway callbacks; event ids are
/// unique so a replayed delivery can be detected before any state change.
#[derive(Debug, Clone, FromRow)]
pub struct WebhookEventEntity {
    pub id: Uuid,
    pub event_id: String,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub processed_at: DateTime<Utc>,
}
