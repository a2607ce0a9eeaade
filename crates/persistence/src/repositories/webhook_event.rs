//! Webhook event repository for database operations.

use sqlx::PgPool;

use crate::metrics::QueryTimer;

/// Repository for the gateway webhook idempotency ledger.
#[derive(Clone)]
pub struct WebhookEventRepository {
    pool: PgPool,
}

impl WebhookEventRepository {
    /// Creates a new WebhookEventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Claim an event id before processing.
    ///
    /// ON CONFLICT DO NOTHING on the unique event id; returns false when the
    /// event was already claimed, in which case the caller must skip all
    /// state changes and acknowledge the delivery.
    pub async fn claim(
        &self,
        event_id: &str,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("claim_webhook_event");
        let result = sqlx::query(
            r#"
            INSERT INTO webhook_events (event_id, event_type, payload)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(event_type)
        .bind(payload)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() == 1)
    }

    /// Delete ledger entries older than the specified days.
    /// Returns the number of deleted records.
    pub async fn delete_older_than_days(&self, days: i32) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_old_webhook_events");
        let result = sqlx::query(
            r#"
            DELETE FROM webhook_events
            WHERE processed_at < NOW() - make_interval(days => $1)
            "#,
        )
        .bind(days)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
