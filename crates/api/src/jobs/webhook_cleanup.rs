//! Webhook event ledger cleanup background job.

use sqlx::PgPool;
use tracing::info;

use persistence::repositories::WebhookEventRepository;

use super::scheduler::{Job, JobFrequency};

/// Default retention period in days for claimed webhook event ids.
const DEFAULT_RETENTION_DAYS: i32 = 30;

/// Background job that prunes old entries from the webhook idempotency
/// ledger. The gateway retries failed deliveries for days, not weeks,
/// so ids older than the retention window can no longer collide.
pub struct WebhookCleanupJob {
    pool: PgPool,
    retention_days: i32,
}

impl WebhookCleanupJob {
    pub fn new(pool: PgPool, retention_days: Option<i32>) -> Self {
        Self {
            pool,
            retention_days: retention_days.unwrap_or(DEFAULT_RETENTION_DAYS),
        }
    }
}

#[async_trait::async_trait]
impl Job for WebhookCleanupJob {
    fn name(&self) -> &'static str {
        "webhook_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Daily
    }

    async fn execute(&self) -> Result<(), String> {
        let events = WebhookEventRepository::new(self.pool.clone());

        let deleted = events
            .delete_older_than_days(self.retention_days)
            .await
            .map_err(|e| format!("Failed to prune webhook events: {}", e))?;

        info!(
            deleted = deleted,
            retention_days = self.retention_days,
            "Pruned old webhook event ids"
        );

        Ok(())
    }
}
