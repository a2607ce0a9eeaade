//! Offer expiry sweep background job.

use sqlx::PgPool;
use tracing::info;

use persistence::repositories::OfferRepository;

use super::scheduler::{Job, JobFrequency};

/// Background job that marks past-deadline pending offers as expired.
///
/// Only pending offers are touched; accepted and rejected offers keep
/// their terminal status regardless of deadline.
pub struct OfferExpiryJob {
    pool: PgPool,
}

impl OfferExpiryJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for OfferExpiryJob {
    fn name(&self) -> &'static str {
        "offer_expiry"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(10)
    }

    async fn execute(&self) -> Result<(), String> {
        let offers = OfferRepository::new(self.pool.clone());

        let expired = offers
            .expire_past_deadline()
            .await
            .map_err(|e| format!("Failed to expire offers: {}", e))?;

        if expired > 0 {
            info!(expired = expired, "Marked past-deadline offers expired");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_job_frequency() {
        let freq = JobFrequency::Minutes(10);
        assert_eq!(freq.duration(), Duration::from_secs(600));
    }
}
