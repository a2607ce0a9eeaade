//! Periodic export of connection pool gauges.

use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};

/// Publishes database pool occupancy so the Prometheus endpoint reflects
/// pool pressure between scrapes.
pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(15)
    }

    async fn execute(&self) -> Result<(), String> {
        persistence::metrics::record_pool_gauges(&self.pool);
        Ok(())
    }
}
