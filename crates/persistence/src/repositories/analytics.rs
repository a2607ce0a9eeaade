//! Influencer analytics repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AnalyticsEntity;
use crate::metrics::QueryTimer;

/// Repository for influencer analytics counters.
///
/// Counters are written only as side effects of workflow operations; the
/// application and offer repositories bump them inside their own
/// transactions. This repository covers reads and the profile-view counter.
#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    /// Creates a new AnalyticsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the counter row for an influencer.
    pub async fn find_by_influencer(
        &self,
        influencer_id: Uuid,
    ) -> Result<Option<AnalyticsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_analytics_by_influencer");
        let result = sqlx::query_as::<_, AnalyticsEntity>(
            r#"
            SELECT * FROM influencer_analytics WHERE influencer_id = $1
            "#,
        )
        .bind(influencer_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count a public profile view.
    pub async fn increment_profile_views(&self, influencer_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("increment_profile_views");
        let result = sqlx::query(
            r#"
            INSERT INTO influencer_analytics (influencer_id, profile_views)
            VALUES ($1, 1)
            ON CONFLICT (influencer_id) DO UPDATE SET
                profile_views = influencer_analytics.profile_views + 1,
                updated_at = NOW()
            "#,
        )
        .bind(influencer_id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }
}
