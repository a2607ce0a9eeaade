//! Influencer analytics entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::InfluencerAnalytics;

/// Database row mapping for the influencer_analytics table.
#[derive(Debug, Clone, FromRow)]
pub struct AnalyticsEntity {
    pub influencer_id: Uuid,
    pub total_applications: i32,
    pub approved_applications: i32,
    pub total_earnings_cents: i64,
    pub profile_views: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<AnalyticsEntity> for InfluencerAnalytics {
    fn from(entity: AnalyticsEntity) -> Self {
        Self {
            influencer_id: entity.influencer_id,
            total_applications: entity.total_applications,
            approved_applications: entity.approved_applications,
            total_earnings_cents: entity.total_earnings_cents,
            profile_views: entity.profile_views,
            updated_at: entity.updated_at,
        }
    }
}
