//! Per-influencer analytics counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate counters for a single influencer.
///
/// Rows are created lazily via upsert and written only by workflow side
/// effects (application submit, application approve, offer accept, profile
/// view). Counters never go negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerAnalytics {
    pub influencer_id: Uuid,
    pub total_applications: i32,
    pub approved_applications: i32,
    pub total_earnings_cents: i64,
    pub profile_views: i32,
    pub updated_at: DateTime<Utc>,
}

impl InfluencerAnalytics {
    /// Fresh counter row for an influencer with no activity yet.
    pub fn empty(influencer_id: Uuid) -> Self {
        Self {
            influencer_id,
            total_applications: 0,
            approved_applications: 0,
            total_earnings_cents: 0,
            profile_views: 0,
            updated_at: Utc::now(),
        }
    }

    /// Approval rate as a percentage, 0.0 when no applications exist.
    pub fn approval_rate(&self) -> f64 {
        if self.total_applications == 0 {
            return 0.0;
        }
        (self.approved_applications as f64 / self.total_applications as f64) * 100.0
    }
}
