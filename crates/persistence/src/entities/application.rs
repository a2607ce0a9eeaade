//! Campaign application entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{ApplicationStatus, CampaignApplication};

/// Database row mapping for the campaign_applications table.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub status: String,
    pub message: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApplicationEntity> for CampaignApplication {
    fn from(entity: ApplicationEntity) -> Self {
        Self {
            id: entity.id,
            campaign_id: entity.campaign_id,
            influencer_id: entity.influencer_id,
            status: entity
                .status
                .parse::<ApplicationStatus>()
                .unwrap_or(ApplicationStatus::Pending),
            message: entity.message,
            applied_at: entity.applied_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Application row joined with campaign title and influencer username for
/// list views.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationDetailEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub status: String,
    pub message: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub campaign_title: String,
    pub influencer_username: String,
}
