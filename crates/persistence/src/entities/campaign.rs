//! Campaign entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Campaign, CampaignCategory, CampaignPlatform};

/// Database row mapping for the campaigns table.
#[derive(Debug, Clone, FromRow)]
pub struct CampaignEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub budget_cents: i64,
    pub category: String,
    pub platform: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CampaignEntity> for Campaign {
    fn from(entity: CampaignEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            image_url: entity.image_url,
            budget_cents: entity.budget_cents,
            category: entity
                .category
                .parse::<CampaignCategory>()
                .unwrap_or(CampaignCategory::Lifestyle),
            platform: entity
                .platform
                .parse::<CampaignPlatform>()
                .unwrap_or(CampaignPlatform::Instagram),
            creator_id: entity.creator_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
