//! Custom offer entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{CustomOffer, OfferStatus};

/// Database row mapping for the custom_offers table.
#[derive(Debug, Clone, FromRow)]
pub struct OfferEntity {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub influencer_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub amount_cents: i64,
    pub deliverables: String,
    pub deadline: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<OfferEntity> for CustomOffer {
    fn from(entity: OfferEntity) -> Self {
        Self {
            id: entity.id,
            brand_id: entity.brand_id,
            influencer_id: entity.influencer_id,
            campaign_id: entity.campaign_id,
            amount_cents: entity.amount_cents,
            deliverables: entity.deliverables,
            deadline: entity.deadline,
            status: entity
                .status
                .parse::<OfferStatus>()
                .unwrap_or(OfferStatus::Pending),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            responded_at: entity.responded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_entity_to_domain() {
        let entity = OfferEntity {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            influencer_id: Uuid::new_v4(),
            campaign_id: None,
            amount_cents: 50_000,
            deliverables: "Two reels".to_string(),
            deadline: Utc::now().date_naive(),
            status: "pending".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            responded_at: None,
        };

        let offer: CustomOffer = entity.clone().into();
        assert_eq!(offer.id, entity.id);
        assert_eq!(offer.amount_cents, 50_000);
        assert_eq!(offer.status, OfferStatus::Pending);
        assert!(offer.is_open());
    }
}
