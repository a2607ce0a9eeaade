//! Custom offer repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::OfferEntity;
use crate::metrics::QueryTimer;

/// Repository for custom offer database operations.
#[derive(Clone)]
pub struct OfferRepository {
    pool: PgPool,
}

impl OfferRepository {
    /// Creates a new OfferRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new offer.
    pub async fn create(
        &self,
        brand_id: Uuid,
        influencer_id: Uuid,
        campaign_id: Option<Uuid>,
        amount_cents: i64,
        deliverables: &str,
        deadline: chrono::NaiveDate,
    ) -> Result<OfferEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_offer");
        let result = sqlx::query_as::<_, OfferEntity>(
            r#"
            INSERT INTO custom_offers (brand_id, influencer_id, campaign_id, amount_cents, deliverables, deadline)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(brand_id)
        .bind(influencer_id)
        .bind(campaign_id)
        .bind(amount_cents)
        .bind(deliverables)
        .bind(deadline)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find offer by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OfferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_offer_by_id");
        let result = sqlx::query_as::<_, OfferEntity>(
            r#"
            SELECT * FROM custom_offers WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Offers sent by a brand, newest first.
    pub async fn list_by_brand(&self, brand_id: Uuid) -> Result<Vec<OfferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_offers_by_brand");
        let result = sqlx::query_as::<_, OfferEntity>(
            r#"
            SELECT * FROM custom_offers WHERE brand_id = $1 ORDER BY created_at DESC
            "#,
        )
        .bind(brand_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Offers received by an influencer, newest first.
    pub async fn list_by_influencer(
        &self,
        influencer_id: Uuid,
    ) -> Result<Vec<OfferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_offers_by_influencer");
        let result = sqlx::query_as::<_, OfferEntity>(
            r#"
            SELECT * FROM custom_offers WHERE influencer_id = $1 ORDER BY created_at DESC
            "#,
        )
        .bind(influencer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Accept a pending offer.
    ///
    /// Compare-and-swap on pending; the influencer's earnings counter is
    /// credited in the same transaction so the amount is applied exactly
    /// once. Returns None when the offer was not pending.
    pub async fn accept(&self, id: Uuid) -> Result<Option<OfferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("accept_offer");

        let mut tx = self.pool.begin().await?;

        let offer = sqlx::query_as::<_, OfferEntity>(
            r#"
            UPDATE custom_offers
            SET status = 'accepted', responded_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let offer = match offer {
            Some(offer) => offer,
            None => {
                tx.rollback().await?;
                timer.record();
                return Ok(None);
            }
        };

        sqlx::query(
            r#"
            INSERT INTO influencer_analytics (influencer_id, total_earnings_cents)
            VALUES ($1, $2)
            ON CONFLICT (influencer_id) DO UPDATE SET
                total_earnings_cents = influencer_analytics.total_earnings_cents + $2,
                updated_at = NOW()
            "#,
        )
        .bind(offer.influencer_id)
        .bind(offer.amount_cents)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(offer))
    }

    /// Reject a pending offer. Returns None when it was not pending.
    pub async fn reject(&self, id: Uuid) -> Result<Option<OfferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("reject_offer");
        let result = sqlx::query_as::<_, OfferEntity>(
            r#"
            UPDATE custom_offers
            SET status = 'rejected', responded_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark past-deadline pending offers expired.
    /// Returns the number of offers swept.
    pub async fn expire_past_deadline(&self) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("expire_offers");
        let result = sqlx::query(
            r#"
            UPDATE custom_offers
            SET status = 'expired', updated_at = NOW()
            WHERE status = 'pending' AND deadline < CURRENT_DATE
            "#,
        )
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Total number of offers ever created.
    pub async fn count_total(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_offers");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM custom_offers
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    /// Per-status offer counts for one brand.
    pub async fn count_by_brand_and_status(
        &self,
        brand_id: Uuid,
        status: &str,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_offers_by_brand_status");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM custom_offers WHERE brand_id = $1 AND status = $2
            "#,
        )
        .bind(brand_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_repository_creation() {
        // Actual database tests are integration tests
    }
}
