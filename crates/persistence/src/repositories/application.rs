//! Campaign application repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ApplicationDetailEntity, ApplicationEntity};
use crate::metrics::QueryTimer;

/// Repository for campaign application database operations.
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    /// Creates a new ApplicationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Submit an application.
    ///
    /// Inserts the application row, records campaign membership and bumps
    /// the influencer's total_applications counter in one transaction.
    pub async fn create(
        &self,
        campaign_id: Uuid,
        influencer_id: Uuid,
        message: Option<&str>,
    ) -> Result<ApplicationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_application");

        let mut tx = self.pool.begin().await?;

        let application = sqlx::query_as::<_, ApplicationEntity>(
            r#"
            INSERT INTO campaign_applications (campaign_id, influencer_id, message)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(campaign_id)
        .bind(influencer_id)
        .bind(message)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO campaign_influencers (campaign_id, influencer_id)
            VALUES ($1, $2)
            ON CONFLICT (campaign_id, influencer_id) DO NOTHING
            "#,
        )
        .bind(campaign_id)
        .bind(influencer_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO influencer_analytics (influencer_id, total_applications)
            VALUES ($1, 1)
            ON CONFLICT (influencer_id) DO UPDATE SET
                total_applications = influencer_analytics.total_applications + 1,
                updated_at = NOW()
            "#,
        )
        .bind(influencer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(application)
    }

    /// Find application by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_application_by_id");
        let result = sqlx::query_as::<_, ApplicationEntity>(
            r#"
            SELECT * FROM campaign_applications WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an influencer's application to a campaign.
    pub async fn find_by_campaign_and_influencer(
        &self,
        campaign_id: Uuid,
        influencer_id: Uuid,
    ) -> Result<Option<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_application_by_pair");
        let result = sqlx::query_as::<_, ApplicationEntity>(
            r#"
            SELECT * FROM campaign_applications
            WHERE campaign_id = $1 AND influencer_id = $2
            "#,
        )
        .bind(campaign_id)
        .bind(influencer_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// An influencer's applications with campaign titles, newest first.
    pub async fn list_by_influencer(
        &self,
        influencer_id: Uuid,
    ) -> Result<Vec<ApplicationDetailEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_applications_by_influencer");
        let result = sqlx::query_as::<_, ApplicationDetailEntity>(
            r#"
            SELECT a.*, c.title AS campaign_title, u.username AS influencer_username
            FROM campaign_applications a
            JOIN campaigns c ON c.id = a.campaign_id
            JOIN users u ON u.id = a.influencer_id
            WHERE a.influencer_id = $1
            ORDER BY a.applied_at DESC
            "#,
        )
        .bind(influencer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Applications to a campaign with applicant usernames, newest first.
    pub async fn list_by_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<ApplicationDetailEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_applications_by_campaign");
        let result = sqlx::query_as::<_, ApplicationDetailEntity>(
            r#"
            SELECT a.*, c.title AS campaign_title, u.username AS influencer_username
            FROM campaign_applications a
            JOIN campaigns c ON c.id = a.campaign_id
            JOIN users u ON u.id = a.influencer_id
            WHERE a.campaign_id = $1
            ORDER BY a.applied_at DESC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Recent applications across one brand's campaigns.
    pub async fn recent_for_brand(
        &self,
        brand_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ApplicationDetailEntity>, sqlx::Error> {
        let timer = QueryTimer::new("recent_applications_for_brand");
        let result = sqlx::query_as::<_, ApplicationDetailEntity>(
            r#"
            SELECT a.*, c.title AS campaign_title, u.username AS influencer_username
            FROM campaign_applications a
            JOIN campaigns c ON c.id = a.campaign_id
            JOIN users u ON u.id = a.influencer_id
            WHERE c.creator_id = $1
            ORDER BY a.applied_at DESC
            LIMIT $2
            "#,
        )
        .bind(brand_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Approve a pending application.
    ///
    /// The status change is a compare-and-swap on pending; the
    /// approved_applications counter is bumped in the same transaction so a
    /// replayed approve can never double count. Returns None when the
    /// application was not pending.
    pub async fn approve(&self, id: Uuid) -> Result<Option<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("approve_application");

        let mut tx = self.pool.begin().await?;

        let application = sqlx::query_as::<_, ApplicationEntity>(
            r#"
            UPDATE campaign_applications
            SET status = 'approved', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let application = match application {
            Some(application) => application,
            None => {
                tx.rollback().await?;
                timer.record();
                return Ok(None);
            }
        };

        sqlx::query(
            r#"
            INSERT INTO influencer_analytics (influencer_id, approved_applications)
            VALUES ($1, 1)
            ON CONFLICT (influencer_id) DO UPDATE SET
                approved_applications = influencer_analytics.approved_applications + 1,
                updated_at = NOW()
            "#,
        )
        .bind(application.influencer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(application))
    }

    /// Reject a pending application. Returns None when it was not pending.
    pub async fn reject(&self, id: Uuid) -> Result<Option<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("reject_application");
        let result = sqlx::query_as::<_, ApplicationEntity>(
            r#"
            UPDATE campaign_applications
            SET status = 'rejected', updated_at = NOW()
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

    /// Count applications currently pending.
    pub async fn count_pending(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_pending_applications");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM campaign_applications WHERE status = 'pending'
            "#,
        )
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
