//! Campaign repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CampaignEntity;
use crate::metrics::QueryTimer;

/// Filters for the public campaign list.
#[derive(Debug, Clone, Default)]
pub struct CampaignListFilter {
    pub category: Option<String>,
    pub platform: Option<String>,
    /// Case-insensitive substring match against title or description.
    pub search: Option<String>,
}

/// Repository for campaign-related database operations.
#[derive(Clone)]
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    /// Creates a new CampaignRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new campaign.
    pub async fn create(
        &self,
        title: &str,
        description: &str,
        image_url: Option<&str>,
        budget_cents: i64,
        category: &str,
        platform: &str,
        creator_id: Uuid,
    ) -> Result<CampaignEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_campaign");
        let result = sqlx::query_as::<_, CampaignEntity>(
            r#"
            INSERT INTO campaigns (title, description, image_url, budget_cents, category, platform, creator_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(image_url)
        .bind(budget_cents)
        .bind(category)
        .bind(platform)
        .bind(creator_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find campaign by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_campaign_by_id");
        let result = sqlx::query_as::<_, CampaignEntity>(
            r#"
            SELECT * FROM campaigns WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Browse campaigns with optional filters, newest first.
    pub async fn list(
        &self,
        filter: &CampaignListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_campaigns");
        let result = sqlx::query_as::<_, CampaignEntity>(
            r#"
            SELECT * FROM campaigns
            WHERE ($1::TEXT IS NULL OR category = $1)
              AND ($2::TEXT IS NULL OR platform = $2)
              AND ($3::TEXT IS NULL OR title ILIKE '%' || $3 || '%' OR description ILIKE '%' || $3 || '%')
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(filter.platform.as_deref())
        .bind(filter.search.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count campaigns matching the browse filters.
    pub async fn count(&self, filter: &CampaignListFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_campaigns");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM campaigns
            WHERE ($1::TEXT IS NULL OR category = $1)
              AND ($2::TEXT IS NULL OR platform = $2)
              AND ($3::TEXT IS NULL OR title ILIKE '%' || $3 || '%' OR description ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(filter.platform.as_deref())
        .bind(filter.search.as_deref())
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    /// Campaigns created by one brand, newest first.
    pub async fn list_by_creator(
        &self,
        creator_id: Uuid,
    ) -> Result<Vec<CampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_campaigns_by_creator");
        let result = sqlx::query_as::<_, CampaignEntity>(
            r#"
            SELECT * FROM campaigns WHERE creator_id = $1 ORDER BY created_at DESC
            "#,
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Newest campaigns for the landing page.
    pub async fn newest(&self, limit: i64) -> Result<Vec<CampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("newest_campaigns");
        let result = sqlx::query_as::<_, CampaignEntity>(
            r#"
            SELECT * FROM campaigns ORDER BY created_at DESC LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Newest campaigns on a single platform for the landing page.
    pub async fn newest_by_platform(
        &self,
        platform: &str,
        limit: i64,
    ) -> Result<Vec<CampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("newest_campaigns_by_platform");
        let result = sqlx::query_as::<_, CampaignEntity>(
            r#"
            SELECT * FROM campaigns WHERE platform = $1 ORDER BY created_at DESC LIMIT $2
            "#,
        )
        .bind(platform)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a campaign (partial update).
    /// Only provided fields are updated; None values are preserved.
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        image_url: Option<&str>,
        budget_cents: Option<i64>,
        category: Option<&str>,
        platform: Option<&str>,
    ) -> Result<Option<CampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_campaign");
        let result = sqlx::query_as::<_, CampaignEntity>(
            r#"
            UPDATE campaigns SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                budget_cents = COALESCE($5, budget_cents),
                category = COALESCE($6, category),
                platform = COALESCE($7, platform),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(image_url)
        .bind(budget_cents)
        .bind(category)
        .bind(platform)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a campaign. Applications and campaign-scoped offers cascade.
    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_campaign");
        let result = sqlx::query(
            r#"
            DELETE FROM campaigns WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Total budget across one brand's campaigns, in cents.
    pub async fn total_budget_by_creator(&self, creator_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("total_budget_by_creator");
        let sum: (Option<i64>,) = sqlx::query_as(
            r#"
            SELECT SUM(budget_cents) FROM campaigns WHERE creator_id = $1
            "#,
        )
        .bind(creator_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(sum.0.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_repository_creation() {
        // Actual database tests are integration tests
    }
}
