//! Admin dashboard repository for database operations.

use sqlx::{PgPool, Row};

use domain::models::AdminDashboardStats;

use crate::metrics::QueryTimer;

/// Repository for the admin dashboard aggregates.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Headline numbers for the admin dashboard.
    pub async fn admin_stats(&self) -> Result<AdminDashboardStats, sqlx::Error> {
        let timer = QueryTimer::new("admin_dashboard_stats");

        // Run the per-table aggregates in parallel
        let (users, campaigns, billing, engagement) = tokio::try_join!(
            self.user_counts(),
            self.campaign_counts(),
            self.billing_totals(),
            self.engagement_counts(),
        )?;

        timer.record();
        Ok(AdminDashboardStats {
            total_users: users.0,
            brand_count: users.1,
            influencer_count: users.2,
            campaigns_last_30_days: campaigns,
            total_revenue_cents: billing.0,
            active_subscriptions: billing.1,
            pending_applications: engagement.0,
            total_offers: engagement.1,
            unread_messages: engagement.2,
        })
    }

    async fn user_counts(&self) -> Result<(i64, i64, i64), sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE role = 'brand') as brands,
                COUNT(*) FILTER (WHERE role = 'influencer') as influencers
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok((row.get("total"), row.get("brands"), row.get("influencers")))
    }

    async fn campaign_counts(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM campaigns
            WHERE created_at > NOW() - INTERVAL '30 days'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }

    async fn billing_totals(&self) -> Result<(i64, i64), sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COALESCE(SUM(amount_cents), 0) FROM payments WHERE status = 'completed') as revenue,
                (SELECT COUNT(*) FROM subscriptions WHERE status = 'active') as active_subs
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok((row.get("revenue"), row.get("active_subs")))
    }

    async fn engagement_counts(&self) -> Result<(i64, i64, i64), sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM campaign_applications WHERE status = 'pending') as pending_applications,
                (SELECT COUNT(*) FROM custom_offers) as total_offers,
                (SELECT COUNT(*) FROM contact_messages WHERE is_read = false) as unread_messages
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok((
            row.get("pending_applications"),
            row.get("total_offers"),
            row.get("unread_messages"),
        ))
    }
}
