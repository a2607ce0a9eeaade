//! Subscription repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SubscriptionEntity;
use crate::metrics::QueryTimer;

/// Inputs for creating or refreshing a user's subscription row.
#[derive(Debug, Clone)]
pub struct SubscriptionUpsert<'a> {
    pub user_id: Uuid,
    pub gateway_subscription_id: Option<&'a str>,
    pub gateway_customer_id: Option<&'a str>,
    pub plan_name: &'a str,
    pub plan_type: &'a str,
    pub billing_cycle: &'a str,
    pub amount_cents: i64,
    pub currency: &'a str,
    pub status: &'a str,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
}

/// Repository for subscription database operations.
#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Creates a new SubscriptionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create or refresh a user's subscription.
    ///
    /// Upsert keyed on user_id; concurrent reconcilers converge on a single
    /// row instead of racing to insert duplicates.
    pub async fn upsert(
        &self,
        input: &SubscriptionUpsert<'_>,
    ) -> Result<SubscriptionEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_subscription");
        let result = sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            INSERT INTO subscriptions (user_id, gateway_subscription_id, gateway_customer_id,
                                       plan_name, plan_type, billing_cycle, amount_cents,
                                       currency, status, current_period_start, current_period_end)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id) DO UPDATE SET
                gateway_subscription_id = EXCLUDED.gateway_subscription_id,
                gateway_customer_id = EXCLUDED.gateway_customer_id,
                plan_name = EXCLUDED.plan_name,
                plan_type = EXCLUDED.plan_type,
                billing_cycle = EXCLUDED.billing_cycle,
                amount_cents = EXCLUDED.amount_cents,
                currency = EXCLUDED.currency,
                status = EXCLUDED.status,
                current_period_start = EXCLUDED.current_period_start,
                current_period_end = EXCLUDED.current_period_end,
                cancel_at_period_end = false,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(input.user_id)
        .bind(input.gateway_subscription_id)
        .bind(input.gateway_customer_id)
        .bind(input.plan_name)
        .bind(input.plan_type)
        .bind(input.billing_cycle)
        .bind(input.amount_cents)
        .bind(input.currency)
        .bind(input.status)
        .bind(input.current_period_start)
        .bind(input.current_period_end)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user's subscription.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_subscription_by_user");
        let result = sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            SELECT * FROM subscriptions WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Reactivate a subscription with fresh period bounds, by the
    /// gateway's subscription id.
    pub async fn renew_by_gateway_id(
        &self,
        gateway_subscription_id: &str,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("renew_subscription");
        let result = sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            UPDATE subscriptions
            SET status = 'active',
                current_period_start = $2,
                current_period_end = $3,
                updated_at = NOW()
            WHERE gateway_subscription_id = $1
            RETURNING *
            "#,
        )
        .bind(gateway_subscription_id)
        .bind(period_start)
        .bind(period_end)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update subscription status by the gateway's subscription id.
    pub async fn set_status_by_gateway_id(
        &self,
        gateway_subscription_id: &str,
        status: &str,
    ) -> Result<Option<SubscriptionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_subscription_status");
        let result = sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            UPDATE subscriptions
            SET status = $2, updated_at = NOW()
            WHERE gateway_subscription_id = $1
            RETURNING *
            "#,
        )
        .bind(gateway_subscription_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a subscription cancelled by the gateway's subscription id.
    pub async fn cancel_by_gateway_id(
        &self,
        gateway_subscription_id: &str,
    ) -> Result<Option<SubscriptionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("cancel_subscription");
        let result = sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            UPDATE subscriptions
            SET status = 'cancelled', cancel_at_period_end = false, updated_at = NOW()
            WHERE gateway_subscription_id = $1
            RETURNING *
            "#,
        )
        .bind(gateway_subscription_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count subscriptions currently active.
    pub async fn count_active(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_active_subscriptions");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM subscriptions WHERE status = 'active'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }
}
