//! Payment repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PaymentEntity;
use crate::metrics::QueryTimer;

/// Repository for payment database operations.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a pending payment for a freshly created checkout session.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_pending(
        &self,
        user_id: Uuid,
        checkout_session_id: &str,
        amount_cents: i64,
        currency: &str,
        plan_name: &str,
        plan_type: &str,
        billing_cycle: &str,
        is_subscription: bool,
    ) -> Result<PaymentEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_pending_payment");
        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            INSERT INTO payments (user_id, checkout_session_id, amount_cents, currency,
                                  plan_name, plan_type, billing_cycle, is_subscription)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(checkout_session_id)
        .bind(amount_cents)
        .bind(currency)
        .bind(plan_name)
        .bind(plan_type)
        .bind(billing_cycle)
        .bind(is_subscription)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a payment by its gateway checkout session id.
    pub async fn find_by_checkout_session(
        &self,
        checkout_session_id: &str,
    ) -> Result<Option<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_payment_by_session");
        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            SELECT * FROM payments WHERE checkout_session_id = $1
            "#,
        )
        .bind(checkout_session_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Complete a pending payment.
    ///
    /// Compare-and-swap on pending, so concurrent webhook delivery and the
    /// success redirect settle to exactly one completion. Returns None when
    /// the payment was not pending.
    pub async fn complete_by_checkout_session(
        &self,
        checkout_session_id: &str,
        payment_intent_id: Option<&str>,
    ) -> Result<Option<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("complete_payment");
        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            UPDATE payments
            SET status = 'completed',
                payment_intent_id = COALESCE($2, payment_intent_id),
                updated_at = NOW()
            WHERE checkout_session_id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(checkout_session_id)
        .bind(payment_intent_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Move a pending payment to a terminal failure state
    /// (failed or cancelled). Returns None when it was not pending.
    pub async fn mark_by_checkout_session(
        &self,
        checkout_session_id: &str,
        status: &str,
    ) -> Result<Option<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_payment");
        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            UPDATE payments
            SET status = $2, updated_at = NOW()
            WHERE checkout_session_id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(checkout_session_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// A user's payment history, newest first.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_payments_by_user");
        let result = sqlx::query_as::<_, PaymentEntity>(
            r#"
            SELECT * FROM payments WHERE user_id = $1 ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Sum of completed payments, in cents.
    pub async fn total_revenue_cents(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("total_revenue");
        let sum: (Option<i64>,) = sqlx::query_as(
            r#"
            SELECT SUM(amount_cents) FROM payments WHERE status = 'completed'
            "#,
        )
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
