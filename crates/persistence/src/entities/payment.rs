//! Payment entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{BillingCycle, Payment, PaymentStatus, PlanType};

/// Database row mapping for the payments table.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub checkout_session_id: String,
    pub payment_intent_id: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub plan_name: String,
    pub plan_type: String,
    pub billing_cycle: String,
    pub is_subscription: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentEntity> for Payment {
    fn from(entity: PaymentEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            checkout_session_id: entity.checkout_session_id,
            payment_intent_id: entity.payment_intent_id,
            amount_cents: entity.amount_cents,
            currency: entity.currency,
            plan_name: entity.plan_name,
            plan_type: entity.plan_type.parse::<PlanType>().unwrap_or(PlanType::Pro),
            billing_cycle: entity
                .billing_cycle
                .parse::<BillingCycle>()
                .unwrap_or(BillingCycle::Monthly),
            is_subscription: entity.is_subscription,
            status: entity
                .status
                .parse::<PaymentStatus>()
                .unwrap_or(PaymentStatus::Pending),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
