//! Subscription entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{BillingCycle, PlanType, Subscription, SubscriptionStatus};

/// Database row mapping for the subscriptions table.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gateway_subscription_id: Option<String>,
    pub gateway_customer_id: Option<String>,
    pub plan_name: String,
    pub plan_type: String,
    pub billing_cycle: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub cancel_at_period_end: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for Subscription {
    fn from(entity: SubscriptionEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            gateway_subscription_id: entity.gateway_subscription_id,
            gateway_customer_id: entity.gateway_customer_id,
            plan_name: entity.plan_name,
            plan_type: entity.plan_type.parse::<PlanType>().unwrap_or(PlanType::Pro),
            billing_cycle: entity
                .billing_cycle
                .parse::<BillingCycle>()
                .unwrap_or(BillingCycle::Monthly),
            amount_cents: entity.amount_cents,
            currency: entity.currency,
            status: entity
                .status
                .parse::<SubscriptionStatus>()
                .unwrap_or(SubscriptionStatus::Incomplete),
            current_period_start: entity.current_period_start,
            current_period_end: entity.current_period_end,
            cancel_at_period_end: entity.cancel_at_period_end,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_subscription_entity_to_domain() {
        let now = Utc::now();
        let entity = SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            gateway_subscription_id: Some("sub_test_1".to_string()),
            gateway_customer_id: Some("cus_test_1".to_string()),
            plan_name: "Pro Plan".to_string(),
            plan_type: "pro".to_string(),
            billing_cycle: "yearly".to_string(),
            amount_cents: 59_400,
            currency: "usd".to_string(),
            status: "active".to_string(),
            current_period_start: now,
            current_period_end: now + Duration::days(365),
            cancel_at_period_end: false,
            created_at: now,
            updated_at: now,
        };

        let subscription: Subscription = entity.clone().into();
        assert_eq!(subscription.status, SubscriptionStatus::Active);
        assert_eq!(subscription.billing_cycle, BillingCycle::Yearly);
        assert!(subscription.is_active(now));
    }
}
