//! Subscription state mirrored from the payment gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::payment::{BillingCycle, PlanType};

/// A user's subscription, at most one row per user.
///
/// Written only by payment reconciliation (webhook handlers and the
/// success-redirect confirmation), never directly by user requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gateway_subscription_id: Option<String>,
    pub gateway_customer_id: Option<String>,
    pub plan_name: String,
    pub plan_type: PlanType,
    pub billing_cycle: BillingCycle,
    pub amount_cents: i64,
    pub currency: String,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub cancel_at_period_end: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Whether the subscription currently grants plan benefits.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.status,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing
        ) && self.current_period_end > now
    }
}

/// Gateway-reported subscription state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    PastDue,
    Incomplete,
    Trialing,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::Trialing => "trialing",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SubscriptionStatus::Active),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "incomplete" => Ok(SubscriptionStatus::Incomplete),
            "trialing" => Ok(SubscriptionStatus::Trialing),
            _ => Err(format!("Invalid subscription status: {}", s)),
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_subscription(status: SubscriptionStatus) -> Subscription {
        let now = Utc::now();
        Subscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            gateway_subscription_id: Some("sub_test_1".to_string()),
            gateway_customer_id: Some("cus_test_1".to_string()),
            plan_name: "Pro Plan".to_string(),
            plan_type: PlanType::Pro,
            billing_cycle: BillingCycle::Monthly,
            amount_cents: 9_900,
            currency: "usd".to_string(),
            status,
            current_period_start: now,
            current_period_end: now + Duration::days(30),
            cancel_at_period_end: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Cancelled,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Incomplete,
            SubscriptionStatus::Trialing,
        ] {
            assert_eq!(
                SubscriptionStatus::from_str(status.as_str()).unwrap(),
                status
            );
        }
        assert!(SubscriptionStatus::from_str("paused").is_err());
    }

    #[test]
    fn test_past_due_serializes_snake_case() {
        let json = serde_json::to_string(&SubscriptionStatus::PastDue).unwrap();
        assert_eq!(json, "\"past_due\"");
    }

    #[test]
    fn test_is_active_by_status() {
        let now = Utc::now();
        assert!(test_subscription(SubscriptionStatus::Active).is_active(now));
        assert!(test_subscription(SubscriptionStatus::Trialing).is_active(now));
        assert!(!test_subscription(SubscriptionStatus::Cancelled).is_active(now));
        assert!(!test_subscription(SubscriptionStatus::PastDue).is_active(now));
        assert!(!test_subscription(SubscriptionStatus::Incomplete).is_active(now));
    }

    #[test]
    fn test_is_active_respects_period_end() {
        let now = Utc::now();
        let mut sub = test_subscription(SubscriptionStatus::Active);
        sub.current_period_end = now - Duration::days(1);
        assert!(!sub.is_active(now));
    }
}
