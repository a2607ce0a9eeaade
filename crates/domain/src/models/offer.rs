//! Direct offers from brands to influencers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A direct collaboration offer, optionally tied to a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOffer {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub influencer_id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub amount_cents: i64,
    pub deliverables: String,
    pub deadline: NaiveDate,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl CustomOffer {
    /// Whether the named influencer can still accept or reject.
    ///
    /// Non-pending offers are immutable through the response endpoints.
    pub fn is_open(&self) -> bool {
        self.status == OfferStatus::Pending
    }

    /// Whether the deadline has passed relative to `today`.
    pub fn is_past_deadline(&self, today: NaiveDate) -> bool {
        self.deadline < today
    }
}

/// Lifecycle state of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Expired => "expired",
        }
    }
}

impl FromStr for OfferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OfferStatus::Pending),
            "accepted" => Ok(OfferStatus::Accepted),
            "rejected" => Ok(OfferStatus::Rejected),
            "expired" => Ok(OfferStatus::Expired),
            _ => Err(format!("Invalid offer status: {}", s)),
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
