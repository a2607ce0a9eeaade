//! Campaign domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A collaboration posting created by a brand account.
///
/// Budget is stored in integer cents to avoid floating point drift in
/// billing-adjacent paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub budget_cents: i64,
    pub category: CampaignCategory,
    pub platform: CampaignPlatform,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content vertical a campaign targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignCategory {
    Fashion,
    Tech,
    Food,
    Lifestyle,
    Travel,
}

impl CampaignCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignCategory::Fashion => "fashion",
            CampaignCategory::Tech => "tech",
            CampaignCategory::Food => "food",
            CampaignCategory::Lifestyle => "lifestyle",
            CampaignCategory::Travel => "travel",
        }
    }

    /// All categories, in display order.
    pub fn all() -> &'static [CampaignCategory] {
        &[
            CampaignCategory::Fashion,
            CampaignCategory::Tech,
            CampaignCategory::Food,
            CampaignCategory::Lifestyle,
            CampaignCategory::Travel,
        ]
    }
}

impl FromStr for CampaignCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fashion" => Ok(CampaignCategory::Fashion),
            "tech" => Ok(CampaignCategory::Tech),
            "food" => Ok(CampaignCategory::Food),
            "lifestyle" => Ok(CampaignCategory::Lifestyle),
            "travel" => Ok(CampaignCategory::Travel),
            _ => Err(format!("Invalid campaign category: {}", s)),
        }
    }
}

impl fmt::Display for CampaignCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Social platform a campaign runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignPlatform {
    Instagram,
    Youtube,
    Tiktok,
    Twitter,
}

impl CampaignPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignPlatform::Instagram => "instagram",
            CampaignPlatform::Youtube => "youtube",
            CampaignPlatform::Tiktok => "tiktok",
            CampaignPlatform::Twitter => "twitter",
        }
    }
}

impl FromStr for CampaignPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "instagram" => Ok(CampaignPlatform::Instagram),
            "youtube" => Ok(CampaignPlatform::Youtube),
            "tiktok" => Ok(CampaignPlatform::Tiktok),
            "twitter" => Ok(CampaignPlatform::Twitter),
            _ => Err(format!("Invalid campaign platform: {}", s)),
        }
    }
}

impl fmt::Display for CampaignPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
