//! Account domain models: roles, profiles and moderation guards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::models::campaign::Campaign;
use crate::models::offer::CustomOffer;

/// Account role. Determines which API surface an account may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Brand,
    Influencer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Brand => "brand",
            Role::Influencer => "influencer",
            Role::Admin => "admin",
        }
    }

    /// Post-login landing page for this role.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Brand => "/dashboard/brand",
            Role::Influencer => "/dashboard/influencer",
            Role::Admin => "/dashboard/admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "brand" => Ok(Role::Brand),
            "influencer" => Ok(Role::Influencer),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Self-reported size bracket for brand accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandSize {
    Startup,
    Small,
    Medium,
    Large,
    Enterprise,
}

impl BrandSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrandSize::Startup => "startup",
            BrandSize::Small => "small",
            BrandSize::Medium => "medium",
            BrandSize::Large => "large",
            BrandSize::Enterprise => "enterprise",
        }
    }
}

impl FromStr for BrandSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "startup" => Ok(BrandSize::Startup),
            "small" => Ok(BrandSize::Small),
            "medium" => Ok(BrandSize::Medium),
            "large" => Ok(BrandSize::Large),
            "enterprise" => Ok(BrandSize::Enterprise),
            _ => Err(format!("Invalid brand size: {}", s)),
        }
    }
}

impl fmt::Display for BrandSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents an account in the system.
///
/// A single entity covers all three roles; role-specific profile fields are
/// optional and only meaningful for the matching role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: Option<String>,
    pub role: Role,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    // Brand profile
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub brand_size: Option<BrandSize>,
    // Influencer profile
    pub niche: Option<String>,
    pub instagram_handle: Option<String>,
    pub youtube_channel: Option<String>,
    pub tiktok_handle: Option<String>,
    pub followers_count: Option<i64>,
    // Account state
    pub is_active: bool,
    pub is_banned: bool,
    pub banned_at: Option<DateTime<Utc>>,
    pub banned_reason: Option<String>,
    pub banned_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_brand(&self) -> bool {
        self.role == Role::Brand
    }

    pub fn is_influencer(&self) -> bool {
        self.role == Role::Influencer
    }

    /// Whether this account may authenticate at all.
    pub fn can_login(&self) -> bool {
        self.is_active && !self.is_banned
    }

    /// Whether this account may edit or delete the given campaign.
    pub fn can_manage_campaign(&self, campaign: &Campaign) -> bool {
        self.is_admin() || campaign.creator_id == self.id
    }

    /// Whether this account may decide applications for the given campaign.
    pub fn can_decide_applications(&self, campaign: &Campaign) -> bool {
        self.can_manage_campaign(campaign)
    }

    /// Whether this account may view the given offer.
    pub fn can_view_offer(&self, offer: &CustomOffer) -> bool {
        self.is_admin() || offer.brand_id == self.id || offer.influencer_id == self.id
    }

    /// Whether this account may accept or reject the given offer.
    ///
    /// Only the named influencer responds; brands and admins never do.
    pub fn can_respond_to_offer(&self, offer: &CustomOffer) -> bool {
        offer.influencer_id == self.id && self.is_influencer()
    }
}

/// Why a moderation request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModerationError {
    #[error("Only admins can moderate accounts")]
    NotAdmin,

    #[error("You cannot ban yourself")]
    SelfBan,

    #[error("Admin accounts cannot be banned")]
    AdminTarget,

    #[error("User is already banned")]
    AlreadyBanned,

    #[error("User is not banned")]
    NotBanned,
}

/// Checks whether `actor` may ban `target`.
pub fn check_ban(actor: &User, target: &User) -> Result<(), ModerationError> {
    if !actor.is_admin() {
        return Err(ModerationError::NotAdmin);
    }
    if actor.id == target.id {
        return Err(ModerationError::SelfBan);
    }
    if target.is_admin() {
        return Err(ModerationError::AdminTarget);
    }
    if target.is_banned {
        return Err(ModerationError::AlreadyBanned);
    }
    Ok(())
}

/// Checks whether `actor` may unban `target`.
pub fn check_unban(actor: &User, target: &User) -> Result<(), ModerationError> {
    if !actor.is_admin() {
        return Err(ModerationError::NotAdmin);
    }
    if !target.is_banned {
        return Err(ModerationError::NotBanned);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::campaign::{CampaignCategory, CampaignPlatform};
    use crate::models::offer::OfferStatus;

    fn test_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: "tester".to_string(),
            email: "tester@example.com".to_string(),
            password_hash: Some("hashed".to_string()),
            role,
            bio: None,
            avatar_url: None,
            website: None,
            phone: None,
            location: None,
            company_name: None,
            industry: None,
            brand_size: None,
            niche: None,
            instagram_handle: None,
            youtube_channel: None,
            tiktok_handle: None,
            followers_count: None,
            is_active: true,
            is_banned: false,
            banned_at: None,
            banned_reason: None,
            banned_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }

    fn test_campaign(creator_id: Uuid) -> Campaign {
        Campaign {
            id: Uuid::new_v4(),
            title: "Summer Fashion".to_string(),
            description: "Lookbook collaboration".to_string(),
            image_url: None,
            budget_cents: 150_000,
            category: CampaignCategory::Fashion,
            platform: CampaignPlatform::Instagram,
            creator_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_offer(brand_id: Uuid, influencer_id: Uuid) -> CustomOffer {
        CustomOffer {
            id: Uuid::new_v4(),
            brand_id,
            influencer_id,
            campaign_id: None,
            amount_cents: 50_000,
            deliverables: "Two reels".to_string(),
            deadline: Utc::now().date_naive(),
            status: OfferStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            responded_at: None,
        }
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Brand, Role::Influencer, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
        assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
        assert!(Role::from_str("viewer").is_err());
    }

    #[test]
    fn test_role_dashboard_path() {
        assert_eq!(Role::Brand.dashboard_path(), "/dashboard/brand");
        assert_eq!(Role::Influencer.dashboard_path(), "/dashboard/influencer");
        assert_eq!(Role::Admin.dashboard_path(), "/dashboard/admin");
    }

    #[test]
    fn test_brand_size_round_trip() {
        for size in [
            BrandSize::Startup,
            BrandSize::Small,
            BrandSize::Medium,
            BrandSize::Large,
            BrandSize::Enterprise,
        ] {
            assert_eq!(BrandSize::from_str(size.as_str()).unwrap(), size);
        }
        assert!(BrandSize::from_str("gigantic").is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = test_user(Role::Brand);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed"));
        assert!(!json.contains("passwordHash"));
    }

    #[test]
    fn test_can_login() {
        let mut user = test_user(Role::Influencer);
        assert!(user.can_login());

        user.is_banned = true;
        user.is_active = false;
        assert!(!user.can_login());
    }

    #[test]
    fn test_can_manage_campaign() {
        let brand = test_user(Role::Brand);
        let other_brand = test_user(Role::Brand);
        let admin = test_user(Role::Admin);
        let campaign = test_campaign(brand.id);

        assert!(brand.can_manage_campaign(&campaign));
        assert!(!other_brand.can_manage_campaign(&campaign));
        assert!(admin.can_manage_campaign(&campaign));
    }

    #[test]
    fn test_can_respond_to_offer() {
        let brand = test_user(Role::Brand);
        let influencer = test_user(Role::Influencer);
        let other_influencer = test_user(Role::Influencer);
        let offer = test_offer(brand.id, influencer.id);

        assert!(influencer.can_respond_to_offer(&offer));
        assert!(!other_influencer.can_respond_to_offer(&offer));
        assert!(!brand.can_respond_to_offer(&offer));
    }

    #[test]
    fn test_can_view_offer() {
        let brand = test_user(Role::Brand);
        let influencer = test_user(Role::Influencer);
        let admin = test_user(Role::Admin);
        let stranger = test_user(Role::Brand);
        let offer = test_offer(brand.id, influencer.id);

        assert!(brand.can_view_offer(&offer));
        assert!(influencer.can_view_offer(&offer));
        assert!(admin.can_view_offer(&offer));
        assert!(!stranger.can_view_offer(&offer));
    }

    #[test]
    fn test_check_ban_requires_admin() {
        let brand = test_user(Role::Brand);
        let target = test_user(Role::Influencer);
        assert_eq!(check_ban(&brand, &target), Err(ModerationError::NotAdmin));
    }

    #[test]
    fn test_check_ban_rejects_self() {
        let admin = test_user(Role::Admin);
        assert_eq!(check_ban(&admin, &admin), Err(ModerationError::SelfBan));
    }

    #[test]
    fn test_check_ban_rejects_admin_target() {
        let admin = test_user(Role::Admin);
        let other_admin = test_user(Role::Admin);
        assert_eq!(
            check_ban(&admin, &other_admin),
            Err(ModerationError::AdminTarget)
        );
    }

    #[test]
    fn test_check_ban_rejects_already_banned() {
        let admin = test_user(Role::Admin);
        let mut target = test_user(Role::Brand);
        target.is_banned = true;
        assert_eq!(
            check_ban(&admin, &target),
            Err(ModerationError::AlreadyBanned)
        );
    }

    #[test]
    fn test_check_ban_allows_valid_target() {
        let admin = test_user(Role::Admin);
        let target = test_user(Role::Influencer);
        assert!(check_ban(&admin, &target).is_ok());
    }

    #[test]
    fn test_check_unban() {
        let admin = test_user(Role::Admin);
        let mut target = test_user(Role::Brand);

        assert_eq!(check_unban(&admin, &target), Err(ModerationError::NotBanned));

        target.is_banned = true;
        assert!(check_unban(&admin, &target).is_ok());

        let brand = test_user(Role::Brand);
        assert_eq!(check_unban(&brand, &target), Err(ModerationError::NotAdmin));
    }
}
