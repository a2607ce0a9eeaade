//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{BrandSize, Role, User};

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub brand_size: Option<String>,
    pub niche: Option<String>,
    pub instagram_handle: Option<String>,
    pub youtube_channel: Option<String>,
    pub tiktok_handle: Option<String>,
    pub followers_count: Option<i64>,
    pub is_active: bool,
    pub is_banned: bool,
    pub banned_at: Option<DateTime<Utc>>,
    pub banned_reason: Option<String>,
    pub banned_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            password_hash: entity.password_hash,
            // Role column carries a CHECK constraint; influencer is the
            // registration default.
            role: entity.role.parse::<Role>().unwrap_or(Role::Influencer),
            bio: entity.bio,
            avatar_url: entity.avatar_url,
            website: entity.website,
            phone: entity.phone,
            location: entity.location,
            company_name: entity.company_name,
            industry: entity.industry,
            brand_size: entity
                .brand_size
                .as_deref()
                .and_then(|s| s.parse::<BrandSize>().ok()),
            niche: entity.niche,
            instagram_handle: entity.instagram_handle,
            youtube_channel: entity.youtube_channel,
            tiktok_handle: entity.tiktok_handle,
            followers_count: entity.followers_count,
            is_active: entity.is_active,
            is_banned: entity.is_banned,
            banned_at: entity.banned_at,
            banned_reason: entity.banned_reason,
            banned_by: entity.banned_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            last_login_at: entity.last_login_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user_entity() -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: Some("$argon2id$stub".to_string()),
            role: "influencer".to_string(),
            bio: None,
            avatar_url: None,
            website: None,
            phone: None,
            location: None,
            company_name: None,
            industry: None,
            brand_size: None,
            niche: Some("fashion".to_string()),
            instagram_handle: Some("@alice".to_string()),
            youtube_channel: None,
            tiktok_handle: None,
            followers_count: Some(12_000),
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

    #[test]
    fn test_user_entity_to_domain() {
        let entity = create_test_user_entity();
        let user: User = entity.clone().into();

        assert_eq!(user.id, entity.id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Influencer);
        assert_eq!(user.followers_count, Some(12_000));
        assert!(user.can_login());
    }

    #[test]
    fn test_brand_entity_maps_brand_size() {
        let mut entity = create_test_user_entity();
        entity.role = "brand".to_string();
        entity.brand_size = Some("startup".to_string());

        let user: User = entity.into();
        assert_eq!(user.role, Role::Brand);
        assert_eq!(user.brand_size, Some(BrandSize::Startup));
    }

    #[test]
    fn test_unknown_brand_size_maps_to_none() {
        let mut entity = create_test_user_entity();
        entity.brand_size = Some("galactic".to_string());

        let user: User = entity.into();
        assert_eq!(user.brand_size, None);
    }

    #[test]
    fn test_banned_entity_cannot_login() {
        let mut entity = create_test_user_entity();
        entity.is_banned = true;
        entity.is_active = false;
        entity.banned_reason = Some("spam".to_string());

        let user: User = entity.into();
        assert!(!user.can_login());
    }
}
