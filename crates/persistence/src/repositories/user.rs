//! User repository for database operations.

use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domain::models::UserAccountStats;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Profile fields a user may change after registration.
///
/// None values leave the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
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
}

/// Filters for the admin user list.
#[derive(Debug, Clone, Default)]
pub struct UserListFilter {
    /// Case-insensitive substring match against username or email.
    pub search: Option<String>,
    pub role: Option<String>,
    /// One of active, banned, inactive.
    pub status: Option<String>,
}

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user account.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find user by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find user by email, case-insensitive.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find user by username, case-insensitive.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_username");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users WHERE LOWER(username) = LOWER($1)
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Resolve a login identifier to an account.
    ///
    /// Email is consulted first, then username; both are unique
    /// case-insensitively so the lookup is unambiguous.
    pub async fn find_by_login_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        if let Some(user) = self.find_by_email(identifier).await? {
            return Ok(Some(user));
        }
        self.find_by_username(identifier).await
    }

    /// Update profile fields (partial update).
    /// Only provided fields are updated; None values are preserved.
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user_profile");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users SET
                bio = COALESCE($2, bio),
                avatar_url = COALESCE($3, avatar_url),
                website = COALESCE($4, website),
                phone = COALESCE($5, phone),
                location = COALESCE($6, location),
                company_name = COALESCE($7, company_name),
                industry = COALESCE($8, industry),
                brand_size = COALESCE($9, brand_size),
                niche = COALESCE($10, niche),
                instagram_handle = COALESCE($11, instagram_handle),
                youtube_channel = COALESCE($12, youtube_channel),
                tiktok_handle = COALESCE($13, tiktok_handle),
                followers_count = COALESCE($14, followers_count),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.bio.as_deref())
        .bind(update.avatar_url.as_deref())
        .bind(update.website.as_deref())
        .bind(update.phone.as_deref())
        .bind(update.location.as_deref())
        .bind(update.company_name.as_deref())
        .bind(update.industry.as_deref())
        .bind(update.brand_size.as_deref())
        .bind(update.niche.as_deref())
        .bind(update.instagram_handle.as_deref())
        .bind(update.youtube_channel.as_deref())
        .bind(update.tiktok_handle.as_deref())
        .bind(update.followers_count)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Record a successful login.
    pub async fn update_last_login(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_user_last_login");
        let result = sqlx::query(
            r#"
            UPDATE users SET last_login_at = NOW() WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// Admin user list with search, role and status filters.
    /// Newest accounts first.
    pub async fn list(
        &self,
        filter: &UserListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_users");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users
            WHERE ($1::TEXT IS NULL OR username ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL OR role = $2)
              AND ($3::TEXT IS NULL
                   OR ($3 = 'active' AND is_active = true AND is_banned = false)
                   OR ($3 = 'banned' AND is_banned = true)
                   OR ($3 = 'inactive' AND is_active = false AND is_banned = false))
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.search.as_deref())
        .bind(filter.role.as_deref())
        .bind(filter.status.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count accounts matching the admin list filters.
    pub async fn count(&self, filter: &UserListFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_users");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1::TEXT IS NULL OR username ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL OR role = $2)
              AND ($3::TEXT IS NULL
                   OR ($3 = 'active' AND is_active = true AND is_banned = false)
                   OR ($3 = 'banned' AND is_banned = true)
                   OR ($3 = 'inactive' AND is_active = false AND is_banned = false))
            "#,
        )
        .bind(filter.search.as_deref())
        .bind(filter.role.as_deref())
        .bind(filter.status.as_deref())
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    /// Aggregate account stats for the admin panel.
    pub async fn account_stats(&self) -> Result<UserAccountStats, sqlx::Error> {
        let timer = QueryTimer::new("user_account_stats");
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE is_active = true AND is_banned = false) as active,
                COUNT(*) FILTER (WHERE is_banned = true) as banned,
                COUNT(*) FILTER (WHERE role = 'brand') as brands,
                COUNT(*) FILTER (WHERE role = 'influencer') as influencers,
                COUNT(*) FILTER (WHERE role = 'admin') as admins
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(UserAccountStats {
            total: row.get("total"),
            active: row.get("active"),
            banned: row.get("banned"),
            brands: row.get("brands"),
            influencers: row.get("influencers"),
            admins: row.get("admins"),
        })
    }

    /// Ban an account. Deactivates it and records who acted and why.
    pub async fn ban(
        &self,
        id: Uuid,
        reason: &str,
        banned_by: Uuid,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("ban_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users SET
                is_banned = true,
                banned_at = $2,
                banned_reason = $3,
                banned_by = $4,
                is_active = false,
                updated_at = NOW()
            WHERE id = $1 AND is_banned = false
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(reason)
        .bind(banned_by)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lift a ban, restoring the account.
    pub async fn unban(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("unban_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users SET
                is_banned = false,
                banned_at = NULL,
                banned_reason = NULL,
                banned_by = NULL,
                is_active = true,
                updated_at = NOW()
            WHERE id = $1 AND is_banned = true
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Most recently registered accounts.
    pub async fn recent(&self, limit: i64) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("recent_users");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users ORDER BY created_at DESC LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_repository_creation() {
        // Actual database tests are integration tests
    }
}
