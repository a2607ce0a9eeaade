//! Admin moderation and platform oversight routes.
//!
//! All handlers require an admin account via the [`AdminUser`] extractor.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    check_ban, check_unban, AdminDashboardStats, Campaign, ContactMessage, MessageStats, User,
    UserAccountStats,
};
use persistence::repositories::{
    CampaignRepository, ContactMessageRepository, DashboardRepository, UserListFilter,
    UserRepository,
};
use shared::pagination::{PageMeta, PageParams, DEFAULT_PAGE_SIZE};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AdminUser;

const RECENT_ACTIVITY_LIMIT: i64 = 5;

/// Aggregate platform statistics with recent activity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardResponse {
    pub stats: AdminDashboardStats,
    pub recent_users: Vec<User>,
    pub recent_campaigns: Vec<Campaign>,
}

/// Query parameters for the admin user list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    /// Account status filter: "active", "banned", or "inactive".
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl UserListQuery {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Paginated user list with account breakdown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub stats: UserAccountStats,
    pub pagination: PageMeta,
}

/// Request body for banning a user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BanRequest {
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
}

/// Query parameters for the contact message inbox.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListQuery {
    /// Read filter: "all", "read", or "unread".
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl MessageListQuery {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }

    fn read_filter(&self) -> Result<Option<bool>, ApiError> {
        match self.status.as_deref() {
            None | Some("all") => Ok(None),
            Some("read") => Ok(Some(true)),
            Some("unread") => Ok(Some(false)),
            Some(other) => Err(ApiError::Validation(format!(
                "Unknown message status filter: {other}"
            ))),
        }
    }
}

/// Paginated contact inbox with read/unread breakdown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListResponse {
    pub messages: Vec<ContactMessage>,
    pub stats: MessageStats,
    pub pagination: PageMeta,
}

/// Platform-wide statistics plus the newest accounts and campaigns.
///
/// GET /api/v1/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<AdminDashboardResponse>, ApiError> {
    let dashboards = DashboardRepository::new(state.pool.clone());
    let users = UserRepository::new(state.pool.clone());
    let campaigns = CampaignRepository::new(state.pool.clone());

    let (stats, recent_users, recent_campaigns) = tokio::try_join!(
        dashboards.admin_stats(),
        users.recent(RECENT_ACTIVITY_LIMIT),
        campaigns.newest(RECENT_ACTIVITY_LIMIT),
    )?;

    Ok(Json(AdminDashboardResponse {
        stats,
        recent_users: recent_users.into_iter().map(User::from).collect(),
        recent_campaigns: recent_campaigns.into_iter().map(Campaign::from).collect(),
    }))
}

/// Searchable, filterable user list.
///
/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    if let Some(status) = query.status.as_deref() {
        if !matches!(status, "active" | "banned" | "inactive") {
            return Err(ApiError::Validation(format!(
                "Unknown account status filter: {status}"
            )));
        }
    }

    let filter = UserListFilter {
        search: query.search.clone(),
        role: query.role.clone(),
        status: query.status.clone(),
    };
    let page = query.page_params().resolve(DEFAULT_PAGE_SIZE);

    let users = UserRepository::new(state.pool.clone());
    let (entities, total, stats) = tokio::try_join!(
        users.list(&filter, page.limit(), page.offset()),
        users.count(&filter),
        users.account_stats(),
    )?;

    Ok(Json(UserListResponse {
        users: entities.into_iter().map(User::from).collect(),
        stats,
        pagination: page.meta(total),
    }))
}

/// Ban a user account. Admins cannot ban themselves or other admins.
///
/// POST /api/v1/admin/users/:id/ban
pub async fn ban_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<BanRequest>,
) -> Result<Json<User>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let users = UserRepository::new(state.pool.clone());
    let target: User = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into();

    check_ban(&admin, &target)?;

    let entity = users
        .ban(id, &request.reason, admin.id)
        .await?
        .ok_or_else(|| ApiError::Conflict("User is already banned".to_string()))?;

    info!(user_id = %id, admin_id = %admin.id, "User banned");

    Ok(Json(entity.into()))
}

/// Lift a ban, restoring the account.
///
/// POST /api/v1/admin/users/:id/unban
pub async fn unban_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let target: User = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into();

    check_unban(&admin, &target)?;

    let entity = users
        .unban(id)
        .await?
        .ok_or_else(|| ApiError::Conflict("User is not banned".to_string()))?;

    info!(user_id = %id, admin_id = %admin.id, "User unbanned");

    Ok(Json(entity.into()))
}

/// Contact inbox, newest first, filterable by read state.
///
/// GET /api/v1/admin/messages
pub async fn list_messages(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<MessageListResponse>, ApiError> {
    let read_filter = query.read_filter()?;
    let page = query.page_params().resolve(DEFAULT_PAGE_SIZE);

    let messages = ContactMessageRepository::new(state.pool.clone());
    let (entities, total, stats) = tokio::try_join!(
        messages.list(read_filter, page.limit(), page.offset()),
        messages.count(read_filter),
        messages.stats(),
    )?;

    Ok(Json(MessageListResponse {
        messages: entities.into_iter().map(ContactMessage::from).collect(),
        stats,
        pagination: page.meta(total),
    }))
}

/// Mark a contact message as read.
///
/// POST /api/v1/admin/messages/:id/read
pub async fn mark_message_read(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ContactMessage>, ApiError> {
    let messages = ContactMessageRepository::new(state.pool.clone());
    let entity = messages
        .mark_read(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;

    Ok(Json(entity.into()))
}

/// Delete a contact message.
///
/// DELETE /api/v1/admin/messages/:id
pub async fn delete_message(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let messages = ContactMessageRepository::new(state.pool.clone());
    let deleted = messages.delete(id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Message not found".to_string()));
    }

    info!(message_id = %id, admin_id = %admin.id, "Contact message deleted");

    Ok(StatusCode::NO_CONTENT)
}
