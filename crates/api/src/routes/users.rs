//! User profile routes for viewing and updating account information.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use domain::models::{BrandSize, User};
use persistence::repositories::{AnalyticsRepository, ProfileUpdate, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, OptionalUserAuth};

/// Request body for profile updates. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,

    #[validate(url(message = "Avatar URL must be a valid URL"))]
    pub avatar_url: Option<String>,

    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,

    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,

    // Brand profile
    #[validate(length(max = 100, message = "Company name must be at most 100 characters"))]
    pub company_name: Option<String>,

    #[validate(length(max = 100, message = "Industry must be at most 100 characters"))]
    pub industry: Option<String>,

    pub brand_size: Option<String>,

    // Influencer profile
    #[validate(length(max = 100, message = "Niche must be at most 100 characters"))]
    pub niche: Option<String>,

    #[validate(custom(function = "shared::validation::validate_social_handle"))]
    pub instagram_handle: Option<String>,

    #[validate(length(max = 100, message = "Channel must be at most 100 characters"))]
    pub youtube_channel: Option<String>,

    #[validate(custom(function = "shared::validation::validate_social_handle"))]
    pub tiktok_handle: Option<String>,

    #[validate(custom(function = "shared::validation::validate_followers_count"))]
    pub followers_count: Option<i64>,
}

impl UpdateProfileRequest {
    fn has_brand_fields(&self) -> bool {
        self.company_name.is_some() || self.industry.is_some() || self.brand_size.is_some()
    }

    fn has_influencer_fields(&self) -> bool {
        self.niche.is_some()
            || self.instagram_handle.is_some()
            || self.youtube_channel.is_some()
            || self.tiktok_handle.is_some()
            || self.followers_count.is_some()
    }
}

/// Get the authenticated user's account.
///
/// GET /api/v1/users/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// Update the authenticated user's profile.
///
/// Shared fields are open to every role; brand fields are rejected for
/// non-brands and influencer fields for non-influencers.
///
/// PUT /api/v1/users/me/profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if request.has_brand_fields() && !user.is_brand() {
        return Err(ApiError::UnprocessableEntity(
            "Brand profile fields are only available to brand accounts".to_string(),
        ));
    }
    if request.has_influencer_fields() && !user.is_influencer() {
        return Err(ApiError::UnprocessableEntity(
            "Influencer profile fields are only available to influencer accounts".to_string(),
        ));
    }

    if let Some(ref brand_size) = request.brand_size {
        brand_size
            .parse::<BrandSize>()
            .map_err(ApiError::Validation)?;
    }

    let update = ProfileUpdate {
        bio: request.bio,
        avatar_url: request.avatar_url,
        website: request.website,
        phone: request.phone,
        location: request.location,
        company_name: request.company_name,
        industry: request.industry,
        brand_size: request.brand_size,
        niche: request.niche,
        instagram_handle: request.instagram_handle,
        youtube_channel: request.youtube_channel,
        tiktok_handle: request.tiktok_handle,
        followers_count: request.followers_count,
    };

    let users = UserRepository::new(state.pool.clone());
    let entity = users
        .update_profile(user.id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %user.id, "Profile updated");

    Ok(Json(entity.into()))
}

/// View a public profile.
///
/// Viewing an influencer profile counts toward their profile_views,
/// unless the influencer is looking at their own page.
///
/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    OptionalUserAuth(viewer): OptionalUserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let user: User = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into();

    let is_self_view = viewer.map(|auth| auth.user_id == user.id).unwrap_or(false);
    if user.is_influencer() && !is_self_view {
        let analytics = AnalyticsRepository::new(state.pool.clone());
        if let Err(e) = analytics.increment_profile_views(user.id).await {
            // A lost view count never fails the profile read
            warn!(user_id = %user.id, error = %e, "Failed to count profile view");
        }
    }

    Ok(Json(user))
}
