//! Campaign application workflow routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{Campaign, CampaignApplication, User};
use persistence::entities::ApplicationDetailEntity;
use persistence::repositories::{ApplicationRepository, CampaignRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_application_submitted;

/// Request body for applying to a campaign.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub message: Option<String>,
}

/// Application row joined with campaign title and applicant username.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub campaign_title: String,
    pub influencer_id: Uuid,
    pub influencer_username: String,
    pub status: String,
    pub message: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApplicationDetailEntity> for ApplicationView {
    fn from(entity: ApplicationDetailEntity) -> Self {
        Self {
            id: entity.id,
            campaign_id: entity.campaign_id,
            campaign_title: entity.campaign_title,
            influencer_id: entity.influencer_id,
            influencer_username: entity.influencer_username,
            status: entity.status,
            message: entity.message,
            applied_at: entity.applied_at,
            updated_at: entity.updated_at,
        }
    }
}

/// List response for application views.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationView>,
}

/// Apply to a campaign. Influencer accounts only.
///
/// A repeat application trips the unique (campaign, influencer)
/// constraint and is reported as a conflict rather than a server error.
///
/// POST /api/v1/campaigns/:id/apply
pub async fn apply(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<CampaignApplication>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if !user.is_influencer() {
        return Err(ApiError::Forbidden(
            "Only influencer accounts can apply to campaigns".to_string(),
        ));
    }

    let campaigns = CampaignRepository::new(state.pool.clone());
    if campaigns.find_by_id(campaign_id).await?.is_none() {
        return Err(ApiError::NotFound("Campaign not found".to_string()));
    }

    let applications = ApplicationRepository::new(state.pool.clone());
    let created = applications
        .create(campaign_id, user.id, request.message.as_deref())
        .await;

    let entity = match created {
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            return Err(ApiError::Conflict(
                "You have already applied to this campaign".to_string(),
            ));
        }
        other => other?,
    };

    record_application_submitted();
    info!(
        application_id = %entity.id,
        campaign_id = %campaign_id,
        influencer_id = %user.id,
        "Application submitted"
    );

    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// The authenticated influencer's applications, newest first.
///
/// GET /api/v1/applications/mine
pub async fn mine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApplicationListResponse>, ApiError> {
    if !user.is_influencer() {
        return Err(ApiError::Forbidden(
            "Only influencer accounts have applications".to_string(),
        ));
    }

    let applications = ApplicationRepository::new(state.pool.clone());
    let entities = applications.list_by_influencer(user.id).await?;

    Ok(Json(ApplicationListResponse {
        applications: entities.into_iter().map(ApplicationView::from).collect(),
    }))
}

/// Applications to a campaign. Campaign creator or admin only.
///
/// GET /api/v1/campaigns/:id/applications
pub async fn list_for_campaign(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<ApplicationListResponse>, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = campaigns
        .find_by_id(campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?
        .into();

    if !user.can_decide_applications(&campaign) {
        return Err(ApiError::Forbidden(
            "Only the campaign creator or an admin can view applications".to_string(),
        ));
    }

    let applications = ApplicationRepository::new(state.pool.clone());
    let entities = applications.list_by_campaign(campaign_id).await?;

    Ok(Json(ApplicationListResponse {
        applications: entities.into_iter().map(ApplicationView::from).collect(),
    }))
}

/// Approve a pending application. Campaign creator or admin only.
///
/// POST /api/v1/applications/:id/approve
pub async fn approve(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CampaignApplication>, ApiError> {
    let applications = ApplicationRepository::new(state.pool.clone());
    decide_guard(&state, &user, &applications, id).await?;

    let entity = applications.approve(id).await?.ok_or_else(|| {
        ApiError::Conflict("Application already processed".to_string())
    })?;

    info!(application_id = %id, actor_id = %user.id, "Application approved");

    Ok(Json(entity.into()))
}

/// Reject a pending application. Campaign creator or admin only.
///
/// POST /api/v1/applications/:id/reject
pub async fn reject(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CampaignApplication>, ApiError> {
    let applications = ApplicationRepository::new(state.pool.clone());
    decide_guard(&state, &user, &applications, id).await?;

    let entity = applications.reject(id).await?.ok_or_else(|| {
        ApiError::Conflict("Application already processed".to_string())
    })?;

    info!(application_id = %id, actor_id = %user.id, "Application rejected");

    Ok(Json(entity.into()))
}

/// Shared authorization for approve/reject: the application must exist
/// and the actor must be the campaign creator or an admin.
async fn decide_guard(
    state: &AppState,
    user: &User,
    applications: &ApplicationRepository,
    application_id: Uuid,
) -> Result<(), ApiError> {
    let application = applications
        .find_by_id(application_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = campaigns
        .find_by_id(application.campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?
        .into();

    if !user.can_decide_applications(&campaign) {
        return Err(ApiError::Forbidden(
            "Only the campaign creator or an admin can decide applications".to_string(),
        ));
    }

    Ok(())
}
