//! Campaign catalog routes for browsing and managing campaign postings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{Campaign, CampaignCategory, CampaignPlatform, User};
use persistence::repositories::{
    ApplicationRepository, CampaignListFilter, CampaignRepository, UserRepository,
};
use shared::pagination::{PageMeta, PageParams};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, OptionalUserAuth};

/// Campaigns shown per browse page.
const BROWSE_PAGE_SIZE: i64 = 9;

/// Newest campaigns on the landing page.
const FEATURED_NEWEST: i64 = 8;

/// Per-platform campaigns on the landing page.
const FEATURED_PER_PLATFORM: i64 = 6;

/// Query parameters for the campaign browse listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseQuery {
    pub category: Option<String>,
    pub platform: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl BrowseQuery {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Request body for creating a campaign.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "Description must be 1-5000 characters"))]
    pub description: String,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    #[validate(custom(function = "shared::validation::validate_budget_cents"))]
    pub budget_cents: i64,

    pub category: String,
    pub platform: String,
}

/// Request body for updating a campaign. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Description must be 1-5000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    #[validate(custom(function = "shared::validation::validate_budget_cents"))]
    pub budget_cents: Option<i64>,

    pub category: Option<String>,
    pub platform: Option<String>,
}

/// Paginated campaign list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignListResponse {
    pub campaigns: Vec<Campaign>,
    pub pagination: PageMeta,
}

/// Campaign detail response.
///
/// The application count is only populated for the creator or an admin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDetailResponse {
    #[serde(flatten)]
    pub campaign: Campaign,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_count: Option<i64>,
}

/// Landing page campaign sections.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedResponse {
    pub newest: Vec<Campaign>,
    pub instagram: Vec<Campaign>,
    pub tiktok: Vec<Campaign>,
}

fn parse_category(value: &str) -> Result<CampaignCategory, ApiError> {
    value.parse().map_err(ApiError::Validation)
}

fn parse_platform(value: &str) -> Result<CampaignPlatform, ApiError> {
    value.parse().map_err(ApiError::Validation)
}

/// Browse campaigns with optional filters, newest first.
///
/// GET /api/v1/campaigns
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<CampaignListResponse>, ApiError> {
    // Reject unknown enum values up front so typos do not read as empty results
    let category = query
        .category
        .as_deref()
        .map(parse_category)
        .transpose()?
        .map(|c| c.as_str().to_string());
    let platform = query
        .platform
        .as_deref()
        .map(parse_platform)
        .transpose()?
        .map(|p| p.as_str().to_string());

    let filter = CampaignListFilter {
        category,
        platform,
        search: query.search.clone(),
    };

    let page = query.page_params().resolve(BROWSE_PAGE_SIZE);
    let campaigns = CampaignRepository::new(state.pool.clone());
    let (entities, total) = tokio::try_join!(
        campaigns.list(&filter, page.limit(), page.offset()),
        campaigns.count(&filter),
    )?;

    Ok(Json(CampaignListResponse {
        campaigns: entities.into_iter().map(Campaign::from).collect(),
        pagination: page.meta(total),
    }))
}

/// Landing page sections: newest overall plus per-platform highlights.
///
/// GET /api/v1/campaigns/featured
pub async fn featured(
    State(state): State<AppState>,
) -> Result<Json<FeaturedResponse>, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let (newest, instagram, tiktok) = tokio::try_join!(
        campaigns.newest(FEATURED_NEWEST),
        campaigns.newest_by_platform(CampaignPlatform::Instagram.as_str(), FEATURED_PER_PLATFORM),
        campaigns.newest_by_platform(CampaignPlatform::Tiktok.as_str(), FEATURED_PER_PLATFORM),
    )?;

    Ok(Json(FeaturedResponse {
        newest: newest.into_iter().map(Campaign::from).collect(),
        instagram: instagram.into_iter().map(Campaign::from).collect(),
        tiktok: tiktok.into_iter().map(Campaign::from).collect(),
    }))
}

/// Campaign detail.
///
/// GET /api/v1/campaigns/:id
pub async fn get_campaign(
    State(state): State<AppState>,
    OptionalUserAuth(viewer): OptionalUserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<CampaignDetailResponse>, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = campaigns
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?
        .into();

    let mut application_count = None;
    if let Some(auth) = viewer {
        let users = UserRepository::new(state.pool.clone());
        if let Some(entity) = users.find_by_id(auth.user_id).await? {
            let user: User = entity.into();
            if user.can_decide_applications(&campaign) {
                let applications = ApplicationRepository::new(state.pool.clone());
                application_count =
                    Some(applications.list_by_campaign(id).await?.len() as i64);
            }
        }
    }

    Ok(Json(CampaignDetailResponse {
        campaign,
        application_count,
    }))
}

/// Create a campaign. Brand accounts only.
///
/// POST /api/v1/campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if !user.is_brand() {
        return Err(ApiError::Forbidden(
            "Only brand accounts can create campaigns".to_string(),
        ));
    }

    let category = parse_category(&request.category)?;
    let platform = parse_platform(&request.platform)?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let entity = campaigns
        .create(
            &request.title,
            &request.description,
            request.image_url.as_deref(),
            request.budget_cents,
            category.as_str(),
            platform.as_str(),
            user.id,
        )
        .await?;

    info!(campaign_id = %entity.id, creator_id = %user.id, "Campaign created");

    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// Update a campaign. Creator or admin only.
///
/// PUT /api/v1/campaigns/:id
pub async fn update_campaign(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCampaignRequest>,
) -> Result<Json<Campaign>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = campaigns
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?
        .into();

    if !user.can_manage_campaign(&campaign) {
        return Err(ApiError::Forbidden(
            "Only the campaign creator or an admin can modify this campaign".to_string(),
        ));
    }

    let category = request
        .category
        .as_deref()
        .map(parse_category)
        .transpose()?;
    let platform = request
        .platform
        .as_deref()
        .map(parse_platform)
        .transpose()?;

    let entity = campaigns
        .update(
            id,
            request.title.as_deref(),
            request.description.as_deref(),
            request.image_url.as_deref(),
            request.budget_cents,
            category.map(|c| c.as_str()),
            platform.map(|p| p.as_str()),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    info!(campaign_id = %id, actor_id = %user.id, "Campaign updated");

    Ok(Json(entity.into()))
}

/// Delete a campaign. Creator or admin only; applications cascade.
///
/// DELETE /api/v1/campaigns/:id
pub async fn delete_campaign(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = campaigns
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?
        .into();

    if !user.can_manage_campaign(&campaign) {
        return Err(ApiError::Forbidden(
            "Only the campaign creator or an admin can delete this campaign".to_string(),
        ));
    }

    campaigns.delete(id).await?;

    info!(campaign_id = %id, actor_id = %user.id, "Campaign deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateCampaignRequest {
        CreateCampaignRequest {
            title: "Summer launch".to_string(),
            description: "Product placement for our summer line".to_string(),
            image_url: None,
            budget_cents: 250_000,
            category: "fashion".to_string(),
            platform: "instagram".to_string(),
        }
    }

    #[test]
    fn test_create_campaign_request_valid() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn test_create_campaign_request_empty_title() {
        let mut request = create_request();
        request.title = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_campaign_request_negative_budget() {
        let mut request = create_request();
        request.budget_cents = -1;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_parse_category_rejects_unknown() {
        assert!(parse_category("fashion").is_ok());
        assert!(parse_category("gaming").is_err());
    }

    #[test]
    fn test_parse_platform_rejects_unknown() {
        assert!(parse_platform("tiktok").is_ok());
        assert!(parse_platform("myspace").is_err());
    }

    #[test]
    fn test_update_request_all_optional() {
        let request: UpdateCampaignRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_ok());
        assert!(request.title.is_none());
    }

    #[test]
    fn test_browse_query_page_params() {
        let query = BrowseQuery {
            category: Some("tech".to_string()),
            platform: None,
            search: None,
            page: Some(2),
            per_page: Some(9),
        };
        let page = query.page_params().resolve(BROWSE_PAGE_SIZE);
        assert_eq!(page.page, 2);
        assert_eq!(page.per_page, 9);
        assert_eq!(page.offset(), 9);
    }
}
