//! Custom offer workflow routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{Campaign, CustomOffer, User};
use persistence::repositories::{CampaignRepository, OfferRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// Request body for creating a custom offer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferRequest {
    pub influencer_id: Uuid,

    /// Optional campaign the offer is tied to; must belong to the brand.
    pub campaign_id: Option<Uuid>,

    #[validate(custom(function = "shared::validation::validate_amount_cents"))]
    pub amount_cents: i64,

    #[validate(length(min = 1, max = 5000, message = "Deliverables must be 1-5000 characters"))]
    pub deliverables: String,

    pub deadline: NaiveDate,
}

/// List response for offers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferListResponse {
    pub offers: Vec<CustomOffer>,
}

/// Create an offer. Brand accounts only; the target must be an
/// influencer and any attached campaign must belong to the brand.
///
/// POST /api/v1/offers
pub async fn create_offer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<CustomOffer>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if !user.is_brand() {
        return Err(ApiError::Forbidden(
            "Only brand accounts can send offers".to_string(),
        ));
    }

    let users = UserRepository::new(state.pool.clone());
    let target: User = users
        .find_by_id(request.influencer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Influencer not found".to_string()))?
        .into();
    if !target.is_influencer() {
        return Err(ApiError::UnprocessableEntity(
            "Offers can only be sent to influencer accounts".to_string(),
        ));
    }

    if let Some(campaign_id) = request.campaign_id {
        let campaigns = CampaignRepository::new(state.pool.clone());
        let campaign: Campaign = campaigns
            .find_by_id(campaign_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?
            .into();
        if campaign.creator_id != user.id {
            return Err(ApiError::Forbidden(
                "Offers can only reference your own campaigns".to_string(),
            ));
        }
    }

    let offers = OfferRepository::new(state.pool.clone());
    let entity = offers
        .create(
            user.id,
            request.influencer_id,
            request.campaign_id,
            request.amount_cents,
            &request.deliverables,
            request.deadline,
        )
        .await?;

    info!(
        offer_id = %entity.id,
        brand_id = %user.id,
        influencer_id = %request.influencer_id,
        "Offer created"
    );

    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// The authenticated user's offers: sent for brands, received for
/// influencers.
///
/// GET /api/v1/offers/mine
pub async fn mine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<OfferListResponse>, ApiError> {
    let offers = OfferRepository::new(state.pool.clone());
    let entities = if user.is_brand() {
        offers.list_by_brand(user.id).await?
    } else if user.is_influencer() {
        offers.list_by_influencer(user.id).await?
    } else {
        return Err(ApiError::Forbidden(
            "Admin accounts do not hold offers".to_string(),
        ));
    };

    Ok(Json(OfferListResponse {
        offers: entities.into_iter().map(CustomOffer::from).collect(),
    }))
}

/// Offer detail. Visible to the brand, the influencer, or an admin.
///
/// GET /api/v1/offers/:id
pub async fn get_offer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomOffer>, ApiError> {
    let offers = OfferRepository::new(state.pool.clone());
    let offer: CustomOffer = offers
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found".to_string()))?
        .into();

    if !user.can_view_offer(&offer) {
        return Err(ApiError::Forbidden(
            "You are not a party to this offer".to_string(),
        ));
    }

    Ok(Json(offer))
}

/// Accept a pending offer. Named influencer only.
///
/// POST /api/v1/offers/:id/accept
pub async fn accept(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomOffer>, ApiError> {
    let offers = OfferRepository::new(state.pool.clone());
    respond_guard(&user, &offers, id).await?;

    let entity = offers
        .accept(id)
        .await?
        .ok_or_else(|| ApiError::Conflict("Offer already processed".to_string()))?;

    info!(offer_id = %id, influencer_id = %user.id, "Offer accepted");

    Ok(Json(entity.into()))
}

/// Reject a pending offer. Named influencer only.
///
/// POST /api/v1/offers/:id/reject
pub async fn reject(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomOffer>, ApiError> {
    let offers = OfferRepository::new(state.pool.clone());
    respond_guard(&user, &offers, id).await?;

    let entity = offers
        .reject(id)
        .await?
        .ok_or_else(|| ApiError::Conflict("Offer already processed".to_string()))?;

    info!(offer_id = %id, influencer_id = %user.id, "Offer rejected");

    Ok(Json(entity.into()))
}

/// Shared authorization for accept/reject: the offer must exist and the
/// actor must be the influencer it names.
async fn respond_guard(
    user: &User,
    offers: &OfferRepository,
    offer_id: Uuid,
) -> Result<(), ApiError> {
    let offer: CustomOffer = offers
        .find_by_id(offer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found".to_string()))?
        .into();

    if !user.can_respond_to_offer(&offer) {
        return Err(ApiError::Forbidden(
            "Only the named influencer can respond to this offer".to_string(),
        ));
    }

    Ok(())
}
