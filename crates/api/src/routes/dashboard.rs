//! Role-specific dashboard routes.

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use domain::models::{Campaign, CustomOffer, InfluencerAnalytics, OfferStatus};
use persistence::repositories::{
    AnalyticsRepository, ApplicationRepository, CampaignRepository, OfferRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::routes::applications::ApplicationView;

const RECENT_APPLICATIONS_LIMIT: i64 = 5;

/// Per-status offer counts for one brand.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferCounts {
    pub pending: i64,
    pub accepted: i64,
    pub rejected: i64,
    pub expired: i64,
}

/// Brand dashboard: campaigns, incoming applications, spend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandDashboardResponse {
    pub campaigns: Vec<Campaign>,
    pub recent_applications: Vec<ApplicationView>,
    pub total_budget_cents: i64,
    pub offer_counts: OfferCounts,
}

/// Influencer dashboard: applications, offers, counters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerDashboardResponse {
    pub applications: Vec<ApplicationView>,
    pub offers: Vec<CustomOffer>,
    pub analytics: AnalyticsView,
}

/// Analytics counters with the derived approval rate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub influencer_id: Uuid,
    pub total_applications: i32,
    pub approved_applications: i32,
    pub approval_rate: f64,
    pub total_earnings_cents: i64,
    pub profile_views: i32,
}

impl From<InfluencerAnalytics> for AnalyticsView {
    fn from(analytics: InfluencerAnalytics) -> Self {
        Self {
            influencer_id: analytics.influencer_id,
            total_applications: analytics.total_applications,
            approved_applications: analytics.approved_applications,
            approval_rate: analytics.approval_rate(),
            total_earnings_cents: analytics.total_earnings_cents,
            profile_views: analytics.profile_views,
        }
    }
}

/// Brand overview: own campaigns, newest applications to them,
/// aggregate budget, and offer counts by status.
///
/// GET /api/v1/dashboard/brand
pub async fn brand(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<BrandDashboardResponse>, ApiError> {
    if !user.is_brand() {
        return Err(ApiError::Forbidden(
            "Only brand accounts have a brand dashboard".to_string(),
        ));
    }

    let campaigns = CampaignRepository::new(state.pool.clone());
    let applications = ApplicationRepository::new(state.pool.clone());
    let offers = OfferRepository::new(state.pool.clone());

    let (own_campaigns, recent, total_budget, pending, accepted, rejected, expired) = tokio::try_join!(
        campaigns.list_by_creator(user.id),
        applications.recent_for_brand(user.id, RECENT_APPLICATIONS_LIMIT),
        campaigns.total_budget_by_creator(user.id),
        offers.count_by_brand_and_status(user.id, OfferStatus::Pending.as_str()),
        offers.count_by_brand_and_status(user.id, OfferStatus::Accepted.as_str()),
        offers.count_by_brand_and_status(user.id, OfferStatus::Rejected.as_str()),
        offers.count_by_brand_and_status(user.id, OfferStatus::Expired.as_str()),
    )?;

    Ok(Json(BrandDashboardResponse {
        campaigns: own_campaigns.into_iter().map(Campaign::from).collect(),
        recent_applications: recent.into_iter().map(ApplicationView::from).collect(),
        total_budget_cents: total_budget,
        offer_counts: OfferCounts {
            pending,
            accepted,
            rejected,
            expired,
        },
    }))
}

/// Influencer overview: own applications, offers received, and the
/// analytics counter row. Influencers without activity get zeroed
/// counters rather than a missing block.
///
/// GET /api/v1/dashboard/influencer
pub async fn influencer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<InfluencerDashboardResponse>, ApiError> {
    if !user.is_influencer() {
        return Err(ApiError::Forbidden(
            "Only influencer accounts have an influencer dashboard".to_string(),
        ));
    }

    let applications = ApplicationRepository::new(state.pool.clone());
    let offers = OfferRepository::new(state.pool.clone());
    let analytics = AnalyticsRepository::new(state.pool.clone());

    let (own_applications, received_offers, analytics_row) = tokio::try_join!(
        applications.list_by_influencer(user.id),
        offers.list_by_influencer(user.id),
        analytics.find_by_influencer(user.id),
    )?;

    let counters = analytics_row
        .map(InfluencerAnalytics::from)
        .unwrap_or_else(|| InfluencerAnalytics::empty(user.id));

    Ok(Json(InfluencerDashboardResponse {
        applications: own_applications
            .into_iter()
            .map(ApplicationView::from)
            .collect(),
        offers: received_offers.into_iter().map(CustomOffer::from).collect(),
        analytics: counters.into(),
    }))
}
