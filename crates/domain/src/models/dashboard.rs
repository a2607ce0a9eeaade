//! Aggregate stat blocks for the admin panel.

use serde::Serialize;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardStats {
    pub total_users: i64,
    pub brand_count: i64,
    pub influencer_count: i64,
    pub campaigns_last_30_days: i64,
    pub total_revenue_cents: i64,
    pub active_subscriptions: i64,
    pub pending_applications: i64,
    pub total_offers: i64,
    pub unread_messages: i64,
}

/// Account breakdown shown alongside the admin user list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccountStats {
    pub total: i64,
    pub active: i64,
    pub banned: i64,
    pub brands: i64,
    pub influencers: i64,
    pub admins: i64,
}

/// Read/unread breakdown for the contact inbox.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStats {
    pub total: i64,
    pub read: i64,
    pub unread: i64,
}
