//! Repository implementations for database operations.

pub mod analytics;
pub mod application;
pub mod campaign;
pub mod contact_message;
pub mod dashboard;
pub mod offer;
pub mod payment;
pub mod subscription;
pub mod user;
pub mod webhook_event;

pub use analytics::AnalyticsRepository;
pub use application::ApplicationRepository;
pub use campaign::{CampaignListFilter, CampaignRepository};
pub use contact_message::ContactMessageRepository;
pub use dashboard::DashboardRepository;
pub use offer::OfferRepository;
pub use payment::PaymentRepository;
pub use subscription::{SubscriptionRepository, SubscriptionUpsert};
pub use user::{ProfileUpdate, UserListFilter, UserRepository};
pub use webhook_event::WebhookEventRepository;
