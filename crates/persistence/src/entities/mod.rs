//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod analytics;
pub mod application;
pub mod campaign;
pub mod contact_message;
pub mod offer;
pub mod payment;
pub mod subscription;
pub mod user;
pub mod webhook_event;

pub use analytics::AnalyticsEntity;
pub use application::{ApplicationDetailEntity, ApplicationEntity};
pub use campaign::CampaignEntity;
pub use contact_message::ContactMessageEntity;
pub use offer::OfferEntity;
pub use payment::PaymentEntity;
pub use subscription::SubscriptionEntity;
pub use user::UserEntity;
pub use webhook_event::WebhookEventEntity;
