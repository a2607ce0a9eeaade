//! Background job scheduler and job implementations.

mod offer_expiry;
mod pool_metrics;
mod scheduler;
mod webhook_cleanup;

pub use offer_expiry::OfferExpiryJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::JobScheduler;
pub use webhook_cleanup::WebhookCleanupJob;
