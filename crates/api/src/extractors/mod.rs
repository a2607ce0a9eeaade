//! Custom Axum extractors.
//!
//! Extractors for parsing and validating request data.

pub mod current_user;
pub mod user_auth;

#[allow(unused_imports)] // Re-exports for downstream use
pub use current_user::{AdminUser, CurrentUser};
#[allow(unused_imports)] // Re-exports for downstream use
pub use user_auth::{OptionalUserAuth, UserAuth};
