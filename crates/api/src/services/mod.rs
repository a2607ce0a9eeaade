//! External service integrations.

pub mod auth;
pub mod email;
pub mod gateway;

#[allow(unused_imports)] // Used in routes
pub use auth::{AuthError, AuthResult, AuthService};
#[allow(unused_imports)] // Used in routes
pub use email::{EmailError, EmailService};
#[allow(unused_imports)] // Used in routes
pub use gateway::{CheckoutSession, GatewayError, PaymentGatewayClient};
