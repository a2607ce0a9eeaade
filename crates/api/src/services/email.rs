//! Outbound transactional email.
//!
//! Only the `console` provider exists today; it writes the message to the
//! log instead of delivering it, which is what development and CI want.
//! The provider string is config-driven so an SMTP or API provider can be
//! added without touching callers.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::EmailConfig;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// A fully composed message ready for delivery.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
}

#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    #[allow(dead_code)]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Delivers a message through the configured provider.
    ///
    /// A disabled service swallows the message and reports success, so
    /// flows like password reset behave identically with email off.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email disabled, dropping message"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.deliver_to_log(message),
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Composes and sends the password reset message for `to_email`.
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        reset_token: &str,
    ) -> Result<(), EmailError> {
        let reset_url = format!(
            "{}/reset-password?token={}",
            self.config.base_url, reset_token
        );

        let body_text = format!(
            "Hi,\n\n\
             We received a request to reset the password for your CrewUp account.\n\n\
             You can choose a new password by clicking the link below:\n\n\
             {reset_url}\n\n\
             This link will expire in 1 hour.\n\n\
             If you didn't request a password reset, you can safely ignore this email.\n\n\
             Best regards,\n\
             The CrewUp Team"
        );

        self.send(EmailMessage {
            to: to_email.to_string(),
            subject: "Reset your password - CrewUp".to_string(),
            body_text,
        })
        .await
    }

    fn deliver_to_log(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            from = %self.config.sender_email,
            subject = %message.subject,
            "Email (console provider)"
        );
        info!("Email body:\n{}", message.body_text);
        Ok(())
    }
}
