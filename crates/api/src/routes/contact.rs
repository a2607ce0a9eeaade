//! Public contact form route.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use persistence::repositories::ContactMessageRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Request body for the public contact form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: String,

    #[validate(length(min = 1, max = 5000, message = "Message must be 1-5000 characters"))]
    pub body: String,
}

/// Acknowledgement returned after a message is stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub message: String,
}

/// Store a contact message for admin triage. No authentication.
///
/// POST /api/v1/contact
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let messages = ContactMessageRepository::new(state.pool.clone());
    let entity = messages
        .create(
            &request.name,
            &request.email,
            &request.subject,
            &request.body,
        )
        .await?;

    info!(message_id = %entity.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: "Thanks for reaching out. We will get back to you soon.".to_string(),
        }),
    ))
}
