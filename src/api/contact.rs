//! Contact form endpoint
//!
//! - POST /api/v1/contact - Dispatch a contact message by email

use axum::{extract::State, Json};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::MessageResponse;
use crate::services::ContactForm;

/// POST /api/v1/contact - Validate the submission and send it
pub async fn send_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.email_service.send_contact(&form).await?;
    Ok(Json(MessageResponse::new("Message sent")))
}
