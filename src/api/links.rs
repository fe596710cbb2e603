//! Magic-link minting, called by the WhatsApp bot.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::{AccessToken, User};
use crate::AppState;

use super::error::ApiError;
use super::validation::validate_phone;

#[derive(Debug, Deserialize)]
pub struct GenerateLinkRequest {
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateLinkResponse {
    pub url: String,
    pub expires_in: String,
    pub phone: String,
}

/// Mint a single-use dashboard link for a user.
///
/// Body: `{"phone": "+1234567890"}`. The bot relays the returned URL over
/// WhatsApp; the token inside it dies on first use or after expiry.
pub async fn generate_link(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateLinkRequest>,
) -> Result<Json<GenerateLinkResponse>, ApiError> {
    let phone = request.phone.trim().to_string();
    if let Err(e) = validate_phone(&phone) {
        return Err(ApiError::validation_field("phone", e));
    }

    let user = User::find_by_phone(&state.db, &phone)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user found for number {}", phone)))?;

    let ttl_hours = state.config.whatsapp.token_expiry_hours;
    let token = AccessToken::create(&state.db, user.id, ttl_hours).await?;

    tracing::info!(user_id = user.id, "Generated magic link");

    Ok(Json(GenerateLinkResponse {
        url: format!("{}/d/{}", state.config.whatsapp.dashboard_url, token),
        expires_in: format!("{}h", ttl_hours),
        phone,
    }))
}
