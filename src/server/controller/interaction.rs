use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::interaction::Interaction,
    server::{error::AppError, service::interaction::InteractionService, state::AppState},
};

/// POST /api/interactions - Discord interactions webhook
///
/// Receives every interaction Discord delivers to the application and answers within the
/// same request. Long-running commands answer with a deferred response and finish in the
/// background.
///
/// Request signatures are not verified here; the endpoint is expected to sit behind a
/// proxy that does.
///
/// # Returns
/// - `200 OK`: JSON interaction response (pong, ephemeral reply, or deferred acknowledgement)
/// - `400 Bad Request`: Body is not a valid interaction
pub async fn interactions(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let interaction: Interaction = serde_json::from_str(&body).map_err(|e| {
        tracing::debug!("Rejected interaction payload: {}", e);
        AppError::BadRequest("Invalid JSON".to_string())
    })?;

    let response = InteractionService::new(&state.clear).handle(&interaction);

    Ok((StatusCode::OK, Json(response)))
}
