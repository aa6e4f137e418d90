use axum::{
    extract::State,
    response::{Html, IntoResponse},
};

use crate::server::state::AppState;

/// GET / - Liveness probe
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// GET /status - Human-readable status page
///
/// Shows the number of clear runs currently in progress.
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Html(format!(
        "<!DOCTYPE html>\
         <html><head><title>ddtbot status</title></head>\
         <body><h1>ddtbot is running</h1>\
         <p>Clear runs in progress: {}</p>\
         <p>Interactions endpoint: <code>POST /api/interactions</code></p>\
         </body></html>",
        state.tasks.len()
    ))
}
