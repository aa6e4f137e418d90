use axum::{
    routing::{get, post},
    Router,
};

use crate::server::{
    controller::{
        interaction::interactions,
        status::{health, status},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/status", get(status))
        .route("/api/interactions", post(interactions))
}
