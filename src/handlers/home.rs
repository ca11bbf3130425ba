use crate::core::state::AppState;
use crate::models::console::HomeResponse;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

/// Occupancy overview and the console's entry points
///
/// GET /
pub async fn home_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HomeResponse {
            occupancy: state.parking.snapshot(),
            routes: ["/admin/login", "/client/entry", "/client/exit"],
        }),
    )
}
