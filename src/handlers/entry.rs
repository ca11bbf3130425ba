use crate::core::error::EntryError;
use crate::core::state::AppState;
use crate::models::console::EntryResponse;
use crate::validation::params::EntryParams;
use crate::workflows::entry::{register_entry, EntryContext};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Available spaces, hourly rate and plan prices
///
/// GET /client/entry
pub async fn entry_form_handler(State(state): State<Arc<AppState>>) -> Response {
    let context = EntryContext::load(&state.api, &state.parking, state.config_id()).await;

    (StatusCode::OK, Json(context.view())).into_response()
}

/// Register a vehicle entry
///
/// POST /client/entry
pub async fn entry_submit_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<EntryParams>,
) -> Result<Response, EntryError> {
    // Reject malformed input before any request is made
    let entry = params.validate()?;

    let context = EntryContext::load(&state.api, &state.parking, state.config_id()).await;
    let client = register_entry(&state.api, &context, entry).await?;

    Ok((
        StatusCode::CREATED,
        Json(EntryResponse {
            success: true,
            client,
            redirect: "/",
        }),
    )
        .into_response())
}
