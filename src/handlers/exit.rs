use crate::core::error::ExitError;
use crate::core::state::AppState;
use crate::models::console::RedirectResponse;
use crate::validation::params::ExitParams;
use crate::workflows::exit::{ExitDenial, ExitState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

fn state_response(exit_state: &ExitState) -> Response {
    let status = match exit_state {
        ExitState::Idle => StatusCode::OK,
        ExitState::PendingConfirmation { .. } => StatusCode::OK,
        ExitState::Denied {
            denial: ExitDenial::NotFound,
            ..
        } => StatusCode::NOT_FOUND,
        ExitState::Denied {
            denial: ExitDenial::Unpaid { .. },
            ..
        } => StatusCode::PAYMENT_REQUIRED,
    };

    (status, Json(exit_state.clone())).into_response()
}

/// GET /client/exit
pub async fn exit_state_handler(State(state): State<Arc<AppState>>) -> Response {
    let flow = state.exit_flow.lock().await;
    (StatusCode::OK, Json(flow.state().clone())).into_response()
}

/// Phase 1: check the vehicle record and its payment status
///
/// POST /client/exit
pub async fn exit_verify_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<ExitParams>,
) -> Result<Response, ExitError> {
    let request = params.validate()?;

    let mut flow = state.exit_flow.lock().await;
    let exit_state = flow.verify(&state.api, request).await?;

    Ok(state_response(exit_state))
}

/// Phase 2: remove the record of a verified, paid vehicle
///
/// POST /client/exit/confirm
pub async fn exit_confirm_handler(State(state): State<Arc<AppState>>) -> Result<Response, ExitError> {
    let mut flow = state.exit_flow.lock().await;
    flow.confirm(&state.api).await?;

    Ok((
        StatusCode::OK,
        Json(RedirectResponse {
            success: true,
            redirect: "/",
        }),
    )
        .into_response())
}

/// POST /client/exit/reset
pub async fn exit_reset_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut flow = state.exit_flow.lock().await;
    flow.reset();

    (StatusCode::OK, Json(flow.state().clone())).into_response()
}
