use crate::core::error::AdminError;
use crate::core::session::Session;
use crate::core::state::AppState;
use crate::models::console::{
    ClientRow, ConfigResponse, DashboardQuery, DashboardResponse, LoginResponse, SuccessResponse,
};
use crate::stores::parking_state::ConfigState;
use crate::validation::params::{ConfigParams, LoginParams, NewUserParams};
use crate::workflows::admin::{self, Dashboard};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::info;

fn dashboard_response(
    state: &AppState,
    session: Session,
    dashboard: &Dashboard,
    query: DashboardQuery,
) -> Response {
    let clients = dashboard
        .filtered(query.filter, &query.cedula)
        .into_iter()
        .map(ClientRow::from)
        .collect();

    (
        StatusCode::OK,
        Json(DashboardResponse {
            users: dashboard.user_summaries(state.root_username()),
            session,
            filter: query.filter,
            cedula: query.cedula,
            clients,
            occupancy: state.parking.snapshot(),
        }),
    )
        .into_response()
}

/// POST /admin/login
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<LoginParams>,
) -> Result<Response, AdminError> {
    let session = admin::login(&state.api, params, state.root_username()).await?;
    state.set_session(session.clone());

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            session,
            redirect: "/admin/dashboard",
        }),
    )
        .into_response())
}

/// POST /admin/logout
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> Response {
    if let Some(username) = state.session().username() {
        info!(username = %username, "Admin logged out");
    }
    state.set_session(Session::Anonymous);

    (
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: "Sesión cerrada".to_string(),
        }),
    )
        .into_response()
}

/// GET /admin/dashboard?filter=<all|paid|unpaid>&cedula=<substring>
///
/// Without an admin session this redirects to the login route.
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, AdminError> {
    let session = state.session();
    admin::require_admin(&session)?;

    // Configuration failures only show up in the occupancy panel
    let (dashboard, _) = tokio::join!(
        Dashboard::load(&state.api, &session),
        state.parking.refresh_config(&state.api, state.config_id())
    );

    Ok(dashboard_response(&state, session, &dashboard?, query))
}

/// POST /admin/clients/{id}/status?filter=..&cedula=..
///
/// The listing in the response keeps the operator's filter and search.
pub async fn toggle_status_handler(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<u64>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, AdminError> {
    let session = state.session();
    let dashboard = admin::toggle_status(&state.api, &session, client_id).await?;

    Ok(dashboard_response(&state, session, &dashboard, query))
}

/// GET /admin/config
pub async fn get_config_handler(State(state): State<Arc<AppState>>) -> Result<Response, AdminError> {
    let session = state.session();
    let config = admin::load_config(&state.api, &session, &state.parking, state.config_id()).await?;

    Ok((
        StatusCode::OK,
        Json(ConfigResponse {
            config: ConfigState::Loaded(config),
        }),
    )
        .into_response())
}

/// PUT /admin/config
pub async fn update_config_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<ConfigParams>,
) -> Result<Response, AdminError> {
    let session = state.session();
    admin::require_root(&session)?;

    let config = params.validate()?;
    let confirmed =
        admin::update_config(&state.api, &session, &state.parking, state.config_id(), config).await?;

    Ok((StatusCode::OK, Json(ConfigResponse { config: confirmed })).into_response())
}

/// POST /admin/users
pub async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
    Json(params): Json<NewUserParams>,
) -> Result<Response, AdminError> {
    let session = state.session();
    admin::require_root(&session)?;

    let user = params.validate()?;
    let dashboard = admin::create_user(&state.api, &session, user).await?;

    Ok(dashboard_response(&state, session, &dashboard, query))
}

/// DELETE /admin/users/{id}
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, AdminError> {
    let session = state.session();
    let dashboard =
        admin::delete_user(&state.api, &session, state.root_username(), user_id).await?;

    Ok(dashboard_response(&state, session, &dashboard, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::unreachable_state;
    use axum::http::header::LOCATION;

    #[tokio::test]
    async fn test_dashboard_redirects_without_session() {
        let state = unreachable_state();

        let result = dashboard_handler(State(state), Query(DashboardQuery::default())).await;
        let response = result.unwrap_err().into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/admin/login");
    }

    #[tokio::test]
    async fn test_config_update_requires_root() {
        let state = unreachable_state();
        state.set_session(Session::for_user("operador", "adminRoot"));

        let params = ConfigParams { slot: 10, precio: 2.0 };
        let response = update_config_handler(State(state), Json(params))
            .await
            .unwrap_err()
            .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_user_requires_root() {
        let state = unreachable_state();
        state.set_session(Session::for_user("operador", "adminRoot"));

        let params = NewUserParams {
            user: "nuevo".to_string(),
            password: "pw".to_string(),
        };
        let response = create_user_handler(State(state), Query(DashboardQuery::default()), Json(params))
            .await
            .unwrap_err()
            .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_login_backend_failure_keeps_anonymous() {
        let state = unreachable_state();

        let params = LoginParams {
            username: "adminRoot".to_string(),
            password: "root".to_string(),
        };
        let response = login_handler(State(state.clone()), Json(params))
            .await
            .unwrap_err()
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(!state.session().is_admin());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let state = unreachable_state();
        state.set_session(Session::for_user("adminRoot", "adminRoot"));

        let response = logout_handler(State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.session(), Session::Anonymous);
    }
}
