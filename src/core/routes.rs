// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::handlers::home::home_handler))
        .route("/health", get(crate::handlers::health::health_handler))

        // Admin
        .route("/admin/login", post(crate::handlers::admin::login_handler))
        .route("/admin/logout", post(crate::handlers::admin::logout_handler))
        .route("/admin/dashboard", get(crate::handlers::admin::dashboard_handler))
        .route(
            "/admin/clients/{id}/status",
            post(crate::handlers::admin::toggle_status_handler),
        )
        .route(
            "/admin/config",
            get(crate::handlers::admin::get_config_handler)
                .put(crate::handlers::admin::update_config_handler),
        )
        .route("/admin/users", post(crate::handlers::admin::create_user_handler))
        .route("/admin/users/{id}", delete(crate::handlers::admin::delete_user_handler))

        // Client entry and exit
        .route(
            "/client/entry",
            get(crate::handlers::entry::entry_form_handler)
                .post(crate::handlers::entry::entry_submit_handler),
        )
        .route(
            "/client/exit",
            get(crate::handlers::exit::exit_state_handler)
                .post(crate::handlers::exit::exit_verify_handler),
        )
        .route("/client/exit/confirm", post(crate::handlers::exit::exit_confirm_handler))
        .route("/client/exit/reset", post(crate::handlers::exit::exit_reset_handler))

        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}
