use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use tracing::debug;

use crate::models::console::ErrorResponse;

pub async fn fallback_handler(uri: Uri) -> Response {
    debug!(path = %uri.path(), "Unknown console route");

    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            error: format!(
                "Ruta desconocida: {}. Rutas válidas: /, /admin/login, /admin/dashboard, /client/entry, /client/exit",
                uri.path()
            ),
        }),
    )
        .into_response()
}
