// Centralized error handling for the console

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use thiserror::Error;

use crate::models::console::ErrorResponse;

/// Errors raised while registering a vehicle entry
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("El campo {0} es obligatorio")]
    MissingField(&'static str),

    #[error("La matrícula debe tener el formato ABC123")]
    InvalidMatricula,

    #[error("Plan de estacionamiento inválido: {0}")]
    InvalidPlan(String),

    #[error("Error al obtener la tarifa")]
    RateUnavailable,

    #[error("Error al consultar los espacios disponibles")]
    OccupancyUnavailable,

    #[error("No hay espacios disponibles")]
    NoSpacesAvailable,

    #[error("Error al registrar el cliente")]
    Submission(#[from] anyhow::Error),
}

impl IntoResponse for EntryError {
    fn into_response(self) -> Response {
        let status = match &self {
            EntryError::MissingField(_) => StatusCode::BAD_REQUEST,
            EntryError::InvalidMatricula => StatusCode::BAD_REQUEST,
            EntryError::InvalidPlan(_) => StatusCode::BAD_REQUEST,
            EntryError::NoSpacesAvailable => StatusCode::CONFLICT,
            EntryError::RateUnavailable => StatusCode::BAD_GATEWAY,
            EntryError::OccupancyUnavailable => StatusCode::BAD_GATEWAY,
            EntryError::Submission(_) => StatusCode::BAD_GATEWAY,
        };

        error_response(status, self.to_string())
    }
}

/// Errors raised by the two-phase exit flow
///
/// Unknown vehicles and unpaid balances are not errors, they are denial
/// states of the flow itself.
#[derive(Error, Debug)]
pub enum ExitError {
    #[error("El campo {0} es obligatorio")]
    MissingField(&'static str),

    #[error("Error al verificar el estado")]
    Lookup(#[from] anyhow::Error),

    #[error("Debe verificar el estado antes de retirar el vehículo")]
    NotConfirmable,

    #[error("Error al eliminar el registro")]
    Deletion(#[source] anyhow::Error),
}

impl IntoResponse for ExitError {
    fn into_response(self) -> Response {
        let status = match &self {
            ExitError::MissingField(_) => StatusCode::BAD_REQUEST,
            ExitError::NotConfirmable => StatusCode::CONFLICT,
            ExitError::Lookup(_) => StatusCode::BAD_GATEWAY,
            ExitError::Deletion(_) => StatusCode::BAD_GATEWAY,
        };

        error_response(status, self.to_string())
    }
}

/// Errors raised by login and the admin dashboard
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("El campo {0} es obligatorio")]
    MissingField(&'static str),

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Error al iniciar sesión")]
    LoginFailed(#[source] anyhow::Error),

    #[error("Debe iniciar sesión como administrador")]
    NotAuthenticated,

    #[error("Solo el administrador raíz puede realizar esta acción")]
    RootRequired,

    #[error("No se puede eliminar al administrador raíz")]
    ProtectedUser,

    #[error("Cliente no encontrado: {0}")]
    ClientNotFound(u64),

    #[error("Usuario no encontrado: {0}")]
    UserNotFound(u64),

    #[error("Configuración inválida: {0}")]
    InvalidConfig(String),

    #[error("Error al comunicarse con el servicio de parqueo")]
    Backend(#[from] anyhow::Error),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = match &self {
            AdminError::NotAuthenticated => return Redirect::to("/admin/login").into_response(),
            AdminError::MissingField(_) => StatusCode::BAD_REQUEST,
            AdminError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            AdminError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AdminError::RootRequired => StatusCode::FORBIDDEN,
            AdminError::ProtectedUser => StatusCode::FORBIDDEN,
            AdminError::ClientNotFound(_) => StatusCode::NOT_FOUND,
            AdminError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AdminError::LoginFailed(_) => StatusCode::BAD_GATEWAY,
            AdminError::Backend(_) => StatusCode::BAD_GATEWAY,
        };

        error_response(status, self.to_string())
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn test_entry_error_statuses() {
        assert_eq!(
            EntryError::InvalidMatricula.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EntryError::NoSpacesAvailable.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            EntryError::Submission(anyhow::anyhow!("boom")).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_transport_errors_hide_cause() {
        let err = ExitError::Lookup(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "Error al verificar el estado");
    }

    #[test]
    fn test_not_authenticated_redirects_to_login() {
        let response = AdminError::NotAuthenticated.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/admin/login");
    }

    #[test]
    fn test_admin_error_statuses() {
        assert_eq!(
            AdminError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AdminError::RootRequired.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AdminError::ClientNotFound(4).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
