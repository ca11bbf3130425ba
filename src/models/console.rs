use serde::{Deserialize, Serialize};

use crate::core::session::Session;
use crate::models::client::{Client, PaymentStatus};
use crate::stores::parking_state::{ConfigState, OccupancySnapshot};
use crate::workflows::admin::{StatusFilter, UserSummary};

#[derive(Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Serialize)]
pub struct RedirectResponse {
    pub success: bool,
    pub redirect: &'static str,
}

#[derive(Serialize)]
pub struct HomeResponse {
    pub occupancy: OccupancySnapshot,
    pub routes: [&'static str; 3],
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub session: Session,
    pub redirect: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub filter: StatusFilter,
    #[serde(default)]
    pub cedula: String,
}

/// A listed client with its display label
#[derive(Serialize)]
pub struct ClientRow {
    pub id: u64,
    pub cedula: String,
    pub matricula: String,
    pub precio: f64,
    pub estado: PaymentStatus,
    pub status_label: &'static str,
}

impl From<&Client> for ClientRow {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            cedula: client.cedula.clone(),
            matricula: client.matricula.clone(),
            precio: client.precio,
            estado: client.estado,
            status_label: client.estado.label(),
        }
    }
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub session: Session,
    pub filter: StatusFilter,
    pub cedula: String,
    pub clients: Vec<ClientRow>,
    /// Present for the root admin only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserSummary>>,
    pub occupancy: OccupancySnapshot,
}

#[derive(Serialize)]
pub struct EntryResponse {
    pub success: bool,
    pub client: Client,
    pub redirect: &'static str,
}

#[derive(Serialize)]
pub struct ConfigResponse {
    pub config: ConfigState,
}
