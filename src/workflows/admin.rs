// Admin login and dashboard operations

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::client::ApiClient;
use crate::core::error::AdminError;
use crate::core::session::Session;
use crate::models::client::{Client, ClientStatusUpdate, PaymentStatus};
use crate::models::config::ParkingConfig;
use crate::models::user::{NewUser, User};
use crate::stores::parking_state::{ConfigState, ParkingState};
use crate::utils::auth::find_user;
use crate::validation::params::LoginParams;

/// Check credentials against the service's user list
///
/// The fetched list, passwords included, is dropped before returning.
pub async fn login(
    api: &ApiClient,
    params: LoginParams,
    root_username: &str,
) -> Result<Session, AdminError> {
    let params = params.validate()?;

    let users = api.get_users().await.map_err(|e| {
        warn!(error = %format!("{:#}", e), "Failed to fetch users for login");
        AdminError::LoginFailed(e)
    })?;

    match find_user(&users, &params.username, &params.password) {
        Some(user) => {
            let session = Session::for_user(&user.username, root_username);
            info!(
                username = %user.username,
                root = session.is_root_admin(),
                "Admin logged in"
            );
            Ok(session)
        }
        None => {
            warn!(username = %params.username, "Rejected admin login");
            Err(AdminError::InvalidCredentials)
        }
    }
}

pub fn require_admin(session: &Session) -> Result<(), AdminError> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(AdminError::NotAuthenticated)
    }
}

pub fn require_root(session: &Session) -> Result<(), AdminError> {
    require_admin(session)?;
    if session.is_root_admin() {
        Ok(())
    } else {
        Err(AdminError::RootRequired)
    }
}

/// Payment status filter of the client listing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

impl StatusFilter {
    pub fn matches(self, client: &Client) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Paid => client.estado == PaymentStatus::Paid,
            StatusFilter::Unpaid => client.estado == PaymentStatus::Unpaid,
        }
    }
}

/// Status filter AND case-sensitive cedula containment
pub fn filter_clients<'a>(
    clients: &'a [Client],
    filter: StatusFilter,
    cedula_query: &str,
) -> Vec<&'a Client> {
    clients
        .iter()
        .filter(|client| filter.matches(client))
        .filter(|client| cedula_query.is_empty() || client.cedula.contains(cedula_query))
        .collect()
}

/// Listed user without credentials
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: u64,
    pub user: String,
    /// False for the root account
    pub deletable: bool,
}

/// Server-confirmed data behind the dashboard
#[derive(Clone, Debug)]
pub struct Dashboard {
    pub clients: Vec<Client>,
    /// Only fetched for the root admin
    pub users: Option<Vec<User>>,
}

impl Dashboard {
    /// Fetch clients, and users when the session is root
    pub async fn load(api: &ApiClient, session: &Session) -> Result<Self, AdminError> {
        require_admin(session)?;

        let clients = async { api.get_clients().await };
        let users = async {
            if session.is_root_admin() {
                api.get_users().await.map(Some)
            } else {
                Ok(None)
            }
        };

        let (clients, users) = tokio::join!(clients, users);
        let (clients, users) = match (clients, users) {
            (Ok(clients), Ok(users)) => (clients, users),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %format!("{:#}", e), "Failed to load dashboard data");
                return Err(AdminError::Backend(e));
            }
        };

        Ok(Self { clients, users })
    }

    pub fn filtered(&self, filter: StatusFilter, cedula_query: &str) -> Vec<&Client> {
        filter_clients(&self.clients, filter, cedula_query)
    }

    pub fn user_summaries(&self, root_username: &str) -> Option<Vec<UserSummary>> {
        self.users.as_ref().map(|users| {
            users
                .iter()
                .map(|u| UserSummary {
                    id: u.id,
                    user: u.username.clone(),
                    deletable: u.username != root_username,
                })
                .collect()
        })
    }
}

/// Flip a client's payment status, then reload from the service
pub async fn toggle_status(
    api: &ApiClient,
    session: &Session,
    client_id: u64,
) -> Result<Dashboard, AdminError> {
    let current = Dashboard::load(api, session).await?;
    let client = current
        .clients
        .iter()
        .find(|c| c.id == client_id)
        .ok_or(AdminError::ClientNotFound(client_id))?;

    let estado = client.estado.toggled();
    api.update_client_status(client_id, &ClientStatusUpdate { estado })
        .await
        .map_err(|e| {
            warn!(error = %format!("{:#}", e), client_id = client_id, "Failed to update client status");
            AdminError::Backend(e)
        })?;

    info!(client_id = client_id, estado = %estado, "Client status updated");

    Dashboard::load(api, session).await
}

/// Current configuration for the root settings panel
pub async fn load_config(
    api: &ApiClient,
    session: &Session,
    state: &ParkingState,
    config_id: u32,
) -> Result<ParkingConfig, AdminError> {
    require_root(session)?;

    state
        .refresh_config(api, config_id)
        .await
        .map_err(AdminError::Backend)
}

/// Push both configuration fields, then re-fetch to confirm
pub async fn update_config(
    api: &ApiClient,
    session: &Session,
    state: &ParkingState,
    config_id: u32,
    config: ParkingConfig,
) -> Result<ConfigState, AdminError> {
    require_root(session)?;

    api.update_config(config_id, &config).await.map_err(|e| {
        warn!(error = %format!("{:#}", e), "Failed to update parking configuration");
        AdminError::Backend(e)
    })?;

    info!(slot = config.slot, precio = config.precio, "Parking configuration updated");

    // The update went through even if the confirming fetch fails
    Ok(match state.refresh_config(api, config_id).await {
        Ok(confirmed) => ConfigState::Loaded(confirmed),
        Err(e) => ConfigState::Failed {
            error: format!("{:#}", e),
        },
    })
}

/// Create an administrator; no uniqueness check is made here
pub async fn create_user(
    api: &ApiClient,
    session: &Session,
    user: NewUser,
) -> Result<Dashboard, AdminError> {
    require_root(session)?;

    let created = api.create_user(&user).await.map_err(|e| {
        warn!(error = %format!("{:#}", e), username = %user.username, "Failed to create user");
        AdminError::Backend(e)
    })?;

    info!(user_id = created.id, username = %created.username, "User created");

    Dashboard::load(api, session).await
}

/// Delete an administrator other than the root account
pub async fn delete_user(
    api: &ApiClient,
    session: &Session,
    root_username: &str,
    user_id: u64,
) -> Result<Dashboard, AdminError> {
    require_root(session)?;

    let users = api.get_users().await.map_err(AdminError::Backend)?;
    let target = users
        .iter()
        .find(|u| u.id == user_id)
        .ok_or(AdminError::UserNotFound(user_id))?;

    if target.username == root_username {
        warn!(user_id = user_id, "Refused to delete root admin");
        return Err(AdminError::ProtectedUser);
    }

    api.delete_user(user_id).await.map_err(|e| {
        warn!(error = %format!("{:#}", e), user_id = user_id, "Failed to delete user");
        AdminError::Backend(e)
    })?;

    info!(user_id = user_id, username = %target.username, "User deleted");

    Dashboard::load(api, session).await
}
