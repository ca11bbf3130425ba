// Application state (AppState)

use crate::api::client::ApiClient;
use crate::core::config::Config;
use crate::core::session::Session;
use crate::stores::parking_state::ParkingState;
use crate::workflows::exit::ExitFlow;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// Shared console state
///
/// One console instance drives one operator session and one exit flow;
/// both reset when the process restarts.
pub struct AppState {
    /// Client for the remote parking service
    pub api: ApiClient,

    /// Occupancy and configuration cache
    pub parking: Arc<ParkingState>,

    /// Capability of the logged-in operator
    session: RwLock<Session>,

    /// Held across the service call of each exit step
    pub exit_flow: Mutex<ExitFlow>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient, parking: Arc<ParkingState>) -> Self {
        Self {
            api,
            parking,
            session: RwLock::new(Session::Anonymous),
            exit_flow: Mutex::new(ExitFlow::new()),
            config: Arc::new(config),
        }
    }

    pub fn session(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_session(&self, session: Session) {
        *self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;
    }

    pub fn root_username(&self) -> &str {
        &self.config.admin.root_username
    }

    pub fn config_id(&self) -> u32 {
        self.config.backend.config_id
    }
}
