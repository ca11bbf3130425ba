// Vehicle entry registration

use serde::Serialize;
use tracing::{info, warn};

use crate::api::client::ApiClient;
use crate::core::error::EntryError;
use crate::models::client::{Client, NewClient, PaymentStatus};
use crate::stores::parking_state::{available_spaces, ConfigState, ParkingState};
use crate::validation::params::{Plan, ValidatedEntry};

/// Capacity and pricing as fetched when the entry form is opened
#[derive(Clone, Debug, PartialEq)]
pub struct EntryContext {
    pub config: ConfigState,
    /// `None` when the client list could not be fetched
    pub occupied: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlanPrice {
    pub plan: Plan,
    pub price: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct EntryView {
    pub available_spaces: Option<usize>,
    pub hourly_rate: Option<f64>,
    pub plans: Vec<PlanPrice>,
    pub config: ConfigState,
}

impl EntryContext {
    /// Fetch configuration and current client count from the service
    ///
    /// Both results are also written to the shared parking state. Fetch
    /// failures are logged and leave the corresponding part unknown.
    pub async fn load(api: &ApiClient, state: &ParkingState, config_id: u32) -> Self {
        let (config, clients) = tokio::join!(
            state.refresh_config(api, config_id),
            api.get_clients()
        );

        let occupied = match clients {
            Ok(clients) => {
                state.set_occupied(clients.len());
                Some(clients.len())
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Failed to fetch clients for entry form");
                None
            }
        };

        let config = match config {
            Ok(config) => ConfigState::Loaded(config),
            Err(e) => ConfigState::Failed {
                error: format!("{:#}", e),
            },
        };

        Self { config, occupied }
    }

    pub fn hourly_rate(&self) -> Option<f64> {
        self.config.loaded().map(|c| c.precio)
    }

    /// Configured capacity minus registered clients, clamped at zero
    pub fn available_spaces(&self) -> Option<usize> {
        let config = self.config.loaded()?;
        let occupied = self.occupied?;
        Some(available_spaces(config.slot, occupied))
    }

    pub fn view(&self) -> EntryView {
        let hourly_rate = self.hourly_rate();
        let plans = match hourly_rate {
            Some(rate) => Plan::ALL
                .iter()
                .map(|&plan| PlanPrice {
                    plan,
                    price: plan.price(rate),
                })
                .collect(),
            None => Vec::new(),
        };

        EntryView {
            available_spaces: self.available_spaces(),
            hourly_rate,
            plans,
            config: self.config.clone(),
        }
    }

    /// Build the record to submit, checking rate and capacity
    pub fn prepare(&self, entry: ValidatedEntry) -> Result<NewClient, EntryError> {
        let hourly_rate = self.hourly_rate().ok_or(EntryError::RateUnavailable)?;
        let available = self
            .available_spaces()
            .ok_or(EntryError::OccupancyUnavailable)?;

        if available == 0 {
            return Err(EntryError::NoSpacesAvailable);
        }

        Ok(NewClient {
            cedula: entry.cedula,
            matricula: entry.matricula.to_uppercase(),
            precio: entry.plan.price(hourly_rate),
            estado: PaymentStatus::Unpaid,
        })
    }
}

/// Register a parked vehicle; a single submission attempt
///
/// The capacity check and the create call are not atomic.
pub async fn register_entry(
    api: &ApiClient,
    context: &EntryContext,
    entry: ValidatedEntry,
) -> Result<Client, EntryError> {
    let plan = entry.plan;
    let new_client = context.prepare(entry)?;

    let created = api.create_client(&new_client).await.map_err(|e| {
        warn!(
            error = %format!("{:#}", e),
            cedula = %new_client.cedula,
            "Failed to register client"
        );
        EntryError::Submission(e)
    })?;

    info!(
        client_id = created.id,
        cedula = %created.cedula,
        matricula = %created.matricula,
        plan = %plan,
        precio = created.precio,
        "Vehicle entry registered"
    );

    Ok(created)
}
