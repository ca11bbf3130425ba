// Two-phase vehicle exit: verify payment, then confirm departure

use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use crate::api::client::ApiClient;
use crate::core::error::ExitError;
use crate::models::client::PaymentStatus;
use crate::validation::params::ValidatedExit;

/// Why a vehicle may not leave
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExitDenial {
    /// Unknown cedula or plate mismatch; the two are reported identically
    NotFound,
    Unpaid { precio: f64 },
}

impl fmt::Display for ExitDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitDenial::NotFound => f.write_str("No se encontró el registro del vehículo"),
            ExitDenial::Unpaid { precio } => write!(f, "Debe pagar ${} antes de salir", precio),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExitState {
    #[default]
    Idle,
    Denied { denial: ExitDenial, message: String },
    PendingConfirmation { cedula: String, message: String },
}

impl ExitState {
    fn denied(denial: ExitDenial) -> Self {
        let message = denial.to_string();
        ExitState::Denied { denial, message }
    }

    fn pending(cedula: String) -> Self {
        ExitState::PendingConfirmation {
            cedula,
            message: "Puede retirar su vehículo".to_string(),
        }
    }
}

/// Exit flow for one console
///
/// `Idle -> Denied | PendingConfirmation -> Idle`. A denied flow accepts a
/// new verification; only a pending one can be confirmed.
#[derive(Debug, Default)]
pub struct ExitFlow {
    state: ExitState,
}

impl ExitFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ExitState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = ExitState::Idle;
    }

    /// Look up the vehicle and decide whether it may leave
    ///
    /// A transport failure leaves the flow idle.
    pub async fn verify(
        &mut self,
        api: &ApiClient,
        request: ValidatedExit,
    ) -> Result<&ExitState, ExitError> {
        self.state = ExitState::Idle;

        let record = api.get_client_by_cedula(&request.cedula).await.map_err(|e| {
            warn!(
                error = %format!("{:#}", e),
                cedula = %request.cedula,
                "Failed to look up client for exit"
            );
            ExitError::Lookup(e)
        })?;

        self.state = match record {
            Some(client) if plates_match(&client.matricula, &request.matricula) => {
                match client.estado {
                    PaymentStatus::Unpaid => {
                        info!(cedula = %request.cedula, precio = client.precio, "Exit denied, balance unpaid");
                        ExitState::denied(ExitDenial::Unpaid {
                            precio: client.precio,
                        })
                    }
                    PaymentStatus::Paid => {
                        info!(cedula = %request.cedula, "Exit verified, awaiting confirmation");
                        ExitState::pending(request.cedula)
                    }
                }
            }
            Some(_) => {
                info!(cedula = %request.cedula, "Exit denied, plate mismatch");
                ExitState::denied(ExitDenial::NotFound)
            }
            None => {
                info!(cedula = %request.cedula, "Exit denied, no record");
                ExitState::denied(ExitDenial::NotFound)
            }
        };

        Ok(&self.state)
    }

    /// Remove the verified record and return to idle
    ///
    /// On failure the record and the pending state are left intact.
    pub async fn confirm(&mut self, api: &ApiClient) -> Result<(), ExitError> {
        let cedula = match &self.state {
            ExitState::PendingConfirmation { cedula, .. } => cedula.clone(),
            _ => return Err(ExitError::NotConfirmable),
        };

        api.delete_client_by_cedula(&cedula).await.map_err(|e| {
            warn!(
                error = %format!("{:#}", e),
                cedula = %cedula,
                "Failed to delete client record on exit"
            );
            ExitError::Deletion(e)
        })?;

        info!(cedula = %cedula, "Vehicle departed");
        self.state = ExitState::Idle;
        Ok(())
    }
}

fn plates_match(stored: &str, provided: &str) -> bool {
    stored.to_lowercase() == provided.to_lowercase()
}
