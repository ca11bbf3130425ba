use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment status of a parked vehicle, `estado` on the wire (0 or 1)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    /// The opposite status, used by the dashboard toggle
    pub fn toggled(self) -> Self {
        match self {
            PaymentStatus::Unpaid => PaymentStatus::Paid,
            PaymentStatus::Paid => PaymentStatus::Unpaid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "No Pagado",
            PaymentStatus::Paid => "Pagado",
        }
    }
}

impl TryFrom<u8> for PaymentStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PaymentStatus::Unpaid),
            1 => Ok(PaymentStatus::Paid),
            other => Err(format!("invalid estado {}, expected 0 or 1", other)),
        }
    }
}

impl From<PaymentStatus> for u8 {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Unpaid => 0,
            PaymentStatus::Paid => 1,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A parked vehicle as stored by the parking service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    /// National ID of the owner
    pub cedula: String,
    /// License plate, uppercase ABC123
    pub matricula: String,
    /// Price fixed at entry time
    pub precio: f64,
    pub estado: PaymentStatus,
}

/// Body of `POST /clients`; the service assigns the id
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub cedula: String,
    pub matricula: String,
    pub precio: f64,
    pub estado: PaymentStatus,
}

/// Partial body of `PUT /clients/{id}` that only touches the status
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientStatusUpdate {
    pub estado: PaymentStatus,
}
