use serde::{Deserialize, Serialize};

/// Singleton configuration record (`/config/{id}`)
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParkingConfig {
    /// Total slot capacity
    pub slot: u32,
    /// Hourly rate
    pub precio: f64,
}
