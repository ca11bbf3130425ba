use crate::api::client::ApiClient;
use crate::models::config::ParkingConfig;
use anyhow::Result;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Cached view of the configuration record
///
/// There are no local defaults: capacity and rate are only known once a
/// fetch of the configuration record succeeded.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConfigState {
    Loading,
    Loaded(ParkingConfig),
    Failed { error: String },
}

impl ConfigState {
    pub fn loaded(&self) -> Option<&ParkingConfig> {
        match self {
            ConfigState::Loaded(config) => Some(config),
            _ => None,
        }
    }
}

/// Slots left for `capacity` with `occupied` vehicles parked, never negative
pub fn available_spaces(capacity: u32, occupied: usize) -> usize {
    (capacity as usize).saturating_sub(occupied)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OccupancySnapshot {
    /// `None` until the first successful occupancy refresh
    pub occupied_spaces: Option<usize>,
    pub available_spaces: Option<usize>,
    pub config: ConfigState,
}

/// Shared occupancy and configuration cache
pub struct ParkingState {
    occupied: AtomicUsize,
    occupancy_known: AtomicBool,
    config: RwLock<ConfigState>,
}

impl ParkingState {
    pub fn new() -> Self {
        Self {
            occupied: AtomicUsize::new(0),
            occupancy_known: AtomicBool::new(false),
            config: RwLock::new(ConfigState::Loading),
        }
    }

    pub fn occupied_spaces(&self) -> usize {
        self.occupied.load(Ordering::Relaxed)
    }

    /// Whether at least one occupancy refresh has succeeded
    pub fn occupancy_known(&self) -> bool {
        self.occupancy_known.load(Ordering::Relaxed)
    }

    /// Parked vehicle count, `None` before any refresh succeeded
    pub fn occupied(&self) -> Option<usize> {
        self.occupancy_known().then(|| self.occupied_spaces())
    }

    /// Last write wins; concurrent refreshes are not ordered
    pub fn set_occupied(&self, count: usize) {
        self.occupied.store(count, Ordering::Relaxed);
        self.occupancy_known.store(true, Ordering::Relaxed);
    }

    pub fn config_state(&self) -> ConfigState {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Record the outcome of a configuration fetch
    ///
    /// A failure after a successful load keeps the loaded snapshot.
    pub fn record_config(&self, result: &Result<ParkingConfig>) {
        let mut guard = self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match result {
            Ok(config) => *guard = ConfigState::Loaded(*config),
            Err(e) => {
                if guard.loaded().is_none() {
                    *guard = ConfigState::Failed {
                        error: format!("{:#}", e),
                    };
                }
            }
        }
    }

    /// `None` until both the configuration and the occupancy are known
    pub fn available_spaces(&self) -> Option<usize> {
        let config = self.config_state();
        let slot = config.loaded()?.slot;
        Some(available_spaces(slot, self.occupied()?))
    }

    pub fn snapshot(&self) -> OccupancySnapshot {
        let config = self.config_state();
        let occupied_spaces = self.occupied();

        OccupancySnapshot {
            occupied_spaces,
            available_spaces: config
                .loaded()
                .zip(occupied_spaces)
                .map(|(c, occupied)| available_spaces(c.slot, occupied)),
            config,
        }
    }

    /// Count parked vehicles; on failure the previous count is kept
    pub async fn refresh_occupancy(&self, api: &ApiClient) -> bool {
        match api.get_clients().await {
            Ok(clients) => {
                debug!(occupied = clients.len(), "Occupancy refreshed");
                self.set_occupied(clients.len());
                true
            }
            Err(e) => {
                warn!(
                    error = %format!("{:#}", e),
                    occupied = self.occupied_spaces(),
                    "Failed to refresh occupancy, keeping previous count"
                );
                false
            }
        }
    }

    pub async fn refresh_config(&self, api: &ApiClient, config_id: u32) -> Result<ParkingConfig> {
        let result = api.get_config(config_id).await;
        if let Err(e) = &result {
            warn!(
                error = %format!("{:#}", e),
                config_id = config_id,
                "Failed to fetch parking configuration"
            );
        }
        self.record_config(&result);
        result
    }
}

impl Default for ParkingState {
    fn default() -> Self {
        Self::new()
    }
}

/// Background occupancy refresh, cancelled when dropped
pub struct OccupancyPoller {
    handle: JoinHandle<()>,
}

impl OccupancyPoller {
    /// Refresh immediately, then every `every` until dropped
    pub fn spawn(state: Arc<ParkingState>, api: ApiClient, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = poll_interval(every);

            loop {
                interval.tick().await;
                state.refresh_occupancy(&api).await;
            }
        });

        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Ticks missed while a refresh was in flight are dropped, not replayed
fn poll_interval(every: Duration) -> Interval {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

impl Drop for OccupancyPoller {
    fn drop(&mut self) {
        debug!("Stopping occupancy poller");
        self.handle.abort();
    }
}
