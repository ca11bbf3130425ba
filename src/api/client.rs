use anyhow::{anyhow, bail, Context, Result};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::models::client::{Client, ClientStatusUpdate, NewClient};
use crate::models::config::ParkingConfig;
use crate::models::user::{NewUser, User};

/// API client for the remote parking service
///
/// Every method issues exactly one request. Nothing is retried.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/clients/cedula/{cedula}` with the cedula percent-encoded as one segment
    fn cedula_url(&self, cedula: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url("/clients/cedula"))
            .context("Invalid parking service base URL")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Parking service base URL cannot hold a path"))?
            .push(cedula);
        Ok(url)
    }

    // Users

    pub async fn get_users(&self) -> Result<Vec<User>> {
        let response = self
            .client
            .get(self.url("/users"))
            .send()
            .await
            .context("Failed to request user list")?;

        read_json(response, "user list").await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        let response = self
            .client
            .post(self.url("/users"))
            .json(user)
            .send()
            .await
            .context("Failed to send new user")?;

        read_json(response, "created user").await
    }

    pub async fn update_user(&self, id: u64, user: &NewUser) -> Result<User> {
        let response = self
            .client
            .put(self.url(&format!("/users/{}", id)))
            .json(user)
            .send()
            .await
            .context("Failed to send user update")?;

        read_json(response, "updated user").await
    }

    pub async fn delete_user(&self, id: u64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/users/{}", id)))
            .send()
            .await
            .context("Failed to send user deletion")?;

        ensure_success(&response)
    }

    // Clients

    pub async fn get_clients(&self) -> Result<Vec<Client>> {
        let response = self
            .client
            .get(self.url("/clients"))
            .send()
            .await
            .context("Failed to request client list")?;

        read_json(response, "client list").await
    }

    /// Look up the parked vehicle registered under `cedula`
    ///
    /// A 404 from the service means no record and yields `None`.
    pub async fn get_client_by_cedula(&self, cedula: &str) -> Result<Option<Client>> {
        let response = self
            .client
            .get(self.cedula_url(cedula)?)
            .send()
            .await
            .context("Failed to request client by cedula")?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(cedula = %cedula, "No client registered for cedula");
            return Ok(None);
        }

        read_json(response, "client").await.map(Some)
    }

    pub async fn create_client(&self, client: &NewClient) -> Result<Client> {
        let response = self
            .client
            .post(self.url("/clients"))
            .json(client)
            .send()
            .await
            .context("Failed to send new client")?;

        read_json(response, "created client").await
    }

    pub async fn update_client_status(&self, id: u64, update: &ClientStatusUpdate) -> Result<()> {
        let response = self
            .client
            .put(self.url(&format!("/clients/{}", id)))
            .json(update)
            .send()
            .await
            .context("Failed to send client status update")?;

        ensure_success(&response)
    }

    pub async fn delete_client(&self, id: u64) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/clients/{}", id)))
            .send()
            .await
            .context("Failed to send client deletion")?;

        ensure_success(&response)
    }

    pub async fn delete_client_by_cedula(&self, cedula: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.cedula_url(cedula)?)
            .send()
            .await
            .context("Failed to send client deletion by cedula")?;

        ensure_success(&response)
    }

    // Configuration

    pub async fn get_config(&self, id: u32) -> Result<ParkingConfig> {
        let response = self
            .client
            .get(self.url(&format!("/config/{}", id)))
            .send()
            .await
            .context("Failed to request parking configuration")?;

        read_json(response, "parking configuration").await
    }

    pub async fn update_config(&self, id: u32, config: &ParkingConfig) -> Result<()> {
        let response = self
            .client
            .put(self.url(&format!("/config/{}", id)))
            .json(config)
            .send()
            .await
            .context("Failed to send parking configuration")?;

        ensure_success(&response)
    }
}

fn ensure_success(response: &Response) -> Result<()> {
    if !response.status().is_success() {
        bail!(
            "Parking service returned error status: {}",
            response.status()
        );
    }
    Ok(())
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    ensure_success(&response)?;

    response
        .json::<T>()
        .await
        .context(format!("Failed to parse {} from parking service", what))
}
