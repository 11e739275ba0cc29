//! HTTP client for the simulation's state endpoints.

use evolvit_core::{Creature, Error, FoodItem, Result, Snapshot, SpriteId, ViewerConfig};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Something that can produce a fresh snapshot, or fail
#[allow(async_fn_in_trait)]
pub trait SnapshotSource {
    async fn fetch_snapshot(&self) -> Result<Snapshot>;
}

/// Body of the state endpoint. Older simulations serve the sprite table
/// from a separate endpoint, so `sprites` may be absent.
#[derive(Debug, Deserialize)]
struct StateDocument {
    creatures: Vec<Creature>,
    food: Vec<FoodItem>,
    #[serde(default)]
    sprites: Option<BTreeMap<SpriteId, String>>,
}

pub struct SimulationClient {
    config: ViewerConfig,
    http_client: Client,
}

impl SimulationClient {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(network_error)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetch the sprite table from its dedicated endpoint
    #[instrument(skip(self))]
    pub async fn fetch_sprites(&self) -> Result<BTreeMap<SpriteId, String>> {
        self.get_json(&self.config.sprites_url()).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Fetching {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Network(format!(
                "{} returned {} - {}",
                url, status, error_text
            )));
        }

        let body = response.bytes().await.map_err(network_error)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl SnapshotSource for SimulationClient {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let state: StateDocument = self.get_json(&self.config.state_url()).await?;

        let sprites = match state.sprites {
            Some(sprites) => sprites,
            None => self.fetch_sprites().await?,
        };

        Ok(Snapshot {
            creatures: state.creatures,
            food: state.food,
            sprites,
        })
    }
}

fn network_error(err: reqwest::Error) -> Error {
    Error::Network(err.to_string())
}
