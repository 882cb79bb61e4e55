///! Remote services the tracker polls
///!
///! - public address lookup (ipify)
///! - spawn cache (fastpokemap)

pub mod address;
pub mod spawn_cache;

pub use address::IpifyClient;
pub use spawn_cache::SpawnCacheClient;

use async_trait::async_trait;
use spawnwatch_common::Entry;
use std::time::Duration;
use thiserror::Error;

/// Transport timeout applied to every outbound request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Parameters of one spawn-cache query
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnQuery {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Caller's public network address as seen from outside
    async fn lookup(&self) -> Result<String, ProviderError>;
}

#[async_trait]
pub trait SpawnSource: Send + Sync {
    /// Spawns near the queried position, in provider order
    async fn fetch(&self, query: &SpawnQuery) -> Result<Vec<Entry>, ProviderError>;
}

/// Read a successful response body as text, mapping non-2xx to an error.
pub(crate) async fn success_body(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status));
    }
    Ok(response.text().await?)
}
