use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{success_body, AddressLookup, ProviderError, REQUEST_TIMEOUT};

const IPIFY_URL: &str = "https://api.ipify.org?format=json";

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

fn parse_ip_response(body: &str) -> Result<String, ProviderError> {
    let response: IpResponse = serde_json::from_str(body)?;
    Ok(response.ip)
}

/// Public address lookup through api.ipify.org
pub struct IpifyClient {
    client: Client,
}

impl IpifyClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build address lookup client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AddressLookup for IpifyClient {
    async fn lookup(&self) -> Result<String, ProviderError> {
        let response = self.client.get(IPIFY_URL).send().await?;
        let body = success_body(response).await?;
        parse_ip_response(&body)
    }
}
