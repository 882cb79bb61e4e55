use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, ORIGIN, PRAGMA, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use spawnwatch_common::Entry;

use super::{success_body, ProviderError, SpawnQuery, SpawnSource, REQUEST_TIMEOUT};

const SPAWN_CACHE_URL: &str = "https://cache.fastpokemap.se/";

// The cache only answers requests that look like they come from its own web page.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/55.0.2858.0 Safari/537.36";
const SITE_ORIGIN: &str = "https://fastpokemap.se";
const CACHE_AUTHORITY: &str = "cache.fastpokemap.se";

fn spawn_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ORIGIN, HeaderValue::from_static(SITE_ORIGIN));
    headers.insert(
        HeaderName::from_static("authority"),
        HeaderValue::from_static(CACHE_AUTHORITY),
    );
    headers
}

fn parse_spawns(body: &str) -> Result<Vec<Entry>, ProviderError> {
    Ok(serde_json::from_str(body)?)
}

/// Client for the fastpokemap spawn cache
pub struct SpawnCacheClient {
    client: Client,
}

impl SpawnCacheClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build spawn cache client")?;
        Ok(Self { client })
    }

    fn request(&self, query: &SpawnQuery) -> RequestBuilder {
        self.client
            .get(SPAWN_CACHE_URL)
            .query(&[
                ("key", "allow-all"),
                ("ts", "0"),
                ("compute", query.address.as_str()),
            ])
            .query(&[("lat", query.latitude), ("lng", query.longitude)])
            .headers(spawn_cache_headers())
    }
}

#[async_trait]
impl SpawnSource for SpawnCacheClient {
    async fn fetch(&self, query: &SpawnQuery) -> Result<Vec<Entry>, ProviderError> {
        let response = self.request(query).send().await?;
        let body = success_body(response).await?;
        let spawns = parse_spawns(&body)?;
        tracing::debug!("Spawn cache returned {} records", spawns.len());
        Ok(spawns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> SpawnQuery {
        SpawnQuery {
            address: "203.0.113.7".to_string(),
            latitude: 48.8566,
            longitude: 2.3522,
        }
    }

    #[test]
    fn test_request_carries_query_and_headers() {
        let client = SpawnCacheClient::new().unwrap();
        let request = client.request(&paris()).build().unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().host_str(), Some("cache.fastpokemap.se"));
        assert_eq!(
            request.url().query(),
            Some("key=allow-all&ts=0&compute=203.0.113.7&lat=48.8566&lng=2.3522")
        );

        let headers = request.headers();
        assert_eq!(headers[PRAGMA], "no-cache");
        assert_eq!(headers[CACHE_CONTROL], "no-cache");
        assert_eq!(headers[ORIGIN], "https://fastpokemap.se");
        assert_eq!(headers["authority"], "cache.fastpokemap.se");
        assert!(headers[USER_AGENT].to_str().unwrap().contains("Chrome/55"));
    }

    #[test]
    fn test_parse_spawns() {
        let body = r#"[
            {"pokemon_id":"Snorlax","expireAt":"2026-10-19T12:10:00.000Z","encounter_id":"1"},
            {"pokemon_id":"PIDGEY","expireAt":"2026-10-19T12:05:00.000Z","encounter_id":"2"}
        ]"#;
        let spawns = parse_spawns(body).unwrap();
        assert_eq!(spawns.len(), 2);
        assert_eq!(spawns[0].category, "Snorlax");
        assert_eq!(spawns[1].extra["encounter_id"], "2");
    }

    #[test]
    fn test_parse_spawns_rejects_error_page() {
        assert!(matches!(
            parse_spawns(r#"{"error":"overloaded"}"#),
            Err(ProviderError::Decode(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires network connection
    async fn test_fetch_live() {
        let client = SpawnCacheClient::new().unwrap();
        let result = client.fetch(&paris()).await;
        assert!(result.is_ok() || result.is_err()); // Just test it can run
    }
}
