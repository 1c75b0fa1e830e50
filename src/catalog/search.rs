use super::Song;
use futures::future::BoxFuture;
use image::DynamicImage;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("catalog answered HTTP {0}")]
    Status(StatusCode),
    #[error("malformed catalog response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("undecodable artwork: {0}")]
    Image(#[from] image::ImageError),
}

/// Everything the session needs from the online catalog.
///
/// Futures are boxed and `'static` so callers can hand them straight to `tokio::spawn`.
pub trait Catalog: Send + Sync {
    fn search(&self, query: &str) -> BoxFuture<'static, Result<Vec<Song>, CatalogError>>;
    fn artwork(&self, url: &str) -> BoxFuture<'static, Result<DynamicImage, CatalogError>>;
}

#[derive(Debug, Default, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    data: Option<SearchData>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchData {
    #[serde(default)]
    results: Option<Vec<Song>>,
}

/// `{data: {results: [...]}}`; a missing level means no hits, not an error.
pub fn parse_results(body: &str) -> Result<Vec<Song>, CatalogError> {
    let envelope: SearchEnvelope = serde_json::from_str(body)?;
    Ok(envelope.data.and_then(|d| d.results).unwrap_or_default())
}

pub struct CatalogClient {
    client: Client,
    endpoint: String,
    limit: u32,
}

impl CatalogClient {
    pub fn new(endpoint: &str, limit: u32, user_agent: &str) -> Result<Self, CatalogError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self::with_client(client, endpoint, limit))
    }

    pub fn with_client(client: Client, endpoint: &str, limit: u32) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            limit,
        }
    }
}

impl Catalog for CatalogClient {
    fn search(&self, query: &str) -> BoxFuture<'static, Result<Vec<Song>, CatalogError>> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query.to_string()), ("limit", self.limit.to_string())]);
        let query = query.to_string();

        Box::pin(async move {
            let resp = request.send().await?;
            if !resp.status().is_success() {
                return Err(CatalogError::Status(resp.status()));
            }
            let body = resp.text().await?;
            let songs = parse_results(&body)?;
            debug!(query = %query, hits = songs.len(), "catalog search finished");
            Ok(songs)
        })
    }

    fn artwork(&self, url: &str) -> BoxFuture<'static, Result<DynamicImage, CatalogError>> {
        let request = self.client.get(url);

        Box::pin(async move {
            let resp = request.send().await?;
            if !resp.status().is_success() {
                return Err(CatalogError::Status(resp.status()));
            }
            let bytes = resp.bytes().await?;
            Ok(image::load_from_memory(&bytes)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_results_in_order() {
        let body = r#"{"status":"SUCCESS","data":{"total":2,"results":[
            {"id":"s1","name":"One","duration":"100"},
            {"id":"s2","name":"Two","duration":"200"}]}}"#;
        let songs = parse_results(body).unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].id, "s1");
        assert_eq!(songs[1].id, "s2");
    }

    #[test]
    fn test_missing_results_is_empty() {
        assert!(parse_results(r#"{"data":{}}"#).unwrap().is_empty());
        assert!(parse_results(r#"{"data":null}"#).unwrap().is_empty());
        assert!(parse_results(r#"{}"#).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let err = parse_results("<html>502</html>").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
