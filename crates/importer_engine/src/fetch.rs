use std::time::Duration;

use importer_logging::importer_trace;
use reqwest::header::ACCEPT;
use url::Url;

use crate::{RawResponse, TransportError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Account ids are appended to this URL as a final path segment.
    pub base_url: String,
    /// `None` leaves the transport default in place.
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:20928/inventory/seelie/".to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

/// Remote data source answering one inventory request per account.
#[async_trait::async_trait]
pub trait InventorySource: Send + Sync {
    async fn get_inventory(&self, account_id: &str) -> Result<RawResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSource {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestSource {
    pub fn new(settings: FetchSettings) -> Result<Self, TransportError> {
        let base_url = Url::parse(&settings.base_url).map_err(|err| {
            TransportError::new(format!("invalid base url {:?}: {err}", settings.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::new(format!(
                "base url {:?} cannot carry a path",
                settings.base_url
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::new(err.to_string()))?;

        Ok(Self { base_url, client })
    }

    /// `<base-url>/<account_id>`, with the id percent-encoded as one segment.
    pub fn endpoint(&self, account_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(account_id);
        }
        url
    }
}

#[async_trait::async_trait]
impl InventorySource for ReqwestSource {
    async fn get_inventory(&self, account_id: &str) -> Result<RawResponse, TransportError> {
        let endpoint = self.endpoint(account_id);
        importer_trace!("GET {}", endpoint);
        let response = self
            .client
            .get(endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        importer_trace!("Account {}: HTTP {} ({} bytes)", account_id, status, body.len());
        Ok(RawResponse { status, body })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(format!("timed out: {err}"));
    }
    TransportError::new(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(base_url: &str) -> ReqwestSource {
        ReqwestSource::new(FetchSettings {
            base_url: base_url.to_string(),
            ..FetchSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_appends_account_id_once() {
        let with_slash = source("http://127.0.0.1:20928/inventory/seelie/");
        let without_slash = source("http://127.0.0.1:20928/inventory/seelie");

        assert_eq!(
            with_slash.endpoint("100000001").as_str(),
            "http://127.0.0.1:20928/inventory/seelie/100000001"
        );
        assert_eq!(
            without_slash.endpoint("100000001").as_str(),
            "http://127.0.0.1:20928/inventory/seelie/100000001"
        );
    }

    #[test]
    fn endpoint_encodes_id_as_single_segment() {
        let src = source("http://localhost/inv/");
        assert_eq!(src.endpoint("a/b").as_str(), "http://localhost/inv/a%2Fb");
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(ReqwestSource::new(FetchSettings {
            base_url: "not a url".to_string(),
            ..FetchSettings::default()
        })
        .is_err());
        assert!(ReqwestSource::new(FetchSettings {
            base_url: "mailto:someone@example.com".to_string(),
            ..FetchSettings::default()
        })
        .is_err());
    }
}
