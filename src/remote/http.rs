//! HTTP client for the remote bug list endpoint.
//!
//! Credentials are kept in a `SecretBox` and only exposed while building the
//! request headers. Header values are wrapped in `RedactedHeader` so they
//! print as `[REDACTED]` if a request is ever logged.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretBox};
use serde::Deserialize;
use url::Url;

use super::error::{ApiError, parse_retry_after};
use super::{BugPage, BugQuery, BugSource, Facets};
use crate::config::Config;
use crate::error::{BugdeckError, Result};
use crate::types::BugRecord;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    fn as_header_value(&self) -> Result<header::HeaderValue> {
        let mut value = header::HeaderValue::from_str(&self.value).map_err(|_| {
            BugdeckError::Auth("API key contains characters not allowed in a header".to_string())
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BugListResponse {
    bugs: Vec<BugRecord>,
    #[serde(default)]
    total_count: Option<usize>,
    #[serde(default)]
    facets: Facets,
}

impl From<BugListResponse> for BugPage {
    fn from(response: BugListResponse) -> Self {
        let total_count = response.total_count.unwrap_or(response.bugs.len());
        BugPage {
            records: response.bugs,
            total_count,
            facets: response.facets,
        }
    }
}

/// Fetches bug pages from `GET {base_url}/api/bugs`.
pub struct HttpBugSource {
    client: Client,
    endpoint: Url,
    api_key: Option<SecretBox<String>>,
}

impl fmt::Debug for HttpBugSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBugSource")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpBugSource {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let endpoint = list_endpoint(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key
                .filter(|key| !key.is_empty())
                .map(|key| SecretBox::new(Box::new(key))),
        })
    }

    /// Build a source from the `remote` section of the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.remote_url().ok_or_else(|| {
            BugdeckError::Config(
                "remote.url is not set; run 'bugdeck config set remote.url <URL>' \
                 or set BUGDECK_API_URL"
                    .to_string(),
            )
        })?;
        Self::new(
            &base_url,
            config.api_key(),
            Duration::from_secs(config.remote_timeout_secs()),
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn request(&self, query: &BugQuery) -> Result<BugPage> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .query(&query.to_params())
            .header(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        if let Some(key) = &self.api_key {
            let bearer = RedactedHeader::new(format!("Bearer {}", key.expose_secret()));
            let apikey = RedactedHeader::new(key.expose_secret().as_str());
            request = request
                .header(header::AUTHORIZATION, bearer.as_header_value()?)
                .header("apikey", apikey.as_header_value()?);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers().get(header::RETRY_AFTER));
            return Err(ApiError::with_status(format!("HTTP {status}"), status)
                .with_retry_after(retry_after)
                .into());
        }

        let body: BugListResponse = response.json().await?;
        Ok(body.into())
    }
}

impl BugSource for HttpBugSource {
    async fn fetch_page(&self, query: &BugQuery) -> Result<BugPage> {
        tracing::debug!(endpoint = %self.endpoint, page = query.page, "fetching bug page");
        self.request(query).await
    }
}

/// Resolve `{base}/api/bugs`, keeping any path prefix on the base URL.
pub fn list_endpoint(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url.trim())
        .map_err(|e| BugdeckError::Config(format!("invalid remote url '{base_url}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BugdeckError::Config(format!(
            "remote url must use http or https, got '{}'",
            url.scheme()
        )));
    }
    url.path_segments_mut()
        .map_err(|_| BugdeckError::Config(format!("remote url '{base_url}' cannot be a base")))?
        .pop_if_empty()
        .extend(["api", "bugs"]);
    url.set_query(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_header_display() {
        let header = RedactedHeader::new("secret-api-key-12345");
        assert_eq!(format!("{}", header), "[REDACTED]");
    }

    #[test]
    fn test_redacted_header_debug() {
        let header = RedactedHeader::new("secret-api-key-12345");
        let debug_str = format!("{:?}", header);
        assert!(!debug_str.contains("secret-api-key-12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_redacted_header_value_is_sensitive() {
        let value = RedactedHeader::new("Bearer abc").as_header_value().unwrap();
        assert!(value.is_sensitive());
        assert!(RedactedHeader::new("bad\nkey").as_header_value().is_err());
    }

    #[test]
    fn test_list_endpoint_paths() {
        assert_eq!(
            list_endpoint("https://qa.example.com").unwrap().as_str(),
            "https://qa.example.com/api/bugs"
        );
        assert_eq!(
            list_endpoint("https://qa.example.com/tenant/").unwrap().as_str(),
            "https://qa.example.com/tenant/api/bugs"
        );
        assert!(list_endpoint("not a url").is_err());
        assert!(list_endpoint("ftp://qa.example.com").is_err());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let source = HttpBugSource::new(
            "https://qa.example.com",
            Some("sk-live-1234".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let debug_str = format!("{:?}", source);
        assert!(!debug_str.contains("sk-live-1234"));
        assert!(debug_str.contains("/api/bugs"));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "bugs": [{"id": "b1", "title": "Broken"}, {"id": "b2", "title": "Slow"}],
            "totalCount": 40,
            "facets": {"reporters": ["Ali"]}
        }"#;
        let page: BugPage = serde_json::from_str::<BugListResponse>(json).unwrap().into();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.total_count, 40);
        assert_eq!(page.facets.reporters, vec!["Ali"]);

        let bare: BugPage = serde_json::from_str::<BugListResponse>(r#"{"bugs": []}"#)
            .unwrap()
            .into();
        assert_eq!(bare.total_count, 0);
        assert!(bare.facets.reporters.is_empty());
    }
}
