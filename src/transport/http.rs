//! `reqwest`-backed transport.
//!
//! Builds request URLs from the configured base, validates status and body,
//! and maps every failure into [`FetchError`]. One shared `reqwest::Client`
//! backs all operations so connections are pooled across list, detail,
//! search and image requests.

use super::api::{CatalogApi, ImageSource};
use super::wire::ListEnvelope;
use crate::domain::{DigidexError, EntityDetail, FetchError, Page, Result};
use crate::Config;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Url};

/// Resource path of the entity collection under the base URL.
const RESOURCE_PATH: &str = "digimon";

/// HTTP client for the catalog API and image hosts.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport from configuration.
    ///
    /// The base URL is not validated here; a malformed base surfaces as
    /// [`FetchError::InvalidUrl`] on the first request.
    ///
    /// # Errors
    ///
    /// Returns [`DigidexError::Config`] if the HTTP client cannot be built
    /// (for example an invalid user agent string).
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| DigidexError::Config(format!("invalid user agent: {e}")))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DigidexError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are built from.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the entity list page `page`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the base URL does not parse.
    pub fn list_url(&self, page: u32, page_size: u32) -> std::result::Result<Url, FetchError> {
        let mut url = self.endpoint(&[RESOURCE_PATH])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string());
        Ok(url)
    }

    /// URL of the detail record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the base URL does not parse.
    pub fn detail_url(&self, id: i64) -> std::result::Result<Url, FetchError> {
        self.endpoint(&[RESOURCE_PATH, &id.to_string()])
    }

    /// URL of a name search; `query` is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the base URL does not parse.
    pub fn search_url(&self, query: &str) -> std::result::Result<Url, FetchError> {
        let mut url = self.endpoint(&[RESOURCE_PATH])?;
        url.query_pairs_mut().append_pair("name", query);
        Ok(url)
    }

    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            tracing::debug!(base_url = %self.base_url, error = %e, "invalid base URL");
            FetchError::InvalidUrl
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|()| FetchError::InvalidUrl)?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Issues a GET and returns the validated, non-empty body.
    async fn get(&self, url: Url, headers: HeaderMap) -> std::result::Result<Vec<u8>, FetchError> {
        tracing::debug!(url = %url, "sending request");

        let response = self
            .client
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "unexpected HTTP status");
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        if body.is_empty() {
            tracing::debug!(url = %url, "empty response body");
            return Err(FetchError::NoData);
        }

        tracing::debug!(url = %url, bytes = body.len(), "response received");
        Ok(body.to_vec())
    }

    async fn get_json(&self, url: Url) -> std::result::Result<Vec<u8>, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        self.get(url, headers).await
    }
}

/// Maps a `reqwest` failure into the fetch taxonomy.
fn map_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_builder() {
        FetchError::InvalidUrl
    } else if error.is_decode() {
        FetchError::Decode(error.to_string())
    } else {
        FetchError::Connectivity(error.to_string())
    }
}

#[async_trait]
impl CatalogApi for HttpTransport {
    async fn fetch_list(&self, page: u32, page_size: u32) -> std::result::Result<Page, FetchError> {
        let url = self.list_url(page, page_size)?;
        let body = self.get_json(url).await?;
        let envelope = ListEnvelope::decode(&body)?;

        tracing::debug!(
            page = page,
            items = envelope.content.len(),
            total_pages = envelope.pageable.total_pages,
            "list page decoded"
        );
        Ok(envelope.into())
    }

    async fn fetch_detail(&self, id: i64) -> std::result::Result<EntityDetail, FetchError> {
        let url = self.detail_url(id)?;
        let body = self.get_json(url).await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!(id = id, error = %e, "failed to decode detail");
            FetchError::Decode(e.to_string())
        })
    }

    async fn search(&self, query: &str) -> std::result::Result<Page, FetchError> {
        let url = self.search_url(query)?;
        let body = self.get_json(url).await?;
        let envelope = ListEnvelope::decode(&body)?;

        tracing::debug!(query = %query, items = envelope.content.len(), "search results decoded");
        Ok(envelope.into())
    }
}

#[async_trait]
impl ImageSource for HttpTransport {
    async fn fetch_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl);
        }
        self.get(parsed, HeaderMap::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base_url: &str) -> HttpTransport {
        let config = Config {
            base_url: base_url.to_string(),
            ..Config::default()
        };
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn builds_list_url() {
        let url = transport("https://digi-api.com/api/v1").list_url(3, 20).unwrap();
        assert_eq!(
            url.as_str(),
            "https://digi-api.com/api/v1/digimon?page=3&pageSize=20"
        );
    }

    #[test]
    fn trailing_slash_in_base_is_ignored() {
        let url = transport("https://digi-api.com/api/v1/").detail_url(289).unwrap();
        assert_eq!(url.as_str(), "https://digi-api.com/api/v1/digimon/289");
    }

    #[test]
    fn search_query_is_percent_encoded() {
        let url = transport("https://digi-api.com/api/v1")
            .search_url("War Greymon & co")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://digi-api.com/api/v1/digimon?name=War+Greymon+%26+co"
        );
    }

    #[test]
    fn malformed_base_is_invalid_url() {
        let err = transport("not a url").list_url(0, 20).unwrap_err();
        assert_eq!(err, FetchError::InvalidUrl);
    }

    #[tokio::test]
    async fn non_http_image_url_is_rejected() {
        let err = transport("https://digi-api.com/api/v1")
            .fetch_bytes("file:///etc/passwd")
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::InvalidUrl);
    }
}
