//! Transport seams.
//!
//! The controllers and the image cache only ever see these traits, which
//! lets tests substitute in-memory implementations with scripted delays and
//! call counters. [`HttpTransport`](super::HttpTransport) implements both for
//! production use.

use crate::domain::{EntityDetail, FetchError, Page};
use async_trait::async_trait;

/// Remote catalog operations.
///
/// Every call completes exactly once with either a value or a
/// [`FetchError`]; none of them retries internally.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetches one page of the full entity list.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] describing why the page could not be loaded.
    async fn fetch_list(&self, page: u32, page_size: u32) -> Result<Page, FetchError>;

    /// Fetches the full record for one entity.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] describing why the record could not be loaded.
    async fn fetch_detail(&self, id: i64) -> Result<EntityDetail, FetchError>;

    /// Searches entities by name on the server.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] describing why the search failed.
    async fn search(&self, query: &str) -> Result<Page, FetchError>;
}

/// Raw byte source for images.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetches the bytes behind `url`, validating the response status.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] describing why the bytes could not be fetched.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
