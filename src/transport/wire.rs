//! JSON envelope types for list and search responses.
//!
//! The API wraps every list-shaped response in `{content, pageable}`. These
//! types exist only to decode that envelope; callers receive a domain
//! [`Page`].

use crate::domain::{EntitySummary, FetchError, Page};
use serde::{Deserialize, Serialize};

/// Top-level list or search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEnvelope {
    pub content: Vec<EntitySummary>,
    pub pageable: Pageable,
}

/// Pagination metadata reported by the server.
///
/// `previous_page` and `next_page` are absolute URLs, empty or absent at the
/// ends of the list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pageable {
    pub current_page: u32,
    pub elements_on_page: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub previous_page: Option<String>,
    pub next_page: Option<String>,
}

impl ListEnvelope {
    /// Decodes an envelope from raw response bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Decode`] when the bytes are not a valid envelope.
    pub fn decode(bytes: &[u8]) -> Result<Self, FetchError> {
        serde_json::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl From<ListEnvelope> for Page {
    fn from(envelope: ListEnvelope) -> Self {
        Self {
            items: envelope.content,
            page_index: envelope.pageable.current_page,
            total_pages: envelope.pageable.total_pages,
            total_items: envelope.pageable.total_elements,
        }
    }
}
