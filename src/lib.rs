//! Digidex: data-fetch orchestration for a paginated creature catalog.
//!
//! Digidex is the headless core of a catalog browser. It provides:
//! - Incremental list loading with at most one page fetch in flight
//! - Local name filtering with a remote search fallback
//! - Detail loading for a single entity
//! - A URL-keyed image cache with request coalescing and a byte budget
//! - A single-owner event loop publishing read-only snapshots to the UI

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Session (session.rs)                               │  ← Event loop
//! │  - CatalogHandle → Event channel                    │
//! │  - watch channel → CatalogSnapshot                  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │  ← Business logic
//! │  - Pagination / search / detail controllers         │
//! │  - Snapshot computation                             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Worker Layer  │   │ Image Layer   │   │ Transport     │
//! │ (worker/)     │   │ (images/)     │   │ (transport/)  │
//! │ - Tasks       │   │ - Coalescing  │   │ - reqwest     │
//! │ - Tickets     │   │ - LRU budget  │   │ - JSON wire   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Entity summary and detail records                │
//! │  - Entity store                                     │
//! │  - Error types                                      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing-subscriber with EnvFilter                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Core domain types (entities, store, errors)
//! - [`images`]: Image cache and LRU store
//! - [`session`]: Event loop and handle
//! - [`transport`]: Catalog API traits and the HTTP implementation
//! - [`worker`]: Worker messages and transport dispatch
//! - [`observability`]: Tracing subscriber setup
//!
//! # Configuration
//!
//! Settings come from a TOML file or a string map:
//!
//! ```toml
//! base_url = "https://digi-api.com/api/v1"
//! page_size = 20
//! request_timeout_ms = 15000
//! search_debounce_ms = 0
//! image_cache_bytes = 33554432
//! trace_level = "debug"
//! ```
//!
//! # Data Flow
//!
//! 1. **UI request**: a [`CatalogHandle`] method sends an [`Event`]
//! 2. **Event handling**: the session runs [`handle_event`], which mutates
//!    [`AppState`] and returns [`Action`]s
//! 3. **Worker**: each `PostToWorker` action runs on its own task; the
//!    response comes back as an event carrying the request's ticket
//! 4. **Completion**: stale tickets are discarded, current ones applied
//! 5. **Publish**: a new [`CatalogSnapshot`] goes out on the watch channel
//!
//! # Examples
//!
//! ```no_run
//! use digidex::{CatalogSession, Config};
//!
//! # async fn run() -> digidex::Result<()> {
//! let mut handle = CatalogSession::connect(&Config::default())?;
//! handle.load_next_page()?;
//!
//! let snapshot = handle.wait_for(|s| !s.rows.is_empty()).await?;
//! for row in &snapshot.rows {
//!     println!("{} {}", row.number, row.entity.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod domain;
pub mod images;
pub mod observability;
pub mod session;
pub mod transport;
pub mod worker;

pub use app::{handle_event, Action, AppState, CatalogSnapshot, Event, ViewMode};
pub use domain::{DigidexError, FetchError, Result};
pub use images::ImageCache;
pub use session::{CatalogHandle, CatalogSession};
pub use transport::{CatalogApi, HttpTransport, ImageSource};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Default catalog API root.
pub const DEFAULT_BASE_URL: &str = "https://digi-api.com/api/v1";

/// Default number of entities per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default image cache budget: 32 MiB of decoded pixels.
pub const DEFAULT_IMAGE_CACHE_BYTES: usize = 32 * 1024 * 1024;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Runtime configuration.
///
/// # Example
///
/// ```toml
/// base_url = "http://localhost:8080/api/v1"
/// page_size = 50
/// search_debounce_ms = 250
/// image_cache_entries = 200
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the catalog API, without a trailing resource segment.
    ///
    /// Default: `https://digi-api.com/api/v1`
    pub base_url: String,

    /// Entities requested per page. Default: 20
    pub page_size: u32,

    /// Timeout applied to every request. Default: 15 seconds
    pub request_timeout: Duration,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Shortest query, in characters, that may trigger a remote search when
    /// nothing matches locally. Default: 2
    pub min_remote_query_len: usize,

    /// Delay before a remote search is sent. Zero sends immediately.
    pub search_debounce: Duration,

    /// Decoded-image byte budget of the image cache. Default: 32 MiB
    pub image_cache_bytes: usize,

    /// Optional cap on the number of cached images.
    pub image_cache_entries: Option<usize>,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("digidex/", env!("CARGO_PKG_VERSION")).to_string(),
            min_remote_query_len: app::search::DEFAULT_MIN_REMOTE_QUERY_LEN,
            search_debounce: Duration::ZERO,
            image_cache_bytes: DEFAULT_IMAGE_CACHE_BYTES,
            image_cache_entries: None,
            trace_level: None,
        }
    }
}

/// On-disk form of [`Config`]; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    page_size: Option<u32>,
    request_timeout_ms: Option<u64>,
    user_agent: Option<String>,
    min_remote_query_len: Option<usize>,
    search_debounce_ms: Option<u64>,
    image_cache_bytes: Option<usize>,
    image_cache_entries: Option<usize>,
    trace_level: Option<String>,
}

impl Config {
    /// Parses configuration from a string map, e.g. environment or CLI
    /// key/value pairs.
    ///
    /// # Parsing Rules
    ///
    /// - `base_url`, `user_agent`: taken as-is when non-empty
    /// - `page_size`: `u32`, must be non-zero
    /// - `request_timeout_ms`, `search_debounce_ms`: milliseconds
    /// - `min_remote_query_len`, `image_cache_bytes`, `image_cache_entries`:
    ///   `usize`
    /// - `trace_level`: `Option<String>`
    ///
    /// Malformed values fall back to their default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    /// use digidex::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "50".to_string());
    /// map.insert("search_debounce_ms".to_string(), "250".to_string());
    /// map.insert("image_cache_bytes".to_string(), "lots".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 50);
    /// assert_eq!(config.search_debounce, Duration::from_millis(250));
    /// assert_eq!(config.image_cache_bytes, digidex::DEFAULT_IMAGE_CACHE_BYTES);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        fn parsed<T: std::str::FromStr>(config: &BTreeMap<String, String>, key: &str) -> Option<T> {
            let raw = config.get(key)?;
            let value = raw.trim().parse::<T>().ok();
            if value.is_none() {
                tracing::debug!(key = key, value = %raw, "malformed config value, using default");
            }
            value
        }

        let text = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let defaults = Self::default();

        Self {
            base_url: text("base_url").unwrap_or(defaults.base_url),
            page_size: parsed::<u32>(config, "page_size")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.page_size),
            request_timeout: parsed::<u64>(config, "request_timeout_ms")
                .map_or(defaults.request_timeout, Duration::from_millis),
            user_agent: text("user_agent").unwrap_or(defaults.user_agent),
            min_remote_query_len: parsed(config, "min_remote_query_len")
                .unwrap_or(defaults.min_remote_query_len),
            search_debounce: parsed::<u64>(config, "search_debounce_ms")
                .map_or(defaults.search_debounce, Duration::from_millis),
            image_cache_bytes: parsed(config, "image_cache_bytes").unwrap_or(defaults.image_cache_bytes),
            image_cache_entries: parsed(config, "image_cache_entries"),
            trace_level: text("trace_level"),
        }
    }

    /// Parses configuration from TOML. Missing keys take their default.
    ///
    /// # Errors
    ///
    /// Returns [`DigidexError::Config`] on malformed TOML, unknown keys,
    /// wrongly typed values or a zero `page_size`.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(input).map_err(|e| DigidexError::Config(format!("invalid configuration: {e}")))?;

        if file.page_size == Some(0) {
            return Err(DigidexError::Config("page_size must be greater than zero".to_string()));
        }

        let defaults = Self::default();
        Ok(Self {
            base_url: file.base_url.unwrap_or(defaults.base_url),
            page_size: file.page_size.unwrap_or(defaults.page_size),
            request_timeout: file
                .request_timeout_ms
                .map_or(defaults.request_timeout, Duration::from_millis),
            user_agent: file.user_agent.unwrap_or(defaults.user_agent),
            min_remote_query_len: file.min_remote_query_len.unwrap_or(defaults.min_remote_query_len),
            search_debounce: file
                .search_debounce_ms
                .map_or(defaults.search_debounce, Duration::from_millis),
            image_cache_bytes: file.image_cache_bytes.unwrap_or(defaults.image_cache_bytes),
            image_cache_entries: file.image_cache_entries,
            trace_level: file.trace_level,
        })
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DigidexError::Io`] if the file cannot be read, or the errors
    /// of [`Config::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn defaults_match_public_api() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://digi-api.com/api/v1");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.min_remote_query_len, 2);
        assert_eq!(config.search_debounce, Duration::ZERO);
        assert!(config.user_agent.starts_with("digidex/"));
    }

    #[test]
    fn from_map_falls_back_per_key() {
        let config = Config::from_map(&map(&[
            ("base_url", "http://localhost:9000/api"),
            ("page_size", "0"),
            ("request_timeout_ms", "abc"),
            ("image_cache_entries", "64"),
            ("trace_level", "debug"),
        ]));

        assert_eq!(config.base_url, "http://localhost:9000/api");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.image_cache_entries, Some(64));
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn from_map_ignores_blank_text() {
        let config = Config::from_map(&map(&[("base_url", "  "), ("trace_level", "")]));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.trace_level, None);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = Config::from_toml_str(
            r#"
            page_size = 50
            search_debounce_ms = 300
            min_remote_query_len = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.page_size, 50);
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.min_remote_query_len, 3);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn toml_rejects_malformed_input() {
        assert!(matches!(
            Config::from_toml_str("page_size = \"many\""),
            Err(DigidexError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("colour = \"red\""),
            Err(DigidexError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("page_size = 0"),
            Err(DigidexError::Config(_))
        ));
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://127.0.0.1:8080/v1\"").unwrap();
        writeln!(file, "image_cache_bytes = 1024").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080/v1");
        assert_eq!(config.image_cache_bytes, 1024);
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(DigidexError::Io(_))));
    }
}
