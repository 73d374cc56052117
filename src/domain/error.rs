//! Error types for the catalog core.
//!
//! Two layers of errors live here. [`FetchError`] is the closed taxonomy every
//! transport operation resolves to; controllers store it in their `Failed`
//! states so the UI can render a retry affordance. [`DigidexError`] covers
//! everything around that: configuration parsing and session plumbing. Both
//! use `thiserror` for their `Error` implementations.

use thiserror::Error;

/// Failure of a single remote operation.
///
/// The variants are deliberately coarse: callers only need to decide whether
/// to offer a retry, show a placeholder, or report a schema problem.
///
/// # Examples
///
/// ```
/// use digidex::FetchError;
///
/// assert!(FetchError::Timeout.is_retryable());
/// assert!(FetchError::Http(503).is_retryable());
/// assert!(!FetchError::Http(404).is_retryable());
/// assert!(FetchError::Decode("missing field `content`".into()).is_logic_bug());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request URL could not be built from the configured base.
    ///
    /// A configuration or programming error; retrying will not help.
    #[error("invalid request URL")]
    InvalidUrl,

    /// The server answered with an empty body.
    #[error("no data received")]
    NoData,

    /// The server answered with a status outside `200..=299`.
    #[error("unexpected HTTP status {0}")]
    Http(u16),

    /// The body was not the JSON shape we expect.
    ///
    /// The only variant that indicates schema drift rather than a transient
    /// condition.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request exceeded its wall-clock budget.
    #[error("request timed out")]
    Timeout,

    /// The request never reached the server or the connection dropped.
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// Image bytes were fetched but could not be decoded.
    #[error("failed to decode image: {0}")]
    ImageDecode(String),
}

impl FetchError {
    /// Returns `true` when repeating the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Connectivity(_) | Self::NoData => true,
            Self::Http(status) => *status >= 500 || *status == 408 || *status == 429,
            Self::InvalidUrl | Self::Decode(_) | Self::ImageDecode(_) => false,
        }
    }

    /// Returns `true` when the failure points at a schema mismatch between
    /// this client and the API.
    #[must_use]
    pub const fn is_logic_bug(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Crate-level error for configuration and session plumbing.
#[derive(Debug, Error)]
pub enum DigidexError {
    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A remote operation failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The catalog session is no longer running.
    ///
    /// Returned by handle operations after the event loop has shut down.
    #[error("Session error: {0}")]
    Session(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for crate operations.
pub type Result<T> = std::result::Result<T, DigidexError>;
