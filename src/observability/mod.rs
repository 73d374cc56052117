//! Structured logging via `tracing`.
//!
//! The library only emits spans and events; installing a subscriber is left
//! to the embedding application. [`init_tracing`] is a convenience for
//! binaries and tests that want human-readable output on stderr.
//!
//! # Configuration
//!
//! The filter is resolved in this order:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! # Usage
//!
//! ```rust
//! use digidex::observability::init_tracing;
//! use digidex::Config;
//!
//! let config = Config::default();
//! init_tracing(&config);
//!
//! tracing::debug!("catalog initialized");
//! ```

mod init;

pub use init::init_tracing;
