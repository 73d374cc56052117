//! Transport layer: HTTP requests, JSON decoding and error mapping.
//!
//! # Modules
//!
//! - [`api`]: `CatalogApi` and `ImageSource` traits the rest of the crate
//!   depends on
//! - [`http`]: `reqwest` implementation of both traits
//! - [`wire`]: JSON envelope types for list and search responses

pub mod api;
pub mod http;
pub mod wire;

pub use api::{CatalogApi, ImageSource};
pub use http::HttpTransport;
pub use wire::{ListEnvelope, Pageable};
