//! Domain layer for the catalog core.
//!
//! Plain data types and the rules attached to them, independent of HTTP,
//! tokio or any UI toolkit.
//!
//! # Organization
//!
//! - [`entity`]: Entity records, pages and detail presentation
//! - [`error`]: Fetch error taxonomy and crate error
//! - [`store`]: Ordered, id-unique entity store
//!
//! # Examples
//!
//! ```
//! use digidex::domain::{EntityStore, EntitySummary};
//!
//! let mut store = EntityStore::new();
//! store.append(vec![EntitySummary::new(1, "Agumon", "", "")]);
//! assert_eq!(store.filter_by_name("agu").len(), 1);
//! ```

pub mod entity;
pub mod error;
pub mod store;

pub use entity::{DetailSummary, EntityDetail, EntitySummary, Page};
pub use error::{DigidexError, FetchError, Result};
pub use store::EntityStore;
