//! Image loading and caching.
//!
//! - [`cache`]: URL-keyed cache with in-flight request coalescing
//! - [`lru`]: byte-budgeted least-recently-used store backing the cache

pub mod cache;
pub mod lru;

pub use cache::{CachedImage, ImageCache};
pub use lru::LruStore;
