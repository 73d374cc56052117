//! View mode of the catalog surface.
//!
//! The catalog shows exactly one projection at a time:
//! - **Browse**: the full entity store, extended page by page
//! - **Search**: matches for the current query, local or remote
//!
//! The mode is derived from the search controller's state rather than kept as
//! a separate flag, so it can never disagree with it.
//!
//! # Example
//!
//! ```rust
//! use digidex::app::ViewMode;
//!
//! let mode = ViewMode::Browse;
//! assert!(mode.allows_pagination());
//! assert!(!ViewMode::Search.allows_pagination());
//! ```

/// Which projection the UI is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMode {
    /// The full entity store in fetch order.
    ///
    /// Scroll-driven pagination is active.
    Browse,

    /// Matches for a non-empty query.
    ///
    /// Pagination triggers are suppressed until the query is cleared.
    Search,
}

impl ViewMode {
    /// Returns `true` when list pagination may be triggered in this mode.
    #[must_use]
    pub const fn allows_pagination(self) -> bool {
        matches!(self, Self::Browse)
    }
}

/// Where the rows of an active search came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchSource {
    /// Substring filter over already-loaded entities.
    Local,

    /// Server-side name search; display-only, never merged into the store.
    Remote,
}
