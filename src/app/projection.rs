//! Read-only projection handed to the UI.
//!
//! A [`CatalogSnapshot`] is computed from [`AppState`](super::AppState) after
//! every state change and published to UI collaborators. It is plain data:
//! the UI renders it and calls handle operations, never mutating it.

use super::detail::DetailState;
use super::modes::{MatchSource, ViewMode};
use super::pagination::PaginationState;
use crate::domain::{DetailSummary, EntitySummary};

/// One visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionRow {
    pub entity: EntitySummary,

    /// Catalog number, e.g. `#007`.
    pub number: String,

    /// Character ranges `(start, end)` of the name matching the current
    /// query, end exclusive. Empty in browse mode.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Everything the UI needs to render the catalog surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    /// Active projection mode.
    pub mode: ViewMode,

    /// Current query in search mode.
    pub query: Option<String>,

    /// Rows of the active projection, in display order.
    pub rows: Vec<ProjectionRow>,

    /// Number of entities in the store, regardless of mode.
    pub loaded: usize,

    /// Pagination state; `Failed` carries the error to offer a retry for.
    pub pagination: PaginationState,

    /// Origin of the rows in search mode.
    pub match_source: Option<MatchSource>,

    /// A remote search for the current query is outstanding.
    pub remote_search_pending: bool,

    /// Detail view state.
    pub detail: DetailState,

    /// Presentation fields of the loaded detail record.
    pub detail_summary: Option<DetailSummary>,
}

impl CatalogSnapshot {
    /// Returns `true` when the first page is loading and nothing is shown
    /// yet, the case where a full-screen indicator is appropriate.
    #[must_use]
    pub fn is_initial_load(&self) -> bool {
        self.loaded == 0 && matches!(self.pagination, PaginationState::Loading { .. })
    }

    /// Returns `true` when a retry affordance should be offered.
    #[must_use]
    pub const fn can_retry(&self) -> bool {
        matches!(self.pagination, PaginationState::Failed { .. })
    }

    /// Ids of the visible rows, in order.
    #[must_use]
    pub fn row_ids(&self) -> Vec<i64> {
        self.rows.iter().map(|row| row.entity.id).collect()
    }
}
