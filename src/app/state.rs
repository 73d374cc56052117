//! Application state and snapshot computation.
//!
//! [`AppState`] is the single source of truth for the catalog surface: the
//! entity store plus one controller per concern. It is owned by exactly one
//! event loop and mutated only through
//! [`handle_event`](super::handle_event), so completions from different
//! requests can never interleave their writes.
//!
//! # State Components
//!
//! - **Store**: entities loaded by pagination, unique by id
//! - **Pagination**: page cursor and in-flight/exhausted state
//! - **Search**: browse/search mode and the current query's matches
//! - **Detail**: the open detail view, if any
//!
//! # Example
//!
//! ```rust
//! use digidex::{AppState, Config};
//!
//! let state = AppState::new(&Config::default());
//! let snapshot = state.compute_snapshot();
//! assert!(snapshot.rows.is_empty());
//! ```

use super::detail::DetailLoader;
use super::modes::ViewMode;
use super::pagination::PaginationController;
use super::projection::{CatalogSnapshot, ProjectionRow};
use super::search::SearchController;
use crate::domain::{EntityStore, EntitySummary};
use crate::Config;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::time::Duration;

/// Central catalog state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Entities loaded by pagination, in fetch order.
    pub store: EntityStore,

    /// Incremental list loading.
    pub pagination: PaginationController,

    /// Browse/search mode and matches.
    pub search: SearchController,

    /// Open detail view.
    pub detail: DetailLoader,

    /// Entities requested per page.
    pub page_size: u32,

    /// Delay before a remote search is sent; zero sends immediately.
    pub search_debounce: Duration,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            store: EntityStore::new(),
            pagination: PaginationController::new(),
            search: SearchController::new(config.min_remote_query_len),
            detail: DetailLoader::new(),
            page_size: config.page_size,
            search_debounce: config.search_debounce,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ViewMode {
        self.search.mode()
    }

    /// Entities of the active projection.
    ///
    /// The full store while browsing, the current matches while searching.
    #[must_use]
    pub fn projection(&self) -> &[EntitySummary] {
        self.search
            .session()
            .map_or_else(|| self.store.as_slice(), |session| session.matches.as_slice())
    }

    /// Computes the snapshot published to the UI.
    #[must_use]
    pub fn compute_snapshot(&self) -> CatalogSnapshot {
        let _span = tracing::trace_span!("compute_snapshot",
            mode = ?self.mode(),
            loaded = self.store.len()
        )
        .entered();

        let query = self.search.query().filter(|q| !q.is_empty());
        let matcher = query.map(|_| SkimMatcherV2::default().ignore_case());

        let rows = self
            .projection()
            .iter()
            .map(|entity| ProjectionRow {
                entity: entity.clone(),
                number: entity.display_number(),
                highlight_ranges: match (&matcher, query) {
                    (Some(m), Some(q)) => compute_highlight_ranges(&entity.name, q, m),
                    _ => vec![],
                },
            })
            .collect();

        let session = self.search.session();

        CatalogSnapshot {
            mode: self.mode(),
            query: query.map(String::from),
            rows,
            loaded: self.store.len(),
            pagination: self.pagination.state().clone(),
            match_source: session.map(|s| s.source),
            remote_search_pending: session.is_some_and(|s| s.pending.is_some()),
            detail: self.detail.state().clone(),
            detail_summary: self.detail.summary(),
        }
    }
}

/// Computes character ranges of `text` matched by `query`.
///
/// Matched character indices of the original `text` are coalesced into
/// contiguous `(start, end)` runs, end exclusive. Case folding is left to the
/// matcher so indices stay aligned with `text`.
fn compute_highlight_ranges(text: &str, query: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    use fuzzy_matcher::FuzzyMatcher;

    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntitySummary;

    fn state_with(names: &[&str]) -> AppState {
        let mut state = AppState::new(&Config::default());
        state.store.append(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| EntitySummary::new(i as i64 + 1, *name, "", "")),
        );
        state
    }

    #[test]
    fn browse_projection_is_full_store() {
        let state = state_with(&["Agumon", "Gabumon"]);
        let snapshot = state.compute_snapshot();

        assert_eq!(snapshot.mode, ViewMode::Browse);
        assert_eq!(snapshot.row_ids(), [1, 2]);
        assert_eq!(snapshot.rows[0].number, "#001");
        assert!(snapshot.rows[0].highlight_ranges.is_empty());
    }

    #[test]
    fn search_projection_is_matches_with_highlights() {
        let mut state = state_with(&["Agumon", "Gabumon"]);
        let store = state.store.clone();
        state.search.set_query("gum", &store);

        let snapshot = state.compute_snapshot();
        assert_eq!(snapshot.mode, ViewMode::Search);
        assert_eq!(snapshot.query.as_deref(), Some("gum"));
        assert_eq!(snapshot.row_ids(), [1]);
        assert_eq!(snapshot.rows[0].highlight_ranges, [(1, 4)]);
        assert_eq!(snapshot.loaded, 2);
    }

    #[test]
    fn highlight_ranges_coalesce_runs() {
        let matcher = SkimMatcherV2::default().ignore_case();
        assert_eq!(compute_highlight_ranges("Agumon", "agu", &matcher), [(0, 3)]);
        assert_eq!(compute_highlight_ranges("Agumon", "GUM", &matcher), [(1, 4)]);
        assert!(compute_highlight_ranges("Agumon", "xyz", &matcher).is_empty());
    }

    #[test]
    fn highlight_ranges_index_original_characters() {
        let matcher = SkimMatcherV2::default().ignore_case();
        assert_eq!(compute_highlight_ranges("İzumon", "zu", &matcher), [(1, 3)]);
        assert_eq!(compute_highlight_ranges("Ökomon", "KOM", &matcher), [(1, 4)]);
    }
}
