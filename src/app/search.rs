//! Search state machine with local-first, remote-fallback matching.
//!
//! Each query change recomputes a case-insensitive substring filter over the
//! entity store. Only when that filter is empty and the query is long enough
//! does the controller ask for a remote search; the remote result replaces
//! the projection for that query alone and is never merged into the store.
//!
//! Every query change issues a fresh generation, so a remote completion for
//! an older query (or after cancel) is recognized as stale and dropped.

use super::modes::{MatchSource, ViewMode};
use crate::domain::{EntityStore, EntitySummary, FetchError, Page};

/// Default minimum query length, in characters, for a remote search.
pub const DEFAULT_MIN_REMOTE_QUERY_LEN: usize = 2;

/// Identifies one remote search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchTicket {
    pub generation: u64,
}

/// An active search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    pub query: String,
    pub matches: Vec<EntitySummary>,
    pub source: MatchSource,
    pub pending: Option<SearchTicket>,
}

/// Search state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchState {
    /// No query; the projection is the full store.
    #[default]
    Browsing,

    /// A non-empty query is active.
    Searching(SearchSession),
}

/// What a query change requires from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was empty; back to browsing.
    Cleared,

    /// Same query as before; nothing to do.
    Unchanged,

    /// Local matches are the projection; no request needed.
    Local,

    /// No local match for a long enough query; issue a remote search.
    Remote(SearchTicket),
}

/// Result of applying a remote search completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// Remote results replaced the projection.
    Applied { count: usize },

    /// The request failed; the (empty) local result stays.
    Failed(FetchError),

    /// The ticket no longer matches the pending request; dropped.
    Stale,
}

/// Owns the search mode and the current query's matches.
#[derive(Debug, Clone)]
pub struct SearchController {
    state: SearchState,
    generation: u64,
    min_remote_len: usize,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_REMOTE_QUERY_LEN)
    }
}

impl SearchController {
    #[must_use]
    pub const fn new(min_remote_len: usize) -> Self {
        Self {
            state: SearchState::Browsing,
            generation: 0,
            min_remote_len,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SearchState {
        &self.state
    }

    #[must_use]
    pub const fn mode(&self) -> ViewMode {
        match self.state {
            SearchState::Browsing => ViewMode::Browse,
            SearchState::Searching(_) => ViewMode::Search,
        }
    }

    #[must_use]
    pub const fn is_browsing(&self) -> bool {
        matches!(self.state, SearchState::Browsing)
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        match &self.state {
            SearchState::Browsing => None,
            SearchState::Searching(session) => Some(&session.query),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&SearchSession> {
        match &self.state {
            SearchState::Browsing => None,
            SearchState::Searching(session) => Some(session),
        }
    }

    /// Returns `true` if `ticket` is the remote request still awaited.
    #[must_use]
    pub fn is_pending(&self, ticket: SearchTicket) -> bool {
        self.session()
            .is_some_and(|session| session.pending == Some(ticket))
    }

    /// Applies a new query against `store`.
    pub fn set_query(&mut self, query: &str, store: &EntityStore) -> SearchOutcome {
        if query.is_empty() {
            if !self.is_browsing() {
                tracing::debug!("query cleared, returning to browse mode");
            }
            self.cancel();
            return SearchOutcome::Cleared;
        }

        if self.query() == Some(query) {
            return SearchOutcome::Unchanged;
        }

        self.generation += 1;
        let matches = store.filter_by_name(query);
        let wants_remote = matches.is_empty() && query.chars().count() >= self.min_remote_len;
        let pending = wants_remote.then_some(SearchTicket {
            generation: self.generation,
        });

        tracing::debug!(
            query = %query,
            local_matches = matches.len(),
            remote = wants_remote,
            "query applied"
        );

        self.state = SearchState::Searching(SearchSession {
            query: query.to_string(),
            matches,
            source: MatchSource::Local,
            pending,
        });

        pending.map_or(SearchOutcome::Local, SearchOutcome::Remote)
    }

    /// Leaves search mode and drops any pending remote request.
    pub fn cancel(&mut self) {
        if !self.is_browsing() {
            self.generation += 1;
        }
        self.state = SearchState::Browsing;
    }

    /// Applies a remote search completion.
    pub fn complete(&mut self, ticket: SearchTicket, result: Result<Page, FetchError>) -> RemoteOutcome {
        let SearchState::Searching(session) = &mut self.state else {
            tracing::debug!("remote search completed after leaving search mode, dropping");
            return RemoteOutcome::Stale;
        };
        if session.pending != Some(ticket) {
            tracing::debug!(query = %session.query, "stale remote search completion, dropping");
            return RemoteOutcome::Stale;
        }

        session.pending = None;
        match result {
            Ok(page) => {
                let count = page.items.len();
                tracing::debug!(query = %session.query, count = count, "remote search applied");
                session.matches = page.items;
                session.source = MatchSource::Remote;
                RemoteOutcome::Applied { count }
            }
            Err(error) => {
                tracing::debug!(query = %session.query, error = %error, "remote search failed, keeping local result");
                RemoteOutcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> EntityStore {
        let mut store = EntityStore::new();
        store.append(vec![
            EntitySummary::new(1, "Agumon", "", ""),
            EntitySummary::new(2, "Gabumon", "", ""),
        ]);
        store
    }

    fn remote_page(names: &[(i64, &str)]) -> Page {
        Page {
            items: names
                .iter()
                .map(|(id, name)| EntitySummary::new(*id, *name, "", ""))
                .collect(),
            page_index: 0,
            total_pages: 1,
            total_items: names.len() as u64,
        }
    }

    #[test]
    fn local_match_needs_no_request() {
        let mut search = SearchController::default();
        assert_eq!(search.set_query("agu", &store()), SearchOutcome::Local);

        let session = search.session().unwrap();
        assert_eq!(session.matches.len(), 1);
        assert_eq!(session.matches[0].id, 1);
        assert!(session.pending.is_none());
        assert_eq!(search.mode(), ViewMode::Search);
    }

    #[test]
    fn no_local_match_triggers_remote() {
        let mut search = SearchController::default();
        let outcome = search.set_query("xyz", &store());

        let SearchOutcome::Remote(ticket) = outcome else {
            panic!("expected remote search, got {outcome:?}");
        };
        assert!(search.is_pending(ticket));
        assert!(search.session().unwrap().matches.is_empty());
    }

    #[test]
    fn short_query_stays_local() {
        let mut search = SearchController::default();
        assert_eq!(search.set_query("x", &store()), SearchOutcome::Local);
        assert!(search.session().unwrap().matches.is_empty());
    }

    #[test]
    fn threshold_counts_characters() {
        let mut search = SearchController::default();
        assert!(matches!(search.set_query("ñ", &store()), SearchOutcome::Local));
        assert!(matches!(search.set_query("ññ", &store()), SearchOutcome::Remote(_)));
    }

    #[test]
    fn same_query_is_unchanged() {
        let mut search = SearchController::default();
        search.set_query("xyz", &store());
        assert_eq!(search.set_query("xyz", &store()), SearchOutcome::Unchanged);
    }

    #[test]
    fn empty_query_returns_to_browsing() {
        let mut search = SearchController::default();
        search.set_query("agu", &store());
        assert_eq!(search.set_query("", &store()), SearchOutcome::Cleared);
        assert!(search.is_browsing());
    }

    #[test]
    fn remote_success_replaces_matches() {
        let mut search = SearchController::default();
        let SearchOutcome::Remote(ticket) = search.set_query("omega", &store()) else {
            panic!("expected remote search");
        };

        let outcome = search.complete(ticket, Ok(remote_page(&[(1300, "Omegamon")])));
        assert_eq!(outcome, RemoteOutcome::Applied { count: 1 });

        let session = search.session().unwrap();
        assert_eq!(session.source, MatchSource::Remote);
        assert_eq!(session.matches[0].name, "Omegamon");
        assert!(session.pending.is_none());
    }

    #[test]
    fn remote_failure_keeps_empty_local_result() {
        let mut search = SearchController::default();
        let SearchOutcome::Remote(ticket) = search.set_query("omega", &store()) else {
            panic!("expected remote search");
        };

        let outcome = search.complete(ticket, Err(FetchError::Http(404)));
        assert_eq!(outcome, RemoteOutcome::Failed(FetchError::Http(404)));

        let session = search.session().unwrap();
        assert_eq!(session.source, MatchSource::Local);
        assert!(session.matches.is_empty());
        assert!(session.pending.is_none());
    }

    #[test]
    fn completion_for_older_query_is_stale() {
        let mut search = SearchController::default();
        let SearchOutcome::Remote(old) = search.set_query("omeg", &store()) else {
            panic!("expected remote search");
        };
        search.set_query("omega", &store());

        assert_eq!(
            search.complete(old, Ok(remote_page(&[(1, "x")]))),
            RemoteOutcome::Stale
        );
        assert!(search.session().unwrap().matches.is_empty());
    }

    #[test]
    fn completion_after_cancel_is_stale() {
        let mut search = SearchController::default();
        let SearchOutcome::Remote(ticket) = search.set_query("omega", &store()) else {
            panic!("expected remote search");
        };
        search.cancel();

        assert_eq!(
            search.complete(ticket, Ok(remote_page(&[(1, "x")]))),
            RemoteOutcome::Stale
        );
        assert!(search.is_browsing());
    }
}
