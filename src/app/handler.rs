//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes UI requests and
//! worker completions, translating them into state changes and actions.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from UI collaborators or worker tasks
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via the controllers in `AppState`
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Pagination**: `LoadNextPage`, `NearListEnd`, `Retry`
//! - **Search**: `QueryChanged`, `CancelSearch`, `SearchDue`
//! - **Detail**: `OpenDetail`, `CloseDetail`
//! - **Worker**: `WorkerResponse` with typed completion variants
//!
//! Pagination events are honored only in browse mode, so search and
//! pagination never drive network state for the same surface at once.
//!
//! # Example
//!
//! ```rust
//! use digidex::{handle_event, AppState, Config, Event};
//!
//! let mut state = AppState::new(&Config::default());
//! let (changed, actions) = handle_event(&mut state, &Event::LoadNextPage);
//! assert!(changed);
//! assert_eq!(actions.len(), 1);
//! ```

use super::detail::DetailOutcome;
use super::pagination::PageOutcome;
use super::search::{RemoteOutcome, SearchOutcome, SearchTicket};
use crate::app::{Action, AppState};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by UI collaborators, timers, or worker completions.
///
/// Events are processed one at a time by a single owner of [`AppState`],
/// which keeps state transitions deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Explicitly requests the next page (first load).
    LoadNextPage,

    /// The visible list scrolled close to its end.
    ///
    /// Same effect as `LoadNextPage`; kept separate so traces show what
    /// triggered a fetch.
    NearListEnd,

    /// Re-attempts the page fetch that failed.
    Retry,

    /// The search text changed; empty text returns to browse mode.
    QueryChanged(String),

    /// Leaves search mode.
    CancelSearch,

    /// A debounced remote search is due.
    SearchDue(SearchTicket),

    /// Opens the detail view for an entity id.
    OpenDetail(i64),

    /// Closes the detail view; an in-flight fetch will be dropped.
    CloseDetail,

    /// Wraps a completion from a worker task.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates state, and returns actions to execute.
///
/// The returned flag tells the caller whether the visible state changed and
/// a new snapshot should be published.
pub fn handle_event(state: &mut AppState, event: &Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::LoadNextPage | Event::NearListEnd => request_next_page(state, false),
        Event::Retry => request_next_page(state, true),

        Event::QueryChanged(query) => {
            let was_browsing = state.search.is_browsing();
            let outcome = state.search.set_query(query, &state.store);

            if was_browsing && !state.search.is_browsing() {
                state.pagination.invalidate();
            }

            match outcome {
                SearchOutcome::Unchanged => (false, vec![]),
                SearchOutcome::Cleared if !was_browsing => resume_browsing(state),
                SearchOutcome::Cleared | SearchOutcome::Local => (true, vec![]),
                SearchOutcome::Remote(ticket) => {
                    let action = if state.search_debounce.is_zero() {
                        Action::PostToWorker(WorkerMessage::search_remote(ticket, query.as_str()))
                    } else {
                        Action::ScheduleSearch {
                            ticket,
                            delay: state.search_debounce,
                        }
                    };
                    (true, vec![action])
                }
            }
        }

        Event::CancelSearch => {
            if state.search.is_browsing() {
                return (false, vec![]);
            }
            state.search.cancel();
            resume_browsing(state)
        }

        Event::SearchDue(ticket) => {
            if !state.search.is_pending(*ticket) {
                tracing::debug!("debounced search superseded, not sending");
                return (false, vec![]);
            }
            let Some(query) = state.search.query() else {
                return (false, vec![]);
            };
            (
                false,
                vec![Action::PostToWorker(WorkerMessage::search_remote(*ticket, query))],
            )
        }

        Event::OpenDetail(id) => {
            let ticket = state.detail.open(*id);
            (true, vec![Action::PostToWorker(WorkerMessage::fetch_detail(ticket))])
        }

        Event::CloseDetail => {
            state.detail.close();
            (true, vec![])
        }

        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

/// Hands pagination back after a search, fetching a page discarded during it.
fn resume_browsing(state: &mut AppState) -> (bool, Vec<Action>) {
    if state.pagination.resume() {
        tracing::debug!(page = state.pagination.next_page(), "refetching page discarded during search");
        let (_, actions) = request_next_page(state, false);
        return (true, actions);
    }
    (true, vec![])
}

fn request_next_page(state: &mut AppState, retry: bool) -> (bool, Vec<Action>) {
    if !state.mode().allows_pagination() {
        tracing::debug!("pagination suppressed while searching");
        return (false, vec![]);
    }

    let ticket = if retry {
        state.pagination.retry()
    } else {
        state.pagination.begin_load()
    };

    ticket.map_or_else(
        || (false, vec![]),
        |ticket| {
            (
                true,
                vec![Action::PostToWorker(WorkerMessage::fetch_page(
                    ticket,
                    state.page_size,
                ))],
            )
        },
    )
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::PageLoaded { ticket, result } => {
            let outcome = state
                .pagination
                .complete(*ticket, result.clone(), &mut state.store);
            (outcome != PageOutcome::Ignored, vec![])
        }

        WorkerResponse::SearchCompleted { ticket, result } => {
            let outcome = state.search.complete(*ticket, result.clone());
            (outcome != RemoteOutcome::Stale, vec![])
        }

        WorkerResponse::DetailLoaded { ticket, result } => {
            let outcome = state.detail.complete(*ticket, result.clone());
            (outcome != DetailOutcome::Stale, vec![])
        }
    }
}
