//! Detail view loader.
//!
//! One detail record is loaded per open detail view. Closing the view, or
//! opening another entity, bumps the generation so a fetch that completes
//! afterwards is dropped instead of updating a view that no longer exists.

use crate::domain::{DetailSummary, EntityDetail, FetchError};
use std::sync::Arc;

/// Identifies one detail fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DetailTicket {
    pub id: i64,
    pub generation: u64,
}

/// State of the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailState {
    /// No detail view is open.
    #[default]
    Closed,

    /// The record for `ticket.id` is being fetched.
    Loading { ticket: DetailTicket },

    /// The record is available.
    Loaded(Arc<EntityDetail>),

    /// The fetch failed; the UI shows a dismissible error and closes.
    Failed { id: i64, error: FetchError },
}

/// Result of applying a detail completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Loaded,
    Failed(FetchError),
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct DetailLoader {
    state: DetailState,
    generation: u64,
}

impl DetailLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &DetailState {
        &self.state
    }

    /// Opens the detail view for `id`, superseding any previous one.
    pub fn open(&mut self, id: i64) -> DetailTicket {
        self.generation += 1;
        let ticket = DetailTicket {
            id,
            generation: self.generation,
        };
        tracing::debug!(id = id, generation = self.generation, "detail view opened");
        self.state = DetailState::Loading { ticket };
        ticket
    }

    /// Closes the detail view; an in-flight fetch will be dropped.
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = DetailState::Closed;
    }

    pub fn complete(&mut self, ticket: DetailTicket, result: Result<EntityDetail, FetchError>) -> DetailOutcome {
        let current = matches!(self.state, DetailState::Loading { ticket: t } if t == ticket);
        if !current || ticket.generation != self.generation {
            tracing::debug!(id = ticket.id, "stale detail completion, dropping");
            return DetailOutcome::Stale;
        }

        match result {
            Ok(detail) => {
                tracing::debug!(id = ticket.id, name = %detail.name, "detail loaded");
                self.state = DetailState::Loaded(Arc::new(detail));
                DetailOutcome::Loaded
            }
            Err(error) => {
                tracing::debug!(id = ticket.id, error = %error, "detail fetch failed");
                self.state = DetailState::Failed {
                    id: ticket.id,
                    error: error.clone(),
                };
                DetailOutcome::Failed(error)
            }
        }
    }

    /// Presentation fields of the loaded record, if any.
    #[must_use]
    pub fn summary(&self) -> Option<DetailSummary> {
        match &self.state {
            DetailState::Loaded(detail) => Some(DetailSummary::from(detail.as_ref())),
            _ => None,
        }
    }
}
