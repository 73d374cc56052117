//! Worker request and response types.
//!
//! The event loop never calls the transport itself. It posts a
//! [`WorkerMessage`] carrying the ticket of the request, and the worker
//! answers with a [`WorkerResponse`] carrying the same ticket, so the loop can
//! tell a current completion from a stale one.

use crate::app::detail::DetailTicket;
use crate::app::pagination::PageTicket;
use crate::app::search::SearchTicket;
use crate::domain::{EntityDetail, FetchError, Page};

/// Requests sent from the event loop to a worker task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Fetch one page of the entity list.
    FetchPage {
        /// Ticket of the in-flight page fetch; carries the page index.
        ticket: PageTicket,

        /// Number of entities per page.
        page_size: u32,
    },

    /// Search entities by name on the server.
    SearchRemote {
        /// Ticket of the pending remote search.
        ticket: SearchTicket,

        /// Query as typed, not yet percent-encoded.
        query: String,
    },

    /// Fetch the full record for the open detail view.
    FetchDetail {
        /// Ticket of the detail fetch; carries the entity id.
        ticket: DetailTicket,
    },
}

impl WorkerMessage {
    #[must_use]
    pub const fn fetch_page(ticket: PageTicket, page_size: u32) -> Self {
        Self::FetchPage { ticket, page_size }
    }

    pub fn search_remote(ticket: SearchTicket, query: impl Into<String>) -> Self {
        Self::SearchRemote {
            ticket,
            query: query.into(),
        }
    }

    #[must_use]
    pub const fn fetch_detail(ticket: DetailTicket) -> Self {
        Self::FetchDetail { ticket }
    }

    /// Short name of the operation, for span and log fields.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::FetchPage { .. } => "fetch page",
            Self::SearchRemote { .. } => "search remote",
            Self::FetchDetail { .. } => "fetch detail",
        }
    }
}

/// Completions sent from a worker task back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerResponse {
    /// A page fetch finished.
    PageLoaded {
        ticket: PageTicket,
        result: Result<Page, FetchError>,
    },

    /// A remote search finished.
    SearchCompleted {
        ticket: SearchTicket,
        result: Result<Page, FetchError>,
    },

    /// A detail fetch finished.
    DetailLoaded {
        ticket: DetailTicket,
        result: Result<EntityDetail, FetchError>,
    },
}
