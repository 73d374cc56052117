//! Incremental list loading state machine.
//!
//! ```text
//!             begin_load                 complete(Ok, more pages)
//!   Idle(n) ─────────────▶ Loading(n) ─────────────────────────▶ Idle(n+1)
//!     ▲                      │   │      complete(Ok, last page)
//!     │  complete(stale)     │   └─────────────────────────────▶ Exhausted
//!     └──────────────────────┤
//!                            │ complete(Err)
//!   Failed(n) ◀──────────────┘
//!     │ retry / begin_load
//!     └──────────────────────▶ Loading(n)
//! ```
//!
//! At most one page fetch is in flight: [`PaginationController::begin_load`]
//! returns `None` while loading or exhausted. The cursor only advances when a
//! page is applied, so a failure or a discarded stale result leaves the next
//! attempt at the same page.
//!
//! Entering search invalidates the fetch in flight. If browsing resumes before
//! it lands, [`PaginationController::resume`] adopts it again; if it was
//! already discarded, `resume` reports that its page is owed.

use crate::domain::{EntityStore, FetchError, Page};

/// Identifies one page fetch.
///
/// A completion is applied only if its ticket is the in-flight one and its
/// generation is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageTicket {
    pub page: u32,
    pub generation: u64,
}

/// Pagination state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationState {
    /// Ready to fetch `next_page`.
    Idle { next_page: u32 },

    /// A fetch for `ticket.page` is in flight.
    Loading { ticket: PageTicket },

    /// The last fetch of `next_page` failed; the UI may offer a retry.
    Failed { next_page: u32, error: FetchError },

    /// The server reported no further pages.
    Exhausted { pages_loaded: u32 },
}

/// Result of applying a page completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Items were appended and the cursor advanced.
    Appended {
        page: u32,
        added: usize,
        exhausted: bool,
    },

    /// The fetch failed; the cursor is unchanged.
    Failed(FetchError),

    /// The fetch was invalidated while in flight; its result was dropped and
    /// the cursor is unchanged.
    Discarded,

    /// The ticket did not match the in-flight fetch; nothing changed.
    Ignored,
}

/// Owns the page cursor and the in-flight/exhausted state.
#[derive(Debug, Clone)]
pub struct PaginationController {
    state: PaginationState,
    generation: u64,
    refetch_owed: bool,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationController {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PaginationState::Idle { next_page: 0 },
            generation: 0,
            refetch_owed: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Starts fetching the next page.
    ///
    /// Returns `None` (and changes nothing) while a fetch is in flight or the
    /// list is exhausted.
    pub fn begin_load(&mut self) -> Option<PageTicket> {
        let page = match &self.state {
            PaginationState::Idle { next_page } | PaginationState::Failed { next_page, .. } => *next_page,
            PaginationState::Loading { ticket } => {
                tracing::debug!(page = ticket.page, "page fetch already in flight, skipping");
                return None;
            }
            PaginationState::Exhausted { pages_loaded } => {
                tracing::debug!(pages_loaded = pages_loaded, "list exhausted, skipping");
                return None;
            }
        };

        let ticket = PageTicket {
            page,
            generation: self.generation,
        };
        self.state = PaginationState::Loading { ticket };
        self.refetch_owed = false;
        tracing::debug!(page = page, generation = self.generation, "page fetch started");
        Some(ticket)
    }

    /// Re-attempts the page that failed.
    ///
    /// Only valid from [`PaginationState::Failed`]; returns `None` otherwise.
    pub fn retry(&mut self) -> Option<PageTicket> {
        if !matches!(self.state, PaginationState::Failed { .. }) {
            tracing::debug!(state = ?self.state, "retry requested outside failed state");
            return None;
        }
        self.begin_load()
    }

    /// Invalidates any in-flight fetch.
    ///
    /// The fetch stays in flight (so no second one can start), but its result
    /// will be discarded when it arrives.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        if let PaginationState::Loading { ticket } = &self.state {
            tracing::debug!(page = ticket.page, "in-flight page fetch invalidated");
        }
    }

    /// Takes pagination back after a search ends.
    ///
    /// The cursor cannot move while searching, so a fetch still in flight is
    /// for the page the list needs and becomes current again. Returns `true`
    /// when a page was discarded during the search and should be fetched
    /// now.
    pub fn resume(&mut self) -> bool {
        if let PaginationState::Loading { ticket } = &self.state {
            if ticket.generation != self.generation {
                tracing::debug!(page = ticket.page, "in-flight page fetch current again");
                // Only one ticket is ever outstanding, so restoring its
                // generation cannot revive any other completion.
                self.generation = ticket.generation;
            }
            return false;
        }
        std::mem::take(&mut self.refetch_owed)
    }

    /// Applies the completion of the fetch identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: Result<Page, FetchError>,
        store: &mut EntityStore,
    ) -> PageOutcome {
        let PaginationState::Loading { ticket: in_flight } = &self.state else {
            tracing::debug!(page = ticket.page, "no page fetch in flight, ignoring completion");
            return PageOutcome::Ignored;
        };
        if *in_flight != ticket {
            tracing::debug!(page = ticket.page, in_flight = in_flight.page, "unexpected page ticket, ignoring");
            return PageOutcome::Ignored;
        }

        if ticket.generation != self.generation {
            tracing::debug!(page = ticket.page, "discarding stale page completion");
            self.state = PaginationState::Idle {
                next_page: ticket.page,
            };
            self.refetch_owed = true;
            return PageOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                let exhausted = page.is_last_after(ticket.page);
                let added = store.append(page.items);
                let pages_loaded = ticket.page + 1;

                self.state = if exhausted {
                    PaginationState::Exhausted { pages_loaded }
                } else {
                    PaginationState::Idle {
                        next_page: pages_loaded,
                    }
                };

                tracing::debug!(
                    page = ticket.page,
                    added = added,
                    total = store.len(),
                    exhausted = exhausted,
                    "page applied"
                );
                PageOutcome::Appended {
                    page: ticket.page,
                    added,
                    exhausted,
                }
            }
            Err(error) => {
                tracing::debug!(page = ticket.page, error = %error, "page fetch failed");
                self.state = PaginationState::Failed {
                    next_page: ticket.page,
                    error: error.clone(),
                };
                PageOutcome::Failed(error)
            }
        }
    }

    /// Page the next fetch will request.
    #[must_use]
    pub const fn next_page(&self) -> u32 {
        match &self.state {
            PaginationState::Idle { next_page } | PaginationState::Failed { next_page, .. } => *next_page,
            PaginationState::Loading { ticket } => ticket.page,
            PaginationState::Exhausted { pages_loaded } => *pages_loaded,
        }
    }

    /// Number of pages applied so far.
    #[must_use]
    pub const fn pages_loaded(&self) -> u32 {
        self.next_page()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, PaginationState::Loading { .. })
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.state, PaginationState::Exhausted { .. })
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&FetchError> {
        match &self.state {
            PaginationState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}
