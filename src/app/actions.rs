//! Actions representing side effects to be executed by the event loop.
//!
//! The event handler is pure: it mutates [`AppState`](super::AppState) and
//! returns the effects the change requires. The session executes them by
//! spawning worker tasks or timers whose results come back as events.
//!
//! # Example
//!
//! ```rust
//! use digidex::app::Action;
//! use digidex::app::pagination::PageTicket;
//! use digidex::worker::WorkerMessage;
//!
//! let ticket = PageTicket { page: 0, generation: 0 };
//! let actions = vec![Action::PostToWorker(WorkerMessage::fetch_page(ticket, 20))];
//! ```

use super::search::SearchTicket;
use crate::worker::WorkerMessage;
use std::time::Duration;

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Runs a network operation on a worker task.
    ///
    /// The worker's response is delivered back as
    /// [`Event::WorkerResponse`](super::Event::WorkerResponse).
    PostToWorker(WorkerMessage),

    /// Delivers [`Event::SearchDue`](super::Event::SearchDue) after `delay`.
    ///
    /// Used to debounce remote searches while the user is still typing.
    ScheduleSearch {
        /// Ticket the remote search was issued under.
        ticket: SearchTicket,
        /// How long to wait before firing.
        delay: Duration,
    },
}
