//! Application layer coordinating state, events, and actions.
//!
//! This module holds the catalog's orchestration logic, sitting between the
//! session event loop and the domain/worker layers. Everything here is
//! synchronous and free of I/O: network calls are requested as actions and
//! their results come back as events.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! UI Request → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`pagination`]: Page cursor with single in-flight fetch and exhaustion
//! - [`search`]: Local filter with remote fallback and stale-result discard
//! - [`detail`]: Detail view loading for a single entity
//! - [`modes`]: Browse/search view mode types
//! - [`projection`]: Snapshot handed to the UI
//! - [`state`]: Central application state container and snapshot computation
//!
//! # Example
//!
//! ```rust
//! use digidex::app::{handle_event, AppState, Event};
//! use digidex::Config;
//!
//! let mut state = AppState::new(&Config::default());
//! let (changed, actions) = handle_event(&mut state, &Event::QueryChanged("agu".into()));
//! assert!(changed);
//! assert_eq!(actions.len(), 1);
//! ```

pub mod actions;
pub mod detail;
pub mod handler;
pub mod modes;
pub mod pagination;
pub mod projection;
pub mod search;
pub mod state;

pub use actions::Action;
pub use detail::{DetailLoader, DetailState, DetailTicket};
pub use handler::{handle_event, Event};
pub use modes::{MatchSource, ViewMode};
pub use pagination::{PageTicket, PaginationController, PaginationState};
pub use projection::{CatalogSnapshot, ProjectionRow};
pub use search::{SearchController, SearchTicket};
pub use state::AppState;
