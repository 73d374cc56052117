//! Background worker tasks for network operations.
//!
//! All transport calls run off the event loop so the loop never waits on the
//! network. Results come back as messages and are applied in arrival order by
//! the loop alone.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types carrying request tickets
//! - `handler`: Worker implementation dispatching to the transport

pub mod handler;
pub mod messages;

pub use handler::CatalogWorker;
pub use messages::{WorkerMessage, WorkerResponse};
