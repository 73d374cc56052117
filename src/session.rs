//! Event loop owning the catalog state.
//!
//! A [`CatalogSession`] is the single owner of [`AppState`]. It receives
//! [`Event`]s on an unbounded channel, runs them through
//! [`handle_event`](crate::app::handle_event) one at a time, executes the
//! returned actions, and publishes a fresh [`CatalogSnapshot`] whenever the
//! visible state changed.
//!
//! ```text
//! CatalogHandle ──Event──▶ ┌──────────────┐ ──spawn──▶ worker task
//!                          │ session loop │                │
//!   watch::Receiver ◀──────│  (AppState)  │ ◀──Response────┘
//!                          └──────────────┘
//! ```
//!
//! Worker tasks and debounce timers post their results back on the same
//! channel, so completions are applied in arrival order and never race each
//! other. The session keeps only a weak sender to itself: when every
//! [`CatalogHandle`] is dropped and outstanding tasks finish, the loop ends.

use crate::app::{handle_event, Action, AppState, CatalogSnapshot, Event};
use crate::domain::{DigidexError, Result};
use crate::images::{CachedImage, ImageCache};
use crate::transport::{CatalogApi, HttpTransport, ImageSource};
use crate::worker::CatalogWorker;
use crate::Config;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;
use tracing::Instrument;

/// The event loop. Constructed and started by [`CatalogSession::spawn`].
pub struct CatalogSession {
    state: AppState,
    events: mpsc::UnboundedReceiver<Event>,
    loopback: mpsc::WeakUnboundedSender<Event>,
    snapshots: watch::Sender<CatalogSnapshot>,
    worker: CatalogWorker,
}

impl CatalogSession {
    /// Starts a session on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(config: &Config, api: Arc<dyn CatalogApi>, images: ImageCache) -> CatalogHandle {
        let state = AppState::new(config);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshots_tx, snapshots_rx) = watch::channel(state.compute_snapshot());

        let session = Self {
            state,
            events: events_rx,
            loopback: events_tx.downgrade(),
            snapshots: snapshots_tx,
            worker: CatalogWorker::new(api),
        };

        let task = tokio::spawn(session.run().instrument(tracing::info_span!("catalog_session")));

        CatalogHandle {
            events: events_tx,
            snapshots: snapshots_rx,
            images,
            task: Arc::new(task.abort_handle()),
        }
    }

    /// Builds the HTTP transport and image cache from `config` and starts a
    /// session backed by them.
    ///
    /// # Errors
    ///
    /// Returns [`DigidexError::Config`] if the HTTP client cannot be built.
    pub fn connect(config: &Config) -> Result<CatalogHandle> {
        let transport = Arc::new(HttpTransport::new(config)?);
        tracing::info!(base_url = %transport.base_url(), "connecting catalog session");

        let source: Arc<dyn ImageSource> = transport.clone();
        let images = ImageCache::from_config(source, config);
        Ok(Self::spawn(config, transport, images))
    }

    async fn run(mut self) {
        tracing::debug!("catalog session started");

        while let Some(event) = self.events.recv().await {
            let (changed, actions) = handle_event(&mut self.state, &event);

            for action in actions {
                self.execute(action);
            }

            if changed {
                self.snapshots.send_replace(self.state.compute_snapshot());
            }
        }

        tracing::debug!("all handles dropped, catalog session stopped");
    }

    fn execute(&self, action: Action) {
        let Some(loopback) = self.loopback.upgrade() else {
            tracing::debug!("no handles left, dropping action");
            return;
        };

        match action {
            Action::PostToWorker(message) => {
                let worker = self.worker.clone();
                let span = tracing::debug_span!("worker", operation = message.operation());
                tokio::spawn(
                    async move {
                        let response = worker.handle_message(message).await;
                        if loopback.send(Event::WorkerResponse(response)).is_err() {
                            tracing::debug!("session stopped before worker response");
                        }
                    }
                    .instrument(span),
                );
            }

            Action::ScheduleSearch { ticket, delay } => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if loopback.send(Event::SearchDue(ticket)).is_err() {
                        tracing::debug!("session stopped before debounced search was due");
                    }
                });
            }
        }
    }
}

/// Cloneable front door to a running [`CatalogSession`].
///
/// Every operation is a non-blocking send; its effect becomes visible through
/// the snapshot channel.
#[derive(Clone)]
pub struct CatalogHandle {
    events: mpsc::UnboundedSender<Event>,
    snapshots: watch::Receiver<CatalogSnapshot>,
    images: ImageCache,
    task: Arc<AbortHandle>,
}

impl std::fmt::Debug for CatalogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogHandle")
            .field("closed", &self.events.is_closed())
            .finish_non_exhaustive()
    }
}

fn session_stopped<E>(_: E) -> DigidexError {
    DigidexError::Session("catalog session has stopped".to_string())
}

impl CatalogHandle {
    fn send(&self, event: Event) -> Result<()> {
        self.events.send(event).map_err(session_stopped)
    }

    /// Requests the next page, e.g. for the first load.
    ///
    /// # Errors
    ///
    /// Every send fails with [`DigidexError::Session`] once the session has
    /// stopped.
    pub fn load_next_page(&self) -> Result<()> {
        self.send(Event::LoadNextPage)
    }

    /// Signals that the visible list is close to its end.
    pub fn near_list_end(&self) -> Result<()> {
        self.send(Event::NearListEnd)
    }

    /// Re-attempts a failed page fetch.
    pub fn retry(&self) -> Result<()> {
        self.send(Event::Retry)
    }

    /// Updates the search text. An empty string returns to browse mode.
    pub fn set_query(&self, query: impl Into<String>) -> Result<()> {
        self.send(Event::QueryChanged(query.into()))
    }

    pub fn cancel_search(&self) -> Result<()> {
        self.send(Event::CancelSearch)
    }

    pub fn open_detail(&self, id: i64) -> Result<()> {
        self.send(Event::OpenDetail(id))
    }

    pub fn close_detail(&self) -> Result<()> {
        self.send(Event::CloseDetail)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A fresh receiver for UI collaborators that render on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.snapshots.clone()
    }

    /// Waits for the next published snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DigidexError::Session`] if the session stops first.
    pub async fn changed(&mut self) -> Result<CatalogSnapshot> {
        self.snapshots.changed().await.map_err(session_stopped)?;
        Ok(self.snapshots.borrow_and_update().clone())
    }

    /// Waits until a snapshot satisfies `predicate`, checking the current
    /// one first.
    ///
    /// # Errors
    ///
    /// Returns [`DigidexError::Session`] if the session stops first.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&CatalogSnapshot) -> bool,
    ) -> Result<CatalogSnapshot> {
        self.snapshots
            .wait_for(predicate)
            .await
            .map(|snapshot| snapshot.clone())
            .map_err(session_stopped)
    }

    /// Shared image cache for row and detail artwork.
    #[must_use]
    pub const fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Loads the image at `url` through the shared cache.
    pub async fn image(&self, url: &str) -> Option<CachedImage> {
        self.images.get_image(url).await
    }

    /// Stops the event loop. Later sends fail; in-flight worker results are
    /// dropped.
    pub fn shutdown(&self) {
        tracing::debug!("catalog session shutdown requested");
        self.task.abort();
    }
}
