//! Worker implementation executing transport calls.
//!
//! A [`CatalogWorker`] is a thin, cloneable wrapper around the injected
//! [`CatalogApi`]. The event loop spawns one task per message; the task runs
//! [`CatalogWorker::handle_message`] and posts the response back to the loop.
//! The worker holds no state of its own and never touches catalog state.

use crate::domain::FetchError;
use crate::transport::CatalogApi;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogWorker {
    api: Arc<dyn CatalogApi>,
}

impl std::fmt::Debug for CatalogWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogWorker").finish_non_exhaustive()
    }
}

impl CatalogWorker {
    #[must_use]
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    /// Logs the outcome of a transport call with consistent fields.
    fn log_result<T>(operation: &str, result: &Result<T, FetchError>) {
        match result {
            Ok(_) => tracing::debug!(operation = operation, "worker operation successful"),
            Err(e) if e.is_logic_bug() => {
                tracing::warn!(operation = operation, error = %e, "response did not match expected schema");
            }
            Err(e) => {
                tracing::debug!(
                    operation = operation,
                    error = %e,
                    retryable = e.is_retryable(),
                    "worker operation failed"
                );
            }
        }
    }

    /// Executes `message` against the transport.
    ///
    /// Always produces a response: failures travel inside it as a
    /// [`FetchError`].
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let operation = message.operation();

        match message {
            WorkerMessage::FetchPage { ticket, page_size } => {
                let result = self.api.fetch_list(ticket.page, page_size).await;
                Self::log_result(operation, &result);
                WorkerResponse::PageLoaded { ticket, result }
            }

            WorkerMessage::SearchRemote { ticket, query } => {
                let result = self.api.search(&query).await;
                Self::log_result(operation, &result);
                WorkerResponse::SearchCompleted { ticket, result }
            }

            WorkerMessage::FetchDetail { ticket } => {
                let result = self.api.fetch_detail(ticket.id).await;
                Self::log_result(operation, &result);
                WorkerResponse::DetailLoaded { ticket, result }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pagination::PageTicket;
    use crate::app::search::SearchTicket;
    use crate::domain::{EntityDetail, EntitySummary, Page};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CatalogApi for RecordingApi {
        async fn fetch_list(&self, page: u32, page_size: u32) -> Result<Page, FetchError> {
            self.calls.lock().unwrap().push(format!("list {page} {page_size}"));
            Ok(Page {
                items: vec![EntitySummary::new(1, "Agumon", "", "")],
                page_index: page,
                total_pages: 3,
                total_items: 3,
            })
        }

        async fn fetch_detail(&self, id: i64) -> Result<EntityDetail, FetchError> {
            self.calls.lock().unwrap().push(format!("detail {id}"));
            Err(FetchError::Http(404))
        }

        async fn search(&self, query: &str) -> Result<Page, FetchError> {
            self.calls.lock().unwrap().push(format!("search {query}"));
            Err(FetchError::Timeout)
        }
    }

    #[tokio::test]
    async fn page_message_calls_fetch_list_with_ticket_page() {
        let api = Arc::new(RecordingApi::default());
        let worker = CatalogWorker::new(api.clone());
        let ticket = PageTicket {
            page: 2,
            generation: 0,
        };

        let response = worker.handle_message(WorkerMessage::fetch_page(ticket, 20)).await;

        let WorkerResponse::PageLoaded { ticket: echoed, result } = response else {
            panic!("expected page response");
        };
        assert_eq!(echoed, ticket);
        assert_eq!(result.unwrap().page_index, 2);
        assert_eq!(*api.calls.lock().unwrap(), ["list 2 20"]);
    }

    #[tokio::test]
    async fn failures_travel_in_the_response() {
        let api = Arc::new(RecordingApi::default());
        let worker = CatalogWorker::new(api.clone());
        let ticket = SearchTicket { generation: 4 };

        let response = worker
            .handle_message(WorkerMessage::search_remote(ticket, "omega"))
            .await;

        assert_eq!(
            response,
            WorkerResponse::SearchCompleted {
                ticket,
                result: Err(FetchError::Timeout)
            }
        );
        assert_eq!(*api.calls.lock().unwrap(), ["search omega"]);
    }
}
