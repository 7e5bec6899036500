//! Submission Store
//!
//! Single source of truth for "what has the operator submitted and what came
//! back". Constructed once per session and passed to every view that renders
//! results.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use super::state::{Applied, StoreState, Transition};
use crate::logic::enrichment::{EnrichmentResult, LogSource};
use crate::logic::transport::{EnrichLogRequest, EnrichmentTransport};

/// Result of one `submit` call
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Blank input. Nothing was sent and nothing changed.
    Rejected,
    /// Result is now `current` and `history[0]`
    Completed(Arc<EnrichmentResult>),
    /// `last_error` now holds this message
    Failed(String),
    /// A newer submission owns the current slot. A successful result was
    /// still added to history.
    Superseded(Option<Arc<EnrichmentResult>>),
}

impl SubmitOutcome {
    pub fn result(&self) -> Option<&Arc<EnrichmentResult>> {
        match self {
            SubmitOutcome::Completed(result) => Some(result),
            SubmitOutcome::Superseded(result) => result.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }
}

pub struct SubmissionStore<T> {
    transport: T,
    state: RwLock<StoreState>,
    history_limit: Option<usize>,
    /// Bumped after every transition
    revision: watch::Sender<u64>,
}

impl<T: EnrichmentTransport> SubmissionStore<T> {
    pub fn new(transport: T) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            transport,
            state: RwLock::new(StoreState::new()),
            history_limit: None,
            revision,
        }
    }

    /// Keep at most `limit` history entries (oldest dropped first)
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit.filter(|l| *l > 0);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // Operations

    /// Submit one raw log for enrichment.
    ///
    /// Never returns an error: failures end up in `last_error` and in the
    /// returned outcome. No retry, no client-side timeout. Dropping the
    /// returned future cancels the submission and releases `is_submitting`.
    pub async fn submit(&self, raw_log: &str, source: Option<LogSource>) -> SubmitOutcome {
        if raw_log.trim().is_empty() {
            log::debug!("Ignoring blank submission");
            return SubmitOutcome::Rejected;
        }

        let source = source.unwrap_or_default();
        let in_flight = InFlight::begin(self);
        let request_id = in_flight.request;
        log::info!("Submitting log #{} (source={})", request_id, source);

        let request = EnrichLogRequest::manual(raw_log, source);
        let response = self.transport.enrich_log(&request).await;
        in_flight.settle();

        match response {
            Ok(result) => {
                let result = Arc::new(result);
                let transition = Transition::Succeeded {
                    request: request_id,
                    result: result.clone(),
                };
                match self.apply(transition) {
                    Applied::Stale => {
                        log::warn!(
                            "Response for superseded submission #{} ({}) kept in history only",
                            request_id,
                            result.correlation_id
                        );
                        SubmitOutcome::Superseded(Some(result))
                    }
                    Applied::Done => {
                        log::info!(
                            "Submission #{} completed: {}",
                            request_id,
                            result.correlation_id
                        );
                        SubmitOutcome::Completed(result)
                    }
                }
            }
            Err(err) => {
                let message = err.user_message();
                let transition = Transition::Failed {
                    request: request_id,
                    message: message.clone(),
                };
                match self.apply(transition) {
                    Applied::Stale => {
                        log::warn!(
                            "Failure of superseded submission #{} dropped: {}",
                            request_id,
                            message
                        );
                        SubmitOutcome::Superseded(None)
                    }
                    Applied::Done => {
                        log::warn!("Submission #{} failed: {}", request_id, message);
                        SubmitOutcome::Failed(message)
                    }
                }
            }
        }
    }

    /// Drop the current result. History and last error are untouched.
    pub fn clear_current(&self) {
        self.apply(Transition::ClearCurrent);
    }

    /// Prepend a result obtained some other way. Does not deduplicate by
    /// correlation id.
    pub fn add_to_history(&self, result: EnrichmentResult) -> Arc<EnrichmentResult> {
        let result = Arc::new(result);
        self.apply(Transition::AddToHistory(result.clone()));
        result
    }
}

impl<T> SubmissionStore<T> {
    // Read path

    /// Consistent copy of the whole state
    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }

    pub fn current(&self) -> Option<Arc<EnrichmentResult>> {
        self.state.read().current.clone()
    }

    pub fn history(&self) -> Vec<Arc<EnrichmentResult>> {
        self.state.read().history.clone()
    }

    pub fn history_len(&self) -> usize {
        self.state.read().history.len()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.read().is_submitting
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read().last_error.clone()
    }

    /// Receiver that changes after every state transition
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn apply(&self, transition: Transition) -> Applied {
        let applied = {
            let mut state = self.state.write();
            state.apply(transition, self.history_limit)
        };
        self.notify();
        applied
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

// ============================================================================
// IN-FLIGHT GUARD
// ============================================================================

/// Owns the in-flight slot for one submission. Dropped unsettled (the
/// `submit` future was cancelled), it releases the slot if no newer
/// submission took it.
struct InFlight<'a, T> {
    store: &'a SubmissionStore<T>,
    request: u64,
    settled: bool,
}

impl<'a, T> InFlight<'a, T> {
    fn begin(store: &'a SubmissionStore<T>) -> Self {
        let request = store.state.write().begin();
        store.notify();
        Self { store, request, settled: false }
    }

    /// Transport resolved; the response transition takes over
    fn settle(mut self) {
        self.settled = true;
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if self.store.apply(Transition::Abandoned { request: self.request }) == Applied::Done {
            log::warn!("Submission #{} cancelled before a response arrived", self.request);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
