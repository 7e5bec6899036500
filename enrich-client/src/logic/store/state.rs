//! Store State & Transitions
//!
//! Data + transition function only. No I/O, no locking: the manager owns the
//! lock and applies one transition per critical section.

use std::sync::Arc;

use crate::logic::enrichment::EnrichmentResult;

/// Observable store state. Cloning is cheap: results are shared.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    /// Most recent first
    pub history: Vec<Arc<EnrichmentResult>>,
    /// In-flight slot (cleared on submit) or the latest completed result
    pub current: Option<Arc<EnrichmentResult>>,
    pub is_submitting: bool,
    pub last_error: Option<String>,
    /// Last request number handed out
    issued: u64,
    /// Request allowed to write `current` / `last_error` / `is_submitting`
    active: Option<u64>,
}

/// One state change after a submission started (see `StoreState::begin`).
#[derive(Debug, Clone)]
pub enum Transition {
    Succeeded { request: u64, result: Arc<EnrichmentResult> },
    Failed { request: u64, message: String },
    /// Caller dropped the submission before the transport resolved
    Abandoned { request: u64 },
    ClearCurrent,
    AddToHistory(Arc<EnrichmentResult>),
}

/// What `apply` did with a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Transition took full effect
    Done,
    /// Response for a request that is no longer active
    Stale,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request currently owning the in-flight slot, if any
    pub fn active_request(&self) -> Option<u64> {
        self.active
    }

    /// Hand out the next request number and claim the in-flight slot.
    /// This is the only way a submission starts.
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.active = Some(self.issued);
        self.is_submitting = true;
        self.last_error = None;
        self.current = None;
        self.issued
    }

    /// Apply one transition.
    ///
    /// Responses only touch `current`, `last_error` and `is_submitting` when
    /// their request is still the active one. A stale success is still kept
    /// in history; a stale failure or abandonment is dropped.
    pub fn apply(&mut self, transition: Transition, history_limit: Option<usize>) -> Applied {
        match transition {
            Transition::Succeeded { request, result } => {
                let owns_slot = self.active == Some(request);
                self.push_front(result.clone(), history_limit);
                if !owns_slot {
                    return Applied::Stale;
                }
                self.current = Some(result);
                self.is_submitting = false;
                self.active = None;
                Applied::Done
            }

            Transition::Failed { request, message } => {
                if self.active != Some(request) {
                    return Applied::Stale;
                }
                self.is_submitting = false;
                self.last_error = Some(message);
                self.active = None;
                Applied::Done
            }

            Transition::Abandoned { request } => {
                if self.active != Some(request) {
                    return Applied::Stale;
                }
                self.is_submitting = false;
                self.active = None;
                Applied::Done
            }

            Transition::ClearCurrent => {
                self.current = None;
                Applied::Done
            }

            Transition::AddToHistory(result) => {
                self.push_front(result, history_limit);
                Applied::Done
            }
        }
    }

    /// Prepend, then drop the oldest entries over `history_limit`. The entry
    /// `current` points to is never evicted.
    fn push_front(&mut self, result: Arc<EnrichmentResult>, history_limit: Option<usize>) {
        self.history.insert(0, result);
        let Some(limit) = history_limit else {
            return;
        };
        while self.history.len() > limit {
            let oldest = self.history.iter().rposition(|r| !self.is_current(r));
            match oldest {
                Some(index) => {
                    self.history.remove(index);
                }
                None => break,
            }
        }
    }

    fn is_current(&self, result: &Arc<EnrichmentResult>) -> bool {
        self.current.as_ref().is_some_and(|c| Arc::ptr_eq(c, result))
    }
}

// ============================================================================
// TESTS
// ============================================================================
