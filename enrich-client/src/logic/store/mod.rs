//! Store Module
//!
//! Submission lifecycle and session history.
//!
//! ## Structure
//! - `state`: StoreState + the transition function
//! - `manager`: SubmissionStore (locking, transport calls, notifications)
//!
//! ## Usage
//! ```ignore
//! let store = SubmissionStore::new(EnrichClient::new(ClientConfig::from_env())?);
//!
//! match store.submit(raw, Some(LogSource::Sysmon)).await {
//!     SubmitOutcome::Completed(result) => render(&result),
//!     SubmitOutcome::Failed(message) => show_error(&message),
//!     _ => {}
//! }
//! ```

pub mod state;
pub mod manager;

pub use state::{Applied, StoreState, Transition};
pub use manager::{SubmissionStore, SubmitOutcome};
