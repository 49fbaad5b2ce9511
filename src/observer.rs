//! Observer trait for view-state transitions.
//!
//! Inject an [`Arc<dyn ViewObserver>`] via
//! [`crate::session::Session::with_observer`] to be told whenever the
//! session's [`ViewState`] or [`ConnectivityStatus`] changes, or a selection
//! is refused by the validator.
//!
//! The session calls observers after releasing its internal lock, so an
//! observer may read back [`crate::session::Session::state`] freely.
//!
//! # Example
//!
//! ```rust
//! use kidney_classify::{ViewObserver, ViewState};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingObserver {
//!     transitions: AtomicUsize,
//! }
//!
//! impl ViewObserver for CountingObserver {
//!     fn on_state_change(&self, state: &ViewState) {
//!         let n = self.transitions.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("transition #{n}: {state:?}");
//!     }
//! }
//!
//! let observer: Arc<dyn ViewObserver> = Arc::new(CountingObserver {
//!     transitions: AtomicUsize::new(0),
//! });
//! # let _ = observer;
//! ```

use crate::error::ValidationError;
use crate::view::{ConnectivityStatus, ViewState};
use std::sync::Arc;

/// Called by the session as the view changes.
///
/// Implementations must be `Send + Sync`; an upload may be driven from a
/// spawned task. All methods default to no-ops.
pub trait ViewObserver: Send + Sync {
    /// The view state changed (including `Idle` after a reset).
    fn on_state_change(&self, state: &ViewState) {
        let _ = state;
    }

    /// The liveness probe resolved.
    fn on_connectivity_change(&self, status: ConnectivityStatus) {
        let _ = status;
    }

    /// A selection was refused by the validator; the view stays `Idle`.
    fn on_advisory(&self, error: &ValidationError) {
        let _ = error;
    }
}

/// Observer for callers that don't need events. The session default.
pub struct NoopObserver;

impl ViewObserver for NoopObserver {}

/// Convenience alias for the type stored in a session.
pub type SharedObserver = Arc<dyn ViewObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        states: Mutex<Vec<ViewState>>,
        connectivity: Mutex<Vec<ConnectivityStatus>>,
        advisories: Mutex<Vec<ValidationError>>,
    }

    impl ViewObserver for RecordingObserver {
        fn on_state_change(&self, state: &ViewState) {
            self.states.lock().unwrap().push(state.clone());
        }

        fn on_connectivity_change(&self, status: ConnectivityStatus) {
            self.connectivity.lock().unwrap().push(status);
        }

        fn on_advisory(&self, error: &ValidationError) {
            self.advisories.lock().unwrap().push(error.clone());
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let o = NoopObserver;
        o.on_state_change(&ViewState::Uploading);
        o.on_connectivity_change(ConnectivityStatus::Connected);
        o.on_advisory(&ValidationError::UnsupportedType {
            mime_type: "text/plain".into(),
        });
    }

    #[test]
    fn recording_observer_receives_events() {
        let o = RecordingObserver::default();
        o.on_state_change(&ViewState::Uploading);
        o.on_state_change(&ViewState::Error("boom".into()));
        o.on_connectivity_change(ConnectivityStatus::Disconnected);

        assert_eq!(
            *o.states.lock().unwrap(),
            vec![ViewState::Uploading, ViewState::Error("boom".into())]
        );
        assert_eq!(
            *o.connectivity.lock().unwrap(),
            vec![ConnectivityStatus::Disconnected]
        );
        assert!(o.advisories.lock().unwrap().is_empty());
    }

    #[test]
    fn arc_dyn_observer_works() {
        let o: SharedObserver = Arc::new(NoopObserver);
        o.on_state_change(&ViewState::Idle);
    }
}
