//! View state machine.
//!
//! ```text
//!            valid file                 classify ok
//!   Idle ─────────────────▶ Uploading ─────────────────▶ Success(result)
//!    ▲ │ invalid file          │  │     classify/read fails
//!    │ └──▶ Idle + advisory    │  └──────────────────────▶ Error(message)
//!    │                         │ reset (late response dropped)
//!    └─────────────────────────┴──── reset ◀──── Success | Error
//! ```
//!
//! [`Controller`] is synchronous and performs no I/O; [`crate::session::Session`]
//! drives it across the await points. Every upload episode is identified by an
//! [`UploadTicket`]; finishing with a ticket that is no longer current is a
//! no-op, which is how a reset during `Uploading` discards the late response.
//!
//! While `Uploading`, the trigger is disabled: [`Controller::begin_upload`]
//! refuses with [`TriggerError::Busy`] and nothing is dispatched.

use crate::error::{ClientError, ValidationError};
use crate::output::ClassificationResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// What the results panel shows. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Idle,
    Uploading,
    Success(ClassificationResult),
    Error(String),
}

impl ViewState {
    pub fn is_uploading(&self) -> bool {
        matches!(self, ViewState::Uploading)
    }
}

/// Result of the one-shot liveness probe. Independent of [`ViewState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityStatus {
    #[default]
    Checking,
    Connected,
    Disconnected,
}

/// Identifies one upload episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    epoch: u64,
}

/// Refusal at the upload trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TriggerError {
    #[error("an upload is already in progress")]
    Busy,
}

/// The single writer of [`ViewState`].
#[derive(Debug, Default)]
pub struct Controller {
    state: ViewState,
    advisory: Option<ValidationError>,
    connectivity: ConnectivityStatus,
    epoch: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Validation message shown alongside `Idle`, if the last selection was refused.
    pub fn advisory(&self) -> Option<&ValidationError> {
        self.advisory.as_ref()
    }

    pub fn connectivity(&self) -> ConnectivityStatus {
        self.connectivity
    }

    /// `false` while an upload is in flight.
    pub fn trigger_enabled(&self) -> bool {
        !self.state.is_uploading()
    }

    /// A selected file failed validation: back to `Idle` with an advisory.
    ///
    /// Refused while uploading, like any other selection.
    pub fn reject_candidate(&mut self, error: ValidationError) -> Result<(), TriggerError> {
        if !self.trigger_enabled() {
            return Err(TriggerError::Busy);
        }
        debug!("Candidate rejected: {}", error);
        self.state = ViewState::Idle;
        self.advisory = Some(error);
        Ok(())
    }

    /// A valid file was selected: enter `Uploading` and hand out a ticket.
    pub fn begin_upload(&mut self) -> Result<UploadTicket, TriggerError> {
        if !self.trigger_enabled() {
            return Err(TriggerError::Busy);
        }
        self.epoch += 1;
        self.state = ViewState::Uploading;
        self.advisory = None;
        debug!("Upload episode {} started", self.epoch);
        Ok(UploadTicket { epoch: self.epoch })
    }

    /// Apply the outcome of an episode. Returns `false`, leaving the state
    /// untouched, when the ticket has been superseded.
    pub fn finish(
        &mut self,
        ticket: UploadTicket,
        outcome: Result<ClassificationResult, ClientError>,
    ) -> bool {
        if ticket.epoch != self.epoch || !self.state.is_uploading() {
            debug!(
                "Dropping stale result for episode {} (current {})",
                ticket.epoch, self.epoch
            );
            return false;
        }
        self.state = match outcome {
            Ok(result) => ViewState::Success(result),
            Err(e) => ViewState::Error(e.to_string()),
        };
        true
    }

    /// Back to `Idle` from anywhere. An in-flight episode is superseded.
    pub fn reset(&mut self) {
        if self.state.is_uploading() {
            debug!("Reset while uploading; episode {} superseded", self.epoch);
        }
        self.epoch += 1;
        self.state = ViewState::Idle;
        self.advisory = None;
    }

    pub fn set_connectivity(&mut self, status: ConnectivityStatus) {
        self.connectivity = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(label: &str) -> ClassificationResult {
        ClassificationResult {
            prediction: label.into(),
            processing_time: Some(0.5),
            confidence: None,
            status: None,
        }
    }

    fn too_large() -> ValidationError {
        ValidationError::TooLarge {
            size_bytes: 11,
            max_bytes: 10,
        }
    }

    #[test]
    fn starts_idle_and_checking() {
        let c = Controller::new();
        assert_eq!(c.state(), &ViewState::Idle);
        assert_eq!(c.connectivity(), ConnectivityStatus::Checking);
        assert!(c.advisory().is_none());
        assert!(c.trigger_enabled());
    }

    #[test]
    fn upload_then_success() {
        let mut c = Controller::new();
        let t = c.begin_upload().unwrap();
        assert_eq!(c.state(), &ViewState::Uploading);
        assert!(!c.trigger_enabled());

        assert!(c.finish(t, Ok(result("Normal"))));
        assert_eq!(c.state(), &ViewState::Success(result("Normal")));
        assert!(c.trigger_enabled());
    }

    #[test]
    fn upload_then_error() {
        let mut c = Controller::new();
        let t = c.begin_upload().unwrap();
        let err = ClientError::Server {
            status: 500,
            message: "model unavailable".into(),
        };
        assert!(c.finish(t, Err(err)));
        assert_eq!(c.state(), &ViewState::Error("model unavailable".into()));
    }

    #[test]
    fn second_trigger_while_uploading_is_busy() {
        let mut c = Controller::new();
        let _t = c.begin_upload().unwrap();
        assert_eq!(c.begin_upload(), Err(TriggerError::Busy));
        assert_eq!(c.reject_candidate(too_large()), Err(TriggerError::Busy));
        assert_eq!(c.state(), &ViewState::Uploading);
        assert!(c.advisory().is_none());
    }

    #[test]
    fn rejected_candidate_stays_idle_with_advisory() {
        let mut c = Controller::new();
        c.reject_candidate(too_large()).unwrap();
        assert_eq!(c.state(), &ViewState::Idle);
        assert_eq!(c.advisory(), Some(&too_large()));

        // A valid selection clears the advisory.
        c.begin_upload().unwrap();
        assert!(c.advisory().is_none());
    }

    #[test]
    fn rejected_candidate_from_success_returns_to_idle() {
        let mut c = Controller::new();
        let t = c.begin_upload().unwrap();
        c.finish(t, Ok(result("Tumor")));
        c.reject_candidate(too_large()).unwrap();
        assert_eq!(c.state(), &ViewState::Idle);
    }

    #[test]
    fn reset_during_upload_drops_late_response() {
        let mut c = Controller::new();
        let t = c.begin_upload().unwrap();
        c.reset();
        assert_eq!(c.state(), &ViewState::Idle);

        assert!(!c.finish(t, Ok(result("Tumor"))));
        assert_eq!(c.state(), &ViewState::Idle);
    }

    #[test]
    fn old_ticket_cannot_overwrite_newer_episode() {
        let mut c = Controller::new();
        let old = c.begin_upload().unwrap();
        c.reset();
        let new = c.begin_upload().unwrap();

        assert!(!c.finish(old, Ok(result("Tumor"))));
        assert_eq!(c.state(), &ViewState::Uploading);
        assert!(c.finish(new, Ok(result("Normal"))));
        assert_eq!(c.state(), &ViewState::Success(result("Normal")));
    }

    #[test]
    fn ticket_is_single_use() {
        let mut c = Controller::new();
        let t = c.begin_upload().unwrap();
        assert!(c.finish(t, Ok(result("Normal"))));
        assert!(!c.finish(t, Ok(result("Tumor"))));
        assert_eq!(c.state(), &ViewState::Success(result("Normal")));
    }

    #[test]
    fn success_and_error_are_reentrant() {
        let mut c = Controller::new();
        let t = c.begin_upload().unwrap();
        c.finish(t, Ok(result("Normal")));
        let t = c.begin_upload().unwrap();
        assert_eq!(c.state(), &ViewState::Uploading);
        c.finish(
            t,
            Err(ClientError::Network {
                action: "classify image",
                reason: "refused".into(),
            }),
        );
        assert!(matches!(c.state(), ViewState::Error(_)));
        c.reset();
        assert_eq!(c.state(), &ViewState::Idle);
    }

    #[test]
    fn connectivity_does_not_touch_view_state() {
        let mut c = Controller::new();
        c.set_connectivity(ConnectivityStatus::Disconnected);
        assert_eq!(c.connectivity(), ConnectivityStatus::Disconnected);
        assert_eq!(c.state(), &ViewState::Idle);
    }

    #[test]
    fn view_state_serialises_tagged() {
        let json = serde_json::to_string(&ViewState::Error("boom".into())).unwrap();
        assert_eq!(json, r#"{"state":"error","data":"boom"}"#);
        let json = serde_json::to_string(&ViewState::Idle).unwrap();
        assert_eq!(json, r#"{"state":"idle"}"#);
    }
}
