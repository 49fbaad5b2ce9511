//! Upload session: sequences validation, encoding and classification for one
//! view, and owns the [`Controller`] that is the view's single writer.
//!
//! ## Ordering
//!
//! ```text
//! upload(candidate)
//!  ├─ trigger check    refused with Busy while Uploading (no I/O)
//!  ├─ validate         sync; refusal → Idle + advisory
//!  ├─ begin_upload     → Uploading, ticket issued
//!  ├─ encode           await file read
//!  ├─ classify         await POST /predict
//!  └─ finish(ticket)   → Success | Error, or dropped if superseded
//! ```
//!
//! The controller lock is never held across an await, so a `Session` can be
//! shared through an `Arc` and an upload spawned onto the runtime while the
//! caller keeps reading [`Session::state`] or calls [`Session::reset`].

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ValidationError};
use crate::observer::{NoopObserver, SharedObserver};
use crate::pipeline::encode::encode;
use crate::pipeline::input::UploadCandidate;
use crate::pipeline::validate::validate;
use crate::view::{ConnectivityStatus, Controller, ViewState};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, info, warn};

/// How a call to [`Session::upload`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The validator refused the candidate; the view is `Idle` with an advisory.
    Rejected(ValidationError),
    /// Another upload was in flight; nothing was dispatched.
    Busy,
    /// The episode ran to completion; carries the resulting `Success` or
    /// `Error` state.
    Completed(ViewState),
    /// The view was reset while this upload was in flight; its result was
    /// dropped.
    Superseded,
}

/// One view's worth of state plus the client it talks through.
pub struct Session {
    client: ApiClient,
    controller: Mutex<Controller>,
    observer: SharedObserver,
}

impl Session {
    /// Build a session with a fresh [`ApiClient`] for `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_client(ApiClient::new(config)?))
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self {
            client,
            controller: Mutex::new(Controller::new()),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Snapshot of the current view state.
    pub fn state(&self) -> ViewState {
        self.lock().state().clone()
    }

    pub fn advisory(&self) -> Option<ValidationError> {
        self.lock().advisory().cloned()
    }

    pub fn connectivity(&self) -> ConnectivityStatus {
        self.lock().connectivity()
    }

    pub fn trigger_enabled(&self) -> bool {
        self.lock().trigger_enabled()
    }

    /// Run the liveness probe once and record the result. Never fails.
    ///
    /// Only the connectivity status changes; the view state is untouched.
    pub async fn check_connectivity(&self) -> ConnectivityStatus {
        let status = self.client.check_health().await;
        self.lock().set_connectivity(status);
        self.observer.on_connectivity_change(status);
        status
    }

    /// Validate, encode and classify one candidate.
    pub async fn upload(&self, candidate: UploadCandidate) -> UploadOutcome {
        let ticket = {
            let mut controller = self.lock();
            if !controller.trigger_enabled() {
                warn!("Ignoring '{}': an upload is already in progress", candidate.name);
                return UploadOutcome::Busy;
            }

            if let Err(e) = validate(&candidate) {
                info!("Rejected '{}': {}", candidate.name, e);
                if controller.reject_candidate(e.clone()).is_err() {
                    return UploadOutcome::Busy;
                }
                drop(controller);
                self.observer.on_advisory(&e);
                self.observer.on_state_change(&ViewState::Idle);
                return UploadOutcome::Rejected(e);
            }

            match controller.begin_upload() {
                Ok(ticket) => ticket,
                Err(_) => return UploadOutcome::Busy,
            }
        };
        self.observer.on_state_change(&ViewState::Uploading);

        let start = Instant::now();
        info!(
            "Uploading '{}' ({}, {} bytes)",
            candidate.name, candidate.mime_type, candidate.size_bytes
        );

        let outcome = match encode(&candidate).await {
            Ok(payload) => self.client.classify(&payload).await,
            Err(e) => Err(e),
        };
        if let Err(ref e) = outcome {
            warn!("Upload of '{}' failed: {}", candidate.name, e);
        }
        debug!("Upload episode took {}ms", start.elapsed().as_millis());

        let (applied, state) = {
            let mut controller = self.lock();
            let applied = controller.finish(ticket, outcome);
            (applied, controller.state().clone())
        };

        if !applied {
            info!("Result for '{}' superseded by a reset", candidate.name);
            return UploadOutcome::Superseded;
        }
        self.observer.on_state_change(&state);
        UploadOutcome::Completed(state)
    }

    /// Return to `Idle`. A response still in flight will be ignored.
    pub fn reset(&self) {
        self.lock().reset();
        self.observer.on_state_change(&ViewState::Idle);
    }

    fn lock(&self) -> MutexGuard<'_, Controller> {
        // Every transition is a plain assignment, so a poisoned lock still
        // guards a consistent state.
        self.controller
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
