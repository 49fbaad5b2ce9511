//! # kidney-classify
//!
//! Upload a kidney CT scan to a remote classification service and render the
//! verdict.
//!
//! The service does all the inference. This crate covers everything on the
//! client side of the wire: refusing files the service cannot take, encoding
//! the image, making the request, normalising failures, and keeping a single
//! view state that a front end renders.
//!
//! ## Flow
//!
//! ```text
//! file
//!  │
//!  ├─ 1. Input     path or buffer → UploadCandidate (name, MIME, size)
//!  ├─ 2. Validate  JPEG/JPG/PNG only, ≤ 10 MiB; refusal never hits the network
//!  ├─ 3. Encode    bytes → data:<mime>;base64,<payload>
//!  ├─ 4. Classify  POST /predict {"image": "<payload>"}
//!  └─ 5. View      Idle → Uploading → Success | Error
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kidney_classify::{render_text, ClientConfig, Session, UploadCandidate, UploadOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Base URL from VITE_API_URL, else http://localhost:8080
//!     let session = Session::new(ClientConfig::from_env()?)?;
//!     session.check_connectivity().await;
//!
//!     let candidate = UploadCandidate::from_path("scan.jpg").await?;
//!     match session.upload(candidate).await {
//!         UploadOutcome::Completed(state) => println!("{}", render_text(&state)),
//!         UploadOutcome::Rejected(reason) => eprintln!("{reason}"),
//!         other => eprintln!("{other:?}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `kidney-classify` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod observer;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod view;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::ApiClient;
pub use config::{ClientConfig, ClientConfigBuilder, API_URL_ENV, DEFAULT_API_URL};
pub use error::{ClientError, ValidationError};
pub use observer::{NoopObserver, SharedObserver, ViewObserver};
pub use output::{ClassificationResult, ModelInfo, TrainingStatus};
pub use pipeline::encode::{encode, EncodedPayload};
pub use pipeline::input::UploadCandidate;
pub use pipeline::validate::{validate, ACCEPTED_MIME_TYPES, MAX_UPLOAD_BYTES};
pub use report::{connectivity_label, render_text, Report, Verdict};
pub use session::{Session, UploadOutcome};
pub use view::{ConnectivityStatus, Controller, TriggerError, UploadTicket, ViewState};
