//! Pipeline stages that run before a request leaves the process.
//!
//! Each submodule implements exactly one step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ validate ──▶ encode ──▶ client
//! (path/bytes) (type, size) (data URL)  (POST /predict)
//! ```
//!
//! 1. [`input`]: resolve a path or buffer into an [`input::UploadCandidate`]
//! 2. [`validate`]: synchronous allow-list and size gate; nothing past this
//!    point runs for a rejected candidate
//! 3. [`encode`]: read the bytes and base64-wrap them as a data URL

pub mod encode;
pub mod input;
pub mod validate;
