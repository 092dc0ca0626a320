// ── Core error types ──
//
// Errors surfaced by the property store, the charge-state mapping and
// bridge assembly. Device transport failures stay as `rngbridge_api::Error`
// until the sync loop decides whether they are recoverable; only the ones
// that are not end up wrapped in `CoreError::Device`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Property store ───────────────────────────────────────────────
    #[error("Property not found: {path}")]
    NotFound { path: String },

    #[error("Property already registered: {path}")]
    DuplicatePath { path: String },

    #[error("Property is read-only: {path}")]
    ReadOnly { path: String },

    // ── Device data ──────────────────────────────────────────────────
    #[error("Unknown charge state code {code} (expected 0-6)")]
    UnknownChargeState { code: i64 },

    #[error("Device request failed: {0}")]
    Device(#[from] rngbridge_api::Error),

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Bridge already started")]
    AlreadyStarted,
}
