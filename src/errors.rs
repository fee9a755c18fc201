//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! [`EmoteError`] only covers conditions a caller has to react to:
//! - Lifecycle misuse (initializing a controller twice)
//! - Model delivery and XR session failures reported by the host
//! - Profile parsing and validation
//!
//! A clip or morph target that is missing from a loaded model is *not* an
//! error. Those are reported as [`Diagnostic`](crate::controller::Diagnostic)
//! values and the affected action becomes a no-op.
//!
//! # Usage
//!
//! ```rust,ignore
//! use emote::errors::{EmoteError, Result};
//!
//! fn load_profile(path: &str) -> Result<ControllerProfile> {
//!     ControllerProfile::from_path(path)
//! }
//! ```

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum EmoteError {
    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The controller already received its one-shot initialization.
    #[error("Controller is already initialized")]
    AlreadyInitialized,

    // ========================================================================
    // Host Errors
    // ========================================================================
    /// The host failed to fetch or parse the character model.
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    /// The host rejected the immersive session request.
    #[error("XR session unavailable: {0}")]
    XrUnavailable(String),

    /// The loader thread went away without delivering a model.
    #[error("Model loader disconnected before delivering a result")]
    LoaderDisconnected,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A profile field holds a value the controller cannot use.
    #[error("Invalid profile field `{field}`: {message}")]
    InvalidProfile {
        /// Dotted path of the offending field
        field: String,
        /// Human readable reason
        message: String,
    },

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, EmoteError>`.
pub type Result<T> = std::result::Result<T, EmoteError>;
