//! Error Types
//!
//! This module defines the error types used throughout the baker.
//!
//! # Overview
//!
//! The main error type [`RigbakeError`] covers the caller-input failures the
//! pipeline can surface:
//! - Invalid tick rates on source clips or in the settings
//! - Degenerate configuration values
//! - Dangling node, mesh or bone references while building inputs
//! - Output values that do not fit the runtime's integer widths
//!
//! Clips without matching channels and nodes without animation relevance are
//! *not* errors; they are filtered out and logged.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, RigbakeError>`.
//!
//! ```rust,ignore
//! use rigbake::errors::{RigbakeError, Result};
//!
//! fn bake() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the baker.
#[derive(Error, Debug)]
pub enum RigbakeError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A tick rate was zero, negative or not finite.
    #[error("Invalid tick rate for {context}: {rate}")]
    InvalidTickRate {
        /// What the rate belongs to (clip name or setting)
        context: String,
        /// The offending rate
        rate: f64,
    },

    /// A setting holds a value the pipeline cannot work with.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// JSON configuration parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Input Graph Errors
    // ========================================================================
    /// A node key does not resolve in the scene arena.
    #[error("Unknown scene node: {0}")]
    UnknownNode(String),

    /// A mesh key does not resolve in the scene arena.
    #[error("Unknown mesh: {0}")]
    UnknownMesh(String),

    /// A bone index is out of range or does not precede its child.
    #[error("Invalid bone reference: {context} (index: {index})")]
    UnknownBone {
        /// Description of what was being linked
        context: String,
        /// The invalid index
        index: usize,
    },

    // ========================================================================
    // Output Errors
    // ========================================================================
    /// A value does not fit the integer width of the runtime format.
    #[error("Value out of range for {context}: {value}")]
    ValueOverflow {
        /// Which output field overflowed
        context: String,
        /// The value that did not fit
        value: u64,
    },
}

/// Alias for `Result<T, RigbakeError>`.
pub type Result<T> = std::result::Result<T, RigbakeError>;
