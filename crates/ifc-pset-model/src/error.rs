// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the parse boundary

use thiserror::Error;

/// Result type alias for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur at the top-level parse boundary
///
/// Per-entity and per-property problems never surface as errors; they are
/// recovered locally as absent values or skipped references. Only a failure
/// of the whole call (reading the file, or an unexpected panic escaping the
/// pipeline) is represented here, and the entry points immediately convert
/// it into the error envelope of [`crate::Document`].
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error while reading the input file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected internal failure escaping the pipeline
    #[error("internal parser failure: {0}")]
    Internal(String),
}

impl ParseError {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        ParseError::Internal(msg.into())
    }
}
