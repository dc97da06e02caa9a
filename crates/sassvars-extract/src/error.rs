//! Error types for variable extraction.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::PathBuf;

use sassvars_system_runtime::RuntimeError;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SassVarsError>;

/// Errors that can occur while extracting SASS variables.
///
/// Every variant is fatal for the request that raised it. Nothing is retried:
/// each one points at a stylesheet or configuration defect.
#[derive(Debug, Error)]
pub enum SassVarsError {
    /// The stylesheet grammar rejected the file content
    #[error("Failed to parse {}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// An `@import` or entry path does not match any existing file
    #[error("Invalid import {}: no matching .sass or .scss file", .path.display())]
    ImportResolution { path: PathBuf },

    /// The entry or import path has an extension other than .sass/.scss
    #[error("Unknown file extension \".{extension}\" for {}", .path.display())]
    UnknownExtension { path: PathBuf, extension: String },

    /// The SASS compiler rejected the synthesized stylesheet
    #[error("SASS compilation failed for {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    /// A submitted marker was absent from the rendered output
    #[error("Value for ${name} not found in rendered output (marker {marker})")]
    MarkerNotFound { name: String, marker: String },

    /// A submitted marker appeared more than once in the rendered output
    #[error("Value for ${name} appears {count} times in rendered output (marker {marker})")]
    DuplicateMarker {
        name: String,
        marker: String,
        count: usize,
    },

    /// Requested names did not come back under the configured case functions
    #[error("Import names must be in the same case as `outputCase`: {}", .names.join(", "))]
    CaseMismatch { names: Vec<String> },

    /// Reading a stylesheet failed
    #[error("Failed to read SASS file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    /// The extraction options could not be loaded
    #[error("Invalid extraction options: {message}")]
    Config { message: String },
}

impl From<serde_json::Error> for SassVarsError {
    fn from(e: serde_json::Error) -> Self {
        SassVarsError::Config {
            message: e.to_string(),
        }
    }
}
