//! Error types for isoband generation.

use isoband_common::{ConfigError, GridError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the isoband pipeline.
#[derive(Error, Debug)]
pub enum IsobandError {
    /// The input grid failed validation.
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),

    /// The pipeline configuration failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The external isoband collaborator failed.
    #[error("isoband generation failed: {0}")]
    Simplify(#[from] SimplifyError),
}

/// Failures talking to the external simplification step.
#[derive(Error, Debug)]
pub enum SimplifyError {
    /// Could not create the scratch directory.
    #[error("failed to create work directory {path}: {source}")]
    WorkDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the dense isogon file.
    #[error("failed to write {path}: {source}")]
    WriteInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not encode or decode a feature collection.
    #[error("GeoJSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The collaborator process could not be started or waited on.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The collaborator exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The collaborator did not finish in time and was killed.
    #[error("{program} timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    /// Could not read the simplified output.
    #[error("failed to read {path}: {source}")]
    ReadOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for pipeline operations.
pub type IsobandResult<T> = Result<T, IsobandError>;
