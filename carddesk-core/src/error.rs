//! Error types for every fallible desk operation.
//!
//! None of these are fatal: the desk turns each of them into an operator
//! notice and returns to an interactive state.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Rejections raised by the scan batch accumulator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("card code is empty")]
    EmptyCode,
    #[error("client label is empty")]
    EmptyClientLabel,
    #[error("card {card_number} is already in this dispatch")]
    DuplicateCard { card_number: String },
    #[error("no card at position {index} (dispatch holds {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Failures of a dispatch submission.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("select a messenger before submitting the dispatch")]
    MissingCourier,
    #[error("scan at least one card before submitting the dispatch")]
    EmptyBatch,
    #[error("dispatch submission failed: {0}")]
    Submission(#[source] ApiError),
}

/// Transport and protocol failures talking to the backend.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid backend URL '{url}'")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("unexpected response body from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// HTTP status of the failed call, when the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { source, .. }
            | ApiError::Decode { source, .. } => source.status(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failures of courier management.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Failures while fetching or exporting reports.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to write report to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Camera decoder lifecycle failures.
#[derive(Error, Debug)]
pub enum DecoderError {
    #[error("a scanning session is already active")]
    AlreadyScanning,
    #[error("no scanning session is active")]
    NotScanning,
    #[error("scanner unavailable: {0}")]
    Unavailable(String),
    #[error("scanner feed error: {0}")]
    Io(#[from] std::io::Error),
}
