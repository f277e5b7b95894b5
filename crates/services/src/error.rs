//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted while fetching questions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("question request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("{message}")]
    Rejected { message: String },
    #[error("invalid question payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while submitting responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("submission failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("{message}")]
    Rejected { message: String },
    #[error("submission response carried no result")]
    MissingResult,
    #[error("invalid submission response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the test session state machine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot {operation} while the session is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: &'static str,
    },
    #[error("questions were already loaded for this session")]
    AlreadyLoaded,
    #[error("a countdown is already running for this session")]
    TimerAlreadyRunning,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Errors emitted while producing or writing a result artifact.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArtifactError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
