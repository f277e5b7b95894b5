#![forbid(unsafe_code)]

pub mod api_config;
pub mod artifact;
pub mod error;
pub mod question_source;
pub mod sessions;
pub mod submission;

pub use vocab_core::Clock;

pub use api_config::ApiConfig;
pub use artifact::ResultArtifact;
pub use error::{ArtifactError, LoadError, SessionError, SubmitError};
pub use question_source::{HttpQuestionSource, QuestionSource};
pub use submission::{HttpSubmitter, SubmissionPayload, SubmitResult, SubmittedResponse, Submitter};

pub use sessions::{
    Countdown, Direction, SessionPhase, SessionProgress, TestSession, TestSessionLoop,
    TickOutcome,
};
