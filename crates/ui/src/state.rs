use services::SessionError;

/// User-facing failure kinds. Each carries one fixed message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    LoadFailure,
    EmptyResultSet,
    SubmitFailure,
    NoResultForDownload,
    /// The operation does not apply in the current phase.
    NotAllowed,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::LoadFailure => "Failed to load questions. Please reload to try again.",
            Self::EmptyResultSet => "No questions are available for this test.",
            Self::SubmitFailure => "Failed to submit test. Your answers are kept; try again.",
            Self::NoResultForDownload => "No test results to download.",
            Self::NotAllowed => "That action is not available right now.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<SessionError> for ViewError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Load(_) => Self::LoadFailure,
            SessionError::Submit(_) => Self::SubmitFailure,
            SessionError::InvalidPhase { .. }
            | SessionError::AlreadyLoaded
            | SessionError::TimerAlreadyRunning
            | SessionError::SubmissionInFlight => Self::NotAllowed,
            _ => Self::Unknown,
        }
    }
}
