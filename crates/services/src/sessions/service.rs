use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use tracing::{debug, info, warn};
use vocab_core::Clock;
use vocab_core::model::{Question, ResponseBuffer, SessionConfig};

use crate::artifact::ResultArtifact;
use crate::error::{ArtifactError, SessionError, SubmitError};
use crate::submission::{SubmissionPayload, SubmitResult};
use super::countdown::{Countdown, TickOutcome};
use super::progress::SessionProgress;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where a test session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    PreTest,
    InProgress,
    Complete,
    /// The source returned no questions. Terminal until a reload.
    Empty { message: String, suggestion: String },
    /// Loading failed. Terminal until a reload.
    Error { message: String },
}

impl SessionPhase {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::PreTest => "pre-test",
            Self::InProgress => "in-progress",
            Self::Complete => "complete",
            Self::Empty { .. } => "no-questions",
            Self::Error { .. } => "error",
        }
    }
}

/// Navigation direction for [`TestSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a vocabulary test.
///
/// Pure state: it performs no I/O. Loading and submission results are fed in by
/// [`super::TestSessionLoop`] and timestamps come from the caller's clock.
pub struct TestSession {
    config: SessionConfig,
    phase: SessionPhase,
    questions: Vec<Question>,
    responses: ResponseBuffer,
    current: usize,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    countdown: Option<Countdown>,
    load_requested: bool,
    transitioning: bool,
    submitting: bool,
    result: Option<SubmitResult>,
    submit_error: Option<String>,
}

impl TestSession {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            phase: SessionPhase::Loading,
            questions: Vec::new(),
            responses: ResponseBuffer::default(),
            current: 0,
            started_at: None,
            completed_at: None,
            countdown: None,
            load_requested: false,
            transitioning: false,
            submitting: false,
            result: None,
            submit_error: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn responses(&self) -> &ResponseBuffer {
        &self.responses
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn current_response(&self) -> Option<&str> {
        self.responses.get(self.current)
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.countdown.as_ref().is_some_and(Countdown::is_running)
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn result(&self) -> Option<&SubmitResult> {
        self.result.as_ref()
    }

    /// Message from the last failed submission, cleared by the next attempt.
    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let position = match self.phase {
            SessionPhase::InProgress | SessionPhase::Complete => self.current + 1,
            _ => 0,
        };
        SessionProgress::new(
            self.questions.len(),
            position,
            self.responses.answered_count(),
        )
    }

    /// Whole seconds between start and completion, or up to the clock's now while running.
    #[must_use]
    pub fn elapsed_secs(&self, clock: &Clock) -> u64 {
        let Some(started) = self.started_at else {
            return 0;
        };
        match self.completed_at {
            Some(end) => u64::try_from((end - started).num_seconds()).unwrap_or(0),
            None => clock.seconds_since(started),
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidPhase {
            operation,
            phase: self.phase.name(),
        }
    }

    //
    // ─── LOADING ───────────────────────────────────────────────────────────────
    //

    /// Claim the single automatic load for this session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyLoaded` on a second call, and
    /// `SessionError::InvalidPhase` outside `loading`.
    pub fn mark_load_requested(&mut self) -> Result<(), SessionError> {
        if self.load_requested {
            return Err(SessionError::AlreadyLoaded);
        }
        if self.phase != SessionPhase::Loading {
            return Err(self.invalid("load"));
        }
        self.load_requested = true;
        Ok(())
    }

    /// Install the fetched questions.
    ///
    /// Keeps at most `question_count` questions. An empty list moves the session
    /// to the no-questions state instead of `pre-test`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `loading`.
    pub fn apply_questions(&mut self, mut questions: Vec<Question>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Loading {
            return Err(self.invalid("apply questions"));
        }
        questions.truncate(self.config.question_count());
        self.current = 0;
        if questions.is_empty() {
            info!(kind = %self.config.kind(), "no questions available");
            self.questions = Vec::new();
            self.responses.reset(0);
            self.phase = SessionPhase::Empty {
                message: self.config.empty_message().to_string(),
                suggestion: self.config.empty_suggestion().to_string(),
            };
            return Ok(());
        }

        info!(count = questions.len(), kind = %self.config.kind(), "questions loaded");
        self.responses.reset(questions.len());
        self.questions = questions;
        self.phase = SessionPhase::PreTest;
        Ok(())
    }

    /// Record a failed load.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `loading`.
    pub fn apply_load_error(&mut self, message: impl Into<String>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Loading {
            return Err(self.invalid("apply load error"));
        }
        let message = message.into();
        warn!(%message, "question load failed");
        self.phase = SessionPhase::Error { message };
        Ok(())
    }

    /// Return to `loading` after an error or an empty result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` from any other phase.
    pub fn reset_for_reload(&mut self) -> Result<(), SessionError> {
        if !matches!(
            self.phase,
            SessionPhase::Error { .. } | SessionPhase::Empty { .. }
        ) {
            return Err(self.invalid("reload"));
        }
        debug!(from = self.phase.name(), "reloading questions");
        self.phase = SessionPhase::Loading;
        self.questions.clear();
        self.responses.reset(0);
        self.current = 0;
        Ok(())
    }

    //
    // ─── TAKING THE TEST ───────────────────────────────────────────────────────
    //

    /// Begin the test at the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `pre-test`, and
    /// `SessionError::TimerAlreadyRunning` if a countdown already exists.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::PreTest {
            return Err(self.invalid("start"));
        }
        if self.timer_running() {
            return Err(SessionError::TimerAlreadyRunning);
        }

        self.started_at = Some(now);
        self.current = 0;
        self.responses.reset(self.questions.len());
        self.countdown = self.config.timer_secs().map(Countdown::start);
        self.phase = SessionPhase::InProgress;
        info!(
            questions = self.questions.len(),
            timer_secs = ?self.config.timer_secs(),
            "test started"
        );
        Ok(())
    }

    /// Store `value` as the response to the displayed question.
    ///
    /// Returns whether anything was written. Silently skipped while an index
    /// change is underway or when the test is not in progress.
    pub fn save_response(&mut self, value: impl Into<String>) -> bool {
        if self.transitioning || self.phase != SessionPhase::InProgress {
            return false;
        }
        self.responses.set(self.current, value)
    }

    /// Save the displayed response and move the pointer one step.
    ///
    /// Opens the transitioning guard; call [`Self::end_advance`] once the new
    /// question has been rendered. Returns `Ok(false)` at a boundary, in which
    /// case the guard is not opened and the index is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `in-progress`.
    pub fn begin_advance(
        &mut self,
        direction: Direction,
        displayed: Option<String>,
    ) -> Result<bool, SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(self.invalid("advance"));
        }
        if let Some(value) = displayed {
            self.save_response(value);
        }

        let target = match direction {
            Direction::Next if !self.is_last() => self.current + 1,
            Direction::Previous if !self.is_first() => self.current - 1,
            _ => {
                debug!(?direction, index = self.current, "navigation at boundary ignored");
                return Ok(false);
            }
        };

        self.transitioning = true;
        self.current = target;
        Ok(true)
    }

    /// Close the transitioning guard opened by [`Self::begin_advance`].
    pub fn end_advance(&mut self) {
        self.transitioning = false;
    }

    /// [`Self::begin_advance`] and [`Self::end_advance`] in one step.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `in-progress`.
    pub fn advance(
        &mut self,
        direction: Direction,
        displayed: Option<String>,
    ) -> Result<bool, SessionError> {
        let moved = self.begin_advance(direction, displayed)?;
        self.end_advance();
        Ok(moved)
    }

    /// Feed one second to the countdown.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::InProgress {
            return TickOutcome::Ignored;
        }
        let Some(countdown) = self.countdown.as_mut() else {
            return TickOutcome::Ignored;
        };
        let outcome = countdown.tick();
        if outcome == TickOutcome::Expired {
            info!("time is up");
        }
        outcome
    }

    /// Stop the countdown if one is running.
    pub fn stop_timer(&mut self) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.stop();
        }
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Save the displayed response, stop the timer and build the payload.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `in-progress`, and
    /// `SessionError::SubmissionInFlight` if a previous payload is unanswered.
    pub fn prepare_submission(
        &mut self,
        displayed: Option<String>,
    ) -> Result<SubmissionPayload, SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(self.invalid("finish"));
        }
        if self.submitting {
            return Err(SessionError::SubmissionInFlight);
        }
        if let Some(value) = displayed {
            self.save_response(value);
        }
        self.stop_timer();
        self.submitting = true;
        self.submit_error = None;
        Ok(SubmissionPayload::build(
            self.config.kind(),
            &self.questions,
            &self.responses,
        ))
    }

    /// Record the submit endpoint's answer.
    ///
    /// Success stores the result and completes the session. Failure keeps the
    /// session in progress with its responses intact.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submit` carrying the failure, and
    /// `SessionError::InvalidPhase` if no submission was prepared.
    pub fn complete_submission(
        &mut self,
        outcome: Result<SubmitResult, SubmitError>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if !self.submitting || self.phase != SessionPhase::InProgress {
            return Err(self.invalid("complete submission"));
        }
        self.submitting = false;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.completed_at = Some(now);
                self.phase = SessionPhase::Complete;
                info!(answered = self.responses.answered_count(), "test submitted");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "test submission failed");
                self.submit_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Package the stored result for download.
    ///
    /// Returns `Ok(None)` when there is nothing to download.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError` if the result cannot be serialized.
    pub fn download(&self, today: NaiveDate) -> Result<Option<ResultArtifact>, ArtifactError> {
        match (&self.phase, &self.result) {
            (SessionPhase::Complete, Some(result)) => {
                ResultArtifact::from_result(result, today).map(Some)
            }
            _ => {
                debug!(phase = self.phase.name(), "nothing to download");
                Ok(None)
            }
        }
    }
}

impl fmt::Debug for TestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSession")
            .field("kind", &self.config.kind())
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("countdown", &self.countdown)
            .field("transitioning", &self.transitioning)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
