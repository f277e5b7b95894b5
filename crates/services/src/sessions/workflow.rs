use std::sync::Arc;

use tracing::debug;
use vocab_core::model::SessionConfig;

use crate::Clock;
use crate::error::SessionError;
use crate::question_source::QuestionSource;
use crate::submission::Submitter;
use super::countdown::TickOutcome;
use super::service::TestSession;

/// Orchestrates a session's I/O: question loading and submission.
#[derive(Clone)]
pub struct TestSessionLoop {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    submitter: Arc<dyn Submitter>,
}

impl TestSessionLoop {
    #[must_use]
    pub fn new(
        clock: Clock,
        source: Arc<dyn QuestionSource>,
        submitter: Arc<dyn Submitter>,
    ) -> Self {
        Self {
            clock,
            source,
            submitter,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Build a session for `config` and run its single automatic load.
    ///
    /// A failed load is recorded in the session's phase, not returned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` only for state machine violations.
    pub async fn open(&self, config: SessionConfig) -> Result<TestSession, SessionError> {
        let mut session = TestSession::new(config);
        self.load(&mut session).await?;
        Ok(session)
    }

    /// Fetch questions once for a freshly created session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyLoaded` when called twice.
    pub async fn load(&self, session: &mut TestSession) -> Result<(), SessionError> {
        session.mark_load_requested()?;
        self.fetch_into(session).await
    }

    /// Manual recovery from `error` or `no-questions`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` from any other phase.
    pub async fn reload(&self, session: &mut TestSession) -> Result<(), SessionError> {
        session.reset_for_reload()?;
        self.fetch_into(session).await
    }

    async fn fetch_into(&self, session: &mut TestSession) -> Result<(), SessionError> {
        let fetched = self.source.fetch_questions(session.config()).await;
        match fetched {
            Ok(questions) => session.apply_questions(questions),
            Err(err) => session.apply_load_error(err.to_string()),
        }
    }

    /// Start the test using the loop's clock.
    ///
    /// # Errors
    ///
    /// Propagates `TestSession::start` errors.
    pub fn start(&self, session: &mut TestSession) -> Result<(), SessionError> {
        session.start(self.clock.now())
    }

    /// Save, stop the timer, submit once, and record the outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submit` when the endpoint fails; the session stays
    /// in progress with its responses.
    pub async fn finish(
        &self,
        session: &mut TestSession,
        displayed: Option<String>,
    ) -> Result<(), SessionError> {
        let payload = session.prepare_submission(displayed)?;
        let outcome = self.submitter.submit(session.config(), &payload).await;
        session.complete_submission(outcome, self.clock.now())
    }

    /// Feed one second to the session's countdown, finishing on expiry.
    ///
    /// # Errors
    ///
    /// Propagates errors from the forced [`Self::finish`].
    pub async fn tick(
        &self,
        session: &mut TestSession,
        displayed: Option<String>,
    ) -> Result<TickOutcome, SessionError> {
        let outcome = session.tick();
        if outcome == TickOutcome::Expired {
            debug!("countdown expired, submitting");
            self.finish(session, displayed).await?;
        }
        Ok(outcome)
    }
}
