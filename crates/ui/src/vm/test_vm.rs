use services::{
    Direction, ResultArtifact, SessionError, SessionPhase, TestSession, TestSessionLoop,
    TickOutcome,
};
use tracing::debug;
use vocab_core::model::SessionConfig;

use crate::state::ViewError;
use crate::surface::{Region, RenderSurface};
use crate::vm::completion_vm::CompletionVm;
use crate::vm::question_vm::QuestionCardVm;
use crate::vm::time_fmt::timer_class;

const LOADING_MESSAGE: &str = "Loading questions...";

const PANELS: [Region; 8] = [
    Region::StatusPanel,
    Region::StatusHint,
    Region::ReloadButton,
    Region::StartPanel,
    Region::QuestionPanel,
    Region::CompletionPanel,
    Region::SubmitError,
    Region::DownloadNotice,
];

/// Keys understood while a test is in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Next,
    Previous,
    /// Only honored on the last question.
    Finish,
}

/// Binds a [`TestSession`] to a surface and drives it through its lifecycle.
pub struct TestSessionVm<S: RenderSurface> {
    session: TestSession,
    runner: TestSessionLoop,
    surface: S,
}

impl<S: RenderSurface> TestSessionVm<S> {
    #[must_use]
    pub fn new(runner: TestSessionLoop, config: SessionConfig, surface: S) -> Self {
        let mut vm = Self {
            session: TestSession::new(config),
            runner,
            surface,
        };
        vm.render();
        vm
    }

    #[must_use]
    pub fn session(&self) -> &TestSession {
        &self.session
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Run the session's single automatic load.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::LoadFailure` or `ViewError::EmptyResultSet` after
    /// rendering the matching panel.
    pub async fn load(&mut self) -> Result<(), ViewError> {
        self.runner.load(&mut self.session).await?;
        self.render();
        self.loaded_outcome()
    }

    /// Fetch again after an error or an empty result.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`], plus `ViewError::NotAllowed` from other phases.
    pub async fn reload(&mut self) -> Result<(), ViewError> {
        self.runner.reload(&mut self.session).await?;
        self.render();
        self.loaded_outcome()
    }

    fn loaded_outcome(&self) -> Result<(), ViewError> {
        match self.session.phase() {
            SessionPhase::Error { .. } => Err(ViewError::LoadFailure),
            SessionPhase::Empty { .. } => Err(ViewError::EmptyResultSet),
            _ => Ok(()),
        }
    }

    /// # Errors
    ///
    /// Returns `ViewError::NotAllowed` outside `pre-test`.
    pub fn start(&mut self) -> Result<(), ViewError> {
        self.runner.start(&mut self.session)?;
        self.render();
        Ok(())
    }

    fn read_input(&self) -> Option<String> {
        self.surface.read_value(Region::ResponseInput)
    }

    /// Copy the input into the buffer. Silently skipped without an input region.
    pub fn save_current_response(&mut self) -> bool {
        match self.read_input() {
            Some(value) => self.session.save_response(value),
            None => false,
        }
    }

    /// Input-change hook; saves only when autosave is configured.
    pub fn on_input(&mut self) -> bool {
        if !self.session.config().autosave() {
            return false;
        }
        self.save_current_response()
    }

    /// Save the displayed response and show the neighbouring question.
    ///
    /// Returns `Ok(false)` at a boundary, leaving the surface untouched.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::NotAllowed` outside `in-progress`.
    pub fn advance(&mut self, direction: Direction) -> Result<bool, ViewError> {
        let displayed = self.read_input();
        if !self.session.begin_advance(direction, displayed)? {
            return Ok(false);
        }
        self.render_question();
        self.session.end_advance();
        Ok(true)
    }

    /// Keyboard shortcut dispatch. Returns whether the key did anything.
    ///
    /// # Errors
    ///
    /// Propagates errors from the mapped operation.
    pub async fn handle_key(&mut self, key: KeyCommand) -> Result<bool, ViewError> {
        if !self.session.config().keyboard_navigation()
            || self.session.phase() != &SessionPhase::InProgress
        {
            debug!(?key, "key ignored");
            return Ok(false);
        }
        match key {
            KeyCommand::Next => self.advance(Direction::Next),
            KeyCommand::Previous => self.advance(Direction::Previous),
            KeyCommand::Finish if self.session.is_last() => {
                self.finish().await?;
                Ok(true)
            }
            KeyCommand::Finish => Ok(false),
        }
    }

    /// One second of the countdown. Expiry submits the test.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::SubmitFailure` when the forced submission fails.
    pub async fn tick(&mut self) -> Result<TickOutcome, ViewError> {
        let displayed = self.read_input();
        let outcome = self.runner.tick(&mut self.session, displayed).await;
        self.render_timer();
        match outcome {
            Ok(TickOutcome::Expired) => {
                self.render();
                Ok(TickOutcome::Expired)
            }
            Ok(outcome) => Ok(outcome),
            Err(err) => Err(self.submit_failed(err)),
        }
    }

    /// Submit the test.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::SubmitFailure` with the session left in progress.
    pub async fn finish(&mut self) -> Result<(), ViewError> {
        let displayed = self.read_input();
        let outcome = self.runner.finish(&mut self.session, displayed).await;
        match outcome {
            Ok(()) => {
                self.render();
                Ok(())
            }
            Err(err) => Err(self.submit_failed(err)),
        }
    }

    fn submit_failed(&mut self, err: SessionError) -> ViewError {
        let view_err = ViewError::from(err);
        if view_err == ViewError::SubmitFailure {
            let detail = self.session.submit_error().unwrap_or_default();
            let text = format!("{} ({detail})", view_err.message());
            self.surface.set_text(Region::SubmitError, &text);
            self.surface.set_visible(Region::SubmitError, true);
            self.surface.set_enabled(Region::FinishButton, true);
        }
        view_err
    }

    /// Package the stored result.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::NoResultForDownload` and shows a notice when there is
    /// no result yet.
    pub fn download(&mut self) -> Result<ResultArtifact, ViewError> {
        match self.session.download(self.runner.clock().today()) {
            Ok(Some(artifact)) => {
                self.surface.set_visible(Region::DownloadNotice, false);
                Ok(artifact)
            }
            Ok(None) => {
                let err = ViewError::NoResultForDownload;
                self.surface.set_text(Region::DownloadNotice, err.message());
                self.surface.set_visible(Region::DownloadNotice, true);
                Err(err)
            }
            Err(err) => {
                debug!(error = %err, "result could not be packaged");
                Err(ViewError::Unknown)
            }
        }
    }

    //
    // ─── RENDERING ─────────────────────────────────────────────────────────────
    //

    /// Redraw the panel for the current phase.
    pub fn render(&mut self) {
        for region in PANELS {
            self.surface.set_visible(region, false);
        }

        match self.session.phase().clone() {
            SessionPhase::Loading => {
                self.surface.set_text(Region::StatusPanel, LOADING_MESSAGE);
                self.surface.set_visible(Region::StatusPanel, true);
            }
            SessionPhase::Error { message } => {
                self.surface.set_text(Region::StatusPanel, &message);
                self.surface.set_visible(Region::StatusPanel, true);
                self.surface.set_visible(Region::ReloadButton, true);
            }
            SessionPhase::Empty {
                message,
                suggestion,
            } => {
                self.surface.set_text(Region::StatusPanel, &message);
                self.surface.set_visible(Region::StatusPanel, true);
                self.surface.set_text(Region::StatusHint, &suggestion);
                self.surface.set_visible(Region::StatusHint, true);
                self.surface.set_visible(Region::ReloadButton, true);
            }
            SessionPhase::PreTest => {
                let total = self.session.questions().len();
                self.surface
                    .set_text(Region::StartPanel, &format!("{total} questions ready"));
                self.surface.set_visible(Region::StartPanel, true);
                self.surface.set_enabled(Region::StartButton, true);
            }
            SessionPhase::InProgress => {
                self.surface.set_visible(Region::QuestionPanel, true);
                self.render_question();
                self.render_timer();
            }
            SessionPhase::Complete => {
                let completion = CompletionVm::from_session(&self.session, &self.runner.clock());
                self.surface
                    .set_text(Region::AnsweredCount, &completion.answered_str);
                self.surface
                    .set_text(Region::ElapsedTime, &completion.elapsed_str);
                if let Some(message) = completion.message.as_deref() {
                    self.surface.set_text(Region::ResultMessage, message);
                }
                self.surface.set_visible(Region::CompletionPanel, true);
                self.surface.set_visible(Region::Timer, false);
            }
        }
    }

    fn render_question(&mut self) {
        let Some(card) = QuestionCardVm::from_session(&self.session) else {
            return;
        };
        let surface = &mut self.surface;
        surface.set_text(Region::TypeBadge, &card.label);
        surface.set_class(Region::TypeBadge, &card.badge_class);
        surface.set_text(Region::QuestionCounter, &card.counter);
        surface.set_text(Region::QuestionText, &card.text);
        surface.set_text(Region::Progress, &format!("{}%", card.progress_percent));

        surface.set_visible(Region::ExamplePanel, card.example.is_some());
        if let Some(example) = card.example.as_deref() {
            surface.set_text(Region::ExampleText, example);
        }
        surface.set_visible(Region::DefinitionPanel, card.definition.is_some());
        if let Some(definition) = card.definition.as_deref() {
            surface.set_text(Region::DefinitionText, definition);
        }
        surface.set_visible(Region::ContextPanel, card.context.is_some());
        if let Some(context) = card.context.as_deref() {
            surface.set_text(Region::ContextPanel, context);
        }

        surface.set_value(Region::ResponseInput, &card.response);
        surface.set_enabled(Region::PrevButton, card.prev_enabled);
        surface.set_visible(Region::NextButton, card.next_visible);
        surface.set_visible(Region::FinishButton, card.finish_visible);
        surface.set_enabled(Region::FinishButton, card.finish_enabled);
    }

    fn render_timer(&mut self) {
        let Some(countdown) = self.session.countdown() else {
            self.surface.set_visible(Region::Timer, false);
            return;
        };
        self.surface.set_text(Region::Timer, &countdown.display());
        self.surface.set_class(Region::Timer, timer_class(countdown));
        self.surface.set_visible(Region::Timer, true);
    }
}
