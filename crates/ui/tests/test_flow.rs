use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use services::{
    Clock, Direction, LoadError, QuestionSource, SessionPhase, SubmissionPayload, SubmitError,
    SubmitResult, Submitter, TestSessionLoop, TickOutcome,
};
use ui::{KeyCommand, MemorySurface, Region, RenderSurface, TestSessionVm, ViewError};
use vocab_core::model::{ItemType, Question, QuestionId, SessionConfig};
use vocab_core::time::fixed_now;

struct StaticSource(Result<Vec<Question>, String>);

#[async_trait]
impl QuestionSource for StaticSource {
    async fn fetch_questions(&self, _config: &SessionConfig) -> Result<Vec<Question>, LoadError> {
        self.0
            .clone()
            .map_err(|message| LoadError::Rejected { message })
    }
}

#[derive(Default)]
struct CountingSubmitter {
    calls: Mutex<Vec<SubmissionPayload>>,
    reject: bool,
}

#[async_trait]
impl Submitter for CountingSubmitter {
    async fn submit(
        &self,
        _config: &SessionConfig,
        payload: &SubmissionPayload,
    ) -> Result<SubmitResult, SubmitError> {
        self.calls.lock().unwrap().push(payload.clone());
        if self.reject {
            return Err(SubmitError::Rejected {
                message: "server busy".into(),
            });
        }
        Ok(SubmitResult {
            result: json!({ "score": 50 }),
            download_filename: None,
            message: Some("Test submitted".into()),
        })
    }
}

fn three_questions() -> Vec<Question> {
    vec![
        Question::new(QuestionId::new(1), ItemType::Vocabulary, "run")
            .unwrap()
            .with_example(Some("She runs daily.".into())),
        Question::new(QuestionId::new(2), ItemType::PhrasalVerb, "give up").unwrap(),
        Question::new(QuestionId::new(3), ItemType::Idiom, "break the ice").unwrap(),
    ]
}

fn vm_with(
    source: StaticSource,
    submitter: Arc<CountingSubmitter>,
    config: SessionConfig,
    surface: MemorySurface,
) -> TestSessionVm<MemorySurface> {
    let runner = TestSessionLoop::new(Clock::fixed(fixed_now()), Arc::new(source), submitter);
    TestSessionVm::new(runner, config, surface)
}

#[tokio::test]
async fn regular_session_runs_end_to_end() {
    let submitter = Arc::new(CountingSubmitter::default());
    let mut vm = vm_with(
        StaticSource(Ok(three_questions())),
        submitter.clone(),
        SessionConfig::regular(),
        MemorySurface::full(),
    );
    assert_eq!(vm.surface().text(Region::StatusPanel), Some("Loading questions..."));

    vm.load().await.unwrap();
    assert!(vm.surface().is_visible(Region::StartPanel));
    assert_eq!(vm.session().responses().len(), 3);

    vm.start().unwrap();
    let surface = vm.surface();
    assert!(surface.is_visible(Region::QuestionPanel));
    assert_eq!(surface.text(Region::QuestionCounter), Some("Question 1 of 3"));
    assert_eq!(surface.text(Region::TypeBadge), Some("Vocabulary"));
    assert_eq!(surface.class(Region::TypeBadge), Some("badge bg-primary"));
    assert!(surface.is_visible(Region::ExamplePanel));
    assert_eq!(surface.text(Region::Timer), Some("10:00"));
    assert!(!surface.is_enabled(Region::PrevButton));
    assert!(surface.is_visible(Region::NextButton));
    assert!(!surface.is_visible(Region::FinishButton));

    vm.surface_mut().type_input("X");
    assert!(vm.advance(Direction::Next).unwrap());
    assert_eq!(vm.session().responses().get(0), Some("X"));
    assert_eq!(vm.session().current_index(), 1);
    assert_eq!(vm.surface().read_value(Region::ResponseInput).as_deref(), Some(""));
    assert!(!vm.surface().is_visible(Region::ExamplePanel));

    vm.surface_mut().type_input("I gave up.");
    vm.advance(Direction::Next).unwrap();
    assert!(vm.surface().is_visible(Region::FinishButton));
    assert!(!vm.surface().is_visible(Region::NextButton));

    let writes = vm.surface().write_count();
    assert!(!vm.advance(Direction::Next).unwrap());
    assert_eq!(vm.surface().write_count(), writes);

    vm.advance(Direction::Previous).unwrap();
    assert_eq!(
        vm.surface().read_value(Region::ResponseInput).as_deref(),
        Some("I gave up.")
    );
    vm.advance(Direction::Next).unwrap();

    vm.surface_mut().type_input("We broke the ice.");
    vm.finish().await.unwrap();

    assert_eq!(vm.session().phase(), &SessionPhase::Complete);
    let surface = vm.surface();
    assert!(surface.is_visible(Region::CompletionPanel));
    assert!(!surface.is_visible(Region::QuestionPanel));
    assert_eq!(surface.text(Region::AnsweredCount), Some("3 of 3 answered"));
    assert_eq!(surface.text(Region::ElapsedTime), Some("00:00"));
    assert_eq!(surface.text(Region::ResultMessage), Some("Test submitted"));

    let payloads = submitter.calls.lock().unwrap();
    let sentences: Vec<_> = payloads[0]
        .responses()
        .iter()
        .map(|response| response.user_sentence.as_str())
        .collect();
    assert_eq!(sentences, ["X", "I gave up.", "We broke the ice."]);
}

#[tokio::test]
async fn timer_of_two_seconds_finishes_once() {
    let submitter = Arc::new(CountingSubmitter::default());
    let mut vm = vm_with(
        StaticSource(Ok(three_questions())),
        submitter.clone(),
        SessionConfig::regular().with_timer(Some(2)),
        MemorySurface::full(),
    );
    vm.load().await.unwrap();
    vm.start().unwrap();
    assert_eq!(vm.surface().class(Region::Timer), Some("timer text-danger"));

    assert_eq!(vm.tick().await.unwrap(), TickOutcome::Running { remaining: 1 });
    assert_eq!(vm.surface().text(Region::Timer), Some("00:01"));
    assert_eq!(vm.tick().await.unwrap(), TickOutcome::Expired);
    assert_eq!(vm.tick().await.unwrap(), TickOutcome::Ignored);

    assert_eq!(submitter.calls.lock().unwrap().len(), 1);
    assert_eq!(vm.session().phase(), &SessionPhase::Complete);
    assert!(!vm.session().timer_running());
}

#[tokio::test]
async fn submit_failure_keeps_the_test_on_screen() {
    let submitter = Arc::new(CountingSubmitter {
        reject: true,
        ..CountingSubmitter::default()
    });
    let mut vm = vm_with(
        StaticSource(Ok(three_questions())),
        submitter,
        SessionConfig::regular(),
        MemorySurface::full(),
    );
    vm.load().await.unwrap();
    vm.start().unwrap();
    vm.surface_mut().type_input("kept");

    let err = vm.finish().await.unwrap_err();
    assert_eq!(err, ViewError::SubmitFailure);
    assert_eq!(vm.session().phase(), &SessionPhase::InProgress);
    assert_eq!(vm.session().responses().get(0), Some("kept"));
    assert!(vm.surface().is_visible(Region::SubmitError));
    assert!(vm.surface().is_visible(Region::QuestionPanel));
    assert!(
        vm.surface()
            .text(Region::SubmitError)
            .is_some_and(|text| text.contains("server busy"))
    );
}

#[tokio::test]
async fn load_failure_shows_reload_and_recovers() {
    let mut vm = vm_with(
        StaticSource(Err("Failed to load questions".into())),
        Arc::new(CountingSubmitter::default()),
        SessionConfig::regular(),
        MemorySurface::full(),
    );
    assert_eq!(vm.load().await.unwrap_err(), ViewError::LoadFailure);
    assert!(vm.surface().is_visible(Region::ReloadButton));
    assert_eq!(
        vm.surface().text(Region::StatusPanel),
        Some("Failed to load questions")
    );
    assert_eq!(vm.start().unwrap_err(), ViewError::NotAllowed);
    assert_eq!(vm.reload().await.unwrap_err(), ViewError::LoadFailure);
}

#[tokio::test]
async fn empty_result_uses_config_message() {
    let config = SessionConfig::mastery();
    let mut vm = vm_with(
        StaticSource(Ok(Vec::new())),
        Arc::new(CountingSubmitter::default()),
        config.clone(),
        MemorySurface::full(),
    );
    assert_eq!(vm.load().await.unwrap_err(), ViewError::EmptyResultSet);
    assert_eq!(vm.surface().text(Region::StatusPanel), Some(config.empty_message()));
    assert_eq!(vm.surface().text(Region::StatusHint), Some(config.empty_suggestion()));
    assert!(!vm.surface().is_visible(Region::StartPanel));
}

#[tokio::test]
async fn download_before_completion_shows_notice() {
    let mut vm = vm_with(
        StaticSource(Ok(three_questions())),
        Arc::new(CountingSubmitter::default()),
        SessionConfig::regular(),
        MemorySurface::full(),
    );
    vm.load().await.unwrap();
    assert_eq!(vm.download().unwrap_err(), ViewError::NoResultForDownload);
    assert!(vm.surface().is_visible(Region::DownloadNotice));

    vm.start().unwrap();
    vm.finish().await.unwrap();
    let artifact = vm.download().unwrap();
    assert_eq!(artifact.filename(), "test-results-2023-11-14.json");
    assert!(!vm.surface().is_visible(Region::DownloadNotice));
}

#[tokio::test]
async fn keyboard_shortcuts_follow_config() {
    let submitter = Arc::new(CountingSubmitter::default());
    let mut vm = vm_with(
        StaticSource(Ok(three_questions())),
        submitter.clone(),
        SessionConfig::mastery(),
        MemorySurface::full(),
    );
    vm.load().await.unwrap();
    assert!(!vm.handle_key(KeyCommand::Next).await.unwrap());
    vm.start().unwrap();

    assert!(!vm.handle_key(KeyCommand::Finish).await.unwrap());
    assert!(vm.handle_key(KeyCommand::Next).await.unwrap());
    assert!(vm.handle_key(KeyCommand::Previous).await.unwrap());
    vm.handle_key(KeyCommand::Next).await.unwrap();
    vm.handle_key(KeyCommand::Next).await.unwrap();
    assert!(vm.handle_key(KeyCommand::Finish).await.unwrap());
    assert_eq!(submitter.calls.lock().unwrap().len(), 1);

    let mut disabled = vm_with(
        StaticSource(Ok(three_questions())),
        Arc::new(CountingSubmitter::default()),
        SessionConfig::regular().with_keyboard_navigation(false),
        MemorySurface::full(),
    );
    disabled.load().await.unwrap();
    disabled.start().unwrap();
    assert!(!disabled.handle_key(KeyCommand::Next).await.unwrap());
    assert_eq!(disabled.session().current_index(), 0);
}

#[tokio::test]
async fn partial_surface_skips_missing_regions() {
    let mut vm = vm_with(
        StaticSource(Ok(three_questions())),
        Arc::new(CountingSubmitter::default()),
        SessionConfig::regular(),
        MemorySurface::with_regions(&[Region::QuestionText]),
    );
    vm.load().await.unwrap();
    vm.start().unwrap();
    assert_eq!(vm.surface().text(Region::QuestionText), Some("run"));

    assert!(!vm.save_current_response());
    assert!(!vm.on_input());
    assert!(vm.advance(Direction::Next).unwrap());
    assert_eq!(vm.session().responses().get(0), Some(""));
    assert_eq!(vm.surface().text(Region::QuestionText), Some("give up"));
}

#[tokio::test]
async fn autosave_writes_on_input_only_when_enabled() {
    let mut vm = vm_with(
        StaticSource(Ok(three_questions())),
        Arc::new(CountingSubmitter::default()),
        SessionConfig::regular().with_autosave(false),
        MemorySurface::full(),
    );
    vm.load().await.unwrap();
    vm.start().unwrap();
    vm.surface_mut().type_input("draft");
    assert!(!vm.on_input());
    assert_eq!(vm.session().responses().get(0), Some(""));
    assert!(vm.save_current_response());
    assert_eq!(vm.session().responses().get(0), Some("draft"));
}
