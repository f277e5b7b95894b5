use serde::{Deserialize, Serialize};
use std::fmt;

/// Which test a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Timed sentence test over items with mastery level 2 or higher.
    Regular,
    /// Untimed sentence test over fully mastered items, graded externally.
    Mastery,
}

impl TestKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TestKind::Regular => "regular",
            TestKind::Mastery => "mastery",
        }
    }

    /// Parses `regular` / `mastery` (case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "regular" => Some(TestKind::Regular),
            "mastery" => Some(TestKind::Mastery),
            _ => None,
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Method and path of a JSON endpoint, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
}

impl Endpoint {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
        }
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
        }
    }
}

pub const REGULAR_TIMER_SECS: u32 = 600;
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Immutable description of how a test session behaves.
///
/// Regular and mastery tests differ only in this data; the session logic is
/// shared. Build one from a preset and adjust it with the `with_*` methods
/// before handing it to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    kind: TestKind,
    timer_secs: Option<u32>,
    question_count: usize,
    shows_examples: bool,
    shows_definitions: bool,
    context_panel: bool,
    autosave: bool,
    keyboard_navigation: bool,
    questions_endpoint: Endpoint,
    submit_endpoint: Endpoint,
    empty_message: String,
    empty_suggestion: String,
}

impl SessionConfig {
    /// Ten-minute test over items with mastery level 2 or higher.
    #[must_use]
    pub fn regular() -> Self {
        Self {
            kind: TestKind::Regular,
            timer_secs: Some(REGULAR_TIMER_SECS),
            question_count: DEFAULT_QUESTION_COUNT,
            shows_examples: true,
            shows_definitions: true,
            context_panel: false,
            autosave: true,
            keyboard_navigation: true,
            questions_endpoint: Endpoint::post("/api/generate-test"),
            submit_endpoint: Endpoint::post("/api/submit-test"),
            empty_message: "No words with mastery level 2 or higher yet. You need mastery level ≥2 to take a test."
                .into(),
            empty_suggestion: "Practice with flashcards to raise your mastery levels.".into(),
        }
    }

    /// Untimed test over mastered items, exported for external evaluation.
    ///
    /// The per-question context panel is enabled but gated by
    /// `shows_definitions`, which this preset leaves off, so the panel stays
    /// hidden unless a caller opts in explicitly.
    #[must_use]
    pub fn mastery() -> Self {
        Self {
            kind: TestKind::Mastery,
            timer_secs: None,
            question_count: DEFAULT_QUESTION_COUNT,
            shows_examples: false,
            shows_definitions: false,
            context_panel: true,
            autosave: true,
            keyboard_navigation: true,
            questions_endpoint: Endpoint::get("/api/mastered-test-questions"),
            submit_endpoint: Endpoint::post("/api/submit-mastered-test"),
            empty_message: "No mastered words found for testing. Master some words first!"
                .into(),
            empty_suggestion: "Keep practicing until words reach mastery level 5.".into(),
        }
    }

    #[must_use]
    pub fn for_kind(kind: TestKind) -> Self {
        match kind {
            TestKind::Regular => Self::regular(),
            TestKind::Mastery => Self::mastery(),
        }
    }

    /// Enables a countdown of `secs` seconds, or disables the timer with `None`.
    ///
    /// A zero-second timer is treated as disabled.
    #[must_use]
    pub fn with_timer(mut self, secs: Option<u32>) -> Self {
        self.timer_secs = secs.filter(|s| *s > 0);
        self
    }

    /// Caps how many questions a session keeps. Zero keeps the current cap.
    #[must_use]
    pub fn with_question_count(mut self, count: usize) -> Self {
        if count > 0 {
            self.question_count = count;
        }
        self
    }

    #[must_use]
    pub fn with_shows_examples(mut self, shows: bool) -> Self {
        self.shows_examples = shows;
        self
    }

    #[must_use]
    pub fn with_shows_definitions(mut self, shows: bool) -> Self {
        self.shows_definitions = shows;
        self
    }

    #[must_use]
    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    #[must_use]
    pub fn with_keyboard_navigation(mut self, enabled: bool) -> Self {
        self.keyboard_navigation = enabled;
        self
    }

    #[must_use]
    pub fn kind(&self) -> TestKind {
        self.kind
    }

    #[must_use]
    pub fn timer_secs(&self) -> Option<u32> {
        self.timer_secs
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn shows_examples(&self) -> bool {
        self.shows_examples
    }

    #[must_use]
    pub fn shows_definitions(&self) -> bool {
        self.shows_definitions
    }

    /// Whether the type-only context panel renders.
    ///
    /// Requires both the panel and `shows_definitions`.
    #[must_use]
    pub fn shows_context_panel(&self) -> bool {
        self.context_panel && self.shows_definitions
    }

    #[must_use]
    pub fn autosave(&self) -> bool {
        self.autosave
    }

    #[must_use]
    pub fn keyboard_navigation(&self) -> bool {
        self.keyboard_navigation
    }

    #[must_use]
    pub fn questions_endpoint(&self) -> &Endpoint {
        &self.questions_endpoint
    }

    #[must_use]
    pub fn submit_endpoint(&self) -> &Endpoint {
        &self.submit_endpoint
    }

    #[must_use]
    pub fn empty_message(&self) -> &str {
        &self.empty_message
    }

    #[must_use]
    pub fn empty_suggestion(&self) -> &str {
        &self.empty_suggestion
    }
}
