use services::TestSession;

/// Everything shown for the current question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionCardVm {
    pub label: String,
    pub badge_class: String,
    pub counter: String,
    pub text: String,
    pub example: Option<String>,
    pub definition: Option<String>,
    pub context: Option<String>,
    pub response: String,
    pub progress_percent: u8,
    pub prev_enabled: bool,
    pub next_visible: bool,
    pub finish_visible: bool,
    /// Off while a submission is in flight.
    pub finish_enabled: bool,
}

impl QuestionCardVm {
    /// Maps the displayed question, `None` when there is none.
    #[must_use]
    pub fn from_session(session: &TestSession) -> Option<Self> {
        let question = session.current_question()?;
        let config = session.config();
        let item_type = question.item_type();
        let progress = session.progress();

        Some(Self {
            label: item_type.label(),
            badge_class: format!("badge {}", item_type.badge_class()),
            counter: format!("Question {} of {}", progress.position, progress.total),
            text: question.text().to_string(),
            example: question
                .example()
                .filter(|_| config.shows_examples())
                .map(str::to_string),
            definition: question
                .meaning()
                .filter(|_| config.shows_definitions())
                .map(str::to_string),
            context: config
                .shows_context_panel()
                .then(|| format!("Type: {}", item_type.label())),
            response: session.current_response().unwrap_or_default().to_string(),
            progress_percent: progress.percent,
            prev_enabled: !session.is_first(),
            next_visible: !session.is_last(),
            finish_visible: session.is_last(),
            finish_enabled: !session.is_submitting(),
        })
    }
}
