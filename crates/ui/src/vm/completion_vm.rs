use services::{Clock, TestSession};

use crate::vm::time_fmt::format_elapsed;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionVm {
    pub answered: usize,
    pub total: usize,
    pub answered_str: String,
    pub elapsed_str: String,
    pub message: Option<String>,
}

impl CompletionVm {
    #[must_use]
    pub fn from_session(session: &TestSession, clock: &Clock) -> Self {
        let progress = session.progress();
        Self {
            answered: progress.answered,
            total: progress.total,
            answered_str: format!("{} of {} answered", progress.answered, progress.total),
            elapsed_str: format_elapsed(session.elapsed_secs(clock)),
            message: session.result().and_then(|result| result.message.clone()),
        }
    }
}
