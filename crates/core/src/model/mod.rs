mod config;
mod evaluation;
mod ids;
mod item_type;
mod mastery;
mod question;
mod responses;

pub use ids::QuestionId;

pub use config::{
    DEFAULT_QUESTION_COUNT, Endpoint, HttpMethod, REGULAR_TIMER_SECS, SessionConfig, TestKind,
};
pub use evaluation::{
    EvaluatedResponse, EvaluationCriteria, EvaluationError, EvaluationSummary, PASS_SCORE,
};
pub use item_type::{ItemType, NEUTRAL_BADGE};
pub use mastery::{MASTERY_PROMOTION_THRESHOLD, MasteryLevel};
pub use question::{Question, QuestionError};
pub use responses::ResponseBuffer;
