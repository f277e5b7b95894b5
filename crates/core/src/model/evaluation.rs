use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::item_type::ItemType;

/// Minimum overall score (0-100) for a mastered item to stay mastered.
pub const PASS_SCORE: f64 = 70.0;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EvaluationError {
    #[error("overall score {score} for question {id} is outside 0-100")]
    ScoreOutOfRange { id: QuestionId, score: f64 },
}

/// Criteria an external evaluator fills in for one sentence.
///
/// Every field starts out `null` in the exported test and may still be
/// missing when results come back; missing values never count towards a pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCriteria {
    #[serde(default)]
    pub word_used_correctly: Option<bool>,
    #[serde(default)]
    pub demonstrates_understanding: Option<bool>,
    #[serde(default)]
    pub grammar_correct: Option<bool>,
    #[serde(default)]
    pub creative_usage: Option<bool>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub evaluator_comments: String,
}

impl EvaluationCriteria {
    /// Whether the item keeps its mastered status.
    ///
    /// Grammar and creativity are recorded but do not gate the result.
    #[must_use]
    pub fn passes(&self) -> bool {
        self.overall_score.unwrap_or(0.0) >= PASS_SCORE
            && self.word_used_correctly.unwrap_or(false)
            && self.demonstrates_understanding.unwrap_or(false)
    }
}

/// One evaluated sentence as returned by the external evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedResponse {
    pub question_id: QuestionId,
    pub word_type: ItemType,
    #[serde(default)]
    pub target_word: Option<String>,
    #[serde(default)]
    pub user_sentence: String,
    #[serde(default)]
    pub evaluation_criteria: EvaluationCriteria,
}

impl EvaluatedResponse {
    /// # Errors
    ///
    /// Returns `EvaluationError::ScoreOutOfRange` if the score is not within 0-100.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        match self.evaluation_criteria.overall_score {
            Some(score) if !(0.0..=100.0).contains(&score) => {
                Err(EvaluationError::ScoreOutOfRange {
                    id: self.question_id.clone(),
                    score,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Pass/fail tally over a batch of evaluated responses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvaluationSummary {
    pub total: usize,
    pub passed: Vec<QuestionId>,
    pub failed: Vec<QuestionId>,
    /// Share of passed items, rounded to a whole percent. Zero for an empty batch.
    pub score_percentage: u32,
}

impl EvaluationSummary {
    /// # Errors
    ///
    /// Returns the first `EvaluationError` found in `results`.
    pub fn from_results(results: &[EvaluatedResponse]) -> Result<Self, EvaluationError> {
        let mut passed = Vec::new();
        let mut failed = Vec::new();
        for result in results {
            result.validate()?;
            if result.evaluation_criteria.passes() {
                passed.push(result.question_id.clone());
            } else {
                failed.push(result.question_id.clone());
            }
        }

        let total = results.len();
        let score_percentage = if total == 0 {
            0
        } else {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let pct = (passed.len() as f64 / total as f64 * 100.0).round() as u32;
            pct
        };

        Ok(Self {
            total,
            passed,
            failed,
            score_percentage,
        })
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.passed.len()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
