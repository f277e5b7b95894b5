use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::item_type::ItemType;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has no text")]
    EmptyText { id: QuestionId },
}

/// A single test prompt: one vocabulary item the learner writes a sentence for.
///
/// Immutable once constructed. Blank optional fields are normalized to `None`
/// so renderers only need to check for presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    id: QuestionId,
    #[serde(rename = "type")]
    item_type: ItemType,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meaning: Option<String>,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if `text` is blank.
    pub fn new(
        id: QuestionId,
        item_type: ItemType,
        text: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText { id });
        }
        Ok(Self {
            id,
            item_type,
            text,
            example: None,
            meaning: None,
        })
    }

    #[must_use]
    pub fn with_example(mut self, example: Option<String>) -> Self {
        self.example = non_blank(example);
        self
    }

    #[must_use]
    pub fn with_meaning(mut self, meaning: Option<String>) -> Self {
        self.meaning = non_blank(meaning);
        self
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn item_type(&self) -> &ItemType {
        &self.item_type
    }

    /// The word, phrasal verb or idiom being tested.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    /// Definition or meaning, when the source provides one.
    #[must_use]
    pub fn meaning(&self) -> Option<&str> {
        self.meaning.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Wire shape accepted from question sources.
///
/// Regular tests send `text`/`example`/`meaning`; mastery tests send
/// `word`/`example_sentence` and either `definition` or `meaning`.
#[derive(Deserialize)]
struct QuestionRecord {
    id: QuestionId,
    #[serde(rename = "type")]
    item_type: ItemType,
    #[serde(alias = "word")]
    text: String,
    #[serde(default, alias = "example_sentence")]
    example: Option<String>,
    #[serde(default, alias = "definition")]
    meaning: Option<String>,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Ok(Question::new(record.id, record.item_type, record.text)?
            .with_example(record.example)
            .with_meaning(record.meaning))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_regular_question_record() {
        let value = json!({
            "type": "idiom",
            "id": 4,
            "text": "break the ice",
            "meaning": "to start a conversation",
            "example": "She told a joke to break the ice."
        });
        let question: Question = serde_json::from_value(value).unwrap();
        assert_eq!(question.id(), &QuestionId::new(4));
        assert_eq!(question.item_type(), &ItemType::Idiom);
        assert_eq!(question.text(), "break the ice");
        assert_eq!(question.meaning(), Some("to start a conversation"));
        assert_eq!(question.example(), Some("She told a joke to break the ice."));
    }

    #[test]
    fn parses_mastery_question_record() {
        let value = json!({
            "type": "vocabulary",
            "format": "sentence_writing",
            "id": 9,
            "word": "ephemeral",
            "definition": "lasting a short time",
            "example_sentence": null,
            "difficulty_level": "hard"
        });
        let question: Question = serde_json::from_value(value).unwrap();
        assert_eq!(question.text(), "ephemeral");
        assert_eq!(question.meaning(), Some("lasting a short time"));
        assert_eq!(question.example(), None);
    }

    #[test]
    fn parses_text_id() {
        let value = json!({ "type": "vocabulary", "id": "v-17", "text": "run" });
        let question: Question = serde_json::from_value(value).unwrap();
        assert_eq!(question.id(), &QuestionId::from("v-17"));
        assert_eq!(question.text(), "run");
    }

    #[test]
    fn blank_example_is_treated_as_absent() {
        let question = Question::new(QuestionId::new(1), ItemType::Vocabulary, "run")
            .unwrap()
            .with_example(Some("   ".into()));
        assert_eq!(question.example(), None);
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new(QuestionId::new(3), ItemType::Idiom, "  ").unwrap_err();
        assert_eq!(err, QuestionError::EmptyText { id: QuestionId::new(3) });

        let value = json!({ "type": "idiom", "id": 3, "text": "" });
        assert!(serde_json::from_value::<Question>(value).is_err());
    }
}
