use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a vocabulary item as issued by the question source.
///
/// Opaque: numeric ids stay numbers and anything else is kept as a string, so
/// the id echoes back to the submitter exactly as it arrived. Ids are only
/// unique within an item type: vocabulary word 3 and idiom 3 are different items.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Num(u64),
    Text(String),
}

impl QuestionId {
    /// Creates a numeric `QuestionId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self::Num(id)
    }
}

impl From<u64> for QuestionId {
    fn from(id: u64) -> Self {
        Self::Num(id)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(id) => write!(f, "QuestionId({id})"),
            Self::Text(id) => write!(f, "QuestionId({id:?})"),
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_display() {
        let id = QuestionId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "QuestionId(42)");

        let id = QuestionId::from("v-17");
        assert_eq!(id.to_string(), "v-17");
        assert_eq!(format!("{id:?}"), "QuestionId(\"v-17\")");
    }

    #[test]
    fn numbers_stay_numbers_and_strings_stay_strings() {
        let json = serde_json::to_string(&QuestionId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: QuestionId = serde_json::from_str("7").unwrap();
        assert_eq!(back, QuestionId::new(7));

        let back: QuestionId = serde_json::from_str("\"v-17\"").unwrap();
        assert_eq!(back, QuestionId::from("v-17"));
        assert_eq!(serde_json::to_string(&back).unwrap(), "\"v-17\"");
    }

    #[test]
    fn numeric_string_is_not_coerced() {
        let id: QuestionId = serde_json::from_str("\"7\"").unwrap();
        assert_ne!(id, QuestionId::new(7));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }
}
