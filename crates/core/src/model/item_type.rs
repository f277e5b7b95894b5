use serde::{Deserialize, Serialize};
use std::fmt;

/// Badge class used for item types without an entry in the badge table.
pub const NEUTRAL_BADGE: &str = "bg-secondary";

/// Wire name, display label, badge class.
static ITEM_TYPES: [(&str, &str, &str); 3] = [
    ("vocabulary", "Vocabulary", "bg-primary"),
    ("phrasal_verb", "Phrasal Verb", "bg-success"),
    ("idiom", "Idiom", "bg-warning"),
];

/// Kind of vocabulary item a question is about.
///
/// Unknown wire names are kept in `Other` and fall back to a capitalized
/// label and the neutral badge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemType {
    Vocabulary,
    PhrasalVerb,
    Idiom,
    Other(String),
}

impl ItemType {
    /// Wire name of this type, as sent and received in JSON.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ItemType::Vocabulary => ITEM_TYPES[0].0,
            ItemType::PhrasalVerb => ITEM_TYPES[1].0,
            ItemType::Idiom => ITEM_TYPES[2].0,
            ItemType::Other(name) => name,
        }
    }

    /// Human readable label shown on the question badge.
    #[must_use]
    pub fn label(&self) -> String {
        match lookup(self.as_str()) {
            Some((_, label, _)) => (*label).to_string(),
            None => capitalize(self.as_str()),
        }
    }

    /// CSS-style class for the question badge.
    #[must_use]
    pub fn badge_class(&self) -> &'static str {
        lookup(self.as_str()).map_or(NEUTRAL_BADGE, |(_, _, badge)| *badge)
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, ItemType::Other(_))
    }
}

fn lookup(name: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    ITEM_TYPES.iter().find(|(wire, _, _)| *wire == name)
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<String> for ItemType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "vocabulary" => ItemType::Vocabulary,
            "phrasal_verb" => ItemType::PhrasalVerb,
            "idiom" => ItemType::Idiom,
            _ => ItemType::Other(value),
        }
    }
}

impl From<&str> for ItemType {
    fn from(value: &str) -> Self {
        ItemType::from(value.to_string())
    }
}

impl From<ItemType> for String {
    fn from(value: ItemType) -> Self {
        match value {
            ItemType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_use_table_labels_and_badges() {
        assert_eq!(ItemType::Vocabulary.label(), "Vocabulary");
        assert_eq!(ItemType::PhrasalVerb.label(), "Phrasal Verb");
        assert_eq!(ItemType::Idiom.label(), "Idiom");
        assert_eq!(ItemType::Vocabulary.badge_class(), "bg-primary");
        assert_eq!(ItemType::PhrasalVerb.badge_class(), "bg-success");
        assert_eq!(ItemType::Idiom.badge_class(), "bg-warning");
    }

    #[test]
    fn unknown_types_are_capitalized_with_neutral_badge() {
        let other = ItemType::from("collocation");
        assert_eq!(other, ItemType::Other("collocation".into()));
        assert_eq!(other.label(), "Collocation");
        assert_eq!(other.badge_class(), NEUTRAL_BADGE);
        assert!(!other.is_known());
    }

    #[test]
    fn empty_unknown_type_has_empty_label() {
        assert_eq!(ItemType::from("").label(), "");
    }

    #[test]
    fn serializes_as_wire_name() {
        let json = serde_json::to_string(&ItemType::PhrasalVerb).unwrap();
        assert_eq!(json, "\"phrasal_verb\"");
        let parsed: ItemType = serde_json::from_str("\"idiom\"").unwrap();
        assert_eq!(parsed, ItemType::Idiom);
        let other: ItemType = serde_json::from_str("\"slang\"").unwrap();
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"slang\"");
    }
}
