use serde::{Deserialize, Serialize};

/// Score on the 0-10 evaluation scale at which an item gains a mastery level.
pub const MASTERY_PROMOTION_THRESHOLD: f64 = 8.0;

/// How well a learner knows an item, from 0 (new) to 5 (mastered).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasteryLevel(u8);

impl MasteryLevel {
    pub const MAX: u8 = 5;
    /// Lowest level at which items appear in regular tests.
    pub const TESTABLE: u8 = 2;

    /// Creates a level, clamping values above the maximum.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_mastered(self) -> bool {
        self.0 == Self::MAX
    }

    #[must_use]
    pub fn is_testable(self) -> bool {
        self.0 >= Self::TESTABLE
    }

    /// Level after a mastery evaluation: unchanged on a pass, reset to zero otherwise.
    #[must_use]
    pub fn after_evaluation(self, passed: bool) -> Self {
        if passed { self } else { Self(0) }
    }

    /// Level after a scored test answer: one up when `score >= threshold`.
    #[must_use]
    pub fn promote_if(self, score: f64, threshold: f64) -> Self {
        if score >= threshold {
            Self::new(self.0.saturating_add(1))
        } else {
            self
        }
    }
}
