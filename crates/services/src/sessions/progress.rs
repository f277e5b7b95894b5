/// Aggregated view of test progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    /// One-based position of the displayed question, 0 before the test starts.
    pub position: usize,
    /// Responses holding more than whitespace.
    pub answered: usize,
    /// `position / total` as a whole percentage.
    pub percent: u8,
}

impl SessionProgress {
    #[must_use]
    pub fn new(total: usize, position: usize, answered: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            let ratio = position.min(total) * 100 / total;
            u8::try_from(ratio).unwrap_or(100)
        };
        Self {
            total,
            position,
            answered,
            percent,
        }
    }
}
