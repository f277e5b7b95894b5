/// Ordered response buffer, one entry per question.
///
/// Index-addressed rather than keyed: entry `i` always belongs to question `i`.
/// The length is fixed at construction and only changes through `reset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBuffer {
    entries: Vec<String>,
}

impl ResponseBuffer {
    /// Creates a buffer of `len` empty responses.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            entries: vec![String::new(); len],
        }
    }

    /// Clears every response and resizes the buffer to `len`.
    pub fn reset(&mut self, len: usize) {
        self.entries.clear();
        self.entries.resize(len, String::new());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Overwrites the response at `index`.
    ///
    /// Returns `false` without writing when `index` is out of range.
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Number of responses containing something other than whitespace.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_empty_entries() {
        let buffer = ResponseBuffer::with_len(3);
        assert_eq!(buffer.len(), 3);
        assert!(buffer.iter().all(str::is_empty));
        assert_eq!(buffer.answered_count(), 0);
    }

    #[test]
    fn set_is_bounded() {
        let mut buffer = ResponseBuffer::with_len(2);
        assert!(buffer.set(1, "I run fast."));
        assert!(!buffer.set(2, "out of range"));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.get(1), Some("I run fast."));
        assert_eq!(buffer.get(2), None);
    }

    #[test]
    fn answered_count_ignores_whitespace() {
        let mut buffer = ResponseBuffer::with_len(3);
        buffer.set(0, "A sentence.");
        buffer.set(1, "   ");
        assert_eq!(buffer.answered_count(), 1);
    }

    #[test]
    fn reset_clears_and_resizes() {
        let mut buffer = ResponseBuffer::with_len(2);
        buffer.set(0, "kept?");
        buffer.reset(4);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.get(0), Some(""));
    }
}
