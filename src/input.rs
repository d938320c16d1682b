//! Mock input stream
//!
//! The ordered, cursor-advancing sequence of pre-supplied values standing
//! in for live interactive input. External strategies render it as the
//! child process's stdin; the embedded evaluator consumes it one read at
//! a time.

/// Values seeded when the embedded strategy receives no inputs at all.
pub const DEFAULT_MOCK_VALUES: &[&str] = &["5", "10", "test", "hello", "20", "3.14", "yes"];

/// Value substituted once the stream is exhausted (embedded strategy policy).
pub const EXHAUSTED_FALLBACK: &str = "default";

#[derive(Debug, Clone)]
pub struct MockInputStream {
    values: Vec<String>,
    cursor: usize,
}

impl MockInputStream {
    pub fn new(values: Vec<String>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Stream for the embedded evaluator: an empty supplied list is
    /// replaced by [`DEFAULT_MOCK_VALUES`].
    pub fn seeded(values: &[String]) -> Self {
        if values.is_empty() {
            Self::new(DEFAULT_MOCK_VALUES.iter().map(|s| s.to_string()).collect())
        } else {
            Self::new(values.to_vec())
        }
    }

    /// Consume the next value, advancing the cursor.
    pub fn next(&mut self) -> Option<String> {
        let value = self.values.get(self.cursor).cloned();
        if value.is_some() {
            self.cursor += 1;
        }
        value
    }

    /// Consume the next value, falling back to [`EXHAUSTED_FALLBACK`].
    pub fn next_or_default(&mut self) -> String {
        self.next().unwrap_or_else(|| EXHAUSTED_FALLBACK.to_string())
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.values.len()
    }
}

/// Render pre-supplied values as a child process's stdin content:
/// newline-joined with a trailing newline. `None` when there is nothing
/// to feed, so the child sees an immediately closed pipe.
pub fn stdin_payload(inputs: &[String]) -> Option<String> {
    if inputs.is_empty() {
        None
    } else {
        Some(format!("{}\n", inputs.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_advances_in_order() {
        let mut stream = MockInputStream::new(vec!["a".into(), "b".into()]);
        assert_eq!(stream.next().as_deref(), Some("a"));
        assert_eq!(stream.next().as_deref(), Some("b"));
        assert_eq!(stream.next(), None);
        assert!(stream.is_exhausted());
    }

    #[test]
    fn exhaustion_falls_back_to_fixed_default() {
        let mut stream = MockInputStream::new(vec!["only".into()]);
        assert_eq!(stream.next_or_default(), "only");
        assert_eq!(stream.next_or_default(), EXHAUSTED_FALLBACK);
        assert_eq!(stream.next_or_default(), EXHAUSTED_FALLBACK);
    }

    #[test]
    fn empty_supplied_list_is_seeded_with_defaults() {
        let mut stream = MockInputStream::seeded(&[]);
        assert_eq!(stream.next().as_deref(), Some("5"));
        assert_eq!(stream.next().as_deref(), Some("10"));
    }

    #[test]
    fn non_empty_supplied_list_is_kept_verbatim() {
        let mut stream = MockInputStream::seeded(&["3".to_string(), "4".to_string()]);
        assert_eq!(stream.next().as_deref(), Some("3"));
        assert_eq!(stream.next().as_deref(), Some("4"));
        assert_eq!(stream.next_or_default(), EXHAUSTED_FALLBACK);
    }

    #[test]
    fn stdin_payload_joins_with_newlines() {
        assert_eq!(stdin_payload(&[]), None);
        assert_eq!(
            stdin_payload(&["3".to_string(), "4".to_string()]).as_deref(),
            Some("3\n4\n")
        );
    }
}
