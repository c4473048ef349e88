//! User-facing explainability trace.

/// Append-only, numbered step log returned with every response.
///
/// One log belongs to one run; it is never shared between requests.
#[derive(Debug, Default, Clone)]
pub struct ExplainLog {
    entries: Vec<String>,
}

impl ExplainLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step as `[n] message`, numbering from 1.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        let step = self.entries.len() + 1;
        tracing::debug!(step, "{}", message);
        self.entries.push(format!("[{}] {}", step, message));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_numbered_in_order() {
        let mut log = ExplainLog::new();
        assert!(log.is_empty());
        log.push("first");
        log.push(String::from("second"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries(), ["[1] first", "[2] second"]);
        assert_eq!(log.into_entries(), vec!["[1] first", "[2] second"]);
    }
}
