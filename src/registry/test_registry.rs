use crate::error::Diagnostic;
use crate::registry::TestEntry;

/// Append-only collection of tests in source order.
///
/// Entries are keyed by position, so two entries may share a name.
#[derive(Debug, Default)]
pub struct TestRegistry {
    entries: Vec<TestEntry>,
    ignore_from: Option<usize>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: TestEntry) {
        self.entries.push(entry);
    }

    /// Record an ignore marker. Only the first one counts.
    pub fn ignore_from(&mut self, line: usize) {
        if self.ignore_from.is_none() {
            self.ignore_from = Some(line);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finalize(self, diagnostics: Vec<Diagnostic>) -> Registry {
        Registry {
            entries: self.entries,
            ignore_from: self.ignore_from,
            diagnostics,
        }
    }
}

/// The finalized, immutable registry of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<TestEntry>,
    ignore_from: Option<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl Registry {
    pub fn entries(&self) -> &[TestEntry] {
        &self.entries
    }

    /// Line of the first ignore marker; `None` means nothing is ignored.
    pub fn ignore_from(&self) -> Option<usize> {
        self.ignore_from
    }

    pub fn is_ignored(&self, entry: &TestEntry) -> bool {
        self.ignore_from.is_some_and(|from| entry.line > from)
    }

    /// Entries that take part in generation, in registration order.
    pub fn active(&self) -> impl Iterator<Item = &TestEntry> {
        self.entries.iter().filter(|e| !self.is_ignored(e))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_keeps_order_and_duplicates() {
        let mut registry = TestRegistry::new();
        registry.register(TestEntry::simple("test_b", None, 1));
        registry.register(TestEntry::simple("test_a", None, 2));
        registry.register(TestEntry::simple("test_b", None, 3));
        assert_eq!(registry.len(), 3);

        let registry = registry.finalize(Vec::new());
        let names: Vec<_> = registry
            .entries()
            .iter()
            .map(|e| e.callable.function())
            .collect();
        assert_eq!(names, vec!["test_b", "test_a", "test_b"]);
    }

    #[test]
    fn test_ignore_is_strictly_after_marker_line() {
        let mut registry = TestRegistry::new();
        registry.register(TestEntry::simple("test_before", None, 4));
        registry.ignore_from(5);
        registry.register(TestEntry::simple("test_after", None, 6));

        let registry = registry.finalize(Vec::new());
        assert_eq!(registry.ignore_from(), Some(5));
        assert!(!registry.is_ignored(&registry.entries()[0]));
        assert!(registry.is_ignored(&registry.entries()[1]));
        let active: Vec<_> = registry.active().map(|e| e.line).collect();
        assert_eq!(active, vec![4]);
    }

    #[test]
    fn test_first_ignore_marker_wins() {
        let mut registry = TestRegistry::new();
        registry.ignore_from(10);
        registry.ignore_from(20);
        registry.register(TestEntry::simple("test_late", None, 15));

        let registry = registry.finalize(Vec::new());
        assert_eq!(registry.ignore_from(), Some(10));
        assert_eq!(registry.active().count(), 0);
    }

    #[test]
    fn test_without_marker_nothing_is_ignored() {
        let mut registry = TestRegistry::new();
        registry.register(TestEntry::simple("test_a", None, 1_000_000));
        let registry = registry.finalize(vec![Diagnostic::UnclosedFixture { opened: 2 }]);
        assert_eq!(registry.active().count(), 1);
        assert_eq!(registry.diagnostics().len(), 1);
    }
}
