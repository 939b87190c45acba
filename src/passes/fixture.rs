use crate::error::{Diagnostic, FixtureError};
use crate::registry::FixtureCalls;

/// The open fixture: its functions and the line it was opened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureScope {
    pub calls: FixtureCalls,
    pub opened: usize,
}

/// Tracks the fixture scope while a file is scanned.
///
/// `None` is idle, `Some` is inside a fixture. Fixtures do not nest.
#[derive(Debug, Default)]
pub struct FixtureTrackerPass {
    scope: Option<FixtureScope>,
}

impl FixtureTrackerPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, calls: FixtureCalls, line: usize) -> Result<(), FixtureError> {
        if let Some(open) = &self.scope {
            return Err(FixtureError::Nested {
                line,
                opened: open.opened,
            });
        }
        self.scope = Some(FixtureScope {
            calls,
            opened: line,
        });
        Ok(())
    }

    pub fn end(&mut self, line: usize) -> Result<FixtureScope, FixtureError> {
        self.scope.take().ok_or(FixtureError::UnmatchedEnd { line })
    }

    pub fn current(&self) -> Option<&FixtureScope> {
        self.scope.as_ref()
    }

    /// Copy of the open scope's functions for a test registered now.
    pub fn capture(&self) -> Option<FixtureCalls> {
        self.scope.as_ref().map(|s| s.calls.clone())
    }

    /// End of file. An open scope is closed with a diagnostic.
    pub fn finish(self) -> Option<Diagnostic> {
        self.scope
            .map(|open| Diagnostic::UnclosedFixture { opened: open.opened })
    }
}
