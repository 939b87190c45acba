//! Error and diagnostic types for the scan pipeline.
//!
//! Fatal errors abort generation for the file they occur in. Diagnostics are
//! collected alongside a successful result and never stop a file.

use std::fmt;

use thiserror::Error;

/// Malformed marker syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: unterminated marker arguments")]
    Unterminated { line: usize },

    #[error("line {line}: unexpected text `{text}` after marker")]
    TrailingText { line: usize, text: String },

    #[error("line {line}: {marker}() takes no arguments")]
    UnexpectedArguments { line: usize, marker: &'static str },

    #[error("line {line}: fixture requires at least one argument")]
    FixtureWithoutArguments { line: usize },

    #[error("line {line}: fixture takes at most three arguments, found {count}")]
    FixtureTooManyArguments { line: usize, count: usize },

    #[error("line {line}: invalid fixture function `{found}`")]
    InvalidFixtureFunction { line: usize, found: String },

    #[error("line {line}: test case needs a call like `func(args)`, found `{found}`")]
    TestCaseNotACall { line: usize, found: String },

    #[error("line {line}: nested include region (already open since line {opened})")]
    NestedInclude { line: usize, opened: usize },

    #[error("line {line}: unmatched include end")]
    UnmatchedIncludeEnd { line: usize },

    #[error("line {line}: {marker}() not allowed inside an include region")]
    MarkerInInclude { line: usize, marker: &'static str },
}

/// Structural violation of fixture nesting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    #[error("nested fixture at line {line} (already open since line {opened})")]
    Nested { line: usize, opened: usize },

    #[error("unmatched fixture end at line {line}")]
    UnmatchedEnd { line: usize },
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("fixture error: {0}")]
    Fixture(#[from] FixtureError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file whose pipeline stopped on a fatal error.
///
/// No generated output exists for such a file.
#[derive(Debug, Error)]
#[error("{file}: {error}")]
pub struct FileFailure {
    pub file: String,
    pub error: FileError,
}

impl FileFailure {
    pub fn new(file: impl Into<String>, error: impl Into<FileError>) -> Self {
        Self {
            file: file.into(),
            error: error.into(),
        }
    }
}

/// Non-fatal findings attached to a file's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    UnclosedFixture { opened: usize },
    UnclosedInclude { opened: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnclosedFixture { opened } => write!(
                f,
                "fixture opened at line {} never closed; implicitly closed at EOF",
                opened
            ),
            Diagnostic::UnclosedInclude { opened } => write!(
                f,
                "include region opened at line {} never closed; implicitly closed at EOF",
                opened
            ),
        }
    }
}
