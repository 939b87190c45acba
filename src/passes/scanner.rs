//! Line scanner.
//!
//! Splits source text into physical lines and classifies each one. A marker
//! must sit on a single line; there is no continuation handling.

use std::str::Lines;

/// Prefix the C side of the framework puts in front of every marker macro.
pub const MARKER_PREFIX: &str = "TT_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKeyword {
    BeginInclude,
    EndInclude,
    BeginFixture,
    EndFixture,
    TestCase,
    IgnoreFromHere,
}

impl MarkerKeyword {
    pub const ALL: [MarkerKeyword; 6] = [
        MarkerKeyword::BeginInclude,
        MarkerKeyword::EndInclude,
        MarkerKeyword::BeginFixture,
        MarkerKeyword::EndFixture,
        MarkerKeyword::TestCase,
        MarkerKeyword::IgnoreFromHere,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MarkerKeyword::BeginInclude => "BEGIN_INCLUDE",
            MarkerKeyword::EndInclude => "END_INCLUDE",
            MarkerKeyword::BeginFixture => "BEGIN_FIXTURE",
            MarkerKeyword::EndFixture => "END_FIXTURE",
            MarkerKeyword::TestCase => "TEST_CASE",
            MarkerKeyword::IgnoreFromHere => "IGNORE_FROM_HERE",
        }
    }

    fn from_ident(ident: &str) -> Option<Self> {
        let bare = ident.strip_prefix(MARKER_PREFIX).unwrap_or(ident);
        Self::ALL.into_iter().find(|k| k.name() == bare)
    }
}

/// Split a marker line (already stripped of leading whitespace) into its
/// keyword and the text starting at the opening parenthesis.
pub(crate) fn split_keyword(trimmed: &str) -> Option<(MarkerKeyword, &str)> {
    let end = trimmed
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());
    let keyword = MarkerKeyword::from_ident(&trimmed[..end])?;
    let rest = trimmed[end..].trim_start();
    rest.starts_with('(').then_some((keyword, rest))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Code,
    Marker(MarkerKeyword),
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub text: &'a str,
    /// 1-based.
    pub number: usize,
    pub kind: LineKind,
}

/// Lazy, restartable line classifier for one file.
pub struct ScannerPass<'a> {
    lines: Lines<'a>,
    number: usize,
    in_block_comment: bool,
}

impl<'a> ScannerPass<'a> {
    pub fn scan(source: &'a str) -> Self {
        Self {
            lines: source.lines(),
            number: 0,
            in_block_comment: false,
        }
    }

    fn classify(&mut self, text: &str) -> LineKind {
        if self.in_block_comment {
            if text.contains("*/") {
                self.in_block_comment = false;
            }
            return LineKind::Comment;
        }

        let trimmed = text.trim_start();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            return LineKind::Comment;
        }
        if let Some(body) = trimmed.strip_prefix("/*") {
            return match body.find("*/") {
                None => {
                    self.in_block_comment = true;
                    LineKind::Comment
                }
                Some(close) if body[close + 2..].trim().is_empty() => LineKind::Comment,
                Some(_) => LineKind::Code,
            };
        }

        match split_keyword(trimmed) {
            Some((keyword, _)) => LineKind::Marker(keyword),
            None => LineKind::Code,
        }
    }
}

impl<'a> Iterator for ScannerPass<'a> {
    type Item = SourceLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.lines.next()?;
        self.number += 1;
        let kind = self.classify(text);
        Some(SourceLine {
            text,
            number: self.number,
            kind,
        })
    }
}
