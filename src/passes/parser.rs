//! Marker parser.
//!
//! Argument extraction is purely textual: balanced-parenthesis splitting that
//! respects C string and character literals. Nothing is evaluated.

use crate::error::ParseError;
use crate::passes::scanner::{MarkerKeyword, SourceLine};
use crate::registry::{FixtureCalls, Invocation};

/// Literal that stands for an absent fixture function.
pub const NULL_ARGUMENT: &str = "NULL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    IncludeBegin,
    IncludeEnd,
    FixtureBegin(FixtureCalls),
    FixtureEnd,
    TestCase(Invocation),
    IgnoreFromHere,
}

pub struct MarkerParserPass;

impl MarkerParserPass {
    pub fn parse(keyword: MarkerKeyword, line: &SourceLine<'_>) -> Result<Marker, ParseError> {
        let number = line.number;
        let open = line
            .text
            .find('(')
            .ok_or(ParseError::Unterminated { line: number })?;
        let call = &line.text[open..];
        let close = matching_close(call).ok_or(ParseError::Unterminated { line: number })?;
        let inner = call[1..close].trim();
        Self::check_trailing(&call[close + 1..], number)?;

        match keyword {
            MarkerKeyword::BeginFixture => Self::parse_fixture(inner, number).map(Marker::FixtureBegin),
            MarkerKeyword::TestCase => Invocation::parse(inner)
                .map(Marker::TestCase)
                .ok_or_else(|| ParseError::TestCaseNotACall {
                    line: number,
                    found: inner.to_string(),
                }),
            _ if !inner.is_empty() => Err(ParseError::UnexpectedArguments {
                line: number,
                marker: keyword.name(),
            }),
            MarkerKeyword::BeginInclude => Ok(Marker::IncludeBegin),
            MarkerKeyword::EndInclude => Ok(Marker::IncludeEnd),
            MarkerKeyword::EndFixture => Ok(Marker::FixtureEnd),
            MarkerKeyword::IgnoreFromHere => Ok(Marker::IgnoreFromHere),
        }
    }

    /// Accepts an optional `;` followed by an optional line or block comment.
    fn check_trailing(rest: &str, line: usize) -> Result<(), ParseError> {
        let rest = rest.trim_start();
        let rest = rest.strip_prefix(';').unwrap_or(rest).trim_start();
        if rest.is_empty() || rest.starts_with("//") {
            return Ok(());
        }
        if let Some(body) = rest.strip_prefix("/*") {
            if let Some(close) = body.find("*/") {
                if body[close + 2..].trim().is_empty() {
                    return Ok(());
                }
            }
        }
        Err(ParseError::TrailingText {
            line,
            text: rest.to_string(),
        })
    }

    fn parse_fixture(inner: &str, line: usize) -> Result<FixtureCalls, ParseError> {
        let args = if inner.is_empty() {
            Vec::new()
        } else {
            split_top_level(inner)
        };

        match args.len() {
            0 => return Err(ParseError::FixtureWithoutArguments { line }),
            1..=3 => {}
            count => return Err(ParseError::FixtureTooManyArguments { line, count }),
        }

        let mut slots = args
            .into_iter()
            .map(|arg| match arg {
                "" | NULL_ARGUMENT => Ok(None),
                name if is_identifier(name) => Ok(Some(name.to_string())),
                other => Err(ParseError::InvalidFixtureFunction {
                    line,
                    found: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        Ok(FixtureCalls {
            setup: slots.next().flatten(),
            dump: slots.next().flatten(),
            teardown: slots.next().flatten(),
        })
    }
}

impl Invocation {
    /// Parse a complete call expression `ident(args...)`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let open = text.find('(')?;
        let function = text[..open].trim_end();
        if !is_identifier(function) {
            return None;
        }
        let call = &text[open..];
        let close = matching_close(call)?;
        if close + 1 != call.len() {
            return None;
        }
        Some(Invocation {
            function: function.to_string(),
            arguments: call[1..close].trim().to_string(),
        })
    }
}

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Walks `text` tracking bracket depth outside of string and character
/// literals, calling `visit` with the byte offset, the character and the
/// depth after that character was applied.
fn walk_brackets(text: &str, mut visit: impl FnMut(usize, char, i32) -> bool) {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
        if !visit(i, c, depth) {
            return;
        }
    }
}

/// Offset of the bracket closing the one `text` starts with.
fn matching_close(text: &str) -> Option<usize> {
    let mut found = None;
    walk_brackets(text, |i, c, depth| {
        if depth == 0 && matches!(c, ')' | ']' | '}') {
            found = Some(i);
            return false;
        }
        true
    });
    found
}

/// Split on commas that are not nested inside brackets or literals.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    walk_brackets(text, |i, c, depth| {
        if c == ',' && depth == 0 {
            parts.push(text[start..i].trim());
            start = i + 1;
        }
        true
    });
    parts.push(text[start..].trim());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::scanner::{LineKind, ScannerPass};

    fn parse(text: &str) -> Result<Marker, ParseError> {
        let line = ScannerPass::scan(text).next().unwrap();
        match line.kind {
            LineKind::Marker(keyword) => MarkerParserPass::parse(keyword, &line),
            other => panic!("`{}` classified as {:?}", text, other),
        }
    }

    fn fixture(text: &str) -> FixtureCalls {
        match parse(text) {
            Ok(Marker::FixtureBegin(calls)) => calls,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_fixture_arity_table() {
        let one = fixture("TT_BEGIN_FIXTURE(setupOne)\t\t// Setup only.");
        assert_eq!(one.setup.as_deref(), Some("setupOne"));
        assert_eq!(one.dump, None);
        assert_eq!(one.teardown, None);

        let two = fixture("TT_BEGIN_FIXTURE(NULL, dumpOne)");
        assert_eq!(two.setup, None);
        assert_eq!(two.dump.as_deref(), Some("dumpOne"));

        let three = fixture("TT_BEGIN_FIXTURE(setupOne, NULL, teardownOne);   // both");
        assert_eq!(three.setup.as_deref(), Some("setupOne"));
        assert_eq!(three.dump, None);
        assert_eq!(three.teardown.as_deref(), Some("teardownOne"));

        let teardown_only = fixture("BEGIN_FIXTURE(NULL, NULL, teardownOne)");
        assert_eq!(teardown_only.names().collect::<Vec<_>>(), vec!["teardownOne"]);

        let empty_slot = fixture("BEGIN_FIXTURE(setupOne, )");
        assert_eq!(empty_slot.names().collect::<Vec<_>>(), vec!["setupOne"]);
    }

    #[test]
    fn test_fixture_arity_errors() {
        assert_eq!(
            parse("TT_BEGIN_FIXTURE()"),
            Err(ParseError::FixtureWithoutArguments { line: 1 })
        );
        assert_eq!(
            parse("TT_BEGIN_FIXTURE(a, b, c, d)"),
            Err(ParseError::FixtureTooManyArguments { line: 1, count: 4 })
        );
        assert_eq!(
            parse("TT_BEGIN_FIXTURE(setup())"),
            Err(ParseError::InvalidFixtureFunction {
                line: 1,
                found: "setup()".to_string()
            })
        );
    }

    #[test]
    fn test_fixture_identifiers_are_case_sensitive() {
        let calls = fixture("TT_BEGIN_FIXTURE(null, Null)");
        assert_eq!(calls.setup.as_deref(), Some("null"));
        assert_eq!(calls.dump.as_deref(), Some("Null"));
    }

    #[test]
    fn test_test_case_invocation() {
        let marker = parse("TT_TEST_CASE(test_1f(0));").unwrap();
        assert_eq!(
            marker,
            Marker::TestCase(Invocation {
                function: "test_1f".to_string(),
                arguments: "0".to_string(),
            })
        );

        let marker = parse(r#"TEST_CASE(check("a,)b", f(1, 2), '('))"#).unwrap();
        match marker {
            Marker::TestCase(inv) => {
                assert_eq!(inv.function, "check");
                assert_eq!(inv.arguments, r#""a,)b", f(1, 2), '('"#);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_test_case_requires_call() {
        assert!(matches!(
            parse("TT_TEST_CASE(test_1f)"),
            Err(ParseError::TestCaseNotACall { line: 1, .. })
        ));
        assert!(matches!(
            parse("TT_TEST_CASE(test_1f(0), test_1f(1))"),
            Err(ParseError::TestCaseNotACall { .. })
        ));
        assert!(matches!(
            parse("TT_TEST_CASE()"),
            Err(ParseError::TestCaseNotACall { .. })
        ));
    }

    #[test]
    fn test_unterminated_arguments() {
        assert_eq!(
            parse("TT_TEST_CASE(test_1f(0)"),
            Err(ParseError::Unterminated { line: 1 })
        );
        assert_eq!(
            parse("TT_BEGIN_FIXTURE(setupOne"),
            Err(ParseError::Unterminated { line: 1 })
        );
    }

    #[test]
    fn test_trailing_text() {
        assert_eq!(parse("TT_END_FIXTURE() /* done */"), Ok(Marker::FixtureEnd));
        assert_eq!(parse("TT_END_FIXTURE()  ; "), Ok(Marker::FixtureEnd));
        assert_eq!(
            parse("TT_END_FIXTURE() foo"),
            Err(ParseError::TrailingText {
                line: 1,
                text: "foo".to_string()
            })
        );
    }

    #[test]
    fn test_argumentless_markers() {
        assert_eq!(parse("TT_BEGIN_INCLUDE()"), Ok(Marker::IncludeBegin));
        assert_eq!(parse("TT_END_INCLUDE( )"), Ok(Marker::IncludeEnd));
        assert_eq!(parse("IGNORE_FROM_HERE();"), Ok(Marker::IgnoreFromHere));
        assert_eq!(
            parse("TT_END_FIXTURE(setupOne)"),
            Err(ParseError::UnexpectedArguments {
                line: 1,
                marker: "END_FIXTURE"
            })
        );
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(split_top_level("a, f(b, c), [d, e]"), vec!["a", "f(b, c)", "[d, e]"]);
        assert_eq!(split_top_level(","), vec!["", ""]);
        assert!(is_identifier("_setup1"));
        assert!(!is_identifier("1setup"));
        assert!(!is_identifier(""));
    }
}
