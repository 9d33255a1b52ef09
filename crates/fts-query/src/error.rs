//! Error types for query lexing and parsing.
//!
//! Lexing fails with a [`LexError`]; parsing fails with a [`ParseError`] that
//! carries a structured [`ErrorKind`], the position of the offending token,
//! the tokens that would have been accepted, and the chain of active rules.
//! [`QueryError`] unifies both for display with a caret under the query.

use std::{error::Error as StdError, fmt};

use serde::Serialize;
use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Deepest permitted nesting of groups and prefixed items.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }

    /// Formats the error with a position indicator showing where the error occurred.
    pub fn format_with_context(&self) -> String {
        let mut result = String::new();
        result.push_str(&format!("query syntax error: {}\n", self.message));
        result.push_str(&format!("  {}\n", self.input));
        result.push_str(&format!("  {}^", " ".repeat(self.position)));
        result
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_context())
    }
}

impl StdError for LexError {}

/// The category of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input remained after a complete query.
    UnexpectedExtraToken,
    /// Input ended where a specific token was required.
    MissingExpectedToken,
    /// A specific token was required but another was found.
    MismatchedToken,
    /// One of several tokens was required but none was found.
    MismatchedTokenSet,
    /// No grammar alternative matches at this point.
    NoViableAlternative,
    /// A one-or-more repetition matched nothing.
    EmptyRequiredRepetition,
    /// A rule was invoked under a mode it is not valid for.
    FailedModePredicate,
    /// Groups or prefixes nest deeper than [`MAX_NESTING_DEPTH`].
    NestingTooDeep,
}

impl ErrorKind {
    /// Returns the snake_case name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::UnexpectedExtraToken => "unexpected_extra_token",
            Self::MissingExpectedToken => "missing_expected_token",
            Self::MismatchedToken => "mismatched_token",
            Self::MismatchedTokenSet => "mismatched_token_set",
            Self::NoViableAlternative => "no_viable_alternative",
            Self::EmptyRequiredRepetition => "empty_required_repetition",
            Self::FailedModePredicate => "failed_mode_predicate",
            Self::NestingTooDeep => "nesting_too_deep",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where in the token stream a parse error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Index of the offending token (equal to the token count at end of input).
    pub index: usize,
    /// Byte offset of the offending token in the query text.
    pub offset: usize,
}

/// A structured parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", describe(.kind, .expected, .actual))]
pub struct ParseError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Where it went wrong.
    pub position: Position,
    /// Tokens that would have been accepted here, if known.
    pub expected: Vec<TokenKind>,
    /// The token found instead; `None` at end of input.
    pub actual: Option<Token>,
    /// Rules active when the failure was detected, outermost first.
    pub rule_stack: Vec<&'static str>,
}

impl ParseError {
    /// Creates a parse error with no expected set or rule context.
    pub fn new(kind: ErrorKind, position: Position, actual: Option<Token>) -> Self {
        Self {
            kind,
            position,
            expected: Vec::new(),
            actual,
            rule_stack: Vec::new(),
        }
    }

    /// Sets the expected token set.
    pub fn with_expected(mut self, expected: impl IntoIterator<Item = TokenKind>) -> Self {
        self.expected = expected.into_iter().collect();
        self
    }

    /// Sets the rule stack.
    pub fn with_rule_stack(mut self, rule_stack: Vec<&'static str>) -> Self {
        self.rule_stack = rule_stack;
        self
    }

    /// The innermost active rule, if any.
    pub fn rule(&self) -> Option<&'static str> {
        self.rule_stack.last().copied()
    }
}

/// Builds the human-readable message for a parse error.
fn describe(kind: &ErrorKind, expected: &[TokenKind], actual: &Option<Token>) -> String {
    let found = match actual {
        Some(token) => format!("'{}'", token.text),
        None => "end of query".to_string(),
    };
    let wanted = expected
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(", ");

    match *kind {
        ErrorKind::UnexpectedExtraToken => format!("unexpected {found} after end of query"),
        ErrorKind::MissingExpectedToken => format!("missing {wanted} at {found}"),
        ErrorKind::MismatchedToken => format!("expected {wanted}, found {found}"),
        ErrorKind::MismatchedTokenSet => format!("expected one of {wanted}, found {found}"),
        ErrorKind::NoViableAlternative if expected.is_empty() => {
            format!("no viable alternative at {found}")
        }
        ErrorKind::NoViableAlternative => {
            format!("no viable alternative at {found} (expected one of {wanted})")
        }
        ErrorKind::EmptyRequiredRepetition => format!("expected at least one item, found {found}"),
        ErrorKind::FailedModePredicate => "rule is not valid in the configured mode".to_string(),
        ErrorKind::NestingTooDeep => {
            format!("query nests deeper than {MAX_NESTING_DEPTH} levels at {found}")
        }
    }
}

/// A unified error type for query parsing.
///
/// This type provides detailed error messages with context, including
/// the original query string and position indicators where applicable.
#[derive(Debug, Clone)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string (if available).
    pub query: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone)]
pub enum QueryErrorKind {
    /// Lexer error (tokenization failed).
    Lex {
        /// Error message.
        message: String,
        /// Byte position in input.
        position: usize,
    },
    /// Parser error (invalid syntax).
    Parse(ParseError),
}

impl QueryError {
    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        match &self.kind {
            QueryErrorKind::Lex { message, .. } => message.clone(),
            QueryErrorKind::Parse(err) => err.to_string(),
        }
    }

    /// Byte offset the error points at.
    pub fn position(&self) -> usize {
        match &self.kind {
            QueryErrorKind::Lex { position, .. } => *position,
            QueryErrorKind::Parse(err) => err.position.offset,
        }
    }

    /// The structured parse error, if this is one.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match &self.kind {
            QueryErrorKind::Parse(err) => Some(err),
            QueryErrorKind::Lex { .. } => None,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.kind {
            QueryErrorKind::Lex { message, .. } if message.contains("unclosed phrase") => {
                Some("Add a closing quote (\") to complete the phrase")
            }
            QueryErrorKind::Lex { message, .. } if message.contains("escape") => {
                Some("A backslash must be followed by the character it escapes")
            }
            QueryErrorKind::Lex { .. } => None,
            QueryErrorKind::Parse(err) => parse_suggestion(err),
        }
    }
}

/// Picks a hint for a parse error.
fn parse_suggestion(err: &ParseError) -> Option<&'static str> {
    let rule = err.rule().unwrap_or_default();
    match err.kind {
        ErrorKind::NestingTooDeep => Some("Reduce the number of nested groups"),
        _ if err.expected.contains(&TokenKind::RParen) => {
            Some("Add a closing parenthesis ) to match the opening one")
        }
        _ if rule.starts_with("cmis") => {
            Some("CMIS queries accept only terms, phrases, '-' exclusions and OR")
        }
        _ if rule.ends_with("range") => Some("Ranges look like [low TO high] or low..high"),
        ErrorKind::MismatchedToken if err.expected == [TokenKind::Integer] => {
            Some("Phrase slop must be a whole number, e.g. \"a b\"~2")
        }
        ErrorKind::NoViableAlternative if rule == "fuzzy" || rule == "slop" => {
            Some("A term or phrase takes a single ~ suffix, e.g. word~0.8")
        }
        ErrorKind::MismatchedTokenSet if rule.ends_with("boost") => {
            Some("A boost must be a number, e.g. word^2")
        }
        _ => None,
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.message())?;

        // If we have a query, show it with a pointer
        if let Some(query) = &self.query {
            writeln!(f, "  {}", query)?;
            let clamped = self.position().min(query.len());
            let column = query[..clamped].chars().count();
            writeln!(f, "  {}^", " ".repeat(column))?;
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {}", suggestion)?;
        }

        Ok(())
    }
}

impl StdError for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: err.message,
                position: err.position,
            },
            query: Some(err.input),
        }
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        Self {
            kind: QueryErrorKind::Parse(err),
            query: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str, start: usize) -> Token {
        Token::new(kind, text, start, start + text.len())
    }

    #[test]
    fn lex_error_display() {
        let err: QueryError = LexError::new("unclosed phrase", 0, "\"hello world").into();
        let display = err.to_string();
        assert!(display.contains("unclosed phrase"));
        assert!(display.contains("\"hello world"));
        assert!(display.contains("^"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn missing_paren_display() {
        let err = ParseError::new(
            ErrorKind::MissingExpectedToken,
            Position { index: 2, offset: 5 },
            None,
        )
        .with_expected([TokenKind::RParen]);
        assert_eq!(err.to_string(), "missing RPAREN at end of query");

        let display = QueryError::from(err).with_query("(rust").to_string();
        assert!(display.contains("(rust"));
        assert!(display.contains("     ^"));
        assert!(display.contains("closing parenthesis"));
    }

    #[test]
    fn mismatched_set_message_lists_expected() {
        let err = ParseError::new(
            ErrorKind::MismatchedTokenSet,
            Position { index: 3, offset: 6 },
            Some(token(TokenKind::Id, "x", 6)),
        )
        .with_expected([TokenKind::Integer, TokenKind::Float]);
        assert_eq!(err.to_string(), "expected one of INTEGER, FLOAT, found 'x'");
    }

    #[test]
    fn cmis_hint_from_rule_stack() {
        let err = ParseError::new(
            ErrorKind::NoViableAlternative,
            Position { index: 1, offset: 5 },
            Some(token(TokenKind::Colon, ":", 5)),
        )
        .with_rule_stack(vec!["cmis_query", "cmis_conjunction", "cmis_test"]);
        assert_eq!(err.rule(), Some("cmis_test"));
        let err = QueryError::from(err);
        assert!(err.suggestion().unwrap().contains("CMIS"));
    }

    #[test]
    fn caret_counts_characters_not_bytes() {
        let err = ParseError::new(
            ErrorKind::UnexpectedExtraToken,
            Position { index: 1, offset: 6 },
            Some(token(TokenKind::RParen, ")", 6)),
        );
        let display = QueryError::from(err).with_query("café )").to_string();
        assert!(display.contains("\n       ^"));
    }

    #[test]
    fn error_kind_names() {
        assert_eq!(ErrorKind::NestingTooDeep.to_string(), "nesting_too_deep");
        assert_eq!(
            ErrorKind::EmptyRequiredRepetition.name(),
            "empty_required_repetition"
        );
    }
}
