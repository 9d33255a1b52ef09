//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use fts_query::{AstNode, ErrorKind, QueryError, Token};
use serde::Serialize;

/// JSON description of a failed parse.
#[derive(Serialize)]
pub struct JsonError {
    /// Error message without the query excerpt.
    pub message: String,
    /// Byte offset into the query.
    pub offset: usize,
    /// Structured kind for parse errors; absent for lexer errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    /// Grammar rule that was active when the error was raised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<&'static str>,
    /// Suggested fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl From<&QueryError> for JsonError {
    fn from(err: &QueryError) -> Self {
        let parse = err.parse_error();
        Self {
            message: err.message(),
            offset: err.position(),
            kind: parse.map(|p| p.kind),
            rule: parse.and_then(|p| p.rule()),
            hint: err.suggestion(),
        }
    }
}

/// JSON output for a single query.
#[derive(Serialize)]
pub struct JsonQueryResult<'a> {
    /// The original query string.
    pub query: &'a str,
    /// The syntax tree, when parsing succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<AstNode>,
    /// The failure, when parsing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// JSON output for `fts parse`.
#[derive(Serialize)]
pub struct JsonParseOutput<'a> {
    /// Results in argument order.
    pub queries: Vec<JsonQueryResult<'a>>,
}

/// JSON output for `fts tokens`.
#[derive(Serialize)]
pub struct JsonTokensOutput<'a> {
    /// The original query string.
    pub query: &'a str,
    /// Tokens in input order.
    pub tokens: &'a [Token],
}

/// Serializes a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json_str) => {
            println!("{json_str}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints a query error on stderr, caret line included.
pub fn print_query_error(err: &QueryError) {
    let rendered = err.to_string();
    eprintln!("error: {}", rendered.trim_end());
}

/// Builds the token table shown by `fts tokens`.
pub fn token_table(tokens: &[Token]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Kind", "Text", "Span"]);
    for (i, token) in tokens.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i.to_string()),
            Cell::new(token.kind.name()),
            Cell::new(&token.text),
            Cell::new(format!("{}..{}", token.start, token.end)),
        ]);
    }
    table
}
