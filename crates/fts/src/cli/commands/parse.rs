//! Implementation of `fts parse`.

use std::process::ExitCode;

use fts_query::{ParserConfig, parse};
use tracing::debug;

use crate::cli::{
    args::{OutputFormat, ParseCommand},
    context::CommandContext,
    output::{JsonError, JsonParseOutput, JsonQueryResult, print_json, print_query_error},
};

/// Parses each query and prints its syntax tree.
///
/// Every query is attempted; the exit status is a failure if any of them did not parse.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let config = cmd.parser.apply(ctx.config.parser);
    debug!(
        mode = %config.mode,
        field_conjunction = config.default_field_conjunction,
        "effective parser settings"
    );

    match cmd.format {
        OutputFormat::Json => run_json(&cmd.queries, &config),
        OutputFormat::Tree | OutputFormat::Sexpr => run_text(&cmd.queries, &config, cmd.format),
    }
}

/// Prints trees or s-expressions, one block per query.
fn run_text(queries: &[String], config: &ParserConfig, format: OutputFormat) -> ExitCode {
    let mut failed = false;
    let show_headers = queries.len() > 1 && format == OutputFormat::Tree;

    for (i, query) in queries.iter().enumerate() {
        if show_headers {
            if i > 0 {
                println!();
            }
            println!("# {query}");
        }
        match parse(query, config) {
            Ok(ast) if format == OutputFormat::Sexpr => println!("{}", ast.to_sexpr()),
            Ok(ast) => print!("{ast}"),
            Err(e) => {
                print_query_error(&e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Prints a single JSON document covering every query.
fn run_json(queries: &[String], config: &ParserConfig) -> ExitCode {
    let mut failed = false;
    let results = queries
        .iter()
        .map(|query| match parse(query, config) {
            Ok(ast) => JsonQueryResult {
                query,
                ast: Some(ast),
                error: None,
            },
            Err(e) => {
                failed = true;
                JsonQueryResult {
                    query,
                    ast: None,
                    error: Some(JsonError::from(&e)),
                }
            }
        })
        .collect();

    let status = print_json(&JsonParseOutput { queries: results });
    if failed { ExitCode::FAILURE } else { status }
}
