//! Implementation of `fts tokens`.

use std::process::ExitCode;

use fts_query::{QueryError, tokenize};

use crate::cli::{
    args::TokensCommand,
    output::{JsonTokensOutput, print_json, print_query_error, token_table},
};

/// Prints the tokens the lexer produces for a query.
pub fn run(cmd: &TokensCommand) -> ExitCode {
    let tokens = match tokenize(&cmd.query) {
        Ok(tokens) => tokens,
        Err(e) => {
            print_query_error(&QueryError::from(e));
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&JsonTokensOutput {
            query: &cmd.query,
            tokens: &tokens,
        });
    }

    if tokens.is_empty() {
        println!("(no tokens)");
    } else {
        println!("{}", token_table(&tokens));
    }
    ExitCode::SUCCESS
}
