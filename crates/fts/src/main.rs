//! Command-line interface for the `fts` query tool.

use std::process::ExitCode;

use fts::cli::{
    CommandContext,
    args::{Commands, parse_cli},
    commands,
    logging::init_tracing,
};

fn main() -> ExitCode {
    let cli = parse_cli();
    init_tracing(cli.verbose);

    let ctx = match cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}
