//! Implementation of `fts config`.

use std::process::ExitCode;

use crate::cli::context::CommandContext;

/// Shows effective configuration settings, preceded by the files they came from.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    let toml = match config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if config.sources.is_empty() {
        println!("# no .fts.toml files found; showing defaults");
    } else {
        println!("# sources (highest precedence first):");
        for path in &config.sources {
            println!("#   {}", path.display());
        }
    }
    println!();
    print!("{toml}");
    ExitCode::SUCCESS
}
