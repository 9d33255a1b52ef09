//! Clap argument definitions for the `fts` CLI.

use std::{env, process::exit};

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum, error::ErrorKind};
use fts_query::{Mode, ParserConfig};

/// Parse a query mode from a string.
fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "fts")]
#[command(about = "Parse Alfresco full-text search queries into syntax trees")]
pub struct Cli {
    /// Diagnostic logging on stderr (-v for debug, -vv for trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Connective used between adjacent items inside `field:( ... )` groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FieldConnective {
    /// Adjacent items must all match.
    And,
    /// Any adjacent item may match.
    Or,
}

/// How a parsed query is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented tree, one node per line.
    #[default]
    Tree,
    /// Single-line s-expression.
    Sexpr,
    /// JSON document.
    Json,
}

/// Flags that override the configured parser settings.
#[derive(Args, Debug, Clone, Default)]
pub struct ParserArgs {
    /// Query dialect: cmis, default-conjunction, default-disjunction [default: from .fts.toml]
    #[arg(short = 'm', long, value_parser = parse_mode)]
    pub mode: Option<Mode>,

    /// Connective inside field groups: and, or [default: from .fts.toml]
    #[arg(long, value_enum)]
    pub field_connective: Option<FieldConnective>,
}

impl ParserArgs {
    /// Applies the flags on top of a configured parser setting.
    pub fn apply(&self, base: ParserConfig) -> ParserConfig {
        let mut config = base;
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(connective) = self.field_connective {
            config.default_field_conjunction = connective == FieldConnective::And;
        }
        config
    }
}

/// Arguments for `fts parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Queries to parse
    #[arg(required = true)]
    pub queries: Vec<String>,

    #[command(flatten)]
    /// Parser setting overrides.
    pub parser: ParserArgs,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Tree)]
    pub format: OutputFormat,
}

/// Arguments for `fts tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    /// Query to tokenize
    pub query: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `fts init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.fts.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `fts` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse queries and print their syntax trees
    #[command(after_help = "\
QUERY SYNTAX:
  term              Term
  term1 term2       Implicit AND (or OR with --mode default-disjunction)
  \"phrase\"          Phrase, optionally with slop: \"a b\"~2
  +term -term       Mandatory / excluded
  !term NOT term    Negation
  a OR b, a || b    Disjunction
  a AND b, a && b   Conjunction
  (expr)            Grouping
  =term ~term       Exact term / synonym expansion
  term~0.8 term^2   Fuzzy match / boost

FIELDS AND RANGES:
  title:guide       Field-qualified term
  @cm:title:guide   Prefixed property reference
  title:(a b)       Field group
  [1 TO 5] <1 TO 5> Inclusive / exclusive range bounds
  1..5              Inclusive range
  big *(3) dog      Proximity with distance
  %template         Query template

EXAMPLES:
  fts parse 'title:guide (rust OR golang) -deprecated'
  fts parse --format sexpr 'a b' 'a OR b'
  fts parse --mode cmis 'alpha -beta OR \"gamma delta\"'")]
    Parse(ParseCommand),

    /// Show the tokens a query is split into
    Tokens(TokensCommand),

    /// Initialize fts configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}

/// Parses CLI arguments, printing a compact command list for top-level `--help`.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp {
                let args: Vec<_> = env::args().collect();
                if args.len() <= 2 {
                    print_command_help();
                    exit(0);
                }
            }
            e.exit();
        }
    }
}

/// Prints custom top-level help listing each subcommand on one line.
fn print_command_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: fts [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:10} {about}");
    }

    println!(
        "  {:<10} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -v, --verbose...  Diagnostic logging on stderr");
    println!("  -h, --help        Print help");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parser_args_override_config() {
        let args = ParserArgs {
            mode: Some(Mode::Cmis),
            field_connective: Some(FieldConnective::Or),
        };
        let config = args.apply(ParserConfig::default());
        assert_eq!(config, ParserConfig::new(Mode::Cmis, false));
    }

    #[test]
    fn parser_args_keep_config_when_absent() {
        let base = ParserConfig::new(Mode::DefaultDisjunction, false);
        assert_eq!(ParserArgs::default().apply(base), base);
    }

    #[test]
    fn parse_subcommand_flags() {
        let cli = Cli::try_parse_from([
            "fts",
            "-v",
            "parse",
            "--mode",
            "CMIS",
            "--format",
            "json",
            "a",
            "b",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Parse(cmd) = cli.command else {
            panic!("expected parse command");
        };
        assert_eq!(cmd.queries, vec!["a", "b"]);
        assert_eq!(cmd.parser.mode, Some(Mode::Cmis));
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let result = Cli::try_parse_from(["fts", "parse", "--mode", "lucene", "a"]);
        assert!(result.is_err());
    }
}
