//! Query parser.
//!
//! Parses a token stream into an [`AstNode`] using recursive descent with
//! speculative trials where the grammar is locally ambiguous.
//!
//! # Grammar
//!
//! ```text
//! query       → disjunction EOF                       (full dialect)
//!             | cmis_disjunction EOF                  (Mode::Cmis)
//! disjunction → conjunction (OR? conjunction)*        (OR optional iff default connector is OR)
//! conjunction → prefixed (AND? prefixed)*             (AND optional iff default connector is AND)
//! prefixed    → (NOT | "!" | "+" | "|" | "-")? test ("^" number)?
//! test        → proximity | term | "=" term | phrase | "~" term | range
//!             | field_ref ":" ( "(" field_disjunction ")" | range | proximity | term | phrase )
//!             | "(" disjunction ")" | template
//! range       → range_word ".." range_word
//!             | ("[" | "<") range_word TO range_word ("]" | ">")
//! proximity   → word ("*" ("(" INTEGER? ")")? word)+
//! template    → "%" field_ref | "%" "(" (field_ref ","?)+ ")"
//! ```
//!
//! The same skeleton runs inside `field:( ... )` groups with field-scoped node
//! kinds, its own default connector, and no field references or templates.
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. Suffixes: `~`, then `^`
//! 3. Prefixes: `NOT`, `!`, `+`, `|`, `-`
//! 4. AND (explicit, or implicit when the default connector is AND)
//! 5. OR (explicit, or implicit when the default connector is OR)

mod cmis;
mod grammar;
mod primitives;
mod range;

use tracing::{debug, trace};

use crate::{
    ast::AstNode,
    config::{Mode, ParserConfig},
    error::{ErrorKind, MAX_NESTING_DEPTH, ParseError, Position, QueryError},
    lexer::tokenize,
    token::{Cursor, Mark, Token, TokenKind},
};

/// Parser state captured before a speculative trial.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    /// Cursor position.
    mark: Mark,
    /// Length of the rule stack.
    rules: usize,
    /// Nesting depth.
    depth: usize,
}

/// Recursive descent parser for one token sequence.
///
/// A parser is constructed per query and consumed by its entry point.
#[derive(Debug)]
pub struct Parser<'a> {
    /// Read position over the tokens.
    cursor: Cursor<'a>,
    /// Settings for this parse.
    config: ParserConfig,
    /// Names of the rules currently being parsed, outermost first.
    rules: Vec<&'static str>,
    /// Current prefix/group nesting depth.
    depth: usize,
    /// Number of enclosing speculative trials.
    speculating: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over a token sequence.
    pub fn new(tokens: &'a [Token], config: ParserConfig) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            config,
            rules: Vec::new(),
            depth: 0,
            speculating: 0,
        }
    }

    /// Parses a whole query with the grammar selected by the configured mode.
    pub fn parse_query(self) -> Result<AstNode, ParseError> {
        match self.config.mode {
            Mode::Cmis => self.parse_cmis(),
            Mode::DefaultConjunction | Mode::DefaultDisjunction => self.parse_fts(),
        }
    }

    /// Parses a whole query with the restricted CMIS grammar.
    ///
    /// Fails with [`ErrorKind::FailedModePredicate`] unless the mode is
    /// [`Mode::Cmis`].
    pub fn parse_cmis(mut self) -> Result<AstNode, ParseError> {
        if self.config.mode != Mode::Cmis {
            return Err(self.error(ErrorKind::FailedModePredicate));
        }
        self.in_rule("cmis_query", |p| {
            let node = p.cmis_disjunction()?;
            p.expect_end()?;
            Ok(node)
        })
    }

    /// Parses a whole query with the full grammar.
    ///
    /// Fails with [`ErrorKind::FailedModePredicate`] in [`Mode::Cmis`].
    pub fn parse_fts(mut self) -> Result<AstNode, ParseError> {
        if !self.config.mode.is_fts() {
            return Err(self.error(ErrorKind::FailedModePredicate));
        }
        self.in_rule("query", |p| {
            let node = p.disjunction(grammar::Scope::Query)?;
            p.expect_end()?;
            Ok(node)
        })
    }

    /// Fails unless every token has been consumed.
    fn expect_end(&self) -> Result<(), ParseError> {
        if self.cursor.at_end() {
            Ok(())
        } else {
            Err(self.error(ErrorKind::UnexpectedExtraToken))
        }
    }

    /// Returns the kind of the token `k` positions ahead.
    fn peek_kind(&self, k: usize) -> Option<TokenKind> {
        self.cursor.peek_kind(k)
    }

    /// Checks whether the next token has the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check_at(0, kind)
    }

    /// Checks whether the token `k` positions ahead has the given kind.
    fn check_at(&self, k: usize, kind: TokenKind) -> bool {
        self.cursor.check_at(k, kind)
    }

    /// Consumes the next token, which the caller has already inspected.
    fn bump(&mut self) -> Result<&'a Token, ParseError> {
        match self.cursor.bump() {
            Some(token) => Ok(token),
            None => Err(self.error(ErrorKind::NoViableAlternative)),
        }
    }

    /// Consumes a token of the given kind.
    fn expect(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            return self.bump();
        }
        let error_kind = if self.cursor.at_end() {
            ErrorKind::MissingExpectedToken
        } else {
            ErrorKind::MismatchedToken
        };
        Err(self.error(error_kind).with_expected([kind]))
    }

    /// Consumes a token whose kind is one of `kinds`.
    fn expect_one_of(&mut self, kinds: &[TokenKind]) -> Result<&'a Token, ParseError> {
        match self.peek_kind(0) {
            Some(kind) if kinds.contains(&kind) => self.bump(),
            _ => Err(self
                .error(ErrorKind::MismatchedTokenSet)
                .with_expected(kinds.iter().copied())),
        }
    }

    /// Builds an error at the current token.
    ///
    /// Inside a trial the error is discarded, so the rule stack is not copied.
    fn error(&self, kind: ErrorKind) -> ParseError {
        let position = Position {
            index: self.cursor.index(),
            offset: self.cursor.offset(),
        };
        let rules = if self.speculating > 0 {
            Vec::new()
        } else {
            self.rules.clone()
        };
        ParseError::new(kind, position, self.cursor.peek(0).cloned()).with_rule_stack(rules)
    }

    /// Runs `f` with `name` pushed on the rule stack.
    fn in_rule<T>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.rules.push(name);
        let result = f(self);
        self.rules.pop();
        result
    }

    /// Runs `f` one nesting level deeper, failing past [`MAX_NESTING_DEPTH`].
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(ErrorKind::NestingTooDeep));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Captures the state a trial must restore.
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            mark: self.cursor.mark(),
            rules: self.rules.len(),
            depth: self.depth,
        }
    }

    /// Restores state captured by [`Self::snapshot`].
    fn restore(&mut self, snapshot: Snapshot) {
        self.cursor.rewind(snapshot.mark);
        self.rules.truncate(snapshot.rules);
        self.depth = snapshot.depth;
    }

    /// Runs `f` speculatively and reports whether it succeeded.
    ///
    /// The parser is left exactly as it was before the call either way; the
    /// caller re-parses the chosen alternative for real.
    fn trial<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, ParseError>) -> bool {
        let snapshot = self.snapshot();
        let index = self.cursor.index();
        self.speculating += 1;
        let ok = f(self).is_ok();
        self.speculating -= 1;
        self.restore(snapshot);
        trace!(index, ok, "trial");
        ok
    }
}

/// Parses a token sequence into an AST.
pub fn parse_tokens(tokens: &[Token], config: &ParserConfig) -> Result<AstNode, ParseError> {
    let result = Parser::new(tokens, *config).parse_query();
    match &result {
        Ok(_) => debug!(mode = %config.mode, tokens = tokens.len(), "parsed query"),
        Err(err) => debug!(
            mode = %config.mode,
            kind = %err.kind,
            index = err.position.index,
            "query rejected"
        ),
    }
    result
}

/// Tokenizes and parses a query string.
pub fn parse(input: &str, config: &ParserConfig) -> Result<AstNode, QueryError> {
    let tokens = tokenize(input)?;
    parse_tokens(&tokens, config).map_err(|err| QueryError::from(err).with_query(input))
}
