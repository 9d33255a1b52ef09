//! Token kinds and the token cursor the parser reads from.
//!
//! Tokens are produced by the lexer (or by any external tokenizer that emits
//! the same kinds) and consumed by the parser through a [`Cursor`], which
//! supports arbitrary lookahead and O(1) mark/rewind for speculative parsing.

use std::fmt;

use serde::Serialize;
use tracing::trace;

/// The kind of a query token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// An identifier-shaped word (`title`, `cm_name`).
    Id,
    /// Any other plain word (`e-mail`, `2nd`, `café`).
    Word,
    /// A word ending in a single `*` (`inter*`).
    PrefixWord,
    /// A word containing `*` or `?` wildcards (`te?t`, `*ing`).
    WildWord,
    /// A quoted phrase, quotes included.
    Phrase,
    /// A decimal integer literal.
    Integer,
    /// A floating point literal.
    Float,
    /// A `{namespace}` URI, braces included.
    Uri,
    /// The `AND` keyword.
    And,
    /// The `OR` keyword.
    Or,
    /// The `NOT` keyword.
    Not,
    /// The `TO` keyword.
    To,
    /// `+`
    Plus,
    /// `|`
    Bar,
    /// `||`
    BarBar,
    /// `-`
    Minus,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Colon,
    /// `=`
    Equals,
    /// `~`
    Tilde,
    /// `^`
    Caret,
    /// `[`
    LSquare,
    /// `]`
    RSquare,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `..`
    DotDot,
    /// `*`
    Star,
    /// `?`
    QuestionMark,
    /// `@`
    At,
    /// `%`
    Percent,
    /// `,`
    Comma,
    /// `&`
    Amp,
    /// `&&`
    AmpAmp,
    /// `!`
    Exclamation,
}

impl TokenKind {
    /// Returns the upper-case name used in diagnostics and AST dumps.
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Word => "WORD",
            Self::PrefixWord => "PREFIX_WORD",
            Self::WildWord => "WILD_WORD",
            Self::Phrase => "PHRASE_LITERAL",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Uri => "URI",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::To => "TO",
            Self::Plus => "PLUS",
            Self::Bar => "BAR",
            Self::BarBar => "BARBAR",
            Self::Minus => "MINUS",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::Colon => "COLON",
            Self::Equals => "EQUALS",
            Self::Tilde => "TILDE",
            Self::Caret => "CARET",
            Self::LSquare => "LSQUARE",
            Self::RSquare => "RSQUARE",
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::DotDot => "DOTDOT",
            Self::Star => "STAR",
            Self::QuestionMark => "QUESTION_MARK",
            Self::At => "AT",
            Self::Percent => "PERCENT",
            Self::Comma => "COMMA",
            Self::Amp => "AMP",
            Self::AmpAmp => "AMPAMP",
            Self::Exclamation => "EXCLAMATION",
        }
    }

    /// True for tokens that can stand as a search word.
    ///
    /// Keywords are words too; whether one is read as an operator depends on
    /// where it appears.
    pub fn is_word(self) -> bool {
        matches!(
            self,
            Self::Id
                | Self::Word
                | Self::PrefixWord
                | Self::WildWord
                | Self::Integer
                | Self::Float
                | Self::And
                | Self::Or
                | Self::Not
                | Self::To
        )
    }

    /// True for tokens accepted as a range bound.
    pub fn is_range_word(self) -> bool {
        matches!(
            self,
            Self::Id | Self::Word | Self::Phrase | Self::Integer | Self::Float
        )
    }

    /// True for numeric literals.
    pub fn is_number(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token with its source text and byte span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// The source text of the token, verbatim.
    pub text: String,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }
}

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Read cursor over a materialized token sequence.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    /// The tokens being read.
    tokens: &'a [Token],
    /// Index of the next unread token.
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned at the first token.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Returns the token `k` positions ahead without consuming anything.
    pub fn peek(&self, k: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + k)
    }

    /// Returns the kind of the token `k` positions ahead.
    pub fn peek_kind(&self, k: usize) -> Option<TokenKind> {
        self.peek(k).map(|t| t.kind)
    }

    /// Checks whether the token `k` positions ahead has the given kind.
    pub fn check_at(&self, k: usize, kind: TokenKind) -> bool {
        self.peek_kind(k) == Some(kind)
    }

    /// Consumes and returns the next token.
    pub fn bump(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        trace!(pos = self.pos, kind = %token.kind, text = %token.text, "advance");
        self.pos += 1;
        Some(token)
    }

    /// Records the current position.
    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// Returns to a previously recorded position.
    pub fn rewind(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    /// True once every token has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Index of the next unread token.
    pub fn index(&self) -> usize {
        self.pos
    }

    /// Byte offset of the next unread token, or of the end of input.
    pub fn offset(&self) -> usize {
        match self.tokens.get(self.pos) {
            Some(token) => token.start,
            None => self.tokens.last().map_or(0, |t| t.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Token> {
        vec![
            Token::new(TokenKind::Id, "title", 0, 5),
            Token::new(TokenKind::Colon, ":", 5, 6),
            Token::new(TokenKind::Id, "guide", 6, 11),
        ]
    }

    #[test]
    fn peek_does_not_consume() {
        let tokens = sample();
        let cursor = Cursor::new(&tokens);
        assert_eq!(cursor.peek_kind(0), Some(TokenKind::Id));
        assert_eq!(cursor.peek_kind(1), Some(TokenKind::Colon));
        assert_eq!(cursor.peek_kind(3), None);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn rewind_restores_position() {
        let tokens = sample();
        let mut cursor = Cursor::new(&tokens);
        let mark = cursor.mark();
        cursor.bump();
        cursor.bump();
        assert_eq!(cursor.offset(), 6);
        cursor.rewind(mark);
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.peek(0).map(|t| t.text.as_str()), Some("title"));
    }

    #[test]
    fn offset_at_end_is_end_of_last_token() {
        let tokens = sample();
        let mut cursor = Cursor::new(&tokens);
        while cursor.bump().is_some() {}
        assert!(cursor.at_end());
        assert_eq!(cursor.offset(), 11);
    }

    #[test]
    fn keywords_are_words() {
        assert!(TokenKind::Or.is_word());
        assert!(TokenKind::To.is_word());
        assert!(!TokenKind::Phrase.is_word());
        assert!(!TokenKind::Star.is_word());
        assert!(TokenKind::Phrase.is_range_word());
        assert!(!TokenKind::To.is_range_word());
    }
}
