//! Query lexer (tokenizer).
//!
//! Converts a query string into the token sequence the parser consumes. Token
//! text is kept verbatim: phrases keep their quotes, escapes are not resolved.

use crate::{
    error::LexError,
    token::{Token, TokenKind},
};

/// Characters that always end a word.
const DELIMITERS: &str = "\"(){}[]<>:=~^@%,&!|+";

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let Some(ch) = self.peek() else {
            return Ok(None);
        };
        let start = self.position;

        let kind = match ch {
            '"' => return self.read_phrase().map(Some),
            '{' => return self.read_uri().map(Some),
            '}' => return Err(self.error_at("unexpected '}'", start)),
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LSquare,
            ']' => TokenKind::RSquare,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            ':' => TokenKind::Colon,
            '=' => TokenKind::Equals,
            '~' => TokenKind::Tilde,
            '^' => TokenKind::Caret,
            '@' => TokenKind::At,
            '%' => TokenKind::Percent,
            ',' => TokenKind::Comma,
            '!' => TokenKind::Exclamation,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '&' if self.peek_second() == Some('&') => {
                self.advance();
                TokenKind::AmpAmp
            }
            '&' => TokenKind::Amp,
            '|' if self.peek_second() == Some('|') => {
                self.advance();
                TokenKind::BarBar
            }
            '|' => TokenKind::Bar,
            '.' if self.peek_second() == Some('.') => {
                self.advance();
                TokenKind::DotDot
            }
            '*' | '?' if !self.peek_second().is_some_and(continues_word) => {
                if ch == '*' {
                    TokenKind::Star
                } else {
                    TokenKind::QuestionMark
                }
            }
            _ => return self.read_word().map(Some),
        };

        self.advance();
        Ok(Some(self.token(kind, start)))
    }

    /// Reads a quoted phrase, keeping the quotes and escapes.
    fn read_phrase(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        self.advance(); // consume opening quote

        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return Ok(self.token(TokenKind::Phrase, start));
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_none() {
                        return Err(self.error_at("unclosed phrase", start));
                    }
                    self.advance();
                }
                Some(_) => self.advance(),
                None => return Err(self.error_at("unclosed phrase", start)),
            }
        }
    }

    /// Reads a `{uri}` namespace literal.
    fn read_uri(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        self.advance(); // consume '{'

        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '}' {
                return Ok(self.token(TokenKind::Uri, start));
            }
        }

        Err(self.error_at("unclosed namespace URI", start))
    }

    /// Reads a word and classifies it.
    fn read_word(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut escaped = false;
        let mut wildcards = 0usize;
        let mut ends_with_star = false;

        while let Some(ch) = self.peek() {
            match ch {
                '\\' => {
                    let escape_at = self.position;
                    self.advance();
                    if self.peek().is_none() {
                        return Err(self.error_at("escape character at end of query", escape_at));
                    }
                    self.advance();
                    escaped = true;
                    ends_with_star = false;
                    continue;
                }
                '.' if self.peek_second() == Some('.') => break,
                '*' | '?' => wildcards += 1,
                c if !continues_word(c) => break,
                _ => {}
            }
            ends_with_star = ch == '*';
            self.advance();
        }

        let text = &self.input[start..self.position];
        let kind = classify_word(text, escaped, wildcards, ends_with_star);
        Ok(self.token(kind, start))
    }

    /// Builds a token spanning from `start` to the current position.
    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, &self.input[start..self.position], start, self.position)
    }

    /// Returns the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Returns the character after the next one.
    fn peek_second(&self) -> Option<char> {
        self.input[self.position..].chars().nth(1)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.position += ch.len_utf8();
        }
    }
}

/// True if `c` can appear after the first character of a word.
fn continues_word(c: char) -> bool {
    !c.is_whitespace() && !DELIMITERS.contains(c)
}

/// Decides the kind of a scanned word from its text.
fn classify_word(text: &str, escaped: bool, wildcards: usize, ends_with_star: bool) -> TokenKind {
    if wildcards > 0 {
        return if wildcards == 1 && ends_with_star && text.len() > 1 {
            TokenKind::PrefixWord
        } else {
            TokenKind::WildWord
        };
    }
    if escaped {
        return TokenKind::Word;
    }
    if text.bytes().all(|b| b.is_ascii_digit()) {
        return TokenKind::Integer;
    }
    if is_float(text) {
        return TokenKind::Float;
    }
    if is_identifier(text) {
        return keyword(text).unwrap_or(TokenKind::Id);
    }
    TokenKind::Word
}

/// Matches `digits '.' digits (('e' | 'E') '-'? digits)?`.
fn is_float(text: &str) -> bool {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(idx) => (&text[..idx], Some(&text[idx + 1..])),
        None => (text, None),
    };
    let Some((whole, fraction)) = mantissa.split_once('.') else {
        return false;
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !digits(fraction) {
        return false;
    }
    match exponent {
        None => true,
        Some(exp) => digits(exp.strip_prefix('-').unwrap_or(exp)),
    }
}

/// Matches `[A-Za-z_][A-Za-z0-9_$#]*`.
fn is_identifier(text: &str) -> bool {
    let mut bytes = text.bytes();
    let Some(first) = bytes.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'#'))
}

/// Recognizes keywords, case-insensitively.
fn keyword(text: &str) -> Option<TokenKind> {
    [
        ("AND", TokenKind::And),
        ("OR", TokenKind::Or),
        ("NOT", TokenKind::Not),
        ("TO", TokenKind::To),
    ]
    .into_iter()
    .find(|(word, _)| text.eq_ignore_ascii_case(word))
    .map(|(_, kind)| kind)
}

/// Convenience function to tokenize a query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).unwrap().into_iter().map(|t| t.text).collect()
    }

    use TokenKind::*;

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
        assert_eq!(tokenize("   ").unwrap(), vec![]);
    }

    #[test]
    fn words_and_identifiers() {
        assert_eq!(kinds("rust e-mail café _id"), vec![Id, Word, Word, Id]);
    }

    #[test]
    fn spans_are_byte_offsets() {
        let tokens = tokenize("  café bar").unwrap();
        assert_eq!((tokens[0].start, tokens[0].end), (2, 7));
        assert_eq!((tokens[1].start, tokens[1].end), (8, 11));
    }

    #[test]
    fn keywords_case_insensitive() {
        assert_eq!(kinds("and Or NOT to"), vec![And, Or, Not, To]);
        assert_eq!(texts("and Or"), vec!["and", "Or"]);
    }

    #[test]
    fn symbolic_connectives() {
        assert_eq!(kinds("a && b || c"), vec![Id, AmpAmp, Id, BarBar, Id]);
        assert_eq!(kinds("& |"), vec![Amp, Bar]);
    }

    #[test]
    fn numbers() {
        assert_eq!(kinds("42 0.8 1.5e-3 2nd"), vec![Integer, Float, Float, Word]);
    }

    #[test]
    fn dotdot_splits_numbers() {
        assert_eq!(kinds("1..10"), vec![Integer, DotDot, Integer]);
        assert_eq!(texts("a..b"), vec!["a", "..", "b"]);
    }

    #[test]
    fn trailing_dot_stays_in_word() {
        assert_eq!(kinds("end."), vec![Word]);
        assert_eq!(kinds("example.com"), vec![Word]);
    }

    #[test]
    fn phrase_keeps_quotes_and_escapes() {
        let tokens = tokenize(r#""say \"hi\"" x"#).unwrap();
        assert_eq!(tokens[0].kind, Phrase);
        assert_eq!(tokens[0].text, r#""say \"hi\"""#);
        assert_eq!(tokens[1].kind, Id);
    }

    #[test]
    fn unclosed_phrase_error() {
        let err = tokenize("rust \"hello world").unwrap_err();
        assert_eq!(err.position, 5);
        assert!(err.message.contains("unclosed"));
    }

    #[test]
    fn uri_literal() {
        let tokens = tokenize("{http://www.alfresco.org/model/content/1.0}name").unwrap();
        assert_eq!(tokens[0].kind, Uri);
        assert_eq!(tokens[0].text, "{http://www.alfresco.org/model/content/1.0}");
        assert_eq!(tokens[1].kind, Id);
    }

    #[test]
    fn unclosed_uri_error() {
        let err = tokenize("{http://x").unwrap_err();
        assert!(err.message.contains("URI"));
    }

    #[test]
    fn minus_only_at_word_start() {
        assert_eq!(kinds("-a b-c"), vec![Minus, Id, Word]);
    }

    #[test]
    fn wildcards() {
        assert_eq!(kinds("inter* te?t *ing"), vec![PrefixWord, WildWord, WildWord]);
        assert_eq!(kinds("a * b"), vec![Id, Star, Id]);
        assert_eq!(kinds("*(5)"), vec![Star, LParen, Integer, RParen]);
        assert_eq!(kinds("?"), vec![QuestionMark]);
    }

    #[test]
    fn escaped_star_is_not_a_wildcard() {
        assert_eq!(kinds(r"a\*"), vec![Word]);
    }

    #[test]
    fn escape_at_end_error() {
        let err = tokenize("abc\\").unwrap_err();
        assert_eq!(err.position, 3);
    }

    #[test]
    fn field_query_tokens() {
        assert_eq!(
            kinds("@cm:name:(a | b)^2"),
            vec![At, Id, Colon, Id, Colon, LParen, Id, Bar, Id, RParen, Caret, Integer]
        );
    }

    #[test]
    fn range_tokens() {
        assert_eq!(
            kinds("[1 TO 10> <a to b]"),
            vec![LSquare, Integer, To, Integer, Gt, Lt, Id, To, Id, RSquare]
        );
    }

    #[test]
    fn fuzzy_and_synonym_tokens() {
        assert_eq!(kinds("word~0.8 ~car"), vec![Id, Tilde, Float, Tilde, Id]);
    }

    #[test]
    fn template_tokens() {
        assert_eq!(
            kinds("%(title, cm:name)"),
            vec![Percent, LParen, Id, Comma, Id, Colon, Id, RParen]
        );
    }

    #[test]
    fn stray_closing_brace_error() {
        let err = tokenize("a }").unwrap_err();
        assert_eq!(err.position, 2);
    }
}
