//! The restricted CMIS `contains()` grammar.
//!
//! Terms and phrases, optionally excluded with `-`, joined by adjacency and
//! separated into alternatives by `OR`. Anything else is rejected at the
//! offending token.

use super::{Parser, grammar::WORDS};
use crate::{
    ast::{AstKind, AstNode},
    error::{ErrorKind, ParseError},
    token::TokenKind,
};

impl Parser<'_> {
    /// True if the token `k` ahead can begin a CMIS operand.
    fn starts_cmis_prefixed(&self, k: usize) -> bool {
        self.peek_kind(k).is_some_and(|kind| {
            kind.is_word() || matches!(kind, TokenKind::Phrase | TokenKind::Minus)
        })
    }

    /// True if the next token separates CMIS alternatives.
    fn at_cmis_or(&self) -> bool {
        match self.peek_kind(0) {
            Some(TokenKind::BarBar) => true,
            Some(TokenKind::Or) => self.starts_cmis_prefixed(1),
            _ => false,
        }
    }

    /// Parses `cmis_conjunction (OR cmis_conjunction)*`.
    pub(super) fn cmis_disjunction(&mut self) -> Result<AstNode, ParseError> {
        self.in_rule("cmis_disjunction", |p| {
            let mut operands = vec![p.cmis_conjunction()?];
            while p.at_cmis_or() {
                p.bump()?;
                operands.push(p.cmis_conjunction()?);
            }
            Ok(AstNode::new(AstKind::Disjunction, operands))
        })
    }

    /// Parses `cmis_prefixed+`.
    ///
    /// Every token other than an OR or the end of input is taken as another
    /// operand, so unsupported syntax fails inside [`Self::cmis_test`].
    fn cmis_conjunction(&mut self) -> Result<AstNode, ParseError> {
        self.in_rule("cmis_conjunction", |p| {
            if p.cursor.at_end() || p.at_cmis_or() {
                return Err(p
                    .error(ErrorKind::EmptyRequiredRepetition)
                    .with_expected(cmis_first_set()));
            }

            let mut operands = vec![p.cmis_prefixed()?];
            while !p.cursor.at_end() && !p.at_cmis_or() {
                operands.push(p.cmis_prefixed()?);
            }
            Ok(AstNode::new(AstKind::Conjunction, operands))
        })
    }

    /// Parses `"-"? cmis_test`.
    fn cmis_prefixed(&mut self) -> Result<AstNode, ParseError> {
        self.in_rule("cmis_prefixed", |p| {
            let kind = if p.check(TokenKind::Minus) {
                p.bump()?;
                AstKind::Exclude
            } else {
                AstKind::Default
            };
            let test = p.cmis_test()?;
            Ok(AstNode::new(kind, vec![test]))
        })
    }

    /// Parses a bare term or phrase.
    fn cmis_test(&mut self) -> Result<AstNode, ParseError> {
        self.in_rule("cmis_test", |p| match p.peek_kind(0) {
            Some(kind) if kind.is_word() => {
                let word = p.bump()?;
                Ok(AstNode::new(AstKind::Term, vec![AstNode::token(word)]))
            }
            Some(TokenKind::Phrase) => {
                let phrase = p.bump()?;
                Ok(AstNode::new(AstKind::Phrase, vec![AstNode::token(phrase)]))
            }
            _ => {
                let mut expected = WORDS.to_vec();
                expected.push(TokenKind::Phrase);
                Err(p.error(ErrorKind::NoViableAlternative).with_expected(expected))
            }
        })
    }
}

/// Tokens that can begin a CMIS operand.
fn cmis_first_set() -> Vec<TokenKind> {
    let mut kinds = WORDS.to_vec();
    kinds.extend([TokenKind::Phrase, TokenKind::Minus]);
    kinds
}
