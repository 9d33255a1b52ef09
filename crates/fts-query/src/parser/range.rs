//! Range and proximity rules.

use super::{Parser, grammar::Scope};
use crate::{
    ast::{AstKind, AstNode},
    error::ParseError,
    token::{Token, TokenKind},
};

/// Tokens accepted as a range bound.
const RANGE_WORDS: [TokenKind; 5] = [
    TokenKind::Id,
    TokenKind::Word,
    TokenKind::Phrase,
    TokenKind::Integer,
    TokenKind::Float,
];

impl<'a> Parser<'a> {
    /// Consumes a range bound.
    fn expect_range_word(&mut self) -> Result<&'a Token, ParseError> {
        self.expect_one_of(&RANGE_WORDS)
    }

    /// Parses `low .. high` or a bracketed `[low TO high>` range.
    ///
    /// Always yields four children: left marker, low, high, right marker.
    pub(super) fn range(&mut self, scope: Scope) -> Result<AstNode, ParseError> {
        let kind = scope.ns().range;
        self.in_rule("range", |p| {
            let bracketed = matches!(p.peek_kind(0), Some(TokenKind::LSquare | TokenKind::Lt));
            if !bracketed {
                let low = p.expect_range_word()?;
                p.expect(TokenKind::DotDot)?;
                let high = p.expect_range_word()?;
                return Ok(AstNode::new(
                    kind,
                    vec![
                        AstNode::marker(AstKind::Inclusive),
                        AstNode::token(low),
                        AstNode::token(high),
                        AstNode::marker(AstKind::Inclusive),
                    ],
                ));
            }

            let left = p.bump()?;
            let low = p.expect_range_word()?;
            p.expect(TokenKind::To)?;
            let high = p.expect_range_word()?;
            let right = p.expect_one_of(&[TokenKind::RSquare, TokenKind::Gt])?;

            let bound = |token: &Token, inclusive: TokenKind| {
                AstNode::marker(if token.kind == inclusive {
                    AstKind::Inclusive
                } else {
                    AstKind::Exclusive
                })
            };
            Ok(AstNode::new(
                kind,
                vec![
                    bound(left, TokenKind::LSquare),
                    AstNode::token(low),
                    AstNode::token(high),
                    bound(right, TokenKind::RSquare),
                ],
            ))
        })
    }

    /// Parses `word ("*" ("(" INTEGER? ")")? word)+`.
    ///
    /// Children alternate word, distance, word. A distance without an integer
    /// is left unspecified rather than given a default.
    pub(super) fn proximity(&mut self, scope: Scope) -> Result<AstNode, ParseError> {
        let kind = scope.ns().proximity;
        self.in_rule("proximity", |p| {
            let first = p.expect_word()?;
            let mut children = vec![AstNode::token(first)];

            loop {
                p.expect(TokenKind::Star)?;
                let mut distance = AstNode::marker(AstKind::Distance);
                if p.check(TokenKind::LParen) {
                    p.bump()?;
                    if p.check(TokenKind::Integer) {
                        let limit = p.bump()?;
                        distance.children.push(AstNode::token(limit));
                    }
                    p.expect(TokenKind::RParen)?;
                }
                let word = p.expect_word()?;
                children.push(distance);
                children.push(AstNode::token(word));

                if !p.check(TokenKind::Star) {
                    break;
                }
            }
            Ok(AstNode::new(kind, children))
        })
    }
}
