//! Field references, suffixes and templates.

use super::{
    Parser,
    grammar::{Scope, WILDCARDS, WORDS},
};
use crate::{
    ast::{AstKind, AstNode},
    error::{ErrorKind, ParseError},
    token::{Token, TokenKind},
};

impl<'a> Parser<'a> {
    /// Consumes a word token.
    pub(super) fn expect_word(&mut self) -> Result<&'a Token, ParseError> {
        self.expect_one_of(&WORDS)
    }

    /// Consumes a word or a stand-alone wildcard.
    pub(super) fn expect_term_word(&mut self) -> Result<&'a Token, ParseError> {
        let mut kinds = WORDS.to_vec();
        kinds.extend(WILDCARDS);
        self.expect_one_of(&kinds)
    }

    /// Parses `"@"? ({uri} | prefix ":")? identifier`.
    ///
    /// `with_prefix` selects the `prefix ":" identifier` reading; the two
    /// readings of `a:b` can only be told apart by what follows.
    fn field_reference(&mut self, with_prefix: bool) -> Result<AstNode, ParseError> {
        self.in_rule("field_reference", |p| {
            if p.check(TokenKind::At) {
                p.bump()?;
            }

            let qualifier = if p.check(TokenKind::Uri) {
                let uri = p.bump()?;
                Some(AstNode::new(AstKind::NameSpace, vec![AstNode::token(uri)]))
            } else if with_prefix {
                let prefix = p.expect(TokenKind::Id)?;
                p.expect(TokenKind::Colon)?;
                Some(AstNode::new(AstKind::Prefix, vec![AstNode::token(prefix)]))
            } else {
                None
            };

            let identifier = p.expect(TokenKind::Id)?;
            let mut children = vec![AstNode::token(identifier)];
            children.extend(qualifier);
            Ok(AstNode::new(AstKind::FieldRef, children))
        })
    }

    /// Parses a field reference, preferring the prefixed reading when it fits.
    fn any_field_reference(&mut self) -> Result<AstNode, ParseError> {
        let prefixed = self.trial(|p| p.field_reference(true));
        self.field_reference(prefixed)
    }

    /// Parses `field_reference ":"` in the given reading.
    fn field_qualifier(&mut self, prefixed: bool) -> Result<AstNode, ParseError> {
        let field = self.field_reference(prefixed)?;
        self.expect(TokenKind::Colon)?;
        Ok(field)
    }

    /// Finds which reading of a field qualifier, if any, starts here.
    ///
    /// Returns `Some(true)` for `prefix:name:`, `Some(false)` for `name:`.
    pub(super) fn field_qualifier_form(&mut self) -> Option<bool> {
        if self.trial(|p| p.field_qualifier(true)) {
            Some(true)
        } else if self.trial(|p| p.field_qualifier(false)) {
            Some(false)
        } else {
            None
        }
    }

    /// Parses a field qualifier if one starts here.
    pub(super) fn optional_field_qualifier(&mut self) -> Result<Option<AstNode>, ParseError> {
        match self.field_qualifier_form() {
            Some(prefixed) => self.field_qualifier(prefixed).map(Some),
            None => Ok(None),
        }
    }

    /// Parses a field-qualified test at the top level.
    ///
    /// `f:( ... )` is a field group. A range or proximity after `f:` becomes
    /// the one-operand field group `f:( ... )` would produce; a word or phrase
    /// becomes a TERM or PHRASE carrying the field reference.
    pub(super) fn field_qualified(&mut self, prefixed: bool) -> Result<AstNode, ParseError> {
        self.in_rule("field_qualified", |p| {
            let field = p.field_qualifier(prefixed)?;
            let scope = Scope::FieldGroup;

            let Some(kind) = p.peek_kind(0) else {
                return Err(p.error(ErrorKind::NoViableAlternative));
            };
            let before_dotdot = p.check_at(1, TokenKind::DotDot);

            if kind == TokenKind::LParen {
                let body = p.field_group_body()?;
                return Ok(AstNode::new(AstKind::FieldGroup, vec![field, body]));
            }

            let is_range = matches!(kind, TokenKind::LSquare | TokenKind::Lt)
                || (kind.is_range_word() && before_dotdot);
            if is_range {
                let range = p.range(scope)?;
                let body = p.wrap_field_test(range);
                return Ok(AstNode::new(AstKind::FieldGroup, vec![field, body]));
            }

            if kind.is_word()
                && p.check_at(1, TokenKind::Star)
                && p.trial(|p| p.proximity(scope))
            {
                let proximity = p.proximity(scope)?;
                let body = p.wrap_field_test(proximity);
                return Ok(AstNode::new(AstKind::FieldGroup, vec![field, body]));
            }

            if (kind.is_word() && !before_dotdot) || WILDCARDS.contains(&kind) {
                let word = p.bump()?;
                let mut children = vec![AstNode::token(word), field];
                children.extend(p.fuzzy()?);
                return Ok(AstNode::new(AstKind::Term, children));
            }

            if kind == TokenKind::Phrase {
                let phrase = p.bump()?;
                let mut children = vec![AstNode::token(phrase), field];
                children.extend(p.slop()?);
                return Ok(AstNode::new(AstKind::Phrase, children));
            }

            let mut expected = WORDS.to_vec();
            expected.extend(WILDCARDS);
            expected.extend([
                TokenKind::Phrase,
                TokenKind::LParen,
                TokenKind::LSquare,
                TokenKind::Lt,
            ]);
            Err(p.error(ErrorKind::NoViableAlternative).with_expected(expected))
        })
    }

    /// True if the next tokens are `~ number`.
    fn at_numeric_suffix(&self) -> bool {
        self.check(TokenKind::Tilde) && self.peek_kind(1).is_some_and(TokenKind::is_number)
    }

    /// Fails if another `~ number` is glued to the suffix ending with `last`.
    ///
    /// `a~0.8 ~0.5` is a term followed by a synonym; `a~0.8~0.5` is neither.
    fn reject_stacked_suffix(&self, last: &Token) -> Result<(), ParseError> {
        let glued = self.cursor.peek(0).is_some_and(|next| next.start == last.end);
        if glued && self.at_numeric_suffix() {
            return Err(self.error(ErrorKind::NoViableAlternative));
        }
        Ok(())
    }

    /// Parses `~ number` after a word, if present.
    ///
    /// A `~` not followed by a number is left alone; it starts a synonym.
    pub(super) fn fuzzy(&mut self) -> Result<Option<AstNode>, ParseError> {
        if !self.at_numeric_suffix() {
            return Ok(None);
        }
        self.in_rule("fuzzy", |p| {
            p.bump()?;
            let number = p.bump()?;
            p.reject_stacked_suffix(number)?;
            Ok(Some(AstNode::new(AstKind::Fuzzy, vec![AstNode::token(number)])))
        })
    }

    /// Parses `~ INTEGER` after a phrase, if present.
    pub(super) fn slop(&mut self) -> Result<Option<AstNode>, ParseError> {
        if !self.at_numeric_suffix() {
            return Ok(None);
        }
        self.in_rule("slop", |p| {
            p.bump()?;
            let slop = p.expect(TokenKind::Integer)?;
            p.reject_stacked_suffix(slop)?;
            Ok(Some(AstNode::new(AstKind::Fuzzy, vec![AstNode::token(slop)])))
        })
    }

    /// Parses `^ number`, if present.
    pub(super) fn boost(&mut self) -> Result<Option<AstNode>, ParseError> {
        if !self.check(TokenKind::Caret) {
            return Ok(None);
        }
        self.in_rule("boost", |p| {
            p.bump()?;
            let factor = p.expect_one_of(&[TokenKind::Integer, TokenKind::Float])?;
            Ok(Some(AstNode::new(AstKind::Boost, vec![AstNode::token(factor)])))
        })
    }

    /// Parses `% field_ref` or `% ( (field_ref ","?)+ )`.
    pub(super) fn template(&mut self) -> Result<AstNode, ParseError> {
        self.in_rule("template", |p| {
            p.expect(TokenKind::Percent)?;
            if !p.check(TokenKind::LParen) {
                let field = p.any_field_reference()?;
                return Ok(AstNode::new(AstKind::Template, vec![field]));
            }

            p.bump()?;
            if p.check(TokenKind::RParen) {
                return Err(p
                    .error(ErrorKind::EmptyRequiredRepetition)
                    .with_expected([TokenKind::At, TokenKind::Uri, TokenKind::Id]));
            }
            let mut fields = Vec::new();
            loop {
                fields.push(p.any_field_reference()?);
                if p.check(TokenKind::Comma) {
                    p.bump()?;
                }
                if p.check(TokenKind::RParen) || p.cursor.at_end() {
                    break;
                }
            }
            p.expect(TokenKind::RParen)?;
            Ok(AstNode::new(AstKind::Template, fields))
        })
    }
}
