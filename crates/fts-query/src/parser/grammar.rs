//! The disjunction / conjunction / prefixed / test skeleton.
//!
//! One set of rules serves both the top level and `field:( ... )` groups; a
//! [`Scope`] picks the node kinds, rule names and allowed alternatives.

use super::Parser;
use crate::{
    ast::{AstKind, AstNode},
    config::Mode,
    error::{ErrorKind, ParseError},
    token::TokenKind,
};

/// Node kinds and rule names produced by one grammar scope.
#[derive(Debug)]
pub(super) struct Namespace {
    /// Disjunction node.
    pub(super) disjunction: AstKind,
    /// Conjunction node.
    pub(super) conjunction: AstKind,
    /// `NOT` / `!` prefix.
    pub(super) negation: AstKind,
    /// No prefix.
    pub(super) default: AstKind,
    /// `+` prefix.
    pub(super) mandatory: AstKind,
    /// `|` prefix.
    pub(super) optional: AstKind,
    /// `-` prefix.
    pub(super) exclude: AstKind,
    /// Single word.
    pub(super) term: AstKind,
    /// `=word`.
    pub(super) exact_term: AstKind,
    /// `="phrase"`.
    pub(super) exact_phrase: AstKind,
    /// Quoted phrase.
    pub(super) phrase: AstKind,
    /// `~word`.
    pub(super) synonym: AstKind,
    /// Range.
    pub(super) range: AstKind,
    /// Proximity.
    pub(super) proximity: AstKind,
    /// Rule names: disjunction, conjunction, prefixed, test, group.
    pub(super) rules: [&'static str; 5],
}

/// Top-level kinds.
const QUERY: Namespace = Namespace {
    disjunction: AstKind::Disjunction,
    conjunction: AstKind::Conjunction,
    negation: AstKind::Negation,
    default: AstKind::Default,
    mandatory: AstKind::Mandatory,
    optional: AstKind::Optional,
    exclude: AstKind::Exclude,
    term: AstKind::Term,
    exact_term: AstKind::ExactTerm,
    exact_phrase: AstKind::ExactPhrase,
    phrase: AstKind::Phrase,
    synonym: AstKind::Synonym,
    range: AstKind::Range,
    proximity: AstKind::Proximity,
    rules: ["disjunction", "conjunction", "prefixed", "test", "group"],
};

/// Field-group kinds.
const FIELD_GROUP: Namespace = Namespace {
    disjunction: AstKind::FieldDisjunction,
    conjunction: AstKind::FieldConjunction,
    negation: AstKind::FieldNegation,
    default: AstKind::FieldDefault,
    mandatory: AstKind::FieldMandatory,
    optional: AstKind::FieldOptional,
    exclude: AstKind::FieldExclude,
    term: AstKind::FgTerm,
    exact_term: AstKind::FgExactTerm,
    exact_phrase: AstKind::FgExactPhrase,
    phrase: AstKind::FgPhrase,
    synonym: AstKind::FgSynonym,
    range: AstKind::FgRange,
    proximity: AstKind::FgProximity,
    rules: [
        "field_group_disjunction",
        "field_group_conjunction",
        "field_group_prefixed",
        "field_group_test",
        "field_group_group",
    ],
};

/// Which instance of the grammar is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scope {
    /// The top level of a query.
    Query,
    /// Inside `field:( ... )`.
    FieldGroup,
}

impl Scope {
    /// Node kinds and rule names for this scope.
    pub(super) fn ns(self) -> &'static Namespace {
        match self {
            Self::Query => &QUERY,
            Self::FieldGroup => &FIELD_GROUP,
        }
    }

    /// True where field references, field groups and templates are allowed.
    pub(super) fn allows_fields(self) -> bool {
        self == Self::Query
    }
}

/// The operator implied between adjacent operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Connector {
    /// Adjacent operands are conjoined.
    And,
    /// Adjacent operands are disjoined.
    Or,
}

/// Tokens that introduce a prefixed operand.
const PREFIXES: [TokenKind; 5] = [
    TokenKind::Not,
    TokenKind::Exclamation,
    TokenKind::Plus,
    TokenKind::Bar,
    TokenKind::Minus,
];

/// Tokens that can be searched for as a word.
pub(super) const WORDS: [TokenKind; 10] = [
    TokenKind::Id,
    TokenKind::Word,
    TokenKind::PrefixWord,
    TokenKind::WildWord,
    TokenKind::Integer,
    TokenKind::Float,
    TokenKind::And,
    TokenKind::Or,
    TokenKind::Not,
    TokenKind::To,
];

/// Stand-alone wildcards, accepted wherever a term's word is.
pub(super) const WILDCARDS: [TokenKind; 2] = [TokenKind::Star, TokenKind::QuestionMark];

impl Parser<'_> {
    /// The default connector of a scope under the current configuration.
    pub(super) fn connector(&self, scope: Scope) -> Connector {
        let and = match scope {
            Scope::Query => self.config.mode != Mode::DefaultDisjunction,
            Scope::FieldGroup => self.config.default_field_conjunction,
        };
        if and { Connector::And } else { Connector::Or }
    }

    /// Tokens that can begin a test in `scope`.
    pub(super) fn test_first_set(scope: Scope) -> Vec<TokenKind> {
        let mut kinds = WORDS.to_vec();
        kinds.extend(WILDCARDS);
        kinds.extend([
            TokenKind::Phrase,
            TokenKind::Equals,
            TokenKind::Tilde,
            TokenKind::LSquare,
            TokenKind::Lt,
            TokenKind::LParen,
        ]);
        if scope.allows_fields() {
            kinds.extend([TokenKind::At, TokenKind::Uri, TokenKind::Percent]);
        }
        kinds
    }

    /// True if the token `k` ahead can begin a test.
    fn starts_test(&self, k: usize, scope: Scope) -> bool {
        self.peek_kind(k)
            .is_some_and(|kind| kind.is_word() || Self::test_first_set(scope).contains(&kind))
    }

    /// True if the token `k` ahead can begin a prefixed operand.
    fn starts_prefixed(&self, k: usize, scope: Scope) -> bool {
        self.peek_kind(k).is_some_and(|kind| PREFIXES.contains(&kind)) || self.starts_test(k, scope)
    }

    /// True if the next token is a disjunction operator.
    ///
    /// `||` always is; the keyword `OR` only when an operand follows it, and is
    /// otherwise a literal word.
    fn at_or_operator(&self, scope: Scope) -> bool {
        match self.peek_kind(0) {
            Some(TokenKind::BarBar) => true,
            Some(TokenKind::Or) => self.starts_prefixed(1, scope),
            _ => false,
        }
    }

    /// True if the next token is a conjunction operator.
    fn at_and_operator(&self, scope: Scope) -> bool {
        match self.peek_kind(0) {
            Some(TokenKind::AmpAmp) => true,
            Some(TokenKind::And) => self.starts_prefixed(1, scope),
            _ => false,
        }
    }

    /// Parses a disjunction of conjunctions.
    ///
    /// When the default connector is AND and no OR was seen, the single
    /// conjunction is returned as is.
    pub(super) fn disjunction(&mut self, scope: Scope) -> Result<AstNode, ParseError> {
        let ns = scope.ns();
        self.in_rule(ns.rules[0], |p| {
            let connector = p.connector(scope);
            let mut operands = vec![p.conjunction(scope)?];
            loop {
                if p.at_or_operator(scope) {
                    p.bump()?;
                } else if connector != Connector::Or || !p.starts_prefixed(0, scope) {
                    break;
                }
                operands.push(p.conjunction(scope)?);
            }

            if connector == Connector::And && operands.len() == 1 {
                return Ok(operands.remove(0));
            }
            Ok(AstNode::new(ns.disjunction, operands))
        })
    }

    /// Parses a conjunction of prefixed operands.
    fn conjunction(&mut self, scope: Scope) -> Result<AstNode, ParseError> {
        let ns = scope.ns();
        self.in_rule(ns.rules[1], |p| {
            if !p.starts_prefixed(0, scope) {
                let mut expected = PREFIXES.to_vec();
                expected.extend(Self::test_first_set(scope));
                return Err(p
                    .error(ErrorKind::EmptyRequiredRepetition)
                    .with_expected(expected));
            }

            let adjacent = p.connector(scope) == Connector::And;
            let mut operands = vec![p.prefixed(scope)?];
            loop {
                if p.at_and_operator(scope) {
                    p.bump()?;
                } else if !adjacent || p.at_or_operator(scope) || !p.starts_prefixed(0, scope) {
                    break;
                }
                operands.push(p.prefixed(scope)?);
            }
            Ok(AstNode::new(ns.conjunction, operands))
        })
    }

    /// Parses a test with an optional prefix and boost.
    fn prefixed(&mut self, scope: Scope) -> Result<AstNode, ParseError> {
        let ns = scope.ns();
        self.in_rule(ns.rules[2], |p| {
            p.nested(|p| {
                let kind = match p.peek_kind(0) {
                    Some(TokenKind::Not | TokenKind::Exclamation) => ns.negation,
                    Some(TokenKind::Plus) => ns.mandatory,
                    Some(TokenKind::Bar) => ns.optional,
                    Some(TokenKind::Minus) => ns.exclude,
                    _ => ns.default,
                };
                if kind != ns.default {
                    p.bump()?;
                }

                let mut children = vec![p.test(scope)?];
                if let Some(boost) = p.boost()? {
                    children.push(boost);
                }
                Ok(AstNode::new(kind, children))
            })
        })
    }

    /// Parses one test, trying alternatives in order.
    fn test(&mut self, scope: Scope) -> Result<AstNode, ParseError> {
        let ns = scope.ns();
        self.in_rule(ns.rules[3], |p| {
            let Some(kind) = p.peek_kind(0) else {
                return Err(p
                    .error(ErrorKind::NoViableAlternative)
                    .with_expected(Self::test_first_set(scope)));
            };

            if kind.is_word()
                && p.check_at(1, TokenKind::Star)
                && p.trial(|p| p.proximity(scope))
            {
                return p.proximity(scope);
            }

            if scope.allows_fields()
                && matches!(kind, TokenKind::Id | TokenKind::At | TokenKind::Uri)
                && let Some(prefixed) = p.field_qualifier_form()
            {
                return p.field_qualified(prefixed);
            }

            let before_dotdot = p.check_at(1, TokenKind::DotDot);
            match kind {
                k if k.is_word() && !before_dotdot => p.term(scope),
                TokenKind::Equals => p.exact_term(scope),
                TokenKind::Star | TokenKind::QuestionMark => p.term(scope),
                TokenKind::Phrase if !before_dotdot => p.phrase(scope),
                TokenKind::Tilde => p.synonym(scope),
                TokenKind::LSquare | TokenKind::Lt => p.range(scope),
                k if k.is_range_word() => p.range(scope),
                TokenKind::LParen => p.group(scope),
                TokenKind::Percent if scope.allows_fields() => p.template(),
                _ => Err(p
                    .error(ErrorKind::NoViableAlternative)
                    .with_expected(Self::test_first_set(scope))),
            }
        })
    }

    /// Parses `( disjunction )`, returning the inner disjunction.
    fn group(&mut self, scope: Scope) -> Result<AstNode, ParseError> {
        self.in_rule(scope.ns().rules[4], |p| {
            p.expect(TokenKind::LParen)?;
            let inner = p.disjunction(scope)?;
            p.expect(TokenKind::RParen)?;
            Ok(inner)
        })
    }

    /// Parses `( field_disjunction )` after a field reference.
    pub(super) fn field_group_body(&mut self) -> Result<AstNode, ParseError> {
        self.group(Scope::FieldGroup)
    }

    /// Wraps a single test the way a one-operand field group would.
    pub(super) fn wrap_field_test(&self, test: AstNode) -> AstNode {
        let ns = Scope::FieldGroup.ns();
        let default = AstNode::new(ns.default, vec![test]);
        let conjunction = AstNode::new(ns.conjunction, vec![default]);
        match self.connector(Scope::FieldGroup) {
            Connector::And => conjunction,
            Connector::Or => AstNode::new(ns.disjunction, vec![conjunction]),
        }
    }

    /// Parses a term: a word with optional fuzziness.
    fn term(&mut self, scope: Scope) -> Result<AstNode, ParseError> {
        let ns = scope.ns();
        self.in_rule("term", |p| {
            let word = p.expect_term_word()?;
            let mut children = vec![AstNode::token(word)];
            children.extend(p.fuzzy()?);
            Ok(AstNode::new(ns.term, children))
        })
    }

    /// Parses a quoted phrase with optional slop.
    fn phrase(&mut self, scope: Scope) -> Result<AstNode, ParseError> {
        let ns = scope.ns();
        self.in_rule("phrase", |p| {
            let phrase = p.expect(TokenKind::Phrase)?;
            let mut children = vec![AstNode::token(phrase)];
            children.extend(p.slop()?);
            Ok(AstNode::new(ns.phrase, children))
        })
    }

    /// Parses `=word` or `="phrase"`, optionally field-qualified at the top level.
    fn exact_term(&mut self, scope: Scope) -> Result<AstNode, ParseError> {
        let ns = scope.ns();
        self.in_rule("exact_term", |p| {
            p.expect(TokenKind::Equals)?;
            let field = p.scoped_field_qualifier(scope)?;
            if !p.check(TokenKind::Phrase) {
                return p.qualified_word(ns.exact_term, field);
            }

            let phrase = p.bump()?;
            let mut children = vec![AstNode::token(phrase)];
            children.extend(field);
            children.extend(p.slop()?);
            Ok(AstNode::new(ns.exact_phrase, children))
        })
    }

    /// Parses `~word`, optionally field-qualified at the top level.
    fn synonym(&mut self, scope: Scope) -> Result<AstNode, ParseError> {
        let kind = scope.ns().synonym;
        self.in_rule("synonym", |p| {
            p.expect(TokenKind::Tilde)?;
            let field = p.scoped_field_qualifier(scope)?;
            p.qualified_word(kind, field)
        })
    }

    /// Parses a field qualifier where `scope` allows one.
    fn scoped_field_qualifier(&mut self, scope: Scope) -> Result<Option<AstNode>, ParseError> {
        if scope.allows_fields() {
            self.optional_field_qualifier()
        } else {
            Ok(None)
        }
    }

    /// Parses `word fuzzy?` into a node of `kind` carrying `field`.
    fn qualified_word(
        &mut self,
        kind: AstKind,
        field: Option<AstNode>,
    ) -> Result<AstNode, ParseError> {
        let word = self.expect_term_word()?;
        let mut children = vec![AstNode::token(word)];
        children.extend(field);
        children.extend(self.fuzzy()?);
        Ok(AstNode::new(kind, children))
    }
}
