//! Query abstract syntax tree.
//!
//! Every rule produces the same node type, an [`AstNode`] tagged with an
//! [`AstKind`]. Operators and tests at the top level and inside
//! `field:( ... )` groups use distinct kinds, so a consumer can tell the scope
//! of a node from its kind alone. Leaf tokens keep their source text verbatim.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::token::{Token, TokenKind};

/// The tag of an AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstKind {
    /// Alternatives; at least one must match.
    Disjunction,
    /// Operands that must all match.
    Conjunction,
    /// `NOT x` / `!x`.
    Negation,
    /// An unprefixed operand.
    Default,
    /// `+x`.
    Mandatory,
    /// `|x`.
    Optional,
    /// `-x`.
    Exclude,
    /// A single word.
    Term,
    /// `=word`.
    ExactTerm,
    /// `="phrase"`.
    ExactPhrase,
    /// A quoted phrase.
    Phrase,
    /// `~word`.
    Synonym,
    /// A bounded range.
    Range,
    /// Words within a distance of each other.
    Proximity,
    /// `field:( ... )`.
    FieldGroup,
    /// `%field` or `%(a, b)`.
    Template,
    /// Disjunction inside a field group.
    FieldDisjunction,
    /// Conjunction inside a field group.
    FieldConjunction,
    /// Negation inside a field group.
    FieldNegation,
    /// Unprefixed operand inside a field group.
    FieldDefault,
    /// `+x` inside a field group.
    FieldMandatory,
    /// `|x` inside a field group.
    FieldOptional,
    /// `-x` inside a field group.
    FieldExclude,
    /// Term inside a field group.
    FgTerm,
    /// Exact term inside a field group.
    FgExactTerm,
    /// Exact phrase inside a field group.
    FgExactPhrase,
    /// Phrase inside a field group.
    FgPhrase,
    /// Synonym inside a field group.
    FgSynonym,
    /// Range inside a field group.
    FgRange,
    /// Proximity inside a field group.
    FgProximity,
    /// A field reference.
    FieldRef,
    /// A `prefix:` namespace qualifier on a field reference.
    Prefix,
    /// A `{uri}` namespace qualifier on a field reference.
    NameSpace,
    /// `^n` relevance boost.
    Boost,
    /// `~n` fuzziness or phrase slop.
    Fuzzy,
    /// Inclusive range bound.
    Inclusive,
    /// Exclusive range bound.
    Exclusive,
    /// Proximity distance; no child when unspecified.
    Distance,
    /// A verbatim token.
    Token(TokenKind),
}

impl AstKind {
    /// Returns the upper-case name used in dumps and serialization.
    pub fn name(self) -> &'static str {
        match self {
            Self::Disjunction => "DISJUNCTION",
            Self::Conjunction => "CONJUNCTION",
            Self::Negation => "NEGATION",
            Self::Default => "DEFAULT",
            Self::Mandatory => "MANDATORY",
            Self::Optional => "OPTIONAL",
            Self::Exclude => "EXCLUDE",
            Self::Term => "TERM",
            Self::ExactTerm => "EXACT_TERM",
            Self::ExactPhrase => "EXACT_PHRASE",
            Self::Phrase => "PHRASE",
            Self::Synonym => "SYNONYM",
            Self::Range => "RANGE",
            Self::Proximity => "PROXIMITY",
            Self::FieldGroup => "FIELD_GROUP",
            Self::Template => "TEMPLATE",
            Self::FieldDisjunction => "FIELD_DISJUNCTION",
            Self::FieldConjunction => "FIELD_CONJUNCTION",
            Self::FieldNegation => "FIELD_NEGATION",
            Self::FieldDefault => "FIELD_DEFAULT",
            Self::FieldMandatory => "FIELD_MANDATORY",
            Self::FieldOptional => "FIELD_OPTIONAL",
            Self::FieldExclude => "FIELD_EXCLUDE",
            Self::FgTerm => "FG_TERM",
            Self::FgExactTerm => "FG_EXACT_TERM",
            Self::FgExactPhrase => "FG_EXACT_PHRASE",
            Self::FgPhrase => "FG_PHRASE",
            Self::FgSynonym => "FG_SYNONYM",
            Self::FgRange => "FG_RANGE",
            Self::FgProximity => "FG_PROXIMITY",
            Self::FieldRef => "FIELD_REF",
            Self::Prefix => "PREFIX",
            Self::NameSpace => "NAME_SPACE",
            Self::Boost => "BOOST",
            Self::Fuzzy => "FUZZY",
            Self::Inclusive => "INCLUSIVE",
            Self::Exclusive => "EXCLUSIVE",
            Self::Distance => "DISTANCE",
            Self::Token(kind) => kind.name(),
        }
    }

    /// True for kinds only produced inside a field group.
    pub fn is_field_scoped(self) -> bool {
        matches!(
            self,
            Self::FieldDisjunction
                | Self::FieldConjunction
                | Self::FieldNegation
                | Self::FieldDefault
                | Self::FieldMandatory
                | Self::FieldOptional
                | Self::FieldExclude
                | Self::FgTerm
                | Self::FgExactTerm
                | Self::FgExactPhrase
                | Self::FgPhrase
                | Self::FgSynonym
                | Self::FgRange
                | Self::FgProximity
        )
    }
}

impl fmt::Display for AstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for AstKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A node of the parsed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AstNode {
    /// The node tag.
    pub kind: AstKind,
    /// Child nodes, in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Self>,
    /// Source text; set on token leaves only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
}

impl AstNode {
    /// Creates an interior node.
    pub fn new(kind: AstKind, children: Vec<Self>) -> Self {
        Self {
            kind,
            children,
            literal: None,
        }
    }

    /// Creates a childless marker node.
    pub fn marker(kind: AstKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// Creates a leaf carrying a token's verbatim text.
    pub fn token(token: &Token) -> Self {
        Self {
            kind: AstKind::Token(token.kind),
            children: Vec::new(),
            literal: Some(token.text.clone()),
        }
    }

    /// Returns the child at `index`.
    pub fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }

    /// Returns the first child of the given kind.
    pub fn find(&self, kind: AstKind) -> Option<&Self> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Returns the token text of a leaf, or of the first child if that is a leaf.
    ///
    /// `TERM`, `BOOST` and `FUZZY` nodes keep their token as the first child, so
    /// this reads the word, boost factor or fuzziness directly.
    pub fn text(&self) -> Option<&str> {
        self.literal
            .as_deref()
            .or_else(|| self.children.first().and_then(|c| c.literal.as_deref()))
    }

    /// Renders the node as a compact S-expression.
    ///
    /// Token leaves print as their text, childless markers as their name:
    /// `(CONJUNCTION (DEFAULT (TERM a)) (DEFAULT (RANGE INCLUSIVE 1 10 EXCLUSIVE)))`.
    pub fn to_sexpr(&self) -> String {
        let mut out = String::new();
        self.write_sexpr(&mut out);
        out
    }

    /// Appends the S-expression form of this node to `out`.
    fn write_sexpr(&self, out: &mut String) {
        if let Some(literal) = &self.literal {
            out.push_str(literal);
            return;
        }
        if self.children.is_empty() {
            out.push_str(self.kind.name());
            return;
        }
        out.push('(');
        out.push_str(self.kind.name());
        for child in &self.children {
            out.push(' ');
            child.write_sexpr(out);
        }
        out.push(')');
    }

    /// Formats the node as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match &self.literal {
            Some(literal) => writeln!(f, "{prefix}{} {literal}", self.kind)?,
            None => writeln!(f, "{prefix}{}", self.kind)?,
        }
        for child in &self.children {
            child.fmt_tree(f, indent + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> AstNode {
        AstNode::token(&Token::new(TokenKind::Id, text, 0, text.len()))
    }

    fn sample() -> AstNode {
        AstNode::new(
            AstKind::Mandatory,
            vec![
                AstNode::new(AstKind::Term, vec![word("rust")]),
                AstNode::new(
                    AstKind::Boost,
                    vec![AstNode::token(&Token::new(TokenKind::Float, "2.0", 6, 9))],
                ),
            ],
        )
    }

    #[test]
    fn sexpr_rendering() {
        assert_eq!(sample().to_sexpr(), "(MANDATORY (TERM rust) (BOOST 2.0))");
        assert_eq!(AstNode::marker(AstKind::Inclusive).to_sexpr(), "INCLUSIVE");
    }

    #[test]
    fn tree_rendering() {
        let expected = "MANDATORY\n  TERM\n    ID rust\n  BOOST\n    FLOAT 2.0\n";
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn text_reads_first_token_child() {
        let node = sample();
        assert_eq!(node.find(AstKind::Boost).and_then(AstNode::text), Some("2.0"));
        assert_eq!(node.child(0).and_then(AstNode::text), Some("rust"));
        assert_eq!(node.text(), None);
    }

    #[test]
    fn serializes_kind_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["kind"], "MANDATORY");
        assert_eq!(json["children"][0]["children"][0]["kind"], "ID");
        assert_eq!(json["children"][0]["children"][0]["literal"], "rust");
        assert!(json.get("literal").is_none());
    }

    #[test]
    fn field_scoped_kinds() {
        assert!(AstKind::FgRange.is_field_scoped());
        assert!(AstKind::FieldConjunction.is_field_scoped());
        assert!(!AstKind::FieldGroup.is_field_scoped());
        assert!(!AstKind::Range.is_field_scoped());
    }
}
