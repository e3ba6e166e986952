//! Selector token types.
//!
//! A token is the smallest parsed unit of a selector: one simple selector
//! ([§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors),
//! [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors),
//! pseudo-classes and pseudo-elements), a combinator, or a list comma.

use std::ops::Range;

use serde::{Serialize, Serializer};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::parser::Ast;

/// The closed set of token tags.
///
/// Variants are declared in grammar priority order: the tokenizer tries
/// attribute selectors first and element type names last.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TokenType {
    /// `[name]`, `[ns|name op value i]`
    Attribute,
    /// `#name`
    Id,
    /// `.name`
    Class,
    /// `,` between selector list alternatives
    Comma,
    /// Whitespace, `>`, `+` or `~` between compound selectors
    Combinator,
    /// `::name` or `::name(argument)`
    PseudoElement,
    /// `:name` or `:name(argument)`
    PseudoClass,
    /// `*` or `ns|*`
    Universal,
    /// `name` or `ns|name`
    Type,
}

/// The type-specific payload of a [`Token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TokenKind {
    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Example: `[lang|="en" i]`
    Attribute {
        /// Namespace prefix before `|`, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        /// Attribute name.
        name: String,
        /// Match operator such as `=`, `~=`, `|=`, `^=`, `$=`, `*=`.
        #[serde(skip_serializing_if = "Option::is_none")]
        operator: Option<String>,
        /// Value as written, quotes included.
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        /// The `i`/`s` case flag.
        #[serde(rename = "caseSensitive", skip_serializing_if = "Option::is_none")]
        case_sensitive: Option<String>,
    },

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id {
        /// The id, without `#`.
        name: String,
    },

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class {
        /// The class name, without `.`.
        name: String,
    },

    /// Selector list separator. Content is normalized to `,`.
    Comma,

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    ///
    /// Content is normalized to ` `, `>`, `+` or `~`.
    Combinator,

    /// [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    PseudoElement {
        /// Name without the leading `::`.
        name: String,
        /// Text between the parens, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        argument: Option<String>,
    },

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass {
        /// Name without the leading `:`.
        name: String,
        /// Text between the parens, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        argument: Option<String>,
        /// The `An+B` part of `:nth-child(An+B of S)`.
        #[serde(skip_serializing_if = "Option::is_none")]
        index: Option<String>,
        /// The parsed selector argument of `:is()`, `:not()`, `:where()`,
        /// `:has()` and friends, when the parser runs recursively.
        #[serde(skip_serializing_if = "Option::is_none")]
        subtree: Option<Box<Ast>>,
    },

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal {
        /// Namespace prefix before `|`, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
    },

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    Type {
        /// Namespace prefix before `|`, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        namespace: Option<String>,
        /// Element name.
        name: String,
    },
}

impl TokenKind {
    /// The tag of this payload.
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        match self {
            Self::Attribute { .. } => TokenType::Attribute,
            Self::Id { .. } => TokenType::Id,
            Self::Class { .. } => TokenType::Class,
            Self::Comma => TokenType::Comma,
            Self::Combinator => TokenType::Combinator,
            Self::PseudoElement { .. } => TokenType::PseudoElement,
            Self::PseudoClass { .. } => TokenType::PseudoClass,
            Self::Universal { .. } => TokenType::Universal,
            Self::Type { .. } => TokenType::Type,
        }
    }
}

/// A typed, position-tagged slice of the selector text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Type tag and type-specific fields.
    #[serde(flatten)]
    pub kind: TokenKind,
    /// The exact source text of the token. Combinator and comma content is
    /// trimmed, with the descendant combinator represented by a single space.
    pub content: String,
    /// Half-open `[start, end)` char range in the trimmed selector.
    #[serde(serialize_with = "serialize_pos")]
    pub pos: Range<usize>,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub fn new(kind: TokenKind, content: impl Into<String>, pos: Range<usize>) -> Self {
        Self {
            kind,
            content: content.into(),
            pos,
        }
    }

    /// The tag of this token.
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        self.kind.token_type()
    }

    /// The `name` field, for token types that carry one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Attribute { name, .. }
            | TokenKind::Id { name }
            | TokenKind::Class { name }
            | TokenKind::PseudoElement { name, .. }
            | TokenKind::PseudoClass { name, .. }
            | TokenKind::Type { name, .. } => Some(name),
            TokenKind::Comma | TokenKind::Combinator | TokenKind::Universal { .. } => None,
        }
    }

    /// The parenthesized argument of a pseudo-class or pseudo-element.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::PseudoElement { argument, .. } | TokenKind::PseudoClass { argument, .. } => {
                argument.as_deref()
            }
            _ => None,
        }
    }

    /// The namespace prefix of a type, universal or attribute selector.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Attribute { namespace, .. }
            | TokenKind::Universal { namespace }
            | TokenKind::Type { namespace, .. } => namespace.as_deref(),
            _ => None,
        }
    }

    /// The parsed selector argument of a recursive pseudo-class.
    #[must_use]
    pub fn subtree(&self) -> Option<&Ast> {
        match &self.kind {
            TokenKind::PseudoClass { subtree, .. } => subtree.as_deref(),
            _ => None,
        }
    }

    /// Length of the token in chars, as counted for `pos`.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pos.end - self.pos.start
    }

    /// Whether the token spans no input.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pos.end == self.pos.start
    }
}

/// Positions serialize as a two-element `[start, end]` array.
fn serialize_pos<S: Serializer>(pos: &Range<usize>, serializer: S) -> Result<S::Ok, S::Error> {
    [pos.start, pos.end].serialize(serializer)
}
