//! Selector AST.
//!
//! [§ 4 Selector syntax and structure](https://www.w3.org/TR/selectors-4/#structure)
//!
//! The tree mirrors the grammar: a selector list holds complex selectors, a
//! complex selector is a binary node joining two selectors with a combinator,
//! and a compound selector is a run of simple selectors. A selector that
//! reduces to a single token is the token itself.

use core::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::tokenizer::Token;

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A descendant combinator is whitespace that separates two compound selectors."
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A child combinator is a greater-than sign (>) that separates two compound
    /// selectors."
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A next-sibling combinator is a plus sign (+) that separates two compound
    /// selectors."
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A subsequent-sibling combinator is a tilde (~) that separates two compound
    /// selectors."
    SubsequentSibling,
}

impl Combinator {
    /// Read a normalized combinator token's content.
    #[must_use]
    pub fn from_content(content: &str) -> Option<Self> {
        match content {
            " " => Some(Self::Descendant),
            ">" => Some(Self::Child),
            "+" => Some(Self::NextSibling),
            "~" => Some(Self::SubsequentSibling),
            _ => None,
        }
    }

    /// The normalized source text of this combinator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => ">",
            Self::NextSibling => "+",
            Self::SubsequentSibling => "~",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Combinator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A node of the selector tree.
///
/// Every node exclusively owns its children, including the `subtree` of a
/// recursive pseudo-class token, so the tree has no sharing and no cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    ///
    /// Comma-separated alternatives, in source order.
    List {
        /// The alternatives.
        list: Vec<Ast>,
    },

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// Two selectors joined by a combinator. The rightmost combinator of a
    /// chain is the outermost node, so `a > b c` is
    /// `Complex(Complex(a, >, b), ' ', c)`.
    Complex {
        /// The combinator joining the two sides.
        combinator: Combinator,
        /// Everything before the combinator.
        left: Box<Ast>,
        /// Everything after the combinator.
        right: Box<Ast>,
    },

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// Two or more simple selectors with no combinator between them.
    Compound {
        /// The simple selectors, in source order.
        list: Vec<Token>,
    },

    /// A selector made of exactly one token.
    Token(Token),
}

impl Ast {
    /// Depth-first `(token, parent)` pairs.
    ///
    /// Every token is yielded once. The parent is the node that directly
    /// holds the token; a bare token at the root has no parent. Combinators
    /// live in [`Ast::Complex`] nodes and are not yielded, nor are the tokens
    /// inside a pseudo-class `subtree`.
    #[must_use]
    pub fn flatten(&self) -> Vec<(&Token, Option<&Self>)> {
        let mut out = Vec::new();
        self.flatten_into(None, &mut out);
        out
    }

    fn flatten_into<'a>(
        &'a self,
        parent: Option<&'a Self>,
        out: &mut Vec<(&'a Token, Option<&'a Self>)>,
    ) {
        match self {
            Self::List { list } => {
                for child in list {
                    child.flatten_into(Some(self), out);
                }
            }
            Self::Complex { left, right, .. } => {
                left.flatten_into(Some(self), out);
                right.flatten_into(Some(self), out);
            }
            Self::Compound { list } => out.extend(list.iter().map(|token| (token, Some(self)))),
            Self::Token(token) => out.push((token, parent)),
        }
    }

    /// The flattened tokens, without their parents.
    #[must_use]
    pub fn tokens(&self) -> Vec<&Token> {
        self.flatten().into_iter().map(|(token, _)| token).collect()
    }

    /// Visit every `(token, parent)` pair in flatten order.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a Token, Option<&'a Self>)) {
        for (token, parent) in self.flatten() {
            visit(token, parent);
        }
    }

    /// Mutable counterpart of [`Ast::walk`], stopping at the first error.
    pub(crate) fn try_for_each_token_mut<E>(
        &mut self,
        visit: &mut impl FnMut(&mut Token) -> Result<(), E>,
    ) -> Result<(), E> {
        match self {
            Self::List { list } => list
                .iter_mut()
                .try_for_each(|child| child.try_for_each_token_mut(&mut *visit)),
            Self::Complex { left, right, .. } => {
                left.try_for_each_token_mut(&mut *visit)?;
                right.try_for_each_token_mut(&mut *visit)
            }
            Self::Compound { list } => list.iter_mut().try_for_each(&mut *visit),
            Self::Token(token) => visit(token),
        }
    }

    /// Concatenated token content.
    ///
    /// List alternatives are joined with `,` and complex selectors keep their
    /// combinator, so re-parsing the result gives an equivalent tree.
    /// Whitespace is canonical rather than original.
    #[must_use]
    pub fn stringify(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List { list } => {
                for (i, child) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{child}")?;
                }
                Ok(())
            }
            Self::Complex {
                combinator,
                left,
                right,
            } => write!(f, "{left}{combinator}{right}"),
            Self::Compound { list } => list.iter().try_for_each(|token| f.write_str(&token.content)),
            Self::Token(token) => f.write_str(&token.content),
        }
    }
}

impl Serialize for Ast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::List { list } => {
                let mut node = serializer.serialize_struct("List", 2)?;
                node.serialize_field("type", "list")?;
                node.serialize_field("list", list)?;
                node.end()
            }
            Self::Complex {
                combinator,
                left,
                right,
            } => {
                let mut node = serializer.serialize_struct("Complex", 4)?;
                node.serialize_field("type", "complex")?;
                node.serialize_field("combinator", combinator)?;
                node.serialize_field("left", left)?;
                node.serialize_field("right", right)?;
                node.end()
            }
            Self::Compound { list } => {
                let mut node = serializer.serialize_struct("Compound", 2)?;
                node.serialize_field("type", "compound")?;
                node.serialize_field("list", list)?;
                node.end()
            }
            Self::Token(token) => token.serialize(serializer),
        }
    }
}
