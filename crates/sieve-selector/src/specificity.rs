//! Specificity calculation.
//!
//! [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)

use core::fmt;
use core::ops::{Add, AddAssign};

use serde::Serialize;
use tracing::trace;

use crate::parser::{Ast, is_nth_pseudo_class, is_recursive_pseudo_class};
use crate::tokenizer::{Token, TokenKind};

/// Smallest comparison base used when ranking the alternatives of a list.
const MIN_LIST_BASE: u32 = 10;

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)
///
/// Specificities are compared by comparing the three components in order."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }

    /// The largest of the three components.
    #[must_use]
    pub fn max_component(self) -> u32 {
        self.0.max(self.1).max(self.2)
    }

    /// Collapse to one integer, `a * 2 * base + b * base + c`.
    ///
    /// Used to rank the alternatives of a selector list. `base` should exceed
    /// every component being compared.
    #[must_use]
    pub fn to_number(self, base: u64) -> u64 {
        u64::from(self.0) * 2 * base + u64::from(self.1) * base + u64::from(self.2)
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl AddAssign for Specificity {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

impl Ast {
    /// Score this selector.
    ///
    /// A list scores as its highest-ranked alternative, the first one on a
    /// tie. Anything else is the sum over its flattened tokens.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let specificity = match self {
            Self::List { list } => list_specificity(list),
            _ => self
                .tokens()
                .into_iter()
                .map(token_specificity)
                .fold(Specificity::default(), Add::add),
        };
        trace!(%specificity, "scored selector");
        specificity
    }
}

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// Alternatives are ranked with [`Specificity::to_number`] on a base wider
/// than any component, and the winning alternative's tuple is returned.
fn list_specificity(list: &[Ast]) -> Specificity {
    let scores: Vec<Specificity> = list.iter().map(Ast::specificity).collect();
    let widest = scores
        .iter()
        .map(|score| score.max_component())
        .fold(MIN_LIST_BASE, u32::max);
    let base = u64::from(widest) + 1;

    let mut best: Option<(u64, Specificity)> = None;
    for score in scores {
        let number = score.to_number(base);
        if best.is_none_or(|(top, _)| number > top) {
            best = Some((number, score));
        }
    }
    best.map(|(_, score)| score).unwrap_or_default()
}

/// The contribution of one token.
fn token_specificity(token: &Token) -> Specificity {
    match &token.kind {
        TokenKind::Id { .. } => Specificity(1, 0, 0),
        TokenKind::Class { .. } | TokenKind::Attribute { .. } => Specificity(0, 1, 0),
        TokenKind::PseudoElement { .. } | TokenKind::Type { .. } => Specificity(0, 0, 1),
        TokenKind::PseudoClass { name, subtree, .. } => {
            // [§ 4.4 :where()](https://www.w3.org/TR/selectors-4/#zero-matches)
            // "The specificity of a :where() pseudo-class is replaced by zero."
            if name == "where" {
                return Specificity::default();
            }
            match subtree {
                Some(subtree) if is_recursive_pseudo_class(name) => {
                    let mut specificity = subtree.specificity();
                    if is_nth_pseudo_class(name) {
                        specificity += Specificity(0, 1, 0);
                    }
                    specificity
                }
                _ => Specificity(0, 1, 0),
            }
        }
        TokenKind::Universal { .. } | TokenKind::Combinator | TokenKind::Comma => {
            Specificity::default()
        }
    }
}
