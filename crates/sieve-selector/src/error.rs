//! Errors raised while tokenizing or building a selector AST.
//!
//! Every failure is fatal for the call that raised it: there is no partial
//! recovery and no partial result. An absent selector is not an error; the
//! public entry points report it as `Ok(None)`.

use strum_macros::Display;
use thiserror::Error;

use crate::tokenizer::TokenType;

/// Which side of a parenthesis group is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Imbalance {
    /// A `(` whose group never returns to nesting depth zero.
    #[strum(to_string = "opening paren without closing paren")]
    UnclosedParen,
    /// A `)` with no open group to close.
    #[strum(to_string = "closing paren without opening paren")]
    UnopenedParen,
}

/// A comma-separated selector list with an empty alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListError {
    /// A comma with nothing before it (leading comma, or two adjacent commas).
    #[error("incorrect comma at index {offset}")]
    IncorrectComma {
        /// Offset of the offending comma token.
        offset: usize,
    },
    /// A list ending in a comma with nothing after it.
    #[error("trailing comma at index {offset}")]
    TrailingComma {
        /// Offset of the last comma token.
        offset: usize,
    },
}

/// Failure while tokenizing or parsing a selector.
///
/// Offsets are char offsets into the trimmed selector text. Errors raised
/// while parsing the argument of a pseudo-class such as `:not()` carry
/// offsets relative to that argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Unmatched `(` or `)` found by the masking pass.
    #[error("{kind} at index {offset}")]
    StructuralImbalance {
        /// Which paren is unmatched.
        kind: Imbalance,
        /// Offset of the unmatched paren.
        offset: usize,
    },

    /// Text that no grammar rule could consume.
    #[error("unexpected sequence {text:?} found at index {offset}")]
    UnexpectedSequence {
        /// The leftover text, as it appears in the input.
        text: String,
        /// Offset of the leftover text.
        offset: usize,
    },

    /// A token whose restored content no longer matches its own pattern.
    #[error("unable to parse content for {token_type}: {content:?}")]
    InvalidTokenContent {
        /// The type the token was tokenized as.
        token_type: TokenType,
        /// The restored token content.
        content: String,
    },

    /// Empty alternative in a comma-separated selector list.
    #[error(transparent)]
    MalformedSelectorList(#[from] ListError),

    /// A group of zero tokens reached the AST builder.
    #[error("could not build AST from an empty token group")]
    EmptyConstruct,

    /// Pseudo-class arguments nested deeper than the parser allows.
    #[error("selector nesting exceeds {limit} levels")]
    NestingTooDeep {
        /// The nesting limit that was hit.
        limit: usize,
    },
}
