//! The ordered selector grammar.
//!
//! Each rule pairs a [`TokenType`] with two compiled patterns:
//!
//! - a *masked* pattern, matched against the selector after the masking pass
//!   has replaced escapes, string contents and parenthesized arguments with
//!   placeholder runs. Pseudo-class and pseudo-element arguments only match
//!   the paren placeholder here.
//! - a *restore* pattern, anchored to a whole token, used to re-derive a
//!   token's fields once its real text has been spliced back in. Its argument
//!   group accepts anything.
//!
//! Patterns are compiled once per process and shared read-only between
//! concurrent parses.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use strum::IntoEnumIterator;

use super::mask::PAREN_PLACEHOLDER;
use super::token::{TokenKind, TokenType};

/// One identifier: word chars, `-`, any non-ASCII code point (which covers
/// the mask placeholders), or a backslash escape.
const NAME: &str = r"(?:[-\w\x{80}-\x{10FFFF}]|\\.)+";

/// Optional `ns|` prefix of type, universal and attribute selectors.
const NAMESPACE: &str = r"(?:(?<namespace>\*|(?:[-\w\x{80}-\x{10FFFF}]|\\.)*)\|)?";

/// A grammar rule: token type plus its masked and restore patterns.
#[derive(Debug)]
pub struct GrammarRule {
    token_type: TokenType,
    masked: Regex,
    restore: Regex,
}

impl GrammarRule {
    fn new(token_type: TokenType) -> Self {
        let masked = source(token_type, &format!("{PAREN_PLACEHOLDER}+"));
        let restore = format!(r"\A(?:{})\z", source(token_type, "(?s:.+)"));
        Self {
            token_type,
            masked: compile(&masked),
            restore: compile(&restore),
        }
    }

    /// The token type this rule produces.
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Find the leftmost match in a masked fragment.
    ///
    /// Returns the byte range of the match within `text` and the token
    /// payload read from its captures.
    #[must_use]
    pub fn find(&self, text: &str) -> Option<(Range<usize>, TokenKind)> {
        let captures = self.masked.captures(text)?;
        let whole = captures.get(0)?;
        let kind = extract(self.token_type, &captures)?;
        Some((whole.range(), kind))
    }

    /// Re-derive a token payload from fully restored token content.
    ///
    /// Returns `None` when the content no longer forms a token of this type.
    #[must_use]
    pub fn restore(&self, content: &str) -> Option<TokenKind> {
        let captures = self.restore.captures(content)?;
        extract(self.token_type, &captures)
    }
}

/// All rules, in the priority order the tokenizer applies them.
static GRAMMAR: Lazy<Vec<GrammarRule>> =
    Lazy::new(|| TokenType::iter().map(GrammarRule::new).collect());

/// The grammar rules in priority order.
#[must_use]
pub fn rules() -> &'static [GrammarRule] {
    &GRAMMAR
}

/// The rule for one token type.
#[must_use]
pub fn rule(token_type: TokenType) -> &'static GrammarRule {
    // GRAMMAR is built from TokenType::iter(), so the discriminant indexes it.
    &GRAMMAR[token_type as usize]
}

/// Pattern source for a token type, with `argument` substituted as the
/// pseudo-class / pseudo-element argument sub-pattern.
fn source(token_type: TokenType, argument: &str) -> String {
    match token_type {
        TokenType::Attribute => format!(
            r"\[\s*{NAMESPACE}(?<name>{NAME})\s*(?:(?<operator>\W?=)\s*(?<value>.+?)\s*(?:\s(?<case_sensitive>[iIsS]))?\s*)?\]"
        ),
        TokenType::Id => format!(r"#(?<name>{NAME})"),
        TokenType::Class => format!(r"\.(?<name>{NAME})"),
        TokenType::Comma => r"\s*,\s*".to_owned(),
        TokenType::Combinator => r"\s*[\s>+~]\s*".to_owned(),
        TokenType::PseudoElement => format!(r"::(?<name>{NAME})(?:\((?<argument>{argument})\))?"),
        TokenType::PseudoClass => format!(r":(?<name>{NAME})(?:\((?<argument>{argument})\))?"),
        TokenType::Universal => format!(r"{NAMESPACE}\*"),
        TokenType::Type => format!(r"{NAMESPACE}(?<name>{NAME})"),
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("selector grammar pattern must compile")
}

fn capture(captures: &Captures<'_>, name: &str) -> Option<String> {
    captures.name(name).map(|m| m.as_str().to_owned())
}

/// Build the token payload from a rule's named captures.
fn extract(token_type: TokenType, captures: &Captures<'_>) -> Option<TokenKind> {
    let kind = match token_type {
        TokenType::Attribute => TokenKind::Attribute {
            namespace: capture(captures, "namespace"),
            name: capture(captures, "name")?,
            operator: capture(captures, "operator"),
            value: capture(captures, "value"),
            case_sensitive: capture(captures, "case_sensitive"),
        },
        TokenType::Id => TokenKind::Id {
            name: capture(captures, "name")?,
        },
        TokenType::Class => TokenKind::Class {
            name: capture(captures, "name")?,
        },
        TokenType::Comma => TokenKind::Comma,
        TokenType::Combinator => TokenKind::Combinator,
        TokenType::PseudoElement => TokenKind::PseudoElement {
            name: capture(captures, "name")?,
            argument: capture(captures, "argument"),
        },
        TokenType::PseudoClass => TokenKind::PseudoClass {
            name: capture(captures, "name")?,
            argument: capture(captures, "argument"),
            index: None,
            subtree: None,
        },
        TokenType::Universal => TokenKind::Universal {
            namespace: capture(captures, "namespace"),
        },
        TokenType::Type => TokenKind::Type {
            namespace: capture(captures, "namespace"),
            name: capture(captures, "name")?,
        },
    };
    Some(kind)
}
