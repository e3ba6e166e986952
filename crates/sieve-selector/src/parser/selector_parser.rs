use std::mem;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::ast::{Ast, Combinator};
use crate::error::{ListError, SelectorError};
use crate::tokenizer::{SelectorTokenizer, Token, TokenKind, TokenType};

/// Pseudo-classes whose argument is itself a selector and gets parsed into a
/// `subtree`.
///
/// [§ 4 Logical combinations](https://www.w3.org/TR/selectors-4/#logical-combination),
/// [§ 14.4 Child-indexed pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index)
pub const RECURSIVE_PSEUDO_CLASSES: [&str; 9] = [
    "not",
    "is",
    "where",
    "has",
    "matches",
    "-moz-any",
    "-webkit-any",
    "nth-child",
    "nth-last-child",
];

/// How deep pseudo-class arguments may nest before parsing gives up.
pub const MAX_NESTING_DEPTH: usize = 64;

/// How many combinators may chain above a compound selector, counted through
/// every enclosing pseudo-class argument, before parsing gives up.
pub const MAX_COMBINATOR_CHAIN: usize = 128;

/// [§ 14.4.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
///
/// "The :nth-child(An+B [of S]?) pseudo-class notation represents elements
/// that are among An+Bth elements from the list composed of their inclusive
/// siblings that match the selector list S."
static NTH_OF_SELECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\A\s*(?<index>even|odd|[-+\dn\s]*?[\dn])\s+of\s+(?<selector>.+?)\s*\z")
        .expect("nth-child pattern must compile")
});

/// Whether a pseudo-class name takes a selector argument.
#[must_use]
pub fn is_recursive_pseudo_class(name: &str) -> bool {
    RECURSIVE_PSEUDO_CLASSES.contains(&name)
}

/// Whether a pseudo-class name is `:nth-child` or `:nth-last-child`, whose
/// selector argument follows an `An+B of` prefix.
#[must_use]
pub fn is_nth_pseudo_class(name: &str) -> bool {
    matches!(name, "nth-child" | "nth-last-child")
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Parse the arguments of recursive pseudo-classes into subtrees.
    pub recursive: bool,
    /// Split comma-separated selectors into an [`Ast::List`].
    pub list: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            list: true,
        }
    }
}

impl ParseOptions {
    /// Options that build the tree without parsing pseudo-class arguments.
    #[must_use]
    pub const fn flat() -> Self {
        Self {
            recursive: false,
            list: true,
        }
    }
}

/// Selector AST builder.
#[derive(Debug, Clone, Copy)]
pub struct SelectorParser {
    options: ParseOptions,
    /// How many pseudo-class arguments enclose the selector being parsed.
    depth: usize,
    /// Combinators chained above the selector being parsed.
    combinators: usize,
}

impl SelectorParser {
    /// Create a parser for top-level selectors.
    #[must_use]
    pub const fn new(options: ParseOptions) -> Self {
        Self {
            options,
            depth: 0,
            combinators: 0,
        }
    }

    /// Tokenize and parse a selector string.
    ///
    /// # Errors
    ///
    /// Any tokenizer error, plus the AST errors of [`SelectorParser::parse_tokens`].
    pub fn parse_str(&self, selector: &str) -> Result<Ast, SelectorError> {
        let mut tokenizer = SelectorTokenizer::new(selector);
        tokenizer.run()?;
        self.parse_tokens(tokenizer.into_tokens())
    }

    /// Build an AST from tokens, then attach pseudo-class subtrees when the
    /// parser is recursive.
    ///
    /// # Errors
    ///
    /// - [`SelectorError::MalformedSelectorList`] for an empty list alternative.
    /// - [`SelectorError::EmptyConstruct`] when a group has no tokens, which
    ///   includes an empty token sequence and a combinator with nothing on one
    ///   side.
    /// - [`SelectorError::NestingTooDeep`] when pseudo-class arguments nest
    ///   past [`MAX_NESTING_DEPTH`], or combinators chain past
    ///   [`MAX_COMBINATOR_CHAIN`].
    /// - Errors from tokenizing and parsing pseudo-class arguments.
    pub fn parse_tokens(&self, tokens: Vec<Token>) -> Result<Ast, SelectorError> {
        debug!(
            tokens = tokens.len(),
            depth = self.depth,
            recursive = self.options.recursive,
            list = self.options.list,
            "parse selector"
        );
        let combinators = self.combinators + longest_chain(&tokens, self.options.list);
        if combinators > MAX_COMBINATOR_CHAIN {
            return Err(SelectorError::NestingTooDeep {
                limit: MAX_COMBINATOR_CHAIN,
            });
        }
        let mut ast = nest(tokens, self.options.list)?;

        if self.options.recursive {
            let scope = Self {
                combinators,
                ..*self
            };
            ast.try_for_each_token_mut(&mut |token| scope.attach_subtree(token))?;
        }

        Ok(ast)
    }

    /// Parse the argument of a recursive pseudo-class into its `subtree`.
    ///
    /// For `:nth-child(An+B of S)` only `S` is parsed and `An+B` is kept as the
    /// token's `index`. A plain `An+B` argument gets no subtree.
    fn attach_subtree(&self, token: &mut Token) -> Result<(), SelectorError> {
        let TokenKind::PseudoClass {
            name,
            argument: Some(argument),
            index,
            subtree,
        } = &mut token.kind
        else {
            return Ok(());
        };
        if !is_recursive_pseudo_class(name) {
            return Ok(());
        }

        let mut selector = argument.as_str();
        if is_nth_pseudo_class(name) {
            let Some(captures) = NTH_OF_SELECTOR.captures(selector) else {
                return Ok(());
            };
            *index = captures.name("index").map(|m| m.as_str().to_owned());
            selector = captures.name("selector").map_or("", |m| m.as_str());
        }

        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SelectorError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        let nested = Self {
            options: ParseOptions::default(),
            depth: self.depth + 1,
            combinators: self.combinators,
        };
        debug!(
            pseudo_class = %name,
            %selector,
            depth = nested.depth,
            "parse pseudo-class argument"
        );
        *subtree = Some(Box::new(nested.parse_str(selector)?));
        Ok(())
    }
}

/// The most combinators in any one selector of the sequence. Each one adds a
/// level of [`Ast::Complex`] when nested.
fn longest_chain(tokens: &[Token], list: bool) -> usize {
    let mut longest = 0;
    let mut chain = 0;
    for token in tokens {
        match token.token_type() {
            TokenType::Combinator => {
                chain += 1;
                longest = longest.max(chain);
            }
            TokenType::Comma if list => chain = 0,
            _ => {}
        }
    }
    longest
}

/// Assemble a token sequence into a tree.
///
/// Commas split a list (when `list` is set); otherwise the rightmost
/// combinator splits the sequence into a complex selector; otherwise what is
/// left is a single token or a compound selector.
fn nest(mut tokens: Vec<Token>, list: bool) -> Result<Ast, SelectorError> {
    if list && tokens.iter().any(|token| token.token_type() == TokenType::Comma) {
        return nest_list(tokens);
    }

    if let Some(at) = tokens
        .iter()
        .rposition(|token| token.token_type() == TokenType::Combinator)
    {
        let mut right = tokens.split_off(at);
        let combinator_token = right.remove(0);
        let combinator = Combinator::from_content(&combinator_token.content).ok_or_else(|| {
            SelectorError::InvalidTokenContent {
                token_type: TokenType::Combinator,
                content: combinator_token.content.clone(),
            }
        })?;
        trace!(%combinator, left = tokens.len(), right = right.len(), "complex selector");
        return Ok(Ast::Complex {
            combinator,
            left: Box::new(nest(tokens, true)?),
            right: Box::new(nest(right, true)?),
        });
    }

    match tokens.len() {
        0 => Err(SelectorError::EmptyConstruct),
        1 => tokens.pop().map(Ast::Token).ok_or(SelectorError::EmptyConstruct),
        _ => Ok(Ast::Compound { list: tokens }),
    }
}

/// Split at every comma and nest each alternative without list handling.
fn nest_list(tokens: Vec<Token>) -> Result<Ast, SelectorError> {
    let mut selectors = Vec::new();
    let mut group = Vec::new();
    let mut last_comma = 0;

    for token in tokens {
        if token.token_type() == TokenType::Comma {
            if group.is_empty() {
                return Err(ListError::IncorrectComma {
                    offset: token.pos.start,
                }
                .into());
            }
            last_comma = token.pos.start;
            selectors.push(nest(mem::take(&mut group), false)?);
        } else {
            group.push(token);
        }
    }

    if group.is_empty() {
        return Err(ListError::TrailingComma { offset: last_comma }.into());
    }
    selectors.push(nest(group, false)?);

    trace!(alternatives = selectors.len(), "selector list");
    Ok(Ast::List { list: selectors })
}
