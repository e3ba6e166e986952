//! CSS selector tokenizer, AST builder and specificity calculator.
//!
//! # Scope
//!
//! This crate implements:
//! - **Masking pass**
//!   - Escapes, quoted string bodies and parenthesized arguments are hidden
//!     from the grammar, so delimiters inside them are never mis-tokenized
//!   - Unbalanced parens are reported with their offset
//!
//! - **Tokenizer**
//!   - Attribute, id, class, type, universal, pseudo-class and pseudo-element
//!     selectors, combinators and list commas
//!   - Namespace prefixes (`ns|name`, `*|*`) and backslash escapes in names
//!   - Char-offset positions into the trimmed selector
//!
//! - **AST builder** ([§ 4 Selector syntax and structure](https://www.w3.org/TR/selectors-4/#structure))
//!   - Selector lists, complex selectors (rightmost combinator outermost),
//!     compound selectors and single tokens
//!   - Arguments of `:is()`, `:not()`, `:where()`, `:has()`, `:matches()`,
//!     `:-moz-any()`, `:-webkit-any()`, `:nth-child(An+B of S)` and
//!     `:nth-last-child(An+B of S)` parsed into subtrees
//!
//! - **Specificity** ([§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules))
//!   - List alternatives ranked on a common base
//!   - `:where()` scores zero; other logical pseudo-classes take the
//!     specificity of their argument
//!
//! # Not Implemented
//!
//! - Matching selectors against a document
//! - Validating pseudo-class names or attribute operators
//! - Namespace resolution
//!
//! # Example
//!
//! ```
//! use sieve_selector::{ParseOptions, Specificity, parse, specificity, stringify};
//!
//! let ast = parse("ul > li.item:not(#skip)", ParseOptions::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(stringify(&ast), "ul>li.item:not(#skip)");
//! assert_eq!(ast.specificity(), Specificity(1, 1, 2));
//!
//! assert_eq!(specificity(":where(#a), .b").unwrap(), Some(Specificity(0, 1, 0)));
//! assert_eq!(specificity(None::<&str>).unwrap(), None);
//! ```

/// Error types for tokenizing and parsing.
pub mod error;
/// Selector AST and the builder that assembles it from tokens.
pub mod parser;
/// Specificity per [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules).
pub mod specificity;
/// Masking pass, grammar table and tokenizer.
pub mod tokenizer;

pub use error::{Imbalance, ListError, SelectorError};
pub use parser::{
    Ast, Combinator, MAX_COMBINATOR_CHAIN, MAX_NESTING_DEPTH, ParseOptions, SelectorParser,
};
pub use specificity::Specificity;
pub use tokenizer::{SelectorTokenizer, Token, TokenKind, TokenType};

/// Tokenize a selector.
///
/// `None` in gives `Ok(None)`. An empty or whitespace-only selector gives an
/// empty token list.
///
/// # Errors
///
/// Returns a [`SelectorError`] for unbalanced parens, text no rule matches,
/// or a token whose restored content is invalid.
pub fn tokenize<'a>(
    selector: impl Into<Option<&'a str>>,
) -> Result<Option<Vec<Token>>, SelectorError> {
    let Some(selector) = selector.into() else {
        return Ok(None);
    };
    let mut tokenizer = SelectorTokenizer::new(selector);
    tokenizer.run()?;
    Ok(Some(tokenizer.into_tokens()))
}

/// Tokenize and parse a selector into an AST.
///
/// `None` in gives `Ok(None)`.
///
/// # Errors
///
/// Any tokenizer error, plus [`SelectorError::EmptyConstruct`] for an empty
/// selector, [`SelectorError::MalformedSelectorList`] for an empty list
/// alternative and [`SelectorError::NestingTooDeep`] for runaway
/// pseudo-class nesting.
pub fn parse<'a>(
    selector: impl Into<Option<&'a str>>,
    options: ParseOptions,
) -> Result<Option<Ast>, SelectorError> {
    selector
        .into()
        .map(|selector| SelectorParser::new(options).parse_str(selector))
        .transpose()
}

/// Build an AST from an already tokenized selector.
///
/// # Errors
///
/// See [`SelectorParser::parse_tokens`].
pub fn parse_tokens(tokens: Vec<Token>, options: ParseOptions) -> Result<Ast, SelectorError> {
    SelectorParser::new(options).parse_tokens(tokens)
}

/// Parse a selector recursively and compute its specificity.
///
/// `None` in gives `Ok(None)`.
///
/// # Errors
///
/// Any error from [`parse`].
pub fn specificity<'a>(
    selector: impl Into<Option<&'a str>>,
) -> Result<Option<Specificity>, SelectorError> {
    Ok(parse(selector, ParseOptions::default())?.map(|ast| ast.specificity()))
}

/// Render an AST back to selector text. See [`Ast::stringify`].
#[must_use]
pub fn stringify(node: &Ast) -> String {
    node.stringify()
}

/// Concatenate token contents in order.
#[must_use]
pub fn stringify_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.content.as_str()).collect()
}
