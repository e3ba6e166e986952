//! Selector AST builder module.

/// Selector AST node types.
pub mod ast;
/// Token-to-tree assembly and pseudo-class argument parsing.
pub mod selector_parser;

pub use ast::{Ast, Combinator};
pub use selector_parser::{
    MAX_COMBINATOR_CHAIN, MAX_NESTING_DEPTH, ParseOptions, RECURSIVE_PSEUDO_CLASSES, SelectorParser,
    is_nth_pseudo_class, is_recursive_pseudo_class,
};
