//! Selector tokenizer module.

/// Ordered grammar table shared by all tokenizers.
pub mod grammar;
/// Masking pass run before the grammar.
pub mod mask;
/// Selector tokenizer implementation.
pub mod selector_tokenizer;
/// Selector token types.
pub mod token;

pub use grammar::GrammarRule;
pub use mask::{MaskedSelector, Replacement};
pub use selector_tokenizer::SelectorTokenizer;
pub use token::{Token, TokenKind, TokenType};
