use tracing::trace;

use super::grammar::{self, GrammarRule};
use super::mask::MaskedSelector;
use super::token::{Token, TokenKind, TokenType};
use crate::error::SelectorError;

/// A piece of the selector while the grammar runs: either text no rule has
/// consumed yet, or a finished token.
#[derive(Debug)]
enum Fragment {
    Text(String),
    Token(Token),
}

/// Selector tokenizer.
///
/// Splits a selector into typed, position-tagged tokens by applying the
/// ordered grammar to a masked copy of the input, then restoring the masked
/// text into the tokens that contain it.
pub struct SelectorTokenizer {
    /// The trimmed input
    input: Vec<char>,
    /// Collected tokens
    tokens: Vec<Token>,
}

impl SelectorTokenizer {
    /// Create a new tokenizer. Leading and trailing whitespace is dropped and
    /// token positions are relative to the trimmed text.
    #[must_use]
    pub fn new(input: impl AsRef<str>) -> Self {
        Self {
            input: input.as_ref().trim().chars().collect(),
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole input. An empty input produces no tokens.
    ///
    /// # Errors
    ///
    /// - [`SelectorError::StructuralImbalance`] for unbalanced parens.
    /// - [`SelectorError::UnexpectedSequence`] for text no rule matches.
    /// - [`SelectorError::InvalidTokenContent`] when a token's restored text
    ///   no longer matches its own rule.
    pub fn run(&mut self) -> Result<(), SelectorError> {
        self.tokens.clear();
        if self.input.is_empty() {
            return Ok(());
        }

        let masked = MaskedSelector::new(&self.input)?;
        let mut tokens = self.split_by_grammar(masked.text())?;

        // Restore masked text, then re-read the fields of every token it touched.
        for index in masked.unmask(&mut tokens) {
            rederive(&mut tokens[index])?;
        }

        trace!(count = tokens.len(), "tokenized selector");
        self.tokens = tokens;
        Ok(())
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Apply every grammar rule, in priority order, to every fragment that is
    /// still plain text, then assign positions.
    fn split_by_grammar(&self, masked: String) -> Result<Vec<Token>, SelectorError> {
        let mut fragments = vec![Fragment::Text(masked)];

        for rule in grammar::rules() {
            let mut i = 0;
            while i < fragments.len() {
                let split = match &fragments[i] {
                    Fragment::Text(text) => split_fragment(rule, text),
                    Fragment::Token(_) => None,
                };
                if let Some((pieces, token_at)) = split {
                    drop(fragments.splice(i..=i, pieces));
                    // Land on the token; the suffix after it is tried next.
                    i += token_at;
                }
                i += 1;
            }
        }

        self.assign_positions(fragments)
    }

    /// Walk the fragments left to right, giving each token its char range.
    /// Any fragment still holding text is an error.
    fn assign_positions(&self, fragments: Vec<Fragment>) -> Result<Vec<Token>, SelectorError> {
        let mut tokens = Vec::with_capacity(fragments.len());
        let mut offset = 0;

        for fragment in fragments {
            match fragment {
                Fragment::Text(text) => {
                    let len = text.chars().count();
                    return Err(SelectorError::UnexpectedSequence {
                        text: self.input[offset..offset + len].iter().collect(),
                        offset,
                    });
                }
                Fragment::Token(mut token) => {
                    let len = token.content.chars().count();
                    token.pos = offset..offset + len;
                    offset += len;
                    if matches!(token.kind, TokenKind::Combinator | TokenKind::Comma) {
                        token.content = normalize(&token.content);
                    }
                    tokens.push(token);
                }
            }
        }

        Ok(tokens)
    }
}

/// Match one rule against a text fragment and split it into
/// `[prefix?, token, suffix?]`. Also returns the index of the token within
/// the pieces.
fn split_fragment(rule: &GrammarRule, text: &str) -> Option<(Vec<Fragment>, usize)> {
    let (range, kind) = rule.find(text)?;
    trace!(
        token_type = %rule.token_type(),
        matched = &text[range.clone()],
        "grammar match"
    );

    let mut pieces = Vec::with_capacity(3);
    if range.start > 0 {
        pieces.push(Fragment::Text(text[..range.start].to_owned()));
    }
    let token_at = pieces.len();
    pieces.push(Fragment::Token(Token::new(kind, &text[range.clone()], 0..0)));
    if range.end < text.len() {
        pieces.push(Fragment::Text(text[range.end..].to_owned()));
    }
    Some((pieces, token_at))
}

/// Trim combinator and comma content. Whitespace-only content is the
/// descendant combinator, written as a single space.
fn normalize(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        " ".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Re-run a token's own rule against its restored content and take the
/// fields it captures.
fn rederive(token: &mut Token) -> Result<(), SelectorError> {
    let token_type: TokenType = token.token_type();
    let kind = grammar::rule(token_type)
        .restore(&token.content)
        .ok_or_else(|| SelectorError::InvalidTokenContent {
            token_type,
            content: token.content.clone(),
        })?;
    trace!(%token_type, content = %token.content, "restored token");
    token.kind = kind;
    Ok(())
}
