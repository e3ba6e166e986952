//! The masking pass.
//!
//! Commas, combinators and parens may legally appear inside quoted attribute
//! values and inside pseudo-class arguments. Before the grammar runs, every
//! escape, every quoted string body and every parenthesized argument is
//! overwritten with a run of reserved private-use code points of the same
//! length, so the grammar cannot be confused by what they contain. Each
//! overwrite is recorded so [`MaskedSelector::unmask`] can splice the real
//! text back into the finished tokens.
//!
//! Masking never changes the length of the selector, so char offsets into the
//! masked text are char offsets into the input.

use tracing::trace;

use crate::error::{Imbalance, SelectorError};
use crate::tokenizer::Token;

/// Placeholder for a backslash escape (the backslash and the escaped char).
pub const ESCAPE_PLACEHOLDER: char = '\u{E000}';
/// Placeholder for the body of a quoted string. The quotes stay visible.
pub const STRING_PLACEHOLDER: char = '\u{E001}';
/// Placeholder for the inside of a paren group. The parens stay visible.
pub const PAREN_PLACEHOLDER: char = '\u{E002}';

/// Original text overwritten by the masking pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// The text as it was when this replacement was recorded. Paren groups
    /// are recorded after escapes and strings were masked, so their value
    /// still holds those placeholders.
    pub value: String,
    /// Char offset of the replaced text.
    pub offset: usize,
    /// Length of the replaced text in chars.
    pub len: usize,
}

/// A selector with escapes, string bodies and paren groups masked out.
#[derive(Debug, Clone)]
pub struct MaskedSelector {
    chars: Vec<char>,
    replacements: Vec<Replacement>,
}

impl MaskedSelector {
    /// Mask a trimmed selector.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::StructuralImbalance`] for a `(` that is never
    /// closed or a `)` that was never opened.
    pub fn new(input: &[char]) -> Result<Self, SelectorError> {
        let mut masked = Self {
            chars: input.to_vec(),
            replacements: Vec::new(),
        };
        masked.mask_escapes();
        masked.mask_strings();
        masked.mask_parens()?;
        trace!(
            replacements = masked.replacements.len(),
            "masked selector"
        );
        Ok(masked)
    }

    /// The masked text.
    #[must_use]
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// The recorded replacements, in discovery order: escapes, then strings,
    /// then paren groups.
    #[must_use]
    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    /// Splice the original text back into the tokens.
    ///
    /// Replacements are applied latest-found first. Paren groups were recorded
    /// with strings and escapes still masked, so restoring them first and the
    /// strings and escapes afterwards fills in every placeholder exactly once.
    /// A replacement is applied to each token whose `pos` contains it.
    ///
    /// Returns the indices of tokens whose content changed, in ascending order.
    pub fn unmask(&self, tokens: &mut [Token]) -> Vec<usize> {
        let mut dirty = vec![false; tokens.len()];

        for replacement in self.replacements.iter().rev() {
            let end = replacement.offset + replacement.len;
            for (index, token) in tokens.iter_mut().enumerate() {
                if token.pos.start > replacement.offset || end > token.pos.end {
                    continue;
                }
                let local = replacement.offset - token.pos.start;
                let mut content: Vec<char> = token.content.chars().collect();
                if local + replacement.len > content.len() {
                    // Normalized combinator or comma content; nothing to restore.
                    continue;
                }
                drop(content.splice(local..local + replacement.len, replacement.value.chars()));
                let restored: String = content.into_iter().collect();
                if restored != token.content {
                    token.content = restored;
                    dirty[index] = true;
                }
            }
        }

        dirty
            .into_iter()
            .enumerate()
            .filter_map(|(index, changed)| changed.then_some(index))
            .collect()
    }

    fn record(&mut self, start: usize, end: usize) {
        self.replacements.push(Replacement {
            value: self.chars[start..end].iter().collect(),
            offset: start,
            len: end - start,
        });
    }

    fn fill(&mut self, start: usize, end: usize, placeholder: char) {
        self.chars[start..end].fill(placeholder);
    }

    /// A backslash and the char after it.
    fn mask_escapes(&mut self) {
        let mut i = 0;
        while i + 1 < self.chars.len() {
            if self.chars[i] == '\\' {
                self.record(i, i + 2);
                self.fill(i, i + 2, ESCAPE_PLACEHOLDER);
                i += 2;
            } else {
                i += 1;
            }
        }
    }

    /// `"..."` or `'...'` with no newline or backslash inside. The quotes are
    /// kept; only the body is masked.
    fn mask_strings(&mut self) {
        let mut i = 0;
        while i < self.chars.len() {
            let Some(close) = self.closing_quote(i) else {
                i += 1;
                continue;
            };
            if close > i + 1 {
                self.record(i, close + 1);
                self.fill(i + 1, close, STRING_PLACEHOLDER);
            }
            i = close + 1;
        }
    }

    fn closing_quote(&self, open: usize) -> Option<usize> {
        let quote = self.chars[open];
        if quote != '"' && quote != '\'' {
            return None;
        }
        let close = self.chars[open + 1..]
            .iter()
            .position(|&c| c == quote || c == '\n' || c == '\\')
            .map(|at| open + 1 + at)?;
        (self.chars[close] == quote).then_some(close)
    }

    /// Balanced paren groups, outermost only. Nested groups are masked along
    /// with the rest of their enclosing argument.
    fn mask_parens(&mut self) -> Result<(), SelectorError> {
        let mut i = 0;
        while i < self.chars.len() {
            match self.chars[i] {
                '(' => {
                    let close = self.matching_paren(i)?;
                    self.record(i, close + 1);
                    self.fill(i + 1, close, PAREN_PLACEHOLDER);
                    i = close + 1;
                }
                ')' => {
                    return Err(SelectorError::StructuralImbalance {
                        kind: Imbalance::UnopenedParen,
                        offset: i,
                    });
                }
                _ => i += 1,
            }
        }
        Ok(())
    }

    fn matching_paren(&self, open: usize) -> Result<usize, SelectorError> {
        let mut depth = 0_usize;
        for (index, &c) in self.chars.iter().enumerate().skip(open) {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(index);
                    }
                }
                _ => {}
            }
        }
        Err(SelectorError::StructuralImbalance {
            kind: Imbalance::UnclosedParen,
            offset: open,
        })
    }
}
