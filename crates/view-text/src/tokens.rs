//! Line token streams and the sub-range filter used on wrapped lines.
//!
//! A token owns no text: it is a start offset plus an opaque scope id, and
//! it extends to the start of the next token (or the end of the line). The
//! tokenizer that produces these lives outside this layer; here they are
//! only carried, sliced and shifted.

/// Opaque style/scope identifier assigned by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// One token: covers `[start_offset, next token's start_offset)` in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start_offset: usize,
    pub scope: ScopeId,
}

impl Token {
    pub fn new(start_offset: usize, scope: ScopeId) -> Self {
        Self {
            start_offset,
            scope,
        }
    }
}

/// The tokens of one input line, sorted by start offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens {
    tokens: Vec<Token>,
    text_length: usize,
}

impl LineTokens {
    /// `tokens` must be sorted ascending by `start_offset` and lie within
    /// `0..text_length`.
    pub fn new(tokens: Vec<Token>, text_length: usize) -> Self {
        debug_assert!(
            tokens.windows(2).all(|w| w[0].start_offset <= w[1].start_offset),
            "tokens must be sorted by start offset"
        );
        debug_assert!(
            tokens.last().is_none_or(|t| t.start_offset <= text_length),
            "token start beyond line length"
        );
        Self {
            tokens,
            text_length,
        }
    }

    /// A line with no tokenization: empty token list.
    pub fn empty(text_length: usize) -> Self {
        Self {
            tokens: Vec::new(),
            text_length,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn text_length(&self) -> usize {
        self.text_length
    }

    /// Restrict to the half-open byte range `[start_offset, end_offset)` and
    /// shift the survivors by `delta_start`.
    ///
    /// Tokens entirely outside the range are dropped; a token straddling the
    /// start boundary is clipped so its shifted start is exactly
    /// `delta_start`. The shift makes the result applicable to an output
    /// line whose first `delta_start` bytes are untokenized indent padding.
    pub fn filter(&self, start_offset: usize, end_offset: usize, delta_start: usize) -> LineTokens {
        debug_assert!(start_offset <= end_offset, "inverted filter range");
        let mut filtered = Vec::new();
        for (i, token) in self.tokens.iter().enumerate() {
            let token_end = self
                .tokens
                .get(i + 1)
                .map_or(self.text_length, |next| next.start_offset);
            if token_end <= start_offset {
                continue;
            }
            if token.start_offset >= end_offset {
                break;
            }
            let clipped = token.start_offset.max(start_offset);
            filtered.push(Token::new(clipped - start_offset + delta_start, token.scope));
        }
        LineTokens {
            tokens: filtered,
            text_length: end_offset - start_offset + delta_start,
        }
    }
}
