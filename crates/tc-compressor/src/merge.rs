//! Literal-run merge state shared by the pull and streaming compressors.

use tc_core::{Token, TokenType};

/// An open run of adjacent literal tokens.
#[derive(Debug, Clone)]
struct LiteralRun {
    value: String,
    start: usize,
    end: usize,
}

impl LiteralRun {
    fn open(token: Token) -> Self {
        Self {
            start: token.range.start,
            end: token.range.end,
            value: token.value,
        }
    }

    /// A literal joins the run only if it starts exactly where the run ends.
    fn touches(&self, token: &Token) -> bool {
        self.end == token.range.start
    }

    fn extend(&mut self, token: Token) {
        self.value.push_str(&token.value);
        self.end = token.range.end;
    }

    fn into_token(self) -> Token {
        Token::literal(self.value, self.start, self.end)
    }
}

/// Incremental literal merger.
///
/// Feed tokens in source order with [`push`](Self::push); every token that
/// becomes final is handed back immediately. A literal run stays pending
/// until an interpolation or a non-touching literal arrives, or
/// [`finish`](Self::finish) is called.
#[derive(Debug, Default)]
pub struct TokenMerger {
    pending: Option<LiteralRun>,
}

impl TokenMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one token. Returns the tokens that are now final, in order.
    pub fn push(&mut self, token: Token) -> Emitted {
        match token.token_type {
            TokenType::Literal => {
                if let Some(run) = self.pending.as_mut().filter(|run| run.touches(&token)) {
                    run.extend(token);
                    return Emitted::default();
                }
                // Consumed delimiters (an empty `{}`, an escape backslash) leave
                // a gap that ends the run.
                let flushed = self.flush();
                self.pending = Some(LiteralRun::open(token));
                Emitted {
                    flushed,
                    passthrough: None,
                }
            }
            TokenType::Interpolation => Emitted {
                flushed: self.flush(),
                passthrough: Some(token),
            },
        }
    }

    /// End of input: flush the pending run, if any.
    pub fn finish(&mut self) -> Option<Token> {
        self.flush()
    }

    /// Drop the pending run without emitting it. Returns whether one was open.
    pub fn discard(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn flush(&mut self) -> Option<Token> {
        self.pending.take().map(LiteralRun::into_token)
    }
}

/// Tokens made final by a single [`TokenMerger::push`]: at most a flushed
/// literal, then the interpolation that ended its run when that is what did.
#[derive(Debug, Default)]
pub struct Emitted {
    flushed: Option<Token>,
    passthrough: Option<Token>,
}

impl Emitted {
    pub(crate) fn single(token: Token) -> Self {
        Self {
            flushed: Some(token),
            passthrough: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flushed.is_none() && self.passthrough.is_none()
    }
}

impl Iterator for Emitted {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.flushed.take().or_else(|| self.passthrough.take())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.flushed.is_some()) + usize::from(self.passthrough.is_some());
        (n, Some(n))
    }
}

impl ExactSizeIterator for Emitted {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_held() {
        let mut merger = TokenMerger::new();
        assert!(merger.push(Token::literal("a", 0, 1)).is_empty());
        assert!(merger.has_pending());
    }

    #[test]
    fn test_interpolation_flushes_run_first() {
        let mut merger = TokenMerger::new();
        merger.push(Token::literal("a", 0, 1));
        merger.push(Token::literal("b", 1, 2));
        let out: Vec<Token> = merger.push(Token::interpolation("x", 3, 4)).collect();
        assert_eq!(out, vec![Token::literal("ab", 0, 2), Token::interpolation("x", 3, 4)]);
        assert!(!merger.has_pending());
    }

    #[test]
    fn test_interpolation_without_run() {
        let mut merger = TokenMerger::new();
        let emitted = merger.push(Token::interpolation("x", 1, 2));
        assert_eq!(emitted.len(), 1);
    }

    #[test]
    fn test_gap_starts_new_run() {
        let mut merger = TokenMerger::new();
        merger.push(Token::literal("foo", 0, 3));
        let out: Vec<Token> = merger.push(Token::literal("{", 6, 7)).collect();
        assert_eq!(out, vec![Token::literal("foo", 0, 3)]);
        assert_eq!(merger.finish(), Some(Token::literal("{", 6, 7)));
    }

    #[test]
    fn test_finish_flushes_once() {
        let mut merger = TokenMerger::new();
        merger.push(Token::literal("foo", 0, 3));
        assert_eq!(merger.finish(), Some(Token::literal("foo", 0, 3)));
        assert_eq!(merger.finish(), None);
    }

    #[test]
    fn test_discard() {
        let mut merger = TokenMerger::new();
        merger.push(Token::literal("foo", 0, 3));
        assert!(merger.discard());
        assert!(!merger.discard());
        assert_eq!(merger.finish(), None);
    }
}
