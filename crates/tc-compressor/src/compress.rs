//! Pull-style compression over a complete token sequence.

use crate::merge::{Emitted, TokenMerger};
use std::iter::FusedIterator;
use tc_core::Token;

/// Merge every maximal run of adjacent literal tokens into one literal.
///
/// Literals are adjacent when one ends exactly where the next starts; a gap
/// left by consumed delimiters ends the run. The merged literal's value is the
/// run's values concatenated in order, its range spans from the first token's
/// start to the last token's end. Interpolations pass through untouched.
/// Total over any input; ordering and overlap are trusted, not re-checked.
///
/// A gap ends a run even between two literals: `a` (0..1), `{` (2..3),
/// `b` (3..4) compresses to `a` and `{b`.
pub fn compress<I>(tokens: I) -> Vec<Token>
where
    I: IntoIterator<Item = Token>,
{
    let tokens = tokens.into_iter();
    let mut merger = TokenMerger::new();
    let mut output = Vec::with_capacity(tokens.size_hint().0);

    for token in tokens {
        output.extend(merger.push(token));
    }
    output.extend(merger.finish());

    output
}

/// [`compress`] over borrowed tokens.
pub fn compress_slice(tokens: &[Token]) -> Vec<Token> {
    compress(tokens.iter().cloned())
}

/// Lazy compressing adapter returned by [`CompressExt::compressed`].
#[derive(Debug)]
pub struct CompressIter<I> {
    inner: I,
    merger: TokenMerger,
    ready: Emitted,
    exhausted: bool,
}

impl<I> CompressIter<I>
where
    I: Iterator<Item = Token>,
{
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            merger: TokenMerger::new(),
            ready: Emitted::default(),
            exhausted: false,
        }
    }
}

impl<I> Iterator for CompressIter<I>
where
    I: Iterator<Item = Token>,
{
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.ready.next() {
                return Some(token);
            }
            if self.exhausted {
                return None;
            }
            match self.inner.next() {
                Some(token) => self.ready = self.merger.push(token),
                None => {
                    self.exhausted = true;
                    return self.merger.finish();
                }
            }
        }
    }
}

impl<I> FusedIterator for CompressIter<I> where I: Iterator<Item = Token> {}

pub trait CompressExt: Iterator<Item = Token> + Sized {
    /// Compress this token iterator lazily. Same merge rule as [`compress`]:
    /// a gap between two literals ends the run.
    fn compressed(self) -> CompressIter<Self> {
        CompressIter::new(self)
    }
}

impl<I> CompressExt for I where I: Iterator<Item = Token> {}
