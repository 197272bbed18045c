use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Token kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Literal,
    Interpolation,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Literal => write!(f, "Literal"),
            TokenType::Interpolation => write!(f, "Interpolation"),
        }
    }
}

/// Half-open `[start, end)` offset interval into the template source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
}

impl TokenRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl From<Range<usize>> for TokenRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<TokenRange> for Range<usize> {
    fn from(range: TokenRange) -> Self {
        range.start..range.end
    }
}

impl fmt::Display for TokenRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A lexed template token.
///
/// Literal values carry text with escapes already resolved by the tokenizer.
/// Interpolation values carry the raw expression text between the braces and
/// are never inspected here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Token {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub value: String,
    pub range: TokenRange,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>, range: impl Into<TokenRange>) -> Self {
        Self {
            token_type,
            value: value.into(),
            range: range.into(),
        }
    }

    pub fn literal(value: impl Into<String>, start: usize, end: usize) -> Self {
        Self::new(TokenType::Literal, value, TokenRange::new(start, end))
    }

    pub fn interpolation(value: impl Into<String>, start: usize, end: usize) -> Self {
        Self::new(TokenType::Interpolation, value, TokenRange::new(start, end))
    }

    pub fn is_literal(&self) -> bool {
        self.token_type == TokenType::Literal
    }

    pub fn is_interpolation(&self) -> bool {
        self.token_type == TokenType::Interpolation
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}, {})", self.token_type, self.value, self.range)
    }
}
