//! Template token compressor.
//!
//! Collapses every run of adjacent literal tokens produced by the template
//! tokenizer into a single literal, leaving interpolations untouched.
//!
//! - [`compress`]: pull-style, over a complete token sequence
//! - [`CompressExt::compressed`]: lazy, over any token iterator
//! - [`TokenCompressorStream`]: push-style, over tokens written asynchronously

pub mod compress;
pub mod merge;
pub mod stream;

pub use compress::{compress, compress_slice, CompressExt, CompressIter};
pub use merge::{Emitted, TokenMerger};
pub use stream::{StreamError, TokenCompressorStream, TokenReader, TokenWriter};
pub use tc_core::{CompressorConfig, Token, TokenRange, TokenType};
