//! Core types shared by the template token compressor.

pub mod config;
pub mod error;
pub mod token;

pub use config::{CompressorConfig, StreamConfig};
pub use error::{Result, TcError};
pub use token::{Token, TokenRange, TokenType};
