//! Streaming compressor: a bounded duplex channel of tokens.
//!
//! The write half owns the merge state and pushes final tokens into a bounded
//! buffer; the read half drains that buffer as a [`Stream`]. A pending literal
//! run is held by the writer across calls and only leaves once an
//! interpolation or a non-touching literal arrives, or on
//! [`TokenWriter::close`].

use crate::merge::{Emitted, TokenMerger};
use futures::stream::{FusedStream, Stream};
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tc_core::config::DEFAULT_BUFFER_CAPACITY;
use tc_core::{CompressorConfig, Token};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

#[derive(Error, Debug)]
pub enum StreamError {
    /// The producer aborted; carries its own failure.
    #[error("token stream aborted: {0}")]
    Aborted(anyhow::Error),
    #[error("token writer dropped before close")]
    WriterDropped,
    #[error("token reader dropped")]
    ReaderDropped,
}

/// Internal buffer frame.
#[derive(Debug)]
enum Frame {
    Token(Token),
    Closed,
    Aborted(anyhow::Error),
}

/// Streaming token compressor. Split it into its write and read halves.
#[derive(Debug)]
pub struct TokenCompressorStream {
    writer: TokenWriter,
    reader: TokenReader,
}

impl TokenCompressorStream {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    pub fn with_config(config: &CompressorConfig) -> tc_core::Result<Self> {
        config.validate()?;
        Ok(Self::with_capacity(config.stream.buffer_capacity))
    }

    /// Build a stream whose output buffer holds at most `capacity` tokens
    /// (clamped to at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        debug!(capacity, "token compressor stream created");
        Self {
            writer: TokenWriter {
                sender: Some(sender),
                merger: TokenMerger::new(),
                outbox: Emitted::default(),
                written: 0,
                emitted: 0,
            },
            reader: TokenReader {
                receiver,
                done: false,
                delivered: 0,
            },
        }
    }

    pub fn split(self) -> (TokenWriter, TokenReader) {
        (self.writer, self.reader)
    }
}

impl Default for TokenCompressorStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Write half. `close` or `abort` consume it; dropping it without either
/// ends the read side with [`StreamError::WriterDropped`].
#[derive(Debug)]
pub struct TokenWriter {
    sender: Option<mpsc::Sender<Frame>>,
    merger: TokenMerger,
    /// Final tokens not yet in the buffer. Survives a cancelled call.
    outbox: Emitted,
    written: usize,
    emitted: usize,
}

impl TokenWriter {
    /// Accept one raw token.
    ///
    /// Resolves once the token is absorbed into the pending literal run or the
    /// tokens it made final are buffered. Suspends while the buffer is full.
    ///
    /// Cancelling a suspended write loses nothing already accepted: tokens
    /// still waiting for a buffer slot go out ahead of whatever the next
    /// `write`, `close` or `abort` produces.
    pub async fn write(&mut self, token: Token) -> Result<(), StreamError> {
        self.drain().await?;
        self.written += 1;
        self.outbox = self.merger.push(token);
        self.drain().await
    }

    /// Flush the pending literal run, then signal end of output.
    pub async fn close(mut self) -> Result<(), StreamError> {
        self.drain().await?;
        if let Some(token) = self.merger.finish() {
            debug!(range = %token.range, "flushing pending literal on close");
            self.outbox = Emitted::single(token);
            self.drain().await?;
        }
        self.send(Frame::Closed).await?;
        self.sender = None;
        debug!(written = self.written, emitted = self.emitted, "token writer closed");
        Ok(())
    }

    /// Fail the stream with `reason`. The pending literal run is discarded,
    /// tokens already final are still delivered ahead of the error.
    pub async fn abort(mut self, reason: impl Into<anyhow::Error>) -> Result<(), StreamError> {
        let reason = reason.into();
        let discarded = self.merger.discard();
        warn!(error = %reason, discarded, "token writer aborted");
        self.drain().await?;
        let result = self.send(Frame::Aborted(reason)).await;
        self.sender = None;
        result
    }

    /// Whether a literal run is currently held back.
    pub fn has_pending(&self) -> bool {
        self.merger.has_pending()
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Move the outbox into the buffer. A token leaves the outbox only once
    /// a slot is reserved for it.
    async fn drain(&mut self) -> Result<(), StreamError> {
        while !self.outbox.is_empty() {
            let sender = self.sender.as_ref().ok_or(StreamError::ReaderDropped)?;
            let permit = sender.reserve().await.map_err(|_| StreamError::ReaderDropped)?;
            if let Some(token) = self.outbox.next() {
                permit.send(Frame::Token(token));
                self.emitted += 1;
            }
        }
        Ok(())
    }

    async fn send(&mut self, frame: Frame) -> Result<(), StreamError> {
        let sender = self.sender.as_ref().ok_or(StreamError::ReaderDropped)?;
        sender.send(frame).await.map_err(|_| StreamError::ReaderDropped)
    }
}

impl Drop for TokenWriter {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            let discarded = self.merger.discard();
            let undelivered = self.outbox.len();
            if !sender.is_closed() {
                warn!(
                    written = self.written,
                    discarded,
                    undelivered,
                    "token writer dropped without close"
                );
            }
        }
    }
}

/// Read half, yielding compressed tokens in order.
#[derive(Debug)]
pub struct TokenReader {
    receiver: mpsc::Receiver<Frame>,
    done: bool,
    delivered: usize,
}

impl TokenReader {
    /// Next compressed token, `None` at end of output.
    pub async fn next_token(&mut self) -> Option<Result<Token, StreamError>> {
        std::future::poll_fn(|cx| self.poll_frame(cx)).await
    }

    /// Drain every remaining token, stopping at the first error.
    pub async fn collect_all(mut self) -> Result<Vec<Token>, StreamError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token().await {
            tokens.push(token?);
        }
        Ok(tokens)
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }

    fn poll_frame(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<Token, StreamError>>> {
        if self.done {
            return Poll::Ready(None);
        }
        let item = match ready!(self.receiver.poll_recv(cx)) {
            Some(Frame::Token(token)) => {
                self.delivered += 1;
                trace!(token_type = %token.token_type, range = %token.range, "token delivered");
                return Poll::Ready(Some(Ok(token)));
            }
            Some(Frame::Closed) => None,
            Some(Frame::Aborted(reason)) => Some(Err(StreamError::Aborted(reason))),
            None => {
                warn!(delivered = self.delivered, "token writer went away without closing");
                Some(Err(StreamError::WriterDropped))
            }
        };
        self.done = true;
        self.receiver.close();
        Poll::Ready(item)
    }
}

impl Stream for TokenReader {
    type Item = Result<Token, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_frame(cx)
    }
}

impl FusedStream for TokenReader {
    fn is_terminated(&self) -> bool {
        self.done
    }
}
