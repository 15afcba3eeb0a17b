use std::collections::VecDeque;
use std::io::{ErrorKind, Read};
use std::time::Duration;

use bytes::Bytes;
use megalink_transport::BoardStream;

use crate::error::{FrameError, Result};
use crate::framer::{Framer, FramerConfig};

const READ_CHUNK_SIZE: usize = 256;

/// Reads complete inbound payloads from any `Read` stream.
///
/// Bytes are pulled in chunks but handed to the [`Framer`] one at a time, so
/// payloads come out in the exact order their end markers arrived.
pub struct FrameReader<T> {
    inner: T,
    framer: Framer,
    ready: VecDeque<Bytes>,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FramerConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FramerConfig) -> Self {
        Self {
            inner,
            framer: Framer::with_config(config),
            ready: VecDeque::new(),
        }
    }

    /// Read the next complete payload (blocking).
    ///
    /// Timeouts on the underlying stream are retried. Returns
    /// `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_payload(&mut self) -> Result<Bytes> {
        loop {
            if let Some(payload) = self.poll_payload()? {
                return Ok(payload);
            }
        }
    }

    /// Perform at most one read and return the next payload, if any.
    ///
    /// Returns `Ok(None)` when the read timed out or produced no complete
    /// payload yet.
    pub fn poll_payload(&mut self) -> Result<Option<Bytes>> {
        if let Some(payload) = self.ready.pop_front() {
            return Ok(Some(payload));
        }

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let read = match self.inner.read(&mut chunk) {
            Ok(n) => n,
            Err(err) if is_retryable(err.kind()) => return Ok(None),
            Err(err) => return Err(FrameError::Io(err)),
        };

        if read == 0 {
            return Err(FrameError::ConnectionClosed);
        }

        self.ready.extend(self.framer.extend(&chunk[..read]));
        Ok(self.ready.pop_front())
    }

    /// The framer state, for diagnostics.
    pub fn framer(&self) -> &Framer {
        &self.framer
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl FrameReader<BoardStream> {
    /// Create a frame reader for `BoardStream` and apply a read timeout.
    ///
    /// The timeout bounds how long [`poll_payload`](Self::poll_payload) blocks.
    pub fn with_read_timeout(
        mut inner: BoardStream,
        timeout: Duration,
        config: FramerConfig,
    ) -> Result<Self> {
        inner
            .set_read_timeout(timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

fn is_retryable(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
    )
}

pub(crate) fn transport_to_frame_error(err: megalink_transport::TransportError) -> FrameError {
    match err {
        megalink_transport::TransportError::Io(io) => FrameError::Io(io),
        megalink_transport::TransportError::Connect { source, .. } => FrameError::Io(source),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
