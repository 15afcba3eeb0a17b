use std::io::{ErrorKind, Write};
use std::time::Duration;

use bytes::BytesMut;
use megalink_transport::BoardStream;

use crate::codec::encode_frame;
use crate::error::{FrameError, Result};
use crate::reader::transport_to_frame_error;

const INITIAL_BUFFER_CAPACITY: usize = 64;

/// Writes length-prefixed request frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Frame `body` as `FF 55 <len> <body>` and write it in full (blocking).
    pub fn write_frame(&mut self, body: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(body, &mut self.buf)?;
        self.write_raw()
    }

    /// Write already-framed bytes unchanged.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf.clear();
        self.buf.extend_from_slice(bytes);
        self.write_raw()
    }

    fn write_raw(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl FrameWriter<BoardStream> {
    /// Create a frame writer for `BoardStream` and apply a write timeout.
    pub fn with_write_timeout(mut inner: BoardStream, timeout: Option<Duration>) -> Result<Self> {
        inner
            .set_write_timeout(timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::new(inner))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_frame_prefixes_marker_and_length() {
        let sink = SharedBuffer::default();
        let mut writer = FrameWriter::new(sink.clone());

        writer.write_frame(&[0xA1, 0x01, 0x01, 0x0A]).unwrap();
        writer.write_frame(&[0x00, 0x02, 0x1D]).unwrap();

        assert_eq!(
            *sink.0.lock().unwrap(),
            vec![0xFF, 0x55, 0x04, 0xA1, 0x01, 0x01, 0x0A, 0xFF, 0x55, 0x03, 0x00, 0x02, 0x1D]
        );
    }

    #[test]
    fn oversized_body_writes_nothing() {
        let sink = SharedBuffer::default();
        let mut writer = FrameWriter::new(sink.clone());

        let err = writer.write_frame(&[0u8; 300]).unwrap_err();
        assert!(matches!(err, FrameError::BodyTooLarge { .. }));
        assert!(sink.0.lock().unwrap().is_empty());
    }

    struct Trickle {
        written: Vec<u8>,
        calls: usize,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.written.push(buf[0]);
            Ok(1)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn partial_and_interrupted_writes_complete() {
        let mut writer = FrameWriter::new(Trickle {
            written: Vec::new(),
            calls: 0,
        });
        writer.write_bytes(&[1, 2, 3, 4]).unwrap();
        assert_eq!(writer.get_ref().written, vec![1, 2, 3, 4]);
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn zero_length_write_is_connection_closed() {
        let mut writer = FrameWriter::new(Closed);
        assert!(matches!(
            writer.write_frame(&[0x01]),
            Err(FrameError::ConnectionClosed)
        ));
    }
}
