use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use crate::error::Result;

/// A connected board channel implementing Read + Write.
///
/// This is the fundamental I/O type returned by transport operations.
/// It wraps either an open serial port or a Unix domain socket stream
/// bridged to a board (or a board simulator).
pub struct BoardStream {
    inner: BoardStreamInner,
}

enum BoardStreamInner {
    Serial(Box<dyn SerialPort>),
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
}

impl Read for BoardStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            BoardStreamInner::Serial(port) => port.read(buf),
            #[cfg(unix)]
            BoardStreamInner::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for BoardStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            BoardStreamInner::Serial(port) => port.write(buf),
            #[cfg(unix)]
            BoardStreamInner::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            BoardStreamInner::Serial(port) => port.flush(),
            #[cfg(unix)]
            BoardStreamInner::Unix(stream) => stream.flush(),
        }
    }
}

impl BoardStream {
    /// Create a BoardStream from an open serial port.
    pub(crate) fn from_serial(port: Box<dyn SerialPort>) -> Self {
        Self {
            inner: BoardStreamInner::Serial(port),
        }
    }

    /// Create a BoardStream from a connected Unix domain socket stream.
    #[cfg(unix)]
    pub fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: BoardStreamInner::Unix(stream),
        }
    }

    /// Set the read timeout on the underlying channel.
    ///
    /// Serial ports share one timeout for reads and writes.
    pub fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        match &mut self.inner {
            BoardStreamInner::Serial(port) => port.set_timeout(timeout).map_err(Into::into),
            #[cfg(unix)]
            BoardStreamInner::Unix(stream) => {
                stream.set_read_timeout(Some(timeout)).map_err(Into::into)
            }
        }
    }

    /// Set the write timeout on the underlying channel.
    ///
    /// No-op for serial ports, whose single timeout is set by
    /// [`set_read_timeout`](Self::set_read_timeout).
    pub fn set_write_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        match &mut self.inner {
            BoardStreamInner::Serial(_) => Ok(()),
            #[cfg(unix)]
            BoardStreamInner::Unix(stream) => stream.set_write_timeout(timeout).map_err(Into::into),
        }
    }

    /// Try to clone this stream so reads and writes can live on different threads.
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            BoardStreamInner::Serial(port) => Ok(Self::from_serial(port.try_clone()?)),
            #[cfg(unix)]
            BoardStreamInner::Unix(stream) => Ok(Self::from_unix(stream.try_clone()?)),
        }
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        match &self.inner {
            BoardStreamInner::Serial(_) => "serial",
            #[cfg(unix)]
            BoardStreamInner::Unix(_) => "unix-domain-socket",
        }
    }
}

impl std::fmt::Debug for BoardStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            BoardStreamInner::Serial(port) => f
                .debug_struct("BoardStream")
                .field("type", &"serial")
                .field("name", &port.name())
                .finish(),
            #[cfg(unix)]
            BoardStreamInner::Unix(_) => f
                .debug_struct("BoardStream")
                .field("type", &"unix")
                .finish(),
        }
    }
}
