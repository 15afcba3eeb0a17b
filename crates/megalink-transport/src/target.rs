use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, TransportError};
use crate::serial::{open_serial, SerialConfig};
use crate::traits::BoardStream;

const UNIX_PREFIX: &str = "unix:";

/// Where the board is reached.
///
/// Parsed from strings: `unix:/run/board.sock` selects a Unix domain socket,
/// anything else is treated as a serial device path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A serial device, e.g. `/dev/ttyUSB0` or `COM3`.
    Serial(PathBuf),
    /// A Unix domain socket bridged to a board.
    Unix(PathBuf),
}

impl Target {
    /// Open the target.
    pub fn open(&self, serial: &SerialConfig) -> Result<BoardStream> {
        match self {
            Target::Serial(path) => open_serial(path, serial),
            #[cfg(unix)]
            Target::Unix(path) => crate::uds::connect(path),
            #[cfg(not(unix))]
            Target::Unix(path) => Err(TransportError::Connect {
                path: path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "unix domain sockets are not available on this platform",
                ),
            }),
        }
    }
}

impl FromStr for Target {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix(UNIX_PREFIX) {
            if path.is_empty() {
                return Err(TransportError::InvalidTarget(s.to_string()));
            }
            return Ok(Target::Unix(PathBuf::from(path)));
        }
        if s.is_empty() {
            return Err(TransportError::InvalidTarget(s.to_string()));
        }
        Ok(Target::Serial(PathBuf::from(s)))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Serial(path) => write!(f, "{}", path.display()),
            Target::Unix(path) => write!(f, "{UNIX_PREFIX}{}", path.display()),
        }
    }
}
