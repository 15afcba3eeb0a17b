use std::os::unix::net::UnixStream;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::BoardStream;

/// Connect to a Unix domain socket that bridges to a board.
///
/// Typical peers are board simulators or a `socat` process relaying a
/// remote serial line.
pub fn connect(path: impl AsRef<Path>) -> Result<BoardStream> {
    let path = path.as_ref();
    let stream = UnixStream::connect(path).map_err(|e| TransportError::Connect {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(?path, "connected to unix domain socket");
    Ok(BoardStream::from_unix(stream))
}
