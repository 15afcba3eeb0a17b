use std::path::PathBuf;

/// Errors that can occur while opening or using a board channel.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the serial device.
    #[error("failed to open serial port {path}: {source}")]
    Open {
        path: PathBuf,
        source: serialport::Error,
    },

    /// Failed to connect to a socket bridge.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A serial port operation other than open failed.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// An I/O error occurred on the channel.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The target string could not be interpreted.
    #[error("invalid target '{0}'")]
    InvalidTarget(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
