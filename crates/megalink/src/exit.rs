use std::fmt;
use std::io;

use megalink_frame::FrameError;
use megalink_link::LinkError;
use megalink_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = io_code(err.kind());
    CliError::new(code, format!("{context}: {err}"))
}

fn io_code(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused => TRANSPORT_ERROR,
        _ => INTERNAL,
    }
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Connect { source, .. } | TransportError::Io(source) => {
            io_error(context, source)
        }
        TransportError::Open { ref source, .. } | TransportError::Serial(ref source) => {
            let code = match source.kind() {
                serialport::ErrorKind::Io(kind) => io_code(kind),
                serialport::ErrorKind::InvalidInput => USAGE,
                serialport::ErrorKind::NoDevice | serialport::ErrorKind::Unknown => {
                    TRANSPORT_ERROR
                }
            };
            CliError::new(code, format!("{context}: {err}"))
        }
        TransportError::InvalidTarget(_) => CliError::new(USAGE, format!("{context}: {err}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        FrameError::BodyTooLarge { .. }
        | FrameError::ShortValue { .. }
        | FrameError::UnknownType(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        LinkError::Transport(err) => transport_error(context, err),
        LinkError::Frame(err) => frame_error(context, err),
        LinkError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        LinkError::InvalidParameter(_) | LinkError::UnknownMessage(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        LinkError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn link_errors_map_to_exit_codes() {
        assert_eq!(
            link_error("read", LinkError::Timeout(Duration::from_secs(1))).code,
            TIMEOUT
        );
        assert_eq!(
            link_error("send", LinkError::UnknownMessage("x".into())).code,
            USAGE
        );
        assert_eq!(link_error("send", LinkError::Closed).code, FAILURE);
        assert_eq!(
            link_error("read", LinkError::NotReturned("<light>".into())).code,
            INTERNAL
        );
    }

    #[test]
    fn missing_socket_is_a_transport_error() {
        let err = TransportError::Connect {
            path: "/tmp/none.sock".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let cli = transport_error("open failed", err);
        assert_eq!(cli.code, TRANSPORT_ERROR);
        assert!(cli.message.starts_with("open failed: "));
    }

    #[test]
    fn missing_serial_device_is_a_transport_error() {
        let err = TransportError::Open {
            path: "/dev/ttyNONE".into(),
            source: serialport::Error::new(serialport::ErrorKind::NoDevice, "gone"),
        };
        assert_eq!(transport_error("open failed", err).code, TRANSPORT_ERROR);

        let denied = TransportError::Open {
            path: "/dev/ttyS0".into(),
            source: serialport::Error::new(
                serialport::ErrorKind::Io(io::ErrorKind::PermissionDenied),
                "denied",
            ),
        };
        assert_eq!(
            transport_error("open failed", denied).code,
            PERMISSION_DENIED
        );
    }

    #[test]
    fn oversized_frames_are_invalid_data() {
        let err = FrameError::BodyTooLarge { size: 300, max: 255 };
        assert_eq!(frame_error("send", err).code, DATA_INVALID);
    }
}
