use std::time::Duration;

/// Errors that can occur while talking to a board.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] megalink_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] megalink_frame::FrameError),

    /// The reply value was read before the board answered.
    #[error("value of {0} has not returned")]
    NotReturned(String),

    /// The message is a command and never gets a reply.
    #[error("{0} does not expect a reply")]
    NoReplyExpected(String),

    /// No reply arrived within the caller's deadline.
    #[error("no reply after {0:?}")]
    Timeout(Duration),

    /// The link has been shut down.
    #[error("link closed")]
    Closed,

    /// A message parameter is missing or out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No catalog entry has this name.
    #[error("unknown message '{0}'")]
    UnknownMessage(String),
}

pub type Result<T> = std::result::Result<T, LinkError>;
