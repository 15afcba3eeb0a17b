/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame body does not fit the 8-bit length field.
    #[error("frame body too large ({size} bytes, max {max})")]
    BodyTooLarge { size: usize, max: usize },

    /// A fixed-width value was cut short.
    #[error("value of type {tag} needs {need} bytes, got {got}")]
    ShortValue { tag: u8, need: usize, got: usize },

    /// The payload carries a type tag the codec does not know.
    #[error("unknown value type {0}")]
    UnknownType(u8),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel reported end of stream.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
