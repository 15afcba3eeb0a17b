//! Talk to MegaPi-class robot controller boards over a serial link.
//!
//! megalink speaks the board's binary request/reply protocol: it frames
//! outbound commands, reassembles inbound replies from the byte stream and
//! matches them to the requests that are waiting for them.
//!
//! # Crate Structure
//!
//! - [`transport`]: byte channels (serial ports, Unix socket bridges)
//! - [`frame`]: marker framing and the little-endian value codec
//! - [`link`]: messages, the reader thread and reply dispatch

/// Re-export transport types.
pub mod transport {
    pub use megalink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use megalink_frame::*;
}

/// Re-export link types.
pub mod link {
    pub use megalink_link::*;
}
