//! Byte channel abstraction for talking to a peripheral board.
//!
//! Provides a unified read/write stream over:
//! - Serial ports (USB-UART adapters, on-board UARTs)
//! - Unix domain sockets (board simulators, `socat` bridges)
//!
//! This is the lowest layer of megalink. Framing and request correlation
//! build on top of the [`BoardStream`] type provided here.

pub mod error;
pub mod serial;
pub mod target;
pub mod traits;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use serial::{available_ports, open_serial, PortInfo, SerialConfig, DEFAULT_BAUD_RATE};
pub use target::Target;
pub use traits::BoardStream;
