//! Framing and value codec for the MegaPi serial protocol.
//!
//! Host-to-board frames carry an explicit length:
//! `FF 55 <len> <ext_id> <action> <device> ...`
//!
//! Board-to-host frames are delimited by markers instead:
//! `FF 55 <ext_id> <type> <value...> 0D 0A`
//!
//! [`Framer`] reassembles inbound payloads one byte at a time,
//! [`wire`] converts typed values to and from little-endian bytes, and
//! [`FrameReader`]/[`FrameWriter`] move frames over any `Read`/`Write`.

pub mod codec;
pub mod error;
pub mod framer;
pub mod reader;
pub mod wire;
pub mod writer;

pub use codec::{decode_reply, encode_frame, encode_reply, Reply, MAX_BODY};
pub use error::{FrameError, Result};
pub use framer::{Framer, FramerConfig, Scan, ScanState, END_MARKER, START_MARKER};
pub use reader::FrameReader;
pub use wire::{decode_payload, Value};
pub use writer::FrameWriter;
