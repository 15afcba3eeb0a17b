//! Outbound request framing and inbound reply decoding.

use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};
use crate::framer::{END_MARKER, START_MARKER};
use crate::wire::{decode_payload, Value};

/// Largest body an outbound frame can carry (the length field is one byte).
pub const MAX_BODY: usize = u8::MAX as usize;

/// Write `FF 55 <len> <body>`, where `len` is the body length.
///
/// Requests are not terminated by an end marker; the firmware reads exactly
/// `len` bytes after the length field.
pub fn encode_frame(body: &[u8], dst: &mut BytesMut) -> Result<()> {
    if body.len() > MAX_BODY {
        return Err(FrameError::BodyTooLarge {
            size: body.len(),
            max: MAX_BODY,
        });
    }
    dst.reserve(START_MARKER.len() + 1 + body.len());
    dst.put_slice(&START_MARKER);
    dst.put_u8(body.len() as u8);
    dst.put_slice(body);
    Ok(())
}

/// Write a complete board-side reply frame: `FF 55 <key> <tag> <value> 0D 0A`.
///
/// Useful for simulators and tests that stand in for the board.
pub fn encode_reply(key: u8, value: &Value, dst: &mut BytesMut) {
    dst.put_slice(&START_MARKER);
    dst.put_u8(key);
    dst.put_u8(value.tag());
    value.encode(dst);
    dst.put_slice(&END_MARKER);
}

/// A decoded inbound payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Correlation key echoed by the board.
    pub key: u8,
    /// The decoded value.
    pub value: Value,
}

/// Decode a framed payload as `<key> <tag> <value...>`.
///
/// Returns `Ok(None)` for payloads too short to carry a key and a tag.
pub fn decode_reply(payload: &[u8]) -> Result<Option<Reply>> {
    let [key, tag, rest @ ..] = payload else {
        return Ok(None);
    };
    let value = decode_payload(*tag, rest)?;
    Ok(Some(Reply { key: *key, value }))
}
