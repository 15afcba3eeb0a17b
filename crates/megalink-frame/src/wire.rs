//! Little-endian conversions between host values and protocol bytes.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Signed 8-bit value.
pub const TAG_BYTE: u8 = 1;
/// 32-bit float.
pub const TAG_FLOAT: u8 = 2;
/// Signed 16-bit value.
pub const TAG_SHORT: u8 = 3;
/// Length-prefixed byte string.
pub const TAG_STRING: u8 = 4;
/// Sent by the firmware for "double" readings; still a 32-bit float on the wire.
pub const TAG_DOUBLE: u8 = 5;
/// Signed 32-bit value.
pub const TAG_LONG: u8 = 6;

/// Lowest reading kept by the range clamp.
pub const READING_MIN: f32 = -512.0;
/// Highest reading kept by the range clamp.
pub const READING_MAX: f32 = 1023.0;

/// A decoded reply value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Float(f32),
    Short(i16),
    Bytes(Bytes),
    Long(i32),
}

impl Value {
    /// The type tag this value is written with.
    pub fn tag(&self) -> u8 {
        match self {
            Value::Byte(_) => TAG_BYTE,
            Value::Float(_) => TAG_FLOAT,
            Value::Short(_) => TAG_SHORT,
            Value::Bytes(_) => TAG_STRING,
            Value::Long(_) => TAG_LONG,
        }
    }

    /// Numeric view of the value, `None` for byte strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Byte(v) => Some(f64::from(*v)),
            Value::Float(v) => Some(f64::from(*v)),
            Value::Short(v) => Some(f64::from(*v)),
            Value::Long(v) => Some(f64::from(*v)),
            Value::Bytes(_) => None,
        }
    }

    /// Append the wire encoding of the value (without its tag).
    ///
    /// Byte strings longer than 255 bytes are truncated to fit the length prefix.
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            Value::Byte(v) => dst.put_slice(&encode_i8(*v)),
            Value::Float(v) => dst.put_slice(&encode_f32(*v)),
            Value::Short(v) => dst.put_slice(&encode_i16(*v)),
            Value::Long(v) => dst.put_slice(&encode_i32(*v)),
            Value::Bytes(v) => {
                let len = v.len().min(u8::MAX as usize);
                dst.put_u8(len as u8);
                dst.put_slice(&v[..len]);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Bytes(v) => write!(f, "{}", String::from_utf8_lossy(v)),
        }
    }
}

pub fn encode_i8(v: i8) -> [u8; 1] {
    v.to_le_bytes()
}

pub fn encode_i16(v: i16) -> [u8; 2] {
    v.to_le_bytes()
}

pub fn encode_i32(v: i32) -> [u8; 4] {
    v.to_le_bytes()
}

pub fn encode_f32(v: f32) -> [u8; 4] {
    v.to_le_bytes()
}

/// Decode a value from the bytes that follow its type tag.
///
/// Bytes past the tag's width are ignored. Byte and float readings outside
/// [`READING_MIN`]..=[`READING_MAX`] decode as zero; the firmware's other
/// numeric types are passed through untouched.
pub fn decode_payload(tag: u8, bytes: &[u8]) -> Result<Value> {
    let value = match tag {
        TAG_BYTE => Value::Byte(i8::from_le_bytes(fixed::<1>(tag, bytes)?)),
        TAG_FLOAT | TAG_DOUBLE => Value::Float(f32::from_le_bytes(fixed::<4>(tag, bytes)?)),
        TAG_SHORT => Value::Short(i16::from_le_bytes(fixed::<2>(tag, bytes)?)),
        TAG_LONG => Value::Long(i32::from_le_bytes(fixed::<4>(tag, bytes)?)),
        TAG_STRING => {
            let [len] = fixed::<1>(tag, bytes)?;
            let end = (1 + len as usize).min(bytes.len());
            Value::Bytes(Bytes::copy_from_slice(&bytes[1..end]))
        }
        other => return Err(FrameError::UnknownType(other)),
    };
    Ok(clamp_reading(tag, value))
}

// Only byte and float readings are range-checked, and an i8 always fits.
// Short, double and long readings pass through unchanged.
fn clamp_reading(tag: u8, value: Value) -> Value {
    match (tag, value) {
        (TAG_FLOAT, Value::Float(v)) if v < READING_MIN || v > READING_MAX => Value::Float(0.0),
        (_, value) => value,
    }
}

fn fixed<const N: usize>(tag: u8, bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .get(..N)
        .and_then(|head| head.try_into().ok())
        .ok_or(FrameError::ShortValue {
            tag,
            need: N,
            got: bytes.len(),
        })
}
