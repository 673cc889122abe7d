//! Primitives that each emit one piece of JSON grammar to a `Sink`, returning the number of bytes
//! written. They do no bookkeeping of their own: generated encoders call them in order.
//!
//! Writing into a `Vec<u8>` is special-cased in every primitive through `Sink::as_buffer`, so the
//! common in-memory case skips the generic write path and, for strings, grows the buffer once to
//! the exact escaped length.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};
use crate::owned::OwnedValue;
use crate::string::{escape_string_into, for_each_escaped_chunk};
use crate::validator::is_number_token;
use crate::{Kind, Value};

/// Where the writer primitives put their output.
pub trait Sink {
    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()>;

    /// Return the underlying growable buffer if this sink is one, letting primitives append to it
    /// directly.
    #[inline]
    fn as_buffer(&mut self) -> Option<&mut Vec<u8>> {
        None
    }
}

impl Sink for Vec<u8> {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    #[inline]
    fn as_buffer(&mut self) -> Option<&mut Vec<u8>> {
        Some(self)
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        (**self).write_bytes(bytes)
    }

    #[inline]
    fn as_buffer(&mut self) -> Option<&mut Vec<u8>> {
        (**self).as_buffer()
    }
}

/// Adapts any `std::io::Write` (a file, a socket, ...) into a `Sink`.
pub struct IoSink<W>(pub W);

impl<W> IoSink<W> {
    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: std::io::Write> Sink for IoSink<W> {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.0.write_all(bytes)
    }
}

#[inline]
fn write_bytes<S: Sink + ?Sized>(sink: &mut S, bytes: &[u8]) -> Result<usize> {
    match sink.as_buffer() {
        Some(buffer) => buffer.extend_from_slice(bytes),
        None => sink.write_bytes(bytes)?,
    }
    Ok(bytes.len())
}

macro_rules! write_byte {
    ($dest:expr, $byte:literal) => {{
        write_bytes($dest, $byte as &[u8])
    }};
}

#[inline]
pub fn write_object_start<S: Sink + ?Sized>(sink: &mut S) -> Result<usize> {
    write_byte!(sink, b"{")
}

#[inline]
pub fn write_object_end<S: Sink + ?Sized>(sink: &mut S) -> Result<usize> {
    write_byte!(sink, b"}")
}

#[inline]
pub fn write_array_start<S: Sink + ?Sized>(sink: &mut S) -> Result<usize> {
    write_byte!(sink, b"[")
}

#[inline]
pub fn write_array_end<S: Sink + ?Sized>(sink: &mut S) -> Result<usize> {
    write_byte!(sink, b"]")
}

#[inline]
pub fn write_colon<S: Sink + ?Sized>(sink: &mut S) -> Result<usize> {
    write_byte!(sink, b":")
}

#[inline]
pub fn write_comma<S: Sink + ?Sized>(sink: &mut S) -> Result<usize> {
    write_byte!(sink, b",")
}

#[inline]
pub fn write_quote<S: Sink + ?Sized>(sink: &mut S) -> Result<usize> {
    write_byte!(sink, b"\"")
}

#[inline]
pub fn write_null<S: Sink + ?Sized>(sink: &mut S) -> Result<usize> {
    write_byte!(sink, b"null")
}

/// Write `value` as a quoted, escaped JSON string.
pub fn write_string<S: Sink + ?Sized>(sink: &mut S, value: &str) -> Result<usize> {
    if let Some(buffer) = sink.as_buffer() {
        let start = buffer.len();
        escape_string_into(buffer, value);
        return Ok(buffer.len() - start);
    }

    let mut written = write_quote(sink)?;
    for_each_escaped_chunk(value, |chunk| {
        written += write_bytes(sink, chunk)?;
        Ok::<(), Error>(())
    })?;
    written += write_quote(sink)?;
    Ok(written)
}

/// Write pre-encoded JSON text as-is, such as the `raw` span of a parsed value.
#[inline]
pub fn write_raw<S: Sink + ?Sized>(sink: &mut S, json: &str) -> Result<usize> {
    write_bytes(sink, json.as_bytes())
}

#[inline]
pub fn write_int<S: Sink + ?Sized>(sink: &mut S, value: i64) -> Result<usize> {
    let mut buffer = itoa::Buffer::new();
    write_bytes(sink, buffer.format(value).as_bytes())
}

pub fn write_quoted_int<S: Sink + ?Sized>(sink: &mut S, value: i64) -> Result<usize> {
    Ok(write_quote(sink)? + write_int(sink, value)? + write_quote(sink)?)
}

#[inline]
pub fn write_uint<S: Sink + ?Sized>(sink: &mut S, value: u64) -> Result<usize> {
    let mut buffer = itoa::Buffer::new();
    write_bytes(sink, buffer.format(value).as_bytes())
}

pub fn write_quoted_uint<S: Sink + ?Sized>(sink: &mut S, value: u64) -> Result<usize> {
    Ok(write_quote(sink)? + write_uint(sink, value)? + write_quote(sink)?)
}

/// Non-finite floats have no JSON number form, so they are written as the strings `"NaN"`,
/// `"Infinity"` and `"-Infinity"`.
#[inline]
fn write_non_finite<S: Sink + ?Sized>(sink: &mut S, value: f64) -> Result<usize> {
    if value.is_nan() {
        write_byte!(sink, b"\"NaN\"")
    } else if value.is_sign_positive() {
        write_byte!(sink, b"\"Infinity\"")
    } else {
        write_byte!(sink, b"\"-Infinity\"")
    }
}

pub fn write_float<S: Sink + ?Sized>(sink: &mut S, value: f64) -> Result<usize> {
    if !value.is_finite() {
        return write_non_finite(sink, value);
    }
    let mut buffer = ryu::Buffer::new();
    write_bytes(sink, buffer.format_finite(value).as_bytes())
}

pub fn write_quoted_float<S: Sink + ?Sized>(sink: &mut S, value: f64) -> Result<usize> {
    if !value.is_finite() {
        return write_non_finite(sink, value);
    }
    Ok(write_quote(sink)? + write_float(sink, value)? + write_quote(sink)?)
}

#[inline]
pub fn write_bool<S: Sink + ?Sized>(sink: &mut S, value: bool) -> Result<usize> {
    if value {
        write_byte!(sink, b"true")
    } else {
        write_byte!(sink, b"false")
    }
}

pub fn write_quoted_bool<S: Sink + ?Sized>(sink: &mut S, value: bool) -> Result<usize> {
    if value {
        write_byte!(sink, b"\"true\"")
    } else {
        write_byte!(sink, b"\"false\"")
    }
}

/// Write `data` as a standard base64 JSON string. Base64 output never needs escaping.
pub fn write_binary<S: Sink + ?Sized>(sink: &mut S, data: &[u8]) -> Result<usize> {
    if let Some(buffer) = sink.as_buffer() {
        let start = buffer.len();
        let Some(length) = base64::encoded_len(data.len(), true) else {
            return Err(Error::invalid_value(
                start,
                "binary too large to encode",
                "base64 length overflows usize",
            ));
        };
        buffer.push(b'"');
        buffer.resize(start + 1 + length, 0);
        if let Err(error) = STANDARD.encode_slice(data, &mut buffer[start + 1..]) {
            buffer.truncate(start);
            return Err(Error::invalid_value(start, "failed to encode binary", error));
        }
        buffer.push(b'"');
        return Ok(buffer.len() - start);
    }
    let encoded = STANDARD.encode(data);
    Ok(write_quote(sink)? + write_bytes(sink, encoded.as_bytes())? + write_quote(sink)?)
}

/// Re-encode a parsed value compactly. Strings are re-escaped and containers are walked through
/// the iterator functions, so insignificant whitespace in the source is dropped.
pub fn write_value<S: Sink + ?Sized>(sink: &mut S, value: &Value<'_>) -> Result<usize> {
    match value.kind() {
        Kind::Null => write_null(sink),
        Kind::False => write_bool(sink, false),
        Kind::True => write_bool(sink, true),
        // Any validated number token is copied as-is, even when it overflows an f64. Only the
        // literals that unvalidated parsing lets through (`NaN`, `Infinity`) are rewritten.
        Kind::Number if is_number_token(value.raw()) => write_raw(sink, value.raw()),
        Kind::Number => write_float(sink, value.number),
        Kind::String => write_string(sink, value.string()?),
        Kind::Object => {
            let mut written = write_object_start(sink)?;
            let mut first = true;
            value.object_for_each(|key, member| {
                if !std::mem::take(&mut first) {
                    written += write_comma(sink)?;
                }
                written += write_string(sink, &key)?;
                written += write_colon(sink)?;
                written += write_value(sink, &member)?;
                Ok(())
            })?;
            written += write_object_end(sink)?;
            Ok(written)
        }
        Kind::Array => {
            let mut written = write_array_start(sink)?;
            let mut first = true;
            value.array_for_each(|element| {
                if !std::mem::take(&mut first) {
                    written += write_comma(sink)?;
                }
                written += write_value(sink, &element)?;
                Ok(())
            })?;
            written += write_array_end(sink)?;
            Ok(written)
        }
    }
}

pub fn write_owned<S: Sink + ?Sized>(sink: &mut S, value: &OwnedValue) -> Result<usize> {
    match value {
        OwnedValue::Null => write_null(sink),
        OwnedValue::Bool(value) => write_bool(sink, *value),
        OwnedValue::Number(value) => write_float(sink, *value),
        OwnedValue::String(value) => write_string(sink, value),
        OwnedValue::Object(map) => {
            let mut written = write_object_start(sink)?;
            for (index, (key, member)) in map.iter().enumerate() {
                if index > 0 {
                    written += write_comma(sink)?;
                }
                written += write_string(sink, key)?;
                written += write_colon(sink)?;
                written += write_owned(sink, member)?;
            }
            written += write_object_end(sink)?;
            Ok(written)
        }
        OwnedValue::Array(elements) => {
            let mut written = write_array_start(sink)?;
            for (index, element) in elements.iter().enumerate() {
                if index > 0 {
                    written += write_comma(sink)?;
                }
                written += write_owned(sink, element)?;
            }
            written += write_array_end(sink)?;
            Ok(written)
        }
    }
}
