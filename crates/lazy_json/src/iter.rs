//! Stateless traversal of objects and arrays.
//!
//! A cursor is a plain byte position into the container's `raw` span, owned by the caller. Each
//! step takes the container and the current cursor and returns the next cursor, so walking a
//! container never allocates any iterator state. The caller must alternate `*_has_next` with
//! `*_next`, and must not reuse a cursor after `*_next` returned an error.
//!
//! ```ignore
//! let mut cursor = 0;
//! while object_has_next(&object, cursor) {
//!     let (key, value, next) = object_next(&object, cursor)?;
//!     cursor = next;
//! }
//! ```

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::parser::{parse_value, scan_string};
use crate::string::unescape;
use crate::util::is_whitespace;
use crate::{Kind, Value};

/// Skip the opening bracket (when `cursor` is 0), whitespace, and separating commas.
#[inline]
fn seek(bytes: &[u8], cursor: usize) -> usize {
    let mut position = cursor.max(1);
    while position < bytes.len() && (is_whitespace(bytes[position]) || bytes[position] == b',') {
        position += 1;
    }
    position
}

#[inline]
fn has_next(container: &Value<'_>, cursor: usize, kind: Kind, closing: u8) -> bool {
    if container.kind != kind {
        return false;
    }
    let bytes = container.raw.as_bytes();
    let position = seek(bytes, cursor);
    position < bytes.len() && bytes[position] != closing
}

#[cold]
fn kind_error(container: &Value<'_>, want: Kind) -> Error {
    Error::type_mismatch(container.offset, want.as_str(), container.kind)
}

/// Returns true if another member of `object` follows `cursor`.
pub fn object_has_next(object: &Value<'_>, cursor: usize) -> bool {
    has_next(object, cursor, Kind::Object, b'}')
}

/// Decode the member of `object` following `cursor`, returning its key, its value, and the cursor
/// just past the value.
pub fn object_next<'a>(
    object: &Value<'a>,
    cursor: usize,
) -> Result<(Cow<'a, str>, Value<'a>, usize)> {
    if object.kind != Kind::Object {
        return Err(kind_error(object, Kind::Object));
    }
    let raw = object.raw;
    let bytes = raw.as_bytes();
    let error = |index: usize, message| Error::syntax(object.offset + index, message);

    let key_start = seek(bytes, cursor);
    if bytes.get(key_start) != Some(&b'"') {
        return Err(error(key_start, "expected object key"));
    }
    let (key_end, has_escapes) =
        scan_string(bytes, key_start).ok_or_else(|| error(key_start, "expected closing quote"))?;
    let interior = &raw[key_start + 1..key_end - 1];
    let key = if has_escapes {
        unescape(interior).map_err(|_| error(key_start, "invalid escape character"))?
    } else {
        Cow::Borrowed(interior)
    };

    let mut colon = key_end;
    while colon < bytes.len() && is_whitespace(bytes[colon]) {
        colon += 1;
    }
    if bytes.get(colon) != Some(&b':') {
        return Err(error(colon, "expected colon"));
    }

    let (value, end) = parse_value(raw, colon + 1, object.offset)?;
    #[cfg(feature = "debug-tracing")]
    tracing::trace!(cursor, end, key = %key, kind = %value.kind, "object member");
    Ok((key, value, end))
}

/// Returns true if another element of `array` follows `cursor`.
pub fn array_has_next(array: &Value<'_>, cursor: usize) -> bool {
    has_next(array, cursor, Kind::Array, b']')
}

/// Decode the element of `array` following `cursor`, returning it and the cursor just past it.
pub fn array_next<'a>(array: &Value<'a>, cursor: usize) -> Result<(Value<'a>, usize)> {
    if array.kind != Kind::Array {
        return Err(kind_error(array, Kind::Array));
    }
    let (value, end) = parse_value(array.raw, seek(array.raw.as_bytes(), cursor), array.offset)?;
    #[cfg(feature = "debug-tracing")]
    tracing::trace!(cursor, end, kind = %value.kind, "array element");
    Ok((value, end))
}

/// Call `f` with each member of `object` in source order, stopping at the first error.
pub fn object_for_each<'a, F>(object: &Value<'a>, mut f: F) -> Result<()>
where
    F: FnMut(Cow<'a, str>, Value<'a>) -> Result<()>,
{
    if object.kind != Kind::Object {
        return Err(kind_error(object, Kind::Object));
    }
    let mut cursor = 0;
    while object_has_next(object, cursor) {
        let (key, value, next) = object_next(object, cursor)?;
        f(key, value)?;
        cursor = next;
    }
    Ok(())
}

/// Call `f` with each element of `array` in source order, stopping at the first error.
pub fn array_for_each<'a, F>(array: &Value<'a>, mut f: F) -> Result<()>
where
    F: FnMut(Value<'a>) -> Result<()>,
{
    if array.kind != Kind::Array {
        return Err(kind_error(array, Kind::Array));
    }
    let mut cursor = 0;
    while array_has_next(array, cursor) {
        let (value, next) = array_next(array, cursor)?;
        f(value)?;
        cursor = next;
    }
    Ok(())
}

/// Adapts the object functions to `Iterator`. The struct lives on the caller's stack and holds
/// nothing but the container reference and the cursor. Iteration ends after the first error.
pub struct ObjectIter<'v, 'a> {
    object: &'v Value<'a>,
    cursor: usize,
    done: bool,
}

impl<'v, 'a> ObjectIter<'v, 'a> {
    pub(crate) fn new(object: &'v Value<'a>, cursor: usize) -> Self {
        Self {
            object,
            cursor,
            done: false,
        }
    }

    /// The cursor just past the last member returned.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<'v, 'a> Iterator for ObjectIter<'v, 'a> {
    type Item = Result<(Cow<'a, str>, Value<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.object.kind != Kind::Object {
            self.done = true;
            return Some(Err(kind_error(self.object, Kind::Object)));
        }
        if !object_has_next(self.object, self.cursor) {
            self.done = true;
            return None;
        }
        match object_next(self.object, self.cursor) {
            Ok((key, value, next)) => {
                self.cursor = next;
                Some(Ok((key, value)))
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}

/// Adapts the array functions to `Iterator`, like `ObjectIter`.
pub struct ArrayIter<'v, 'a> {
    array: &'v Value<'a>,
    cursor: usize,
    done: bool,
}

impl<'v, 'a> ArrayIter<'v, 'a> {
    pub(crate) fn new(array: &'v Value<'a>, cursor: usize) -> Self {
        Self {
            array,
            cursor,
            done: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<'v, 'a> Iterator for ArrayIter<'v, 'a> {
    type Item = Result<Value<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.array.kind != Kind::Array {
            self.done = true;
            return Some(Err(kind_error(self.array, Kind::Array)));
        }
        if !array_has_next(self.array, self.cursor) {
            self.done = true;
            return None;
        }
        match array_next(self.array, self.cursor) {
            Ok((value, next)) => {
                self.cursor = next;
                Some(Ok(value))
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}
