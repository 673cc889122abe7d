use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use crate::error::{Error, Result};
use crate::string::unescape;
use crate::util::skip_whitespace;
use crate::validator::valid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Kind {
    #[default]
    Null,
    False,
    True,
    Number,
    String,
    Object,
    Array,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::False => "false",
            Kind::True => "true",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Object => "object",
            Kind::Array => "array",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handle onto one JSON value within a source buffer.
///
/// Scalars are decoded when the value is created: `text` holds the string payload (borrowed from
/// the source unless it contained escapes) and `number` holds the parsed float. Objects and arrays
/// are only "squashed": `raw` covers the bracket-to-bracket span and nothing inside of it has been
/// looked at beyond matching brackets. Use the iterator functions or `value()` to go deeper.
#[derive(Clone, Debug, Default)]
pub struct Value<'a> {
    pub(crate) kind: Kind,
    pub(crate) raw: &'a str,
    pub(crate) text: Option<Cow<'a, str>>,
    pub(crate) number: f64,
    pub(crate) offset: usize,
}

/// Parse the single JSON value in `buffer`.
///
/// The whole buffer is validated first, so this never succeeds on malformed JSON. Only the
/// outermost value is decoded; nested containers are left for the caller to iterate.
pub fn parse<B: AsRef<[u8]> + ?Sized>(buffer: &B) -> Result<Value<'_>> {
    let bytes = buffer.as_ref();
    valid(bytes)?;
    parse_unvalidated(bytes)
}

/// Parse the single JSON value in `buffer` without validating it first.
///
/// Only the outermost value is checked: scalars are decoded and containers must have balanced
/// brackets, but malformed content nested inside a container is not noticed until that content is
/// iterated. This is intended for input that is already trusted to be well-formed.
pub fn parse_unvalidated<B: AsRef<[u8]> + ?Sized>(buffer: &B) -> Result<Value<'_>> {
    let result = std::str::from_utf8(buffer.as_ref())
        .map_err(|error| Error::syntax(error.valid_up_to(), "invalid UTF-8"))
        .and_then(|source| {
            if skip_whitespace(source.as_bytes(), 0) == source.len() {
                return Err(Error::syntax(source.len(), "invalid character before JSON"));
            }
            let (value, end) = parse_value(source, 0, 0)?;
            let trailing = skip_whitespace(source.as_bytes(), end);
            if trailing < source.len() {
                return Err(Error::syntax(trailing, "invalid character after JSON"));
            }
            Ok(value)
        });
    if let Err(error) = &result {
        tracing::debug!(%error, "rejected malformed JSON");
    }
    result
}

/// Decode the value starting at the first non-whitespace byte at or after `start` in `source`,
/// returning it along with the position just past its end.
///
/// `base_offset` is the offset of `source` itself within the original buffer. It is added to the
/// new value's `offset` and to the index of any error.
pub(crate) fn parse_value(
    source: &str,
    start: usize,
    base_offset: usize,
) -> Result<(Value<'_>, usize)> {
    let bytes = source.as_bytes();
    let position = skip_whitespace(bytes, start);
    let error = |index: usize, message| Error::syntax(base_offset + index, message);

    let Some(&first) = bytes.get(position) else {
        return Err(error(position, "expected value"));
    };
    let (kind, end) = match first {
        b'{' | b'[' => {
            let end = squash(bytes, position)
                .ok_or_else(|| error(bytes.len(), "unbalanced brackets"))?;
            let kind = if first == b'{' {
                Kind::Object
            } else {
                Kind::Array
            };
            (kind, end)
        }
        b'"' => {
            let (end, has_escapes) = scan_string(bytes, position)
                .ok_or_else(|| error(bytes.len(), "expected closing quote"))?;
            let interior = &source[position + 1..end - 1];
            let text = if has_escapes {
                unescape(interior).map_err(|_| error(position, "invalid escape character"))?
            } else {
                Cow::Borrowed(interior)
            };
            return Ok((
                Value {
                    kind: Kind::String,
                    raw: &source[position..end],
                    text: Some(text),
                    number: 0.0,
                    offset: base_offset + position,
                },
                end,
            ));
        }
        b't' | b'f' | b'n' => {
            let (kind, literal): (Kind, &[u8]) = match first {
                b't' => (Kind::True, &b"true"[..]),
                b'f' => (Kind::False, &b"false"[..]),
                _ => (Kind::Null, &b"null"[..]),
            };
            let end = expect_literal(bytes, position, literal)
                .map_err(|index| error(index, "invalid character in literal"))?;
            (kind, end)
        }
        b'-' | b'0'..=b'9' | b'N' | b'I' => {
            let end = scan_number(bytes, position);
            let raw = &source[position..end];
            let number = raw
                .parse::<f64>()
                .map_err(|_| error(position, "invalid number"))?;
            return Ok((
                Value {
                    kind: Kind::Number,
                    raw,
                    text: None,
                    number,
                    offset: base_offset + position,
                },
                end,
            ));
        }
        _ => {
            return Err(error(
                position,
                "invalid character looking for beginning of value",
            ))
        }
    };

    Ok((
        Value {
            kind,
            raw: &source[position..end],
            text: None,
            number: 0.0,
            offset: base_offset + position,
        },
        end,
    ))
}

/// Find the end of the object or array opening at `start` by counting bracket depth. String
/// contents are skipped over whole, so brackets inside of them never count. Returns the position
/// just past the matching close bracket.
pub(crate) fn squash(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut position = start;
    while position < bytes.len() {
        match bytes[position] {
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth -= 1;
                if depth == 0 {
                    #[cfg(feature = "debug-tracing")]
                    tracing::trace!(start, end = position + 1, "squashed container");
                    return Some(position + 1);
                }
            }
            b'"' => {
                let (end, _) = scan_string(bytes, position)?;
                position = end;
                continue;
            }
            _ => {}
        }
        position += 1;
    }
    None
}

/// Find the end of the string opening at `start`, returning the position just past the closing
/// quote and whether any escapes were seen along the way.
pub(crate) fn scan_string(bytes: &[u8], start: usize) -> Option<(usize, bool)> {
    let mut position = start + 1;
    let mut has_escapes = false;
    loop {
        let found = memchr::memchr2(b'"', b'\\', bytes.get(position..)?)?;
        position += found;
        if bytes[position] == b'"' {
            return Some((position + 1, has_escapes));
        }
        // Skip the backslash and whatever it escapes, which can never end the string.
        has_escapes = true;
        position += 2;
    }
}

/// Find the end of the number starting at `start`. Accepts the `NaN`, `Infinity` and `-Infinity`
/// literals as well as anything made of number characters; the float parser decides whether the
/// result is actually a number.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut position = start;
    if bytes[position] == b'-' {
        position += 1;
    }
    let rest = &bytes[position..];
    if rest.starts_with(b"NaN") {
        return position + 3;
    }
    if rest.starts_with(b"Infinity") {
        return position + 8;
    }
    while let Some(b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E') = bytes.get(position) {
        position += 1;
    }
    position
}

/// Check that `literal` appears at `start`, returning the position after it or the index of the
/// first byte that differs.
fn expect_literal(bytes: &[u8], start: usize, literal: &[u8]) -> std::result::Result<usize, usize> {
    for (index, &expected) in literal.iter().enumerate() {
        if bytes.get(start + index) != Some(&expected) {
            return Err(start + index);
        }
    }
    Ok(start + literal.len())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scalars() {
        let value = parse("  true ").unwrap();
        assert_eq!(value.kind, Kind::True);
        assert_eq!(value.raw, "true");
        assert_eq!(value.offset, 2);

        let value = parse("null").unwrap();
        assert_eq!(value.kind, Kind::Null);

        let value = parse("-12.5e1").unwrap();
        assert_eq!(value.kind, Kind::Number);
        assert_eq!(value.raw, "-12.5e1");
        assert_eq!(value.number, -125.0);
    }

    #[test]
    fn test_string_without_escapes_borrows() {
        let value = parse(r#""hello""#).unwrap();
        assert_eq!(value.kind, Kind::String);
        assert_eq!(value.raw, r#""hello""#);
        assert!(matches!(value.text, Some(Cow::Borrowed("hello"))));
    }

    #[test]
    fn test_string_with_escapes_decodes() {
        let value = parse(r#""a\nb\"c 🔈""#).unwrap();
        assert_eq!(value.text.as_deref(), Some("a\nb\"c 🔈"));
        assert!(matches!(value.text, Some(Cow::Owned(_))));
    }

    #[test]
    fn test_containers_are_squashed() {
        let source = r#" {"a": [1, "]}"], "b": {"c": "\"{"}} "#;
        let value = parse(source).unwrap();
        assert_eq!(value.kind, Kind::Object);
        assert_eq!(value.raw, source.trim());
        assert_eq!(value.offset, 1);
        assert!(value.text.is_none());

        let value = parse("[[], [[]]]").unwrap();
        assert_eq!(value.kind, Kind::Array);
        assert_eq!(value.raw, "[[], [[]]]");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(matches!(
            parse("[1,2,3"),
            Err(Error::Syntax {
                index: 6,
                message: "expected comma"
            })
        ));
    }

    #[test]
    fn test_unvalidated_only_checks_outer_value() {
        let value = parse_unvalidated(r#"[1, {"a": tru}]"#).unwrap();
        assert_eq!(value.kind, Kind::Array);

        assert!(matches!(
            parse_unvalidated("[1, 2"),
            Err(Error::Syntax {
                index: 5,
                message: "unbalanced brackets"
            })
        ));
        assert!(matches!(
            parse_unvalidated("nul"),
            Err(Error::Syntax {
                index: 3,
                message: "invalid character in literal"
            })
        ));
        assert!(matches!(
            parse_unvalidated("1 2"),
            Err(Error::Syntax {
                index: 2,
                message: "invalid character after JSON"
            })
        ));
        assert!(matches!(
            parse_unvalidated(b"\"\xC3\x28\"" as &[u8]),
            Err(Error::Syntax {
                index: 1,
                message: "invalid UTF-8"
            })
        ));
    }

    #[test]
    fn test_unvalidated_special_numbers() {
        assert!(parse_unvalidated("NaN").unwrap().number.is_nan());
        assert_eq!(parse_unvalidated("Infinity").unwrap().number, f64::INFINITY);
        assert_eq!(
            parse_unvalidated("-Infinity").unwrap().number,
            f64::NEG_INFINITY
        );
        assert!(parse("NaN").is_err());
    }

    #[test]
    fn test_nested_offsets() {
        let source = "  [1, 2]";
        let outer = parse(source).unwrap();
        let (inner, end) = parse_value(outer.raw, 4, outer.offset).unwrap();
        assert_eq!(inner.raw, "2");
        assert_eq!(inner.offset, 6);
        assert_eq!(&source[inner.offset..inner.offset + 1], "2");
        assert_eq!(end, 5);
    }
}
