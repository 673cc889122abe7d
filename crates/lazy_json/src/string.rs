use std::borrow::Cow;
use std::convert::Infallible;

use memchr::memchr;
use unescape_zero_copy::Error;

const NO: u8 = 0;
const UU: u8 = b'u';
const QU: u8 = b'"';
const BS: u8 = b'\\';
// First byte of U+2028 and U+2029, which are only escaped when the rest of the sequence matches.
const LS: u8 = b'L';

/// How each byte is written inside a JSON string. `NO` bytes are copied verbatim, `UU` bytes use
/// the `\u00xx` form, and everything else is written as a backslash followed by that letter.
///
/// `<`, `>` and `&` are legal in JSON strings but are escaped anyway so the output can be embedded
/// in HTML script contexts.
#[rustfmt::skip]
static ESCAPE: [u8; 256] = [
    //  0   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    UU, UU, UU, UU, UU, UU, UU, UU, UU, b't', b'n', UU, UU, b'r', UU, UU, // 0
    UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, // 1
    NO, NO, QU, NO, NO, NO, UU, NO, NO, NO, NO, NO, NO, NO, NO, NO, // 2
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, UU, NO, UU, NO, // 3
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, // 4
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, BS, NO, NO, NO, // 5
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, // 6
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, // 7
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, // 8
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, // 9
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, // A
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, // B
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, // C
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, // D
    NO, NO, LS, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, // E
    NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, // F
];

static HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A single escape sequence, at most `\uXXXX`.
struct EscapeSequence {
    bytes: [u8; 6],
    length: usize,
}

impl EscapeSequence {
    fn short(letter: u8) -> Self {
        Self {
            bytes: [b'\\', letter, 0, 0, 0, 0],
            length: 2,
        }
    }

    fn unicode(code_unit: u16) -> Self {
        let [high, low] = code_unit.to_be_bytes();
        Self {
            bytes: [
                b'\\',
                b'u',
                HEX_DIGITS[(high >> 4) as usize],
                HEX_DIGITS[(high & 0xF) as usize],
                HEX_DIGITS[(low >> 4) as usize],
                HEX_DIGITS[(low & 0xF) as usize],
            ],
            length: 6,
        }
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.length]
    }
}

/// If the byte at `index` needs escaping, return the escape along with how many input bytes it
/// replaces.
#[inline(always)]
fn escape_at(bytes: &[u8], index: usize) -> Option<(EscapeSequence, usize)> {
    let byte = bytes[index];
    match ESCAPE[byte as usize] {
        NO => None,
        UU => Some((EscapeSequence::unicode(byte as u16), 1)),
        LS => match bytes.get(index + 1..index + 3) {
            Some([0x80, 0xA8]) => Some((EscapeSequence::unicode(0x2028), 3)),
            Some([0x80, 0xA9]) => Some((EscapeSequence::unicode(0x2029), 3)),
            _ => None,
        },
        letter => Some((EscapeSequence::short(letter), 1)),
    }
}

/// Walk `s`, handing `emit` alternating runs of verbatim bytes and escape sequences, in order.
/// Stops at the first error from `emit`.
pub(crate) fn for_each_escaped_chunk<E, F>(s: &str, mut emit: F) -> Result<(), E>
where
    F: FnMut(&[u8]) -> Result<(), E>,
{
    let bytes = s.as_bytes();
    let mut run_start = 0;
    let mut index = 0;
    while index < bytes.len() {
        let Some((escape, consumed)) = escape_at(bytes, index) else {
            index += 1;
            continue;
        };
        if run_start < index {
            emit(&bytes[run_start..index])?;
        }
        emit(escape.as_bytes())?;
        index += consumed;
        run_start = index;
    }
    if run_start < bytes.len() {
        emit(&bytes[run_start..])?;
    }
    Ok(())
}

/// Return the exact number of bytes `escape_string_into` would append for `s`, including the
/// surrounding quotes, without writing anything.
pub fn quoted_string_length(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut length = s.len() + 2;
    let mut index = 0;
    while index < bytes.len() {
        match escape_at(bytes, index) {
            Some((escape, consumed)) => {
                length = length + escape.length - consumed;
                index += consumed;
            }
            None => index += 1,
        }
    }
    length
}

/// Append `s` to `buf` as a quoted JSON string. The buffer is grown exactly once.
pub fn escape_string_into(buf: &mut Vec<u8>, s: &str) {
    buf.reserve(quoted_string_length(s));
    buf.push(b'"');
    let result = for_each_escaped_chunk::<Infallible, _>(s, |chunk| {
        buf.extend_from_slice(chunk);
        Ok(())
    });
    if let Err(never) = result {
        match never {}
    }
    buf.push(b'"');
}

/// Return `text` as a quoted, escaped JSON string.
pub fn escape_for_output(text: &str) -> Vec<u8> {
    let mut output = Vec::new();
    escape_string_into(&mut output, text);
    output
}

/// Write the escaped contents of `s` to `writer`, without the surrounding quotes.
pub fn write_escaped_str_contents<W: std::io::Write + ?Sized>(
    writer: &mut W,
    s: &str,
) -> std::io::Result<()> {
    for_each_escaped_chunk(s, |chunk| writer.write_all(chunk))
}

#[inline]
fn hex_code_unit(digits: Option<&str>) -> Option<u32> {
    let digits = digits?;
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Decode a single escape sequence, `s` being everything after the backslash.
///
/// Surrogate code units only decode as a complete high/low pair. A lone or mismatched surrogate
/// ends decoding: the rest of the string is dropped and everything decoded so far is kept.
pub(crate) fn json_escape_sequence(s: &str) -> Result<(Option<char>, &str), Error> {
    let mut chars = s.chars();
    let next = chars.next().ok_or(Error::IncompleteSequence)?;
    match next {
        'b' => Ok((Some('\x08'), chars.as_str())),
        'f' => Ok((Some('\x0C'), chars.as_str())),
        'n' => Ok((Some('\n'), chars.as_str())),
        'r' => Ok((Some('\r'), chars.as_str())),
        't' => Ok((Some('\t'), chars.as_str())),
        'u' => {
            let first = hex_code_unit(s.get(1..5)).ok_or(Error::IncompleteSequence)?;
            if !(0xD800..=0xDFFF).contains(&first) {
                // Everything outside the surrogate range is a valid scalar value.
                return Ok((char::from_u32(first), &s[5..]));
            }
            if (0xD800..=0xDBFF).contains(&first) && s.get(5..7) == Some("\\u") {
                if let Some(second) = hex_code_unit(s.get(7..11)) {
                    if (0xDC00..=0xDFFF).contains(&second) {
                        // Taken from serde_json: https://github.com/serde-rs/json/blob/1d7378e8ee87e9225da28094329e06345b76cd99/src/read.rs#L969
                        let combined = (((first - 0xD800) << 10) | (second - 0xDC00)) + 0x1_0000;
                        return Ok((char::from_u32(combined), &s[11..]));
                    }
                }
            }
            Ok((None, ""))
        }
        // `"`, `\` and `/` stand for themselves.
        ch => Ok((Some(ch), chars.as_str())),
    }
}

/// Decode the escape sequences in the interior of a JSON string (the text between its quotes).
/// Borrows from `raw` when there is nothing to decode.
pub fn unescape(raw: &str) -> Result<Cow<'_, str>, Error> {
    // Most strings don't contain escapes, so doing a quick lookup over the
    // whole string can speed up the normal case.
    if memchr(b'\\', raw.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(raw));
    }
    unescape_zero_copy::unescape(json_escape_sequence, raw)
}
