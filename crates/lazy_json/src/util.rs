// Learned from: https://nullprogram.com/blog/2017/10/06/
#[rustfmt::skip]
static UTF8_LENGTH_LOOKUP: [usize; 32] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 2, 2, 3, 3, 4, 0,
];

/// Return the byte length of the complete UTF-8 code point that starts with `byte`. This can be
/// done branchlessly and without computing the entire `char`. Continuation bytes and bytes that
/// can never start a code point return 0.
#[inline(always)]
pub(crate) fn char_length_from_byte(byte: u8) -> usize {
    UTF8_LENGTH_LOOKUP[byte as usize >> 3]
}

/// Check that the code point starting at `start` is well-formed UTF-8, returning its length.
#[inline]
pub(crate) fn utf8_sequence_length(bytes: &[u8], start: usize) -> Option<usize> {
    let length = char_length_from_byte(bytes[start]);
    if length == 0 {
        return None;
    }
    let sequence = bytes.get(start..start + length)?;
    std::str::from_utf8(sequence).ok().map(|_| length)
}

/// JSON only treats these four bytes as insignificant whitespace.
#[inline(always)]
pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Return the position of the first non-whitespace byte at or after `position`, which may be
/// `bytes.len()` if only whitespace remains.
#[inline]
pub(crate) fn skip_whitespace(bytes: &[u8], mut position: usize) -> usize {
    while position < bytes.len() && is_whitespace(bytes[position]) {
        position += 1;
    }
    position
}
