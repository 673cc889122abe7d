use crate::error::{Error, Result};
use crate::util::{skip_whitespace, utf8_sequence_length};
use crate::MAX_NESTING_DEPTH;

/// Check that `buffer` holds exactly one well-formed JSON value, optionally surrounded by
/// whitespace, without building any representation of it.
///
/// The first violation aborts validation, and the returned error carries the exact byte index
/// where it was detected.
pub fn valid<B: AsRef<[u8]> + ?Sized>(buffer: &B) -> Result<()> {
    let result = Validator::new(buffer.as_ref()).validate_payload();
    if let Err(error) = &result {
        tracing::debug!(%error, "rejected malformed JSON");
    }
    result
}

/// Returns true if `text` is exactly one JSON number token, with nothing before or after it.
pub(crate) fn is_number_token(text: &str) -> bool {
    let mut validator = Validator::new(text.as_bytes());
    matches!(validator.peek(), Some(b'-' | b'0'..=b'9'))
        && validator.validate_number().is_ok()
        && validator.is_eof()
}

/// Recursive descent over the JSON grammar, with one method per production. Every method expects
/// `position` to be at the first byte of its production and leaves it just past the end.
struct Validator<'a> {
    bytes: &'a [u8],
    position: usize,
    depth: usize,
}

impl<'a> Validator<'a> {
    fn new(bytes: &'a [u8]) -> Validator<'a> {
        Self {
            bytes,
            position: 0,
            depth: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.position >= self.bytes.len()
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        self.position = skip_whitespace(self.bytes, self.position);
    }

    #[inline]
    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.position += 1;
        }
    }

    #[cold]
    fn error(&self, message: &'static str) -> Error {
        Error::syntax(self.position, message)
    }

    fn enter_container(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.error("exceeded max nesting depth"));
        }
        Ok(())
    }

    fn validate_payload(&mut self) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'{' | b'[' | b'"' | b'-' | b'0'..=b'9' | b't' | b'f' | b'n') => {}
            _ => return Err(self.error("invalid character before JSON")),
        }
        self.validate_value()?;
        self.skip_whitespace();
        if !self.is_eof() {
            return Err(self.error("invalid character after JSON"));
        }
        Ok(())
    }

    fn validate_value(&mut self) -> Result<()> {
        let Some(byte) = self.peek() else {
            return Err(self.error("expected value"));
        };
        match byte {
            b'{' => self.validate_object(),
            b'[' => self.validate_array(),
            b'"' => self.validate_string(),
            b'-' | b'0'..=b'9' => self.validate_number(),
            b't' => self.validate_literal(b"true"),
            b'f' => self.validate_literal(b"false"),
            b'n' => self.validate_literal(b"null"),
            _ => Err(self.error("invalid character looking for beginning of value")),
        }
    }

    fn validate_object(&mut self) -> Result<()> {
        self.enter_container()?;
        self.position += 1;
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.position += 1;
            self.depth -= 1;
            return Ok(());
        }

        loop {
            match self.peek() {
                Some(b'"') => self.validate_string()?,
                // A `}` here means the previous member had a trailing comma.
                Some(_) => return Err(self.error("invalid character for object key")),
                None => return Err(self.error("expected object key")),
            }

            self.skip_whitespace();
            match self.peek() {
                Some(b':') => self.position += 1,
                Some(_) => return Err(self.error("invalid character for colon")),
                None => return Err(self.error("expected colon")),
            }

            self.skip_whitespace();
            self.validate_value()?;

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.position += 1;
                    self.skip_whitespace();
                }
                Some(b'}') => {
                    self.position += 1;
                    break;
                }
                Some(_) => return Err(self.error("invalid character for comma")),
                None => return Err(self.error("expected comma")),
            }
        }

        self.depth -= 1;
        Ok(())
    }

    fn validate_array(&mut self) -> Result<()> {
        self.enter_container()?;
        self.position += 1;
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.position += 1;
            self.depth -= 1;
            return Ok(());
        }

        loop {
            self.validate_value()?;

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.position += 1;
                    self.skip_whitespace();
                }
                Some(b']') => {
                    self.position += 1;
                    break;
                }
                Some(_) => return Err(self.error("invalid character for comma")),
                None => return Err(self.error("expected comma")),
            }
        }

        self.depth -= 1;
        Ok(())
    }

    fn validate_string(&mut self) -> Result<()> {
        // Opening quote.
        self.position += 1;
        loop {
            let Some(byte) = self.peek() else {
                return Err(self.error("expected closing quote"));
            };
            match byte {
                b'"' => {
                    self.position += 1;
                    return Ok(());
                }
                b'\\' => self.validate_escape()?,
                0x00..=0x1F => return Err(self.error("invalid control character in string")),
                0x80..=0xFF => match utf8_sequence_length(self.bytes, self.position) {
                    Some(length) => self.position += length,
                    None => return Err(self.error("invalid UTF-8 in string")),
                },
                _ => self.position += 1,
            }
        }
    }

    fn validate_escape(&mut self) -> Result<()> {
        // The backslash itself.
        self.position += 1;
        match self.peek() {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                self.position += 1;
                Ok(())
            }
            Some(b'u') => {
                self.position += 1;
                for _ in 0..4 {
                    match self.peek() {
                        Some(digit) if digit.is_ascii_hexdigit() => self.position += 1,
                        Some(_) => return Err(self.error("invalid character in unicode escape")),
                        None => return Err(self.error("expected hex digit")),
                    }
                }
                Ok(())
            }
            Some(_) => Err(self.error("invalid escape character")),
            None => Err(self.error("expected escape character")),
        }
    }

    fn validate_number(&mut self) -> Result<()> {
        if self.peek() == Some(b'-') {
            self.position += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error("expected digit after sign"));
            }
        }

        // A leading zero stands alone, anything following it is not part of the integer.
        if self.peek() == Some(b'0') {
            self.position += 1;
        } else {
            self.skip_digits();
        }

        if self.peek() == Some(b'.') {
            self.position += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error("expected digit after decimal point"));
            }
            self.skip_digits();
        }

        if let Some(b'e' | b'E') = self.peek() {
            self.position += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.position += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error("expected digit in exponent"));
            }
            self.skip_digits();
        }

        Ok(())
    }

    fn validate_literal(&mut self, literal: &'static [u8]) -> Result<()> {
        for &expected in literal {
            match self.peek() {
                Some(byte) if byte == expected => self.position += 1,
                Some(_) => return Err(self.error("invalid character in literal")),
                None => return Err(self.error("unexpected end of literal")),
            }
        }
        Ok(())
    }
}
