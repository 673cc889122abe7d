use std::borrow::Cow;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};
use crate::iter::{self, ArrayIter, ObjectIter};
use crate::owned::OwnedValue;
use crate::validator::is_number_token;
use crate::{Kind, Value};

/// Decode one of the quoted names the writer uses for non-finite floats.
fn special_float(text: &str) -> Option<f64> {
    match text {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

impl<'a> Value<'a> {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The exact source text of this value, without surrounding whitespace or separators.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Byte offset of this value within the original top-level buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The decoded payload of a string value.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The eagerly parsed payload of a number value.
    pub fn number(&self) -> Option<f64> {
        (self.kind == Kind::Number).then_some(self.number)
    }

    /// Returns false for `null`, and for the default `Value` that stands in for an absent field.
    pub fn exists(&self) -> bool {
        self.kind != Kind::Null
    }

    #[cold]
    fn mismatch(&self, want: &'static str) -> Error {
        Error::type_mismatch(self.offset, want, self.kind)
    }

    pub fn string(&self) -> Result<&str> {
        match self.kind {
            Kind::String => self.text().ok_or_else(|| self.mismatch("string")),
            _ => Err(self.mismatch("string")),
        }
    }

    /// Like `string`, but gives up the decoded text without copying it.
    pub fn into_string(self) -> Result<Cow<'a, str>> {
        match (self.kind, self.text) {
            (Kind::String, Some(text)) => Ok(text),
            (kind, _) => Err(Error::type_mismatch(self.offset, "string", kind)),
        }
    }

    pub fn bool(&self) -> Result<bool> {
        match self.kind {
            Kind::True => Ok(true),
            Kind::False => Ok(false),
            _ => Err(self.mismatch("bool")),
        }
    }

    /// Integers are read from the raw token, so they must be written without a fraction or
    /// exponent.
    pub fn int(&self) -> Result<i64> {
        if self.kind != Kind::Number {
            return Err(self.mismatch("integer"));
        }
        self.raw
            .parse::<i64>()
            .map_err(|error| Error::invalid_value(self.offset, "invalid integer", error))
    }

    pub fn uint(&self) -> Result<u64> {
        if self.kind != Kind::Number {
            return Err(self.mismatch("unsigned integer"));
        }
        self.raw
            .parse::<u64>()
            .map_err(|error| Error::invalid_value(self.offset, "invalid unsigned integer", error))
    }

    /// Numbers, plus the strings `"NaN"`, `"Infinity"` and `"-Infinity"` that stand in for
    /// non-finite floats.
    pub fn float(&self) -> Result<f64> {
        match self.kind {
            Kind::Number => Ok(self.number),
            Kind::String => self
                .text()
                .and_then(special_float)
                .ok_or_else(|| self.mismatch("number")),
            _ => Err(self.mismatch("number")),
        }
    }

    /// An integer encoded as a JSON string, e.g. `"42"`.
    pub fn quoted_int(&self) -> Result<i64> {
        let text = self.string()?;
        text.parse::<i64>()
            .map_err(|error| Error::invalid_value(self.offset, "invalid quoted integer", error))
    }

    /// A float encoded as a JSON string, e.g. `"1.5"` or `"NaN"`.
    pub fn quoted_float(&self) -> Result<f64> {
        let text = self.string()?;
        if let Some(special) = special_float(text) {
            return Ok(special);
        }
        if !is_number_token(text) {
            return Err(Error::invalid_value(
                self.offset,
                "invalid quoted float",
                format!("{text:?} is not a JSON number"),
            ));
        }
        text.parse::<f64>()
            .map_err(|error| Error::invalid_value(self.offset, "invalid quoted float", error))
    }

    /// Binary data encoded as a standard base64 string.
    pub fn binary(&self) -> Result<Vec<u8>> {
        let text = self.string()?;
        STANDARD
            .decode(text)
            .map_err(|error| Error::invalid_value(self.offset, "invalid base64", error))
    }

    /// Look up `key` in this object. When the key appears more than once, the last occurrence
    /// wins, matching `value()`.
    pub fn get(&self, key: &str) -> Result<Option<Value<'a>>> {
        let mut found = None;
        iter::object_for_each(self, |member_key, value| {
            if member_key == key {
                found = Some(value);
            }
            Ok(())
        })?;
        Ok(found)
    }

    /// Eagerly decode this value and everything nested inside of it.
    pub fn value(&self) -> Result<OwnedValue> {
        OwnedValue::from_value(self)
    }

    pub fn object_has_next(&self, cursor: usize) -> bool {
        iter::object_has_next(self, cursor)
    }

    pub fn object_next(&self, cursor: usize) -> Result<(Cow<'a, str>, Value<'a>, usize)> {
        iter::object_next(self, cursor)
    }

    pub fn array_has_next(&self, cursor: usize) -> bool {
        iter::array_has_next(self, cursor)
    }

    pub fn array_next(&self, cursor: usize) -> Result<(Value<'a>, usize)> {
        iter::array_next(self, cursor)
    }

    /// Iterate the members of this object, starting from `cursor` (0 for the beginning).
    pub fn object_iter(&self, cursor: usize) -> ObjectIter<'_, 'a> {
        ObjectIter::new(self, cursor)
    }

    /// Iterate the elements of this array, starting from `cursor` (0 for the beginning).
    pub fn array_iter(&self, cursor: usize) -> ArrayIter<'_, 'a> {
        ArrayIter::new(self, cursor)
    }

    pub fn object_for_each<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(Cow<'a, str>, Value<'a>) -> Result<()>,
    {
        iter::object_for_each(self, f)
    }

    pub fn array_for_each<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(Value<'a>) -> Result<()>,
    {
        iter::array_for_each(self, f)
    }
}

#[cfg(test)]
mod test {
    use crate::{parse, Error, Kind, Value};

    #[test]
    fn test_typed_accessors() {
        assert_eq!(parse(r#""hi""#).unwrap().string().unwrap(), "hi");
        assert!(parse("true").unwrap().bool().unwrap());
        assert!(!parse("false").unwrap().bool().unwrap());
        assert_eq!(parse("-42").unwrap().int().unwrap(), -42);
        assert_eq!(parse("18446744073709551615").unwrap().uint().unwrap(), u64::MAX);
        assert_eq!(parse("2.5").unwrap().float().unwrap(), 2.5);
        assert_eq!(parse(r#""-17""#).unwrap().quoted_int().unwrap(), -17);
        assert_eq!(parse(r#""1e3""#).unwrap().quoted_float().unwrap(), 1000.0);
        assert_eq!(
            parse(r#""aGVsbG8=""#).unwrap().binary().unwrap(),
            b"hello".to_vec()
        );
    }

    #[test]
    fn test_special_floats() {
        assert!(parse(r#""NaN""#).unwrap().float().unwrap().is_nan());
        assert_eq!(
            parse(r#""-Infinity""#).unwrap().quoted_float().unwrap(),
            f64::NEG_INFINITY
        );
        assert!(matches!(
            parse(r#""fast""#).unwrap().float(),
            Err(Error::TypeMismatch {
                want: "number",
                got: Kind::String,
                ..
            })
        ));
    }

    #[test]
    fn test_type_mismatch_reports_offset() {
        let object = parse(r#"{"a": "text"}"#).unwrap();
        let value = object.get("a").unwrap().unwrap();
        let error = value.int().unwrap_err();
        assert!(matches!(
            error,
            Error::TypeMismatch {
                index: 6,
                want: "integer",
                got: Kind::String
            }
        ));
        assert_eq!(error.name(), "TypeMismatchError");
    }

    #[test]
    fn test_invalid_values() {
        let overflow = parse("9223372036854775808").unwrap().int().unwrap_err();
        assert!(matches!(
            overflow,
            Error::InvalidValue {
                index: 0,
                message: "invalid integer",
                ..
            }
        ));
        assert!(matches!(
            parse("1.5").unwrap().int(),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(r#""not base64!""#).unwrap().binary(),
            Err(Error::InvalidValue {
                message: "invalid base64",
                ..
            })
        ));
        assert!(matches!(
            parse(r#""inf""#).unwrap().quoted_float(),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_exists() {
        assert!(!parse("null").unwrap().exists());
        assert!(!Value::default().exists());
        assert!(parse("0").unwrap().exists());
        assert!(parse("false").unwrap().exists());
    }

    #[test]
    fn test_get_last_wins() {
        let object = parse(r#"{"a":"b","a":1}"#).unwrap();
        assert_eq!(object.get("a").unwrap().unwrap().int().unwrap(), 1);
        assert!(object.get("missing").unwrap().is_none());
    }
}
