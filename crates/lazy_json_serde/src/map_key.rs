use lazy_json::writer::{self, Sink};
use serde::ser::{self, Impossible};
use serde::Serialize;

use crate::error::{Error, Result};

/// Writes a single object key. JSON keys are always strings, so strings and chars are written as
/// they are, numbers and bools are written quoted, and everything else is rejected.
pub(crate) struct MapKeySerializer<'a, S: ?Sized> {
    sink: &'a mut S,
}

impl<'a, S: Sink + ?Sized> MapKeySerializer<'a, S> {
    pub(crate) fn new(sink: &'a mut S) -> Self {
        Self { sink }
    }
}

#[cold]
fn key_must_be_a_string() -> Error {
    Error::KeyMustBeAString
}

impl<'a, S: Sink + ?Sized> ser::Serializer for MapKeySerializer<'a, S> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Impossible<(), Error>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        writer::write_quoted_bool(self.sink, v)?;
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        writer::write_quoted_int(self.sink, v)?;
        Ok(())
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        writer::write_quoted_uint(self.sink, v)?;
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        writer::write_quoted_float(self.sink, v)?;
        Ok(())
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        writer::write_string(self.sink, v)?;
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(key_must_be_a_string())
    }

    fn serialize_none(self) -> Result<()> {
        Err(key_must_be_a_string())
    }

    fn serialize_some<T>(self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_unit(self) -> Result<()> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Err(key_must_be_a_string())
    }

    // Fieldless enums make natural keys.
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_must_be_a_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_must_be_a_string())
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use serde::Serialize;

    use crate::{to_string, Error};

    #[test]
    fn test_scalar_keys_are_quoted() {
        let mut map = BTreeMap::new();
        map.insert(true, 1);
        map.insert(false, 0);
        assert_eq!(to_string(&map).unwrap(), r#"{"false":0,"true":1}"#);

        let mut map = BTreeMap::new();
        map.insert('c', 'd');
        assert_eq!(to_string(&map).unwrap(), r#"{"c":"d"}"#);
    }

    #[test]
    fn test_enum_keys() {
        #[derive(Serialize, PartialEq, Eq, PartialOrd, Ord)]
        enum Color {
            Red,
            Green,
        }

        #[derive(Serialize, PartialEq, Eq, PartialOrd, Ord)]
        struct Id(u32);

        let mut map = BTreeMap::new();
        map.insert(Color::Red, Id(1));
        map.insert(Color::Green, Id(2));
        assert_eq!(to_string(&map).unwrap(), r#"{"Red":1,"Green":2}"#);

        let mut map = BTreeMap::new();
        map.insert(Id(4), Color::Green);
        assert_eq!(to_string(&map).unwrap(), r#"{"4":"Green"}"#);
    }

    #[test]
    fn test_rejected_keys() {
        let mut map = BTreeMap::new();
        map.insert(Some(1), 1);
        let error = to_string(&map).unwrap_err();
        assert!(matches!(error, Error::KeyMustBeAString));
        assert_eq!(error.name(), "KeyMustBeAStringError");

        let mut map = BTreeMap::new();
        map.insert((1, 2), 1);
        assert!(matches!(to_string(&map), Err(Error::KeyMustBeAString)));
    }
}
