use lazy_json::writer::{self, Sink};
use serde::{ser, Serialize};

use crate::error::{Error, Result};
use crate::map_key::MapKeySerializer;

pub struct Serializer<S> {
    pub(crate) sink: S,
}

impl<S: Sink> Serializer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

pub fn to_writer<S, T>(sink: &mut S, value: &T) -> Result<()>
where
    S: Sink + ?Sized,
    T: ?Sized + Serialize,
{
    let mut ser = Serializer { sink };
    value.serialize(&mut ser)
}

pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut buffer = Vec::with_capacity(128);
    to_writer(&mut buffer, value)?;
    Ok(buffer)
}

pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let buffer = to_vec(value)?;
    // SAFETY: The writer only ever emits ASCII punctuation and the contents of `&str`s, so the
    // output is guaranteed to be UTF-8.
    Ok(unsafe { String::from_utf8_unchecked(buffer) })
}

impl<'a, S: Sink> ser::Serializer for &'a mut Serializer<S> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Compound<'a, S>;
    type SerializeTuple = Compound<'a, S>;
    type SerializeTupleStruct = Compound<'a, S>;
    type SerializeTupleVariant = Compound<'a, S>;
    type SerializeMap = Compound<'a, S>;
    type SerializeStruct = Compound<'a, S>;
    type SerializeStructVariant = Compound<'a, S>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        writer::write_bool(&mut self.sink, v)?;
        Ok(())
    }

    // JSON does not distinguish between different sizes of integers, so all
    // signed integers will be serialized the same and all unsigned integers
    // will be serialized the same.
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
        writer::write_int(&mut self.sink, v)?;
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
        writer::write_uint(&mut self.sink, v)?;
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        writer::write_float(&mut self.sink, v)?;
        Ok(())
    }

    fn serialize_char(self, v: char) -> Result<()> {
        // A char encoded as UTF-8 takes 4 bytes at most.
        let mut buf = [0; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        writer::write_string(&mut self.sink, v)?;
        Ok(())
    }

    // Byte buffers are written as base64 strings, matching how the decoder reads binary fields.
    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        writer::write_binary(&mut self.sink, v)?;
        Ok(())
    }

    fn serialize_none(self) -> Result<()> {
        self.serialize_unit()
    }

    // A present optional is represented as just the contained value, so
    // `Some(())` and `None` both serialize as `null`.
    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        writer::write_null(&mut self.sink)?;
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

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

    // Variants with data use the externally tagged form, `{"Variant":<value>}`.
    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.write_variant_tag(variant)?;
        value.serialize(&mut *self)?;
        writer::write_object_end(&mut self.sink)?;
        Ok(())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        writer::write_array_start(&mut self.sink)?;
        Ok(Compound::new(self, false))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    // `{"Variant":[...]}`
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.write_variant_tag(variant)?;
        writer::write_array_start(&mut self.sink)?;
        Ok(Compound::new(self, true))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        writer::write_object_start(&mut self.sink)?;
        Ok(Compound::new(self, false))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    // `{"Variant":{...}}`
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.write_variant_tag(variant)?;
        writer::write_object_start(&mut self.sink)?;
        Ok(Compound::new(self, true))
    }
}

impl<S: Sink> Serializer<S> {
    /// Open the wrapping object of an externally tagged variant, up to and including the colon.
    fn write_variant_tag(&mut self, variant: &str) -> Result<()> {
        writer::write_object_start(&mut self.sink)?;
        writer::write_string(&mut self.sink, variant)?;
        writer::write_colon(&mut self.sink)?;
        Ok(())
    }
}

/// State for an array or object being written: whether a separator is needed before the next
/// element, and whether an enclosing variant object must be closed at the end.
pub struct Compound<'a, S: 'a> {
    serializer: &'a mut Serializer<S>,
    after_first: bool,
    in_variant: bool,
}

impl<'a, S: Sink> Compound<'a, S> {
    fn new(serializer: &'a mut Serializer<S>, in_variant: bool) -> Self {
        Self {
            serializer,
            after_first: false,
            in_variant,
        }
    }

    fn write_or_skip_first_separator(&mut self) -> Result<()> {
        if self.after_first {
            writer::write_comma(&mut self.serializer.sink)?;
        } else {
            self.after_first = true;
        }
        Ok(())
    }

    fn end_array(self) -> Result<()> {
        writer::write_array_end(&mut self.serializer.sink)?;
        self.end_variant()
    }

    fn end_object(self) -> Result<()> {
        writer::write_object_end(&mut self.serializer.sink)?;
        self.end_variant()
    }

    fn end_variant(self) -> Result<()> {
        if self.in_variant {
            writer::write_object_end(&mut self.serializer.sink)?;
        }
        Ok(())
    }

    fn write_field<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.write_or_skip_first_separator()?;
        writer::write_string(&mut self.serializer.sink, key)?;
        writer::write_colon(&mut self.serializer.sink)?;
        value.serialize(&mut *self.serializer)
    }
}

impl<'a, S: Sink> ser::SerializeSeq for Compound<'a, S> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.write_or_skip_first_separator()?;
        value.serialize(&mut *self.serializer)
    }

    fn end(self) -> Result<()> {
        self.end_array()
    }
}

impl<'a, S: Sink> ser::SerializeTuple for Compound<'a, S> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<()> {
        self.end_array()
    }
}

impl<'a, S: Sink> ser::SerializeTupleStruct for Compound<'a, S> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<()> {
        self.end_array()
    }
}

impl<'a, S: Sink> ser::SerializeTupleVariant for Compound<'a, S> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<()> {
        self.end_array()
    }
}

impl<'a, S: Sink> ser::SerializeMap for Compound<'a, S> {
    type Ok = ();
    type Error = Error;

    // Keys go through their own serializer, which only accepts types that can be written as
    // JSON strings.
    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.write_or_skip_first_separator()?;
        key.serialize(MapKeySerializer::new(&mut self.serializer.sink))
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        writer::write_colon(&mut self.serializer.sink)?;
        value.serialize(&mut *self.serializer)
    }

    fn end(self) -> Result<()> {
        self.end_object()
    }
}

impl<'a, S: Sink> ser::SerializeStruct for Compound<'a, S> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.write_field(key, value)
    }

    fn end(self) -> Result<()> {
        self.end_object()
    }
}

impl<'a, S: Sink> ser::SerializeStructVariant for Compound<'a, S> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.write_field(key, value)
    }

    fn end(self) -> Result<()> {
        self.end_object()
    }
}
