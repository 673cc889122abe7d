//! Bookkeeping shared by generated struct and map decoders: which fields have been seen, which
//! are still missing, and how nested failures are attributed to a field.
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::Value;

/// Tracks the fields of one struct while its object is being decoded.
///
/// ```ignore
/// let mut tracker = FieldTracker::new("Point", &["x", "y"]);
/// tracker.decode_fields(&object, |index, value| {
///     match index {
///         0 => x = value.int()?,
///         _ => y = value.int()?,
///     }
///     Ok(())
/// })?;
/// tracker.finish(&["x", "y"])?;
/// ```
pub struct FieldTracker<'f> {
    type_name: &'f str,
    fields: &'f [&'f str],
    seen: Vec<bool>,
    allow_unknown_fields: bool,
    unknown_fields: Vec<String>,
}

impl<'f> FieldTracker<'f> {
    pub fn new(type_name: &'f str, fields: &'f [&'f str]) -> Self {
        Self {
            type_name,
            fields,
            seen: vec![false; fields.len()],
            allow_unknown_fields: false,
            unknown_fields: Vec::new(),
        }
    }

    /// When allowed, unknown fields are collected instead of failing the decode.
    pub fn allow_unknown_fields(mut self, allow: bool) -> Self {
        self.allow_unknown_fields = allow;
        self
    }

    /// Record that `field` was found, returning its index in the known field list, or `None` for
    /// an allowed unknown field.
    pub fn visit(&mut self, field: &str) -> Result<Option<usize>> {
        let Some(index) = self.fields.iter().position(|known| *known == field) else {
            if !self.allow_unknown_fields {
                return Err(Error::UnmarshalUnknownFields {
                    type_name: self.type_name.to_owned(),
                    fields: vec![field.to_owned()],
                });
            }
            self.unknown_fields.push(field.to_owned());
            return Ok(None);
        };
        if std::mem::replace(&mut self.seen[index], true) {
            return Err(Error::UnmarshalDuplicateField {
                type_name: self.type_name.to_owned(),
                field: field.to_owned(),
            });
        }
        Ok(Some(index))
    }

    pub fn is_set(&self, field: &str) -> bool {
        self.fields
            .iter()
            .position(|known| *known == field)
            .is_some_and(|index| self.seen[index])
    }

    /// Visit every member of `object`, calling `f` with the index and value of each known field.
    /// Errors returned by `f` are attributed to the field being decoded.
    pub fn decode_fields<'a, F>(&mut self, object: &Value<'a>, mut f: F) -> Result<()>
    where
        F: FnMut(usize, Value<'a>) -> Result<()>,
    {
        object.object_for_each(|key, value| match self.visit(&key)? {
            Some(index) => f(index, value).map_err(|error| error.in_field(self.type_name, key)),
            None => Ok(()),
        })
    }

    /// Check that every one of the `required` fields was visited, listing all that weren't.
    pub fn finish(&self, required: &[&str]) -> Result<()> {
        let missing = required
            .iter()
            .filter(|field| !self.is_set(field))
            .map(|field| field.to_string())
            .collect::<Vec<_>>();
        if missing.is_empty() {
            return Ok(());
        }
        Err(Error::UnmarshalMissingFields {
            type_name: self.type_name.to_owned(),
            fields: missing,
        })
    }

    /// The unknown fields collected so far, in source order.
    pub fn unknown_fields(&self) -> &[String] {
        &self.unknown_fields
    }

    /// Fail with every collected unknown field, for callers that allow them during the decode but
    /// still want to report them afterwards.
    pub fn reject_unknown_fields(&self) -> Result<()> {
        if self.unknown_fields.is_empty() {
            return Ok(());
        }
        Err(Error::UnmarshalUnknownFields {
            type_name: self.type_name.to_owned(),
            fields: self.unknown_fields.clone(),
        })
    }
}

/// Decode `object` into a map, decoding each member's value with `decode`. Unlike `Value::value`,
/// a key that appears more than once is an error.
pub fn decode_map<'a, V, F>(
    type_name: &str,
    object: &Value<'a>,
    mut decode: F,
) -> Result<FxHashMap<String, V>>
where
    F: FnMut(Value<'a>) -> Result<V>,
{
    let mut map = FxHashMap::default();
    object.object_for_each(|key, value| {
        let decoded = decode(value).map_err(|error| error.in_field(type_name, key.as_ref()))?;
        if map.insert(key.into_owned(), decoded).is_some() {
            return Err(Error::UnmarshalDuplicateMapKey {
                type_name: type_name.to_owned(),
            });
        }
        Ok(())
    })?;
    Ok(map)
}
