use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::{Kind, Value, MAX_NESTING_DEPTH};

/// A fully decoded JSON value, for callers that want a conventional tree rather than lazy access.
#[derive(Clone, Debug, PartialEq)]
pub enum OwnedValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(ObjectMap),
    Array(Vec<OwnedValue>),
}

impl OwnedValue {
    /// Decode `value` and everything nested inside of it.
    pub fn from_value(value: &Value<'_>) -> Result<OwnedValue> {
        materialize(value, 0)
    }

    pub fn kind(&self) -> Kind {
        match self {
            OwnedValue::Null => Kind::Null,
            OwnedValue::Bool(true) => Kind::True,
            OwnedValue::Bool(false) => Kind::False,
            OwnedValue::Number(_) => Kind::Number,
            OwnedValue::String(_) => Kind::String,
            OwnedValue::Object(_) => Kind::Object,
            OwnedValue::Array(_) => Kind::Array,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OwnedValue::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OwnedValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            OwnedValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[OwnedValue]> {
        match self {
            OwnedValue::Array(elements) => Some(elements),
            _ => None,
        }
    }
}

fn materialize(value: &Value<'_>, depth: usize) -> Result<OwnedValue> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::syntax(value.offset, "exceeded max nesting depth"));
    }
    Ok(match value.kind {
        Kind::Null => OwnedValue::Null,
        Kind::False => OwnedValue::Bool(false),
        Kind::True => OwnedValue::Bool(true),
        Kind::Number => OwnedValue::Number(value.number),
        Kind::String => OwnedValue::String(value.string()?.to_owned()),
        Kind::Object => {
            let mut map = ObjectMap::new();
            value.object_for_each(|key, member| {
                map.insert(key.into_owned(), materialize(&member, depth + 1)?);
                Ok(())
            })?;
            OwnedValue::Object(map)
        }
        Kind::Array => {
            let mut elements = Vec::new();
            value.array_for_each(|element| {
                elements.push(materialize(&element, depth + 1)?);
                Ok(())
            })?;
            OwnedValue::Array(elements)
        }
    })
}

/// An insertion-ordered map of object members. Inserting a key that is already present replaces
/// its value in place, so for duplicate keys in a document the last occurrence wins while keeping
/// the position of the first.
#[derive(Clone, Debug, Default)]
pub struct ObjectMap {
    entries: Vec<(String, OwnedValue)>,
    index: FxHashMap<String, usize>,
}

impl ObjectMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`, returning the previous value if the key was already present.
    pub fn insert(&mut self, key: String, value: OwnedValue) -> Option<OwnedValue> {
        if let Some(&existing) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[existing].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&OwnedValue> {
        self.index.get(key).map(|&index| &self.entries[index].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OwnedValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl PartialEq for ObjectMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<(String, OwnedValue)> for ObjectMap {
    fn from_iter<T: IntoIterator<Item = (String, OwnedValue)>>(iter: T) -> Self {
        let mut map = ObjectMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
