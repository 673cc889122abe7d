//! Serialize any `serde::Serialize` type as standard JSON through the `lazy_json` writer.
//!
//! Output is the same compact JSON the writer primitives produce by hand: strings use the writer's
//! escaping, byte buffers are written as base64 strings, and non-finite floats are written as the
//! strings `"NaN"`, `"Infinity"` and `"-Infinity"`, so everything written here can be read back
//! with `lazy_json::parse`.
mod error;
mod map_key;
mod serializer;

pub use error::{Error, Result};
pub use serializer::{to_string, to_vec, to_writer, Serializer};
