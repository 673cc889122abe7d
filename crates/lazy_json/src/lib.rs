//! A lazy, low-allocation JSON engine for generated (de)serialization code.
//!
//! `parse` validates a buffer and returns a `Value` for the outermost JSON value. Scalars are
//! decoded immediately, while objects and arrays are only delimited: their contents are decoded on
//! demand through the cursor functions in `iter`, one member at a time. The `writer` module is the
//! other half, a set of primitives that emit JSON directly into a `Vec<u8>` or any `io::Write`.
mod error;
mod owned;
mod parser;
mod string;
mod util;
mod validator;
mod value;

pub mod decode;
pub mod iter;
pub mod writer;

pub use error::{Error, Result};
pub use owned::{ObjectMap, OwnedValue};
pub use parser::{parse, parse_unvalidated, Kind, Value};
pub use string::{
    escape_for_output, escape_string_into, quoted_string_length, unescape,
    write_escaped_str_contents,
};
pub use validator::valid;

/// Objects and arrays nested deeper than this are rejected, by both the validator and eager
/// materialization, so that hostile input can't exhaust the stack.
pub const MAX_NESTING_DEPTH: usize = 512;
