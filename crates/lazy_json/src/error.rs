use thiserror::Error as ThisError;

use crate::Kind;

type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Malformed JSON text. `index` is the byte offset where the problem was detected.
    #[error("syntax error at index {index}: {message}")]
    Syntax { index: usize, message: &'static str },
    /// A typed accessor was used on a value of a different kind. `want` names what the accessor
    /// decodes, e.g. `"bool"` or `"integer"`.
    #[error("type mismatch at index {index}: expected {want}, found {got}")]
    TypeMismatch {
        index: usize,
        want: &'static str,
        got: Kind,
    },
    /// Syntactically valid JSON that could not be decoded into the requested type.
    #[error("invalid value at index {index}: {message}: {cause}")]
    InvalidValue {
        index: usize,
        message: &'static str,
        #[source]
        cause: BoxedCause,
    },

    // Struct-level errors, composed by generated decoders.
    #[error("failed to unmarshal field {field} of {type_name}: {cause}")]
    UnmarshalField {
        type_name: String,
        field: String,
        #[source]
        cause: Box<Error>,
    },
    #[error("missing required fields of {type_name}: {}", .fields.join(", "))]
    UnmarshalMissingFields {
        type_name: String,
        fields: Vec<String>,
    },
    #[error("unknown fields of {type_name}: {}", .fields.join(", "))]
    UnmarshalUnknownFields {
        type_name: String,
        fields: Vec<String>,
    },
    #[error("field {field} of {type_name} was set more than once")]
    UnmarshalDuplicateField { type_name: String, field: String },
    #[error("map {type_name} contains a duplicate key")]
    UnmarshalDuplicateMapKey { type_name: String },

    #[error("IOError: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    #[cold]
    pub(crate) fn syntax(index: usize, message: &'static str) -> Self {
        Error::Syntax { index, message }
    }

    #[cold]
    pub(crate) fn type_mismatch(index: usize, want: &'static str, got: Kind) -> Self {
        Error::TypeMismatch { index, want, got }
    }

    #[cold]
    pub(crate) fn invalid_value<E>(index: usize, message: &'static str, cause: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        Error::InvalidValue {
            index,
            message,
            cause: cause.into(),
        }
    }

    /// Wrap this error as the cause of a failure to decode `field` of `type_name`.
    pub fn in_field(self, type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Error::UnmarshalField {
            type_name: type_name.into(),
            field: field.into(),
            cause: Box::new(self),
        }
    }

    /// Returns the type name of this error
    pub fn name(&self) -> &'static str {
        match self {
            Error::Syntax { .. } => "SyntaxError",
            Error::TypeMismatch { .. } => "TypeMismatchError",
            Error::InvalidValue { .. } => "InvalidValueError",
            Error::UnmarshalField { .. } => "UnmarshalFieldError",
            Error::UnmarshalMissingFields { .. } => "UnmarshalMissingFieldsError",
            Error::UnmarshalUnknownFields { .. } => "UnmarshalUnknownFieldsError",
            Error::UnmarshalDuplicateField { .. } => "UnmarshalDuplicateFieldError",
            Error::UnmarshalDuplicateMapKey { .. } => "UnmarshalDuplicateMapKeyError",
            Error::Io(_) => "IoError",
        }
    }

    /// Returns the byte index into the source buffer this error applies to, if relevant.
    /// Field errors report the index of their innermost cause.
    pub fn index(&self) -> Option<usize> {
        match self {
            Error::Syntax { index, .. }
            | Error::TypeMismatch { index, .. }
            | Error::InvalidValue { index, .. } => Some(*index),
            Error::UnmarshalField { cause, .. } => cause.index(),
            _ => None,
        }
    }

    /// Returns the static message of a syntax or invalid value error.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Error::Syntax { message, .. } | Error::InvalidValue { message, .. } => Some(*message),
            _ => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
