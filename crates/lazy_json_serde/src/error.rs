use serde::ser;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("IOError: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(lazy_json::Error),
    #[error("{0}")]
    Custom(String),
    #[error("map key must be a string")]
    KeyMustBeAString,
}

impl Error {
    /// Returns the type name of this error
    pub fn name(&self) -> &'static str {
        match self {
            Error::Io(_) => "IoError",
            Error::Json(error) => error.name(),
            Error::Custom(_) => "CustomError",
            Error::KeyMustBeAString => "KeyMustBeAStringError",
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

impl From<lazy_json::Error> for Error {
    fn from(value: lazy_json::Error) -> Self {
        // Sink failures surface as plain IO errors rather than nested inside a JSON error.
        match value {
            lazy_json::Error::Io(error) => Error::Io(error),
            other => Error::Json(other),
        }
    }
}

impl ser::Error for Error {
    #[cold]
    fn custom<T: std::fmt::Display>(msg: T) -> Error {
        Error::Custom(msg.to_string())
    }
}
