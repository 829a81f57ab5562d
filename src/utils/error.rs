use std::fmt;
use std::io;

/// Common result type for pagenav operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for pagenav operations
#[derive(Debug)]
pub enum Error {
    /// IO error wrapper
    Io(io::Error),
    /// Malformed markup input
    Markup(String),
    /// Configuration error
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Markup(msg) => write!(f, "Markup error: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
