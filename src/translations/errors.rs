//! Hard failures for the translation table parser.
//!
//! Almost everything that can go wrong inside a table is a soft issue (see
//! [`ErrorKind`](crate::translations::ErrorKind)) that gets reported and then
//! preserved verbatim. The variants here are the few conditions where no
//! sensible result can be produced at all:
//! - `UnparsableHeader` - the first line of a block is not a top marker
//!    template, so the table has no identity.
//! - `EmptyTable` - no lines were handed in.
//! - `InvalidLanguageData` - language reference data could not be loaded.
//! - `Io` - wrapper for underlying I/O errors raised by the binary helpers.

use std::error::Error;
use std::fmt;

/// The canonical result type used across the translations module.
pub type Result<T> = std::result::Result<T, T9nError>;

#[derive(Debug)]
pub enum T9nError {
    UnparsableHeader {
        line: String,
    },
    EmptyTable,
    InvalidLanguageData {
        msg: String,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
    Io {
        msg: String,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
}

impl T9nError {
    /// Construct an unparsable-header error for `line`.
    pub fn header<S: Into<String>>(line: S) -> Self {
        T9nError::UnparsableHeader { line: line.into() }
    }

    /// Construct a language-data error without an underlying cause.
    pub fn language_data<S: Into<String>>(msg: S) -> Self {
        T9nError::InvalidLanguageData {
            msg: msg.into(),
            source: None,
        }
    }

    /// Wrap a std::io::Error or other error as an Io variant.
    pub fn io_err<E: Error + Send + Sync + 'static>(msg: impl Into<String>, e: E) -> Self {
        T9nError::Io {
            msg: msg.into(),
            source: Some(Box::new(e)),
        }
    }

    /// Returns a short description of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            T9nError::UnparsableHeader { .. } => "UnparsableHeader",
            T9nError::EmptyTable => "EmptyTable",
            T9nError::InvalidLanguageData { .. } => "InvalidLanguageData",
            T9nError::Io { .. } => "Io",
        }
    }
}

impl fmt::Display for T9nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            T9nError::UnparsableHeader { line } => write!(f, "cannot parse header: {:?}", line),
            T9nError::EmptyTable => write!(f, "table has no lines"),
            T9nError::InvalidLanguageData { msg, source } => {
                if let Some(s) = source {
                    write!(f, "invalid language data: {} (cause: {})", msg, s)
                } else {
                    write!(f, "invalid language data: {}", msg)
                }
            }
            T9nError::Io { msg, source } => {
                if let Some(s) = source {
                    write!(f, "IO error: {} (cause: {})", msg, s)
                } else {
                    write!(f, "IO error: {}", msg)
                }
            }
        }
    }
}

impl Error for T9nError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            T9nError::InvalidLanguageData { source, .. } | T9nError::Io { source, .. } => {
                source.as_ref().map(|b| b.as_ref() as &dyn Error)
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for T9nError {
    fn from(e: std::io::Error) -> Self {
        T9nError::io_err("I/O error", e)
    }
}

impl From<serde_json::Error> for T9nError {
    fn from(e: serde_json::Error) -> Self {
        T9nError::InvalidLanguageData {
            msg: "malformed JSON".to_string(),
            source: Some(Box::new(e)),
        }
    }
}
