//! Error types for bibfront-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bibfront operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bibfront operations
#[derive(Error, Debug)]
pub enum Error {
    /// An entry lacks a field that an output rule requires
    #[error("Entry `{id}` is missing required field `{field}`")]
    MissingField { id: String, field: &'static str },

    /// The BibTeX source could not be parsed at all
    #[error("Malformed BibTeX source {}: {message}", .path.display())]
    MalformedSource { path: PathBuf, message: String },

    /// Reading a source or writing an output failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a frontmatter block failed
    #[error("Failed to render frontmatter: {0}")]
    Render(String),

    /// A settings file could not be read or decoded
    #[error("Invalid settings in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Render(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Render(err.to_string())
    }
}
