use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotasError {
    /// The path escapes the corpus root, has the wrong extension, or does not
    /// resolve to the expected kind of entry.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Malformed header in block {block}: {message}")]
    MalformedHeader { block: usize, message: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unparseable timestamp {value:?} in {path}")]
    TimestampParse { path: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NotasError {
    /// Wraps an io error with the corpus-relative path it happened at.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        NotasError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the underlying cause is a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NotasError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, NotasError>;
