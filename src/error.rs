use thiserror::Error;

/// Classifies automaton construction failures for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionErrorKind {
    /// No (pattern, replacement) pairs were supplied
    EmptyPatternSet,
    /// A pattern of length zero was supplied
    EmptyPattern,
    /// A pattern contains a byte outside the supported ASCII range
    NonAsciiPattern,
    /// The state counter would overflow its numeric domain
    StateSpaceExhausted,
    /// A replacement offset would overflow its numeric domain
    OffsetSpaceExhausted,
    /// A reused transition key carried a different input byte (determinism violation)
    KeyCollision,
}

/// Substitution engine error types
#[derive(Error, Debug)]
pub enum SubstError {
    #[error("Construction error: {message}")]
    Construction {
        kind: ConstructionErrorKind,
        message: String,
    },

    #[error("Parse error at line {line}: {message}")]
    ParseErrorAtLine { line: usize, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid automaton file: {0}")]
    InvalidFormat(String),

    /// The persisted copy did not read back identical to what was written.
    /// The in-memory automaton is still trustworthy; only the file is suspect.
    #[error("Verification failed: persisted automaton differs from the in-memory copy")]
    VerificationFailed,

    #[error("Invalid replacement offset: {0}")]
    InvalidOffset(i16),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SubstError {
    pub(crate) fn construction(kind: ConstructionErrorKind, message: impl Into<String>) -> Self {
        SubstError::Construction {
            kind,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SubstError>;
