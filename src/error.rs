use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, MlError>;

/// The crate's error type.
#[derive(Debug)]
pub enum MlError {
    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// A shape invariant was violated (e.g. mismatched lengths).
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "dense input", "label").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },

    /// Saving or loading model parameters failed at the filesystem level.
    Io(io::Error),

    /// A parameter file exists but could not be parsed.
    MalformedModel(&'static str),
}

impl Display for MlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            MlError::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            MlError::Io(err) => write!(f, "io error: {err}"),
            MlError::MalformedModel(msg) => write!(f, "malformed model file: {msg}"),
        }
    }
}

impl Error for MlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MlError {
    fn from(err: io::Error) -> Self {
        MlError::Io(err)
    }
}
