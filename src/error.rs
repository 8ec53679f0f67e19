use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The frame cannot enter the pipeline (zero width or height).
    InvalidInput(String),
    /// A raw buffer does not match the declared dimensions.
    SizeMismatch { expected: usize, actual: usize },
    /// A parameter set violates a pipeline invariant.
    InvalidParams(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(reason) => write!(f, "invalid input frame: {reason}"),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::InvalidParams(reason) => write!(f, "invalid parameters: {reason}"),
        }
    }
}

impl std::error::Error for Error {}
