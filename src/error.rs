use std::fmt;

use crate::estimator::TrainingState;

/// Identifies the numeric safety check that rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowGuard {
    CountExhausted,
    IntegerSumOverflow,
    SumSwamped,
    SumNotFinite,
    AverageNarrowing,
    L2NormSwamped,
    L2NormNotFinite,
}

impl fmt::Display for OverflowGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            OverflowGuard::CountExhausted => "element count exhausted",
            OverflowGuard::IntegerSumOverflow => "integer sum overflowed",
            OverflowGuard::SumSwamped => "sum is too large to absorb the value",
            OverflowGuard::SumNotFinite => "sum is no longer finite",
            OverflowGuard::AverageNarrowing => "average does not fit the output type",
            OverflowGuard::L2NormSwamped => "l2 norm is too large to absorb the value",
            OverflowGuard::L2NormNotFinite => "l2 norm is no longer finite",
        };
        f.write_str(description)
    }
}

/// Coarse classification used by callers that decide how to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    State,
    Validation,
    Arithmetic,
    Lookup,
    Argument,
    Archive,
    Internal,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeaturizerError {
    #[error("'{operation}' is not valid while the estimator is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: TrainingState,
    },

    #[error("'{operation}' is not valid after a failed update")]
    Poisoned { operation: &'static str },

    #[error("training has already finished")]
    AlreadyFinished,

    #[error("a transformer has already been created")]
    TransformerAlreadyCreated,

    #[error("invalid annotation: {0}")]
    InvalidAnnotation(String),

    #[error("invalid transformer parameters: {0}")]
    InvalidParameters(String),

    #[error("overflow: {guard}")]
    Overflow { guard: OverflowGuard },

    #[error("no elements were provided during training")]
    NoElements,

    #[error("no '{name}' annotation for column {column}")]
    AnnotationNotFound { column: usize, name: String },

    #[error("column {column} is out of range for {columns} columns")]
    InvalidColumn { column: usize, columns: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported archive version {major}.{minor}")]
    UnsupportedArchiveVersion { major: u16, minor: u16 },

    #[error("archive error: {0}")]
    Archive(String),

    #[error("internal logic error: {0}")]
    Internal(&'static str),
}

impl FeaturizerError {
    pub fn overflow(guard: OverflowGuard) -> Self {
        FeaturizerError::Overflow { guard }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FeaturizerError::InvalidState { .. }
            | FeaturizerError::Poisoned { .. }
            | FeaturizerError::AlreadyFinished
            | FeaturizerError::TransformerAlreadyCreated => ErrorKind::State,
            FeaturizerError::InvalidAnnotation(_) | FeaturizerError::InvalidParameters(_) => {
                ErrorKind::Validation
            }
            FeaturizerError::Overflow { .. } | FeaturizerError::NoElements => ErrorKind::Arithmetic,
            FeaturizerError::AnnotationNotFound { .. } => ErrorKind::Lookup,
            FeaturizerError::InvalidColumn { .. } | FeaturizerError::InvalidArgument(_) => {
                ErrorKind::Argument
            }
            FeaturizerError::UnsupportedArchiveVersion { .. } | FeaturizerError::Archive(_) => {
                ErrorKind::Archive
            }
            FeaturizerError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<bincode::Error> for FeaturizerError {
    fn from(error: bincode::Error) -> Self {
        FeaturizerError::Archive(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeaturizerError>;
