use std::fmt;

/// Result type for pendulum-q operations
pub type Result<T> = std::result::Result<T, PendulumError>;

/// Main error type for the service, the agent and the simulator client
#[derive(Debug, Clone)]
pub enum PendulumError {
    /// Wrong number of values or wrong array width
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// A submitted value could not be parsed
    InvalidValue {
        field: String,
        value: String,
    },

    /// Invalid configuration parameter
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// IO errors (model file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),

    /// Numerical computation errors
    NumericalError(String),

    /// Empty buffer or container
    EmptyBuffer(String),

    /// Action index outside the network's output range
    InvalidAction {
        action: String,
        max_actions: usize,
    },

    /// Training error
    TrainingError(String),

    /// Failure talking to a remote service
    HttpError(String),
}

impl fmt::Display for PendulumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendulumError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            PendulumError::InvalidValue { field, value } => {
                write!(f, "Invalid value for '{}': {:?}", field, value)
            }
            PendulumError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            PendulumError::IoError(msg) => write!(f, "IO error: {}", msg),
            PendulumError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            PendulumError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            PendulumError::EmptyBuffer(msg) => write!(f, "Empty buffer: {}", msg),
            PendulumError::InvalidAction { action, max_actions } => {
                write!(f, "Invalid action {}: must be in 0..{}", action, max_actions)
            }
            PendulumError::TrainingError(msg) => write!(f, "Training error: {}", msg),
            PendulumError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for PendulumError {}

impl From<std::io::Error> for PendulumError {
    fn from(err: std::io::Error) -> Self {
        PendulumError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PendulumError {
    fn from(err: bincode::Error) -> Self {
        PendulumError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for PendulumError {
    fn from(err: serde_json::Error) -> Self {
        PendulumError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for PendulumError {
    fn from(err: reqwest::Error) -> Self {
        PendulumError::HttpError(err.to_string())
    }
}

// Helper functions for common error patterns
impl PendulumError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        PendulumError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_value<S: Into<String>>(field: S, value: S) -> Self {
        PendulumError::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        PendulumError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PendulumError::DimensionMismatch { .. }
                | PendulumError::InvalidValue { .. }
                | PendulumError::InvalidAction { .. }
                | PendulumError::InvalidParameter { .. }
        )
    }
}
