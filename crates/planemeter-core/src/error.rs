/// An error type for the measurement core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlanemeterError {
    /// Camera or measurement configuration is unusable, e.g. a non-positive focal length.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A per-request value is missing, malformed or not a finite number.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The arithmetic produced a non-finite value.
    #[error("Calculation failure: {0}")]
    CalculationFailure(String),
}

impl PlanemeterError {
    /// Short stable category name of the error, suitable for wire formats.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanemeterError::InvalidConfiguration(_) => "invalid_configuration",
            PlanemeterError::InvalidInput(_) => "invalid_input",
            PlanemeterError::CalculationFailure(_) => "calculation_failure",
        }
    }

    /// The detail message without the category prefix.
    pub fn details(&self) -> &str {
        match self {
            PlanemeterError::InvalidConfiguration(msg)
            | PlanemeterError::InvalidInput(msg)
            | PlanemeterError::CalculationFailure(msg) => msg,
        }
    }
}

/// Result type for the measurement core.
pub type Result<T> = std::result::Result<T, PlanemeterError>;
