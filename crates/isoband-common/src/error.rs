//! Error types for grid construction and configuration.

use thiserror::Error;

/// Shape violations detected while building a [`crate::Grid`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },

    #[error("{array} has {actual} entries, expected {expected} ({width}x{height})")]
    LengthMismatch {
        array: &'static str,
        expected: usize,
        actual: usize,
        width: usize,
        height: usize,
    },
}

impl GridError {
    /// Create a LengthMismatch error for the named array.
    pub fn length_mismatch(array: &'static str, actual: usize, width: usize, height: usize) -> Self {
        Self::LengthMismatch {
            array,
            expected: width * height,
            actual,
            width,
            height,
        }
    }
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{param}': {message}")]
    InvalidValue { param: String, message: String },

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Create an InvalidValue error.
    pub fn invalid(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            param: param.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_display() {
        let err = GridError::length_mismatch("values", 7, 3, 3);
        let display = err.to_string();
        assert!(display.contains("values"));
        assert!(display.contains("expected 9"));
        assert!(display.contains("3x3"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("step", "must be > 0");
        assert_eq!(err.to_string(), "invalid value for 'step': must be > 0");
    }
}
