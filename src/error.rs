// Pose Coach 🚀 MIT License

//! Error types for the pose pipeline.

use std::fmt;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PoseError>;

/// Main error type for the pose pipeline.
#[derive(Debug)]
pub enum PoseError {
    /// Invalid configuration provided.
    ConfigError(String),
    /// Malformed fixed topology tables (checked once at startup).
    TopologyError(String),
    /// Input tensor shape does not match the expected layout.
    ShapeError(String),
    /// Error loading or parsing a reference recording.
    RecordingError(String),
    /// IO error (file not found, permission denied, etc.).
    IoError(String),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::TopologyError(msg) => write!(f, "Topology error: {msg}"),
            Self::ShapeError(msg) => write!(f, "Shape error: {msg}"),
            Self::RecordingError(msg) => write!(f, "Recording error: {msg}"),
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for PoseError {}

impl From<serde_json::Error> for PoseError {
    fn from(err: serde_json::Error) -> Self {
        Self::RecordingError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PoseError::ShapeError("expected 19 channels, got 18".to_string());
        assert_eq!(err.to_string(), "Shape error: expected 19 channels, got 18");

        let err = PoseError::ConfigError("kernel size must be odd".to_string());
        assert!(err.to_string().starts_with("Config error"));
    }

    #[test]
    fn test_io_error_display() {
        let err = PoseError::IoError("cannot read moves.json: not found".to_string());
        assert_eq!(err.to_string(), "IO error: cannot read moves.json: not found");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PoseError = json_err.into();
        assert!(matches!(err, PoseError::RecordingError(_)));
    }
}
