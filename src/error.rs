//! Error types for the forecasting core.
//!
//! Every core operation fails synchronously with one of these kinds; nothing
//! is retried inside the pipeline. Callers that want a retry must re-invoke
//! the whole failed operation; no partial state survives a failure.

/// Errors surfaced by the transform / sample / predict / persistence core.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    /// A required field is missing or cannot be parsed.
    #[error("malformed input: field '{field}' has unparseable value '{value}'")]
    MalformedInput { field: String, value: String },

    /// A caller-supplied size or count is out of its valid range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The underlying model call failed (or broke its contract).
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// Model persistence (save/load) failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl PipelineError {
    pub fn malformed(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedInput {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the core modules.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_names_field_and_value() {
        let err = PipelineError::malformed("Date", "not-a-date");
        let msg = err.to_string();
        assert!(msg.contains("Date"));
        assert!(msg.contains("not-a-date"));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = PipelineError::invalid("chunk_size", "must be >= 1");
        assert!(err.to_string().contains("chunk_size"));
        assert!(err.to_string().contains("must be >= 1"));
    }
}
