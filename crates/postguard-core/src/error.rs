//! Error types for PostGuard

/// Result type alias using PostGuard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for PostGuard operations
///
/// A rule that cannot interpret a model's output is not an error: it degrades
/// to "not flagged" and is recorded on the outcome instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing credential or invalid descriptor configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Model endpoint answered with something other than a JSON document
    #[error("model endpoint returned non-JSON response: {0}")]
    MalformedUpstreamResponse(String),

    /// Model endpoint reported its own error in the response body
    #[error("model failed: {0}")]
    UpstreamModel(String),

    /// Connection, DNS or body read failure talking to a model endpoint
    #[error("transport error: {0}")]
    Transport(String),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// A model call failed, so no verdict could be reached
    #[error("{model}: {source}")]
    ModerationUnavailable {
        model: String,
        #[source]
        source: Box<Error>,
    },

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new malformed-response error carrying the raw body
    pub fn malformed(body: impl Into<String>) -> Self {
        Self::MalformedUpstreamResponse(body.into())
    }

    /// Create a new upstream model error
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamModel(msg.into())
    }

    /// Create a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Attribute a failure to the model that produced it
    pub fn unavailable(model: impl Into<String>, source: Error) -> Self {
        Self::ModerationUnavailable {
            model: model.into(),
            source: Box::new(source),
        }
    }

    /// Whether this is a configuration failure rather than a model failure
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_names_model_and_cause() {
        let err = Error::unavailable("toxicity", Error::upstream("Model is loading"));
        assert_eq!(err.to_string(), "toxicity: model failed: Model is loading");
        assert!(!err.is_config());
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("Missing credential");
        assert!(err.is_config());
        assert_eq!(err.to_string(), "configuration error: Missing credential");
    }
}
