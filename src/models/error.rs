//! Error type for fixture construction.
//!
//! Every failure the builder can hit is a usage error in the calling test, so
//! errors are returned as they happen and never retried.

use std::fmt;

/// Custom error type for the fixture builder.
#[derive(Debug)]
pub enum FixtureError {
    /// The requested body encoding does not fit the request, e.g. a structured
    /// body without a JSON content type, or an object that cannot be serialized
    UnsupportedOperation(String),
    /// An operation ran before the call that creates the data it edits
    MissingPrerequisite(String),
    /// A JSON document could not be parsed into a request
    Format(serde_json::Error),
    /// The request could not be serialized
    Serialization(serde_json::Error),
    /// Reading a fixture file or a binary body failed
    Io(std::io::Error),
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedOperation(msg) => write!(f, "Unsupported operation: {msg}"),
            Self::MissingPrerequisite(msg) => write!(f, "Missing prerequisite: {msg}"),
            Self::Format(e) => write!(f, "Malformed request JSON: {e}"),
            Self::Serialization(e) => write!(f, "Could not serialize request: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(e) | Self::Serialization(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::UnsupportedOperation(_) | Self::MissingPrerequisite(_) => None,
        }
    }
}

impl From<std::io::Error> for FixtureError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_messages() {
        let err = FixtureError::UnsupportedOperation("Unsupported content type in request".into());
        assert_eq!(
            err.to_string(),
            "Unsupported operation: Unsupported content type in request"
        );

        let err = FixtureError::MissingPrerequisite("claims".into());
        assert_eq!(err.to_string(), "Missing prerequisite: claims");
    }

    #[test]
    fn test_source_is_exposed_for_wrapped_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = FixtureError::from(io);
        assert!(matches!(err, FixtureError::Io(_)));
        assert!(err.source().is_some());

        let err = FixtureError::MissingPrerequisite("authorizer".into());
        assert!(err.source().is_none());
    }
}
