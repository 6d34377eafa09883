//! JSON encoding and decoding of proxy requests.
//!
//! The builder only depends on the [`Codec`] trait; [`JsonCodec`] is the
//! `serde_json` implementation used by default.

use serde_json::Value;

use crate::models::{AwsProxyRequest, FixtureError};

/// Converts requests to and from JSON text.
#[cfg_attr(test, mockall::automock)]
pub trait Codec {
    /// Serializes a request.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Serialization` if the request cannot be encoded.
    fn encode(&self, request: &AwsProxyRequest) -> Result<String, FixtureError>;

    /// Serializes an arbitrary JSON value, used for structured bodies.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Serialization` if the value cannot be encoded.
    fn encode_value(&self, value: &Value) -> Result<String, FixtureError>;

    /// Parses a request.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Format` if `json` is not a valid request document.
    fn decode(&self, json: &str) -> Result<AwsProxyRequest, FixtureError>;
}

/// Compact JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, request: &AwsProxyRequest) -> Result<String, FixtureError> {
        serde_json::to_string(request).map_err(FixtureError::Serialization)
    }

    fn encode_value(&self, value: &Value) -> Result<String, FixtureError> {
        serde_json::to_string(value).map_err(FixtureError::Serialization)
    }

    fn decode(&self, json: &str) -> Result<AwsProxyRequest, FixtureError> {
        serde_json::from_str(json).map_err(FixtureError::Format)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip() {
        let mut request = AwsProxyRequest::new();
        request.path = Some("/orders".into());
        request.multi_value_headers.add("Accept", "application/json");

        let json = JsonCodec.encode(&request).unwrap();
        let decoded = JsonCodec.decode(&json).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_decode_malformed_is_format_error() {
        let result = JsonCodec.decode("{\"path\": ");
        assert!(matches!(result, Err(FixtureError::Format(_))));

        let result = JsonCodec.decode("[1, 2, 3]");
        assert!(matches!(result, Err(FixtureError::Format(_))));
    }

    #[test]
    fn test_encode_value() {
        let encoded = JsonCodec.encode_value(&json!({"id": 7})).unwrap();
        assert_eq!(encoded, r#"{"id":7}"#);
    }
}
