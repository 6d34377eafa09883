//! Small helpers shared by the models and the builder.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::DateTime;

use crate::models::defaults::REQUEST_TIME_FORMAT;

/// Input bytes per MIME line: 57 bytes encode to exactly 76 characters.
const MIME_CHUNK_BYTES: usize = 57;
const MIME_LINE_SEPARATOR: &str = "\r\n";

/// Generates a new random request id.
#[must_use]
pub fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Formats epoch milliseconds the way the gateway fills `requestTime`.
///
/// # Returns
///
/// `None` if the timestamp is outside the range chrono can represent.
#[must_use]
pub fn format_request_time(epoch_millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(epoch_millis)
        .map(|time| time.format(REQUEST_TIME_FORMAT).to_string())
}

/// MIME base64 (RFC 2045): standard alphabet with padding, lines of at most
/// 76 characters separated by CRLF, no trailing separator.
#[must_use]
pub fn mime_encode(bytes: &[u8]) -> String {
    bytes
        .chunks(MIME_CHUNK_BYTES)
        .map(|chunk| STANDARD.encode(chunk))
        .collect::<Vec<_>>()
        .join(MIME_LINE_SEPARATOR)
}
