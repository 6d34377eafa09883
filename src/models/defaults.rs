//! Default values and well-known names used when seeding a request.

/// Stage name given to every new request context
pub const DEFAULT_STAGE: &str = "test";

/// Protocol reported by the gateway
pub const DEFAULT_PROTOCOL: &str = "HTTP/1.1";

/// Caller address for requests that never left the machine
pub const DEFAULT_SOURCE_IP: &str = "127.0.0.1";

pub const CONTENT_TYPE: &str = "Content-Type";
pub const COOKIE: &str = "Cookie";
pub const HOST: &str = "Host";

/// Header CloudFront uses to report the scheme the client connected with
pub const FORWARDED_PROTO: &str = "CloudFront-Forwarded-Proto";

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Gateway `requestTime` format, e.g. `09/Apr/2015:12:34:56 +0000`
pub const REQUEST_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

pub(crate) fn default_stage() -> String {
    DEFAULT_STAGE.to_string()
}

pub(crate) fn default_protocol() -> String {
    DEFAULT_PROTOCOL.to_string()
}
