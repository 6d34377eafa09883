//! Test fixtures for Lambda handlers behind an API Gateway proxy integration.
//!
//! [`AwsProxyRequestBuilder`] assembles the event a REST API would deliver
//! (method, path, headers, query string, body, request context with identity
//! and authorizer) and turns it into the JSON the handler receives.

pub mod builder;
pub mod codec;
pub mod models;
pub mod utils;

pub use builder::AwsProxyRequestBuilder;
pub use codec::{Codec, JsonCodec};
pub use models::{AwsProxyRequest, FixtureError};
