//! Fluent builder for API Gateway proxy request fixtures.
//!
//! The builder owns one [`AwsProxyRequest`] and every configuration call edits
//! it in place and hands the builder back, so calls chain:
//!
//! ```
//! use apigw_fixtures::builder::AwsProxyRequestBuilder;
//!
//! let mut builder = AwsProxyRequestBuilder::with_path_and_method("/orders", "POST");
//! builder
//!     .json()
//!     .header("X-Request-Source", "tests")
//!     .query_string("dryRun", "true")
//!     .body(r#"{"item":"book"}"#);
//!
//! let request = builder.build();
//! assert_eq!(request.header("content-type"), Some("application/json"));
//! ```

use lambda_runtime::tracing::debug;
use lambda_runtime::{Context, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::codec::{Codec, JsonCodec};
use crate::models::defaults::{
    APPLICATION_FORM_URLENCODED, APPLICATION_JSON, CONTENT_TYPE, COOKIE, FORWARDED_PROTO, HOST,
};
use crate::models::{AwsProxyRequest, Claims, CognitoAuthenticationType, FixtureError};
use crate::utils::{format_request_time, mime_encode};

/// Builds an [`AwsProxyRequest`] one facet at a time.
///
/// [`build`](Self::build) lends out the request the builder owns rather than a
/// copy, so later calls change what the caller observes on the next borrow.
#[derive(Debug, Clone)]
pub struct AwsProxyRequestBuilder<C = JsonCodec> {
    request: AwsProxyRequest,
    codec: C,
}

impl AwsProxyRequestBuilder<JsonCodec> {
    /// Request with no path or method and all defaults filled in.
    #[must_use]
    pub fn new() -> Self {
        Self::with_codec(JsonCodec)
    }

    #[must_use]
    pub fn with_path(path: impl Into<String>) -> Self {
        let mut builder = Self::new();
        builder.path(path);
        builder
    }

    #[must_use]
    pub fn with_path_and_method(path: impl Into<String>, method: impl Into<String>) -> Self {
        let mut builder = Self::with_path(path);
        builder.method(method);
        builder
    }
}

impl Default for AwsProxyRequestBuilder<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> AwsProxyRequestBuilder<C> {
    /// Builder that encodes and decodes through `codec`.
    #[must_use]
    pub fn with_codec(codec: C) -> Self {
        Self {
            request: AwsProxyRequest::new(),
            codec,
        }
    }

    pub fn stage(&mut self, stage: impl Into<String>) -> &mut Self {
        self.request.request_context.stage = stage.into();
        self
    }

    pub fn method(&mut self, method: impl Into<String>) -> &mut Self {
        self.request.http_method = Some(method.into());
        self
    }

    pub fn path(&mut self, path: impl Into<String>) -> &mut Self {
        self.request.path = Some(path.into());
        self
    }

    /// Adds `Content-Type: application/json`, keeping earlier content types.
    pub fn json(&mut self) -> &mut Self {
        self.header(CONTENT_TYPE, APPLICATION_JSON)
    }

    /// Adds a url-encoded form field to the body.
    ///
    /// Fields are joined with `&` and appended to whatever body text is
    /// already there. Keys and values are written as given, not encoded.
    pub fn form(&mut self, key: &str, value: &str) -> &mut Self {
        self.request
            .multi_value_headers
            .add(CONTENT_TYPE, APPLICATION_FORM_URLENCODED);

        let field = format!("{key}={value}");
        match &mut self.request.body {
            Some(body) if !body.is_empty() => {
                body.push('&');
                body.push_str(&field);
            }
            body => *body = Some(field),
        }
        self
    }

    /// Appends a header value. Existing values for the same name are kept.
    pub fn header(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.request.multi_value_headers.add(key, value);
        self
    }

    /// Appends a query string parameter value.
    pub fn query_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.request
            .multi_value_query_string_parameters
            .add(key, value);
        self
    }

    pub fn body(&mut self, body: impl Into<String>) -> &mut Self {
        self.request.body = Some(body.into());
        self
    }

    pub fn null_body(&mut self) -> &mut Self {
        self.request.body = None;
        self
    }

    /// Serializes `body` as JSON and uses it as the request body.
    ///
    /// Only the first `Content-Type` value is checked, and it must be exactly
    /// `application/json`; call [`json`](Self::json) first.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::UnsupportedOperation` if the content type is not
    /// JSON or if `body` cannot be serialized.
    pub fn json_body<T: Serialize + ?Sized>(&mut self, body: &T) -> Result<&mut Self, FixtureError> {
        if self.request.multi_value_headers.first(CONTENT_TYPE) != Some(APPLICATION_JSON) {
            return Err(FixtureError::UnsupportedOperation(
                "Unsupported content type in request".to_string(),
            ));
        }

        let value = serde_json::to_value(body).map_err(|e| not_serializable(&e))?;
        let encoded = self
            .codec
            .encode_value(&value)
            .map_err(|e| not_serializable(&e))?;
        Ok(self.body(encoded))
    }

    /// Reads `reader` to the end and stores it as a MIME base64 body.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Io` if reading fails; the request is left as it
    /// was.
    pub fn binary_body<R: Read>(&mut self, mut reader: R) -> Result<&mut Self, FixtureError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        self.request.is_base64_encoded = true;
        Ok(self.body(mime_encode(&bytes)))
    }

    /// Sets the authorizer principal and uses it as the claims subject.
    pub fn authorizer_principal(&mut self, principal: impl Into<String>) -> &mut Self {
        let principal = principal.into();
        let authorizer = self.request.request_context.authorizer_mut();
        authorizer
            .claims
            .get_or_insert_with(Claims::default)
            .subject = Some(principal.clone());
        authorizer.principal_id = Some(principal);
        self
    }

    /// Sets a value in the authorizer context. `principalId` sets the
    /// principal itself.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::UnsupportedOperation` for the key `claims`; the
    /// request is left as it was.
    pub fn authorizer_context_value(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, FixtureError> {
        let context = &mut self.request.request_context;
        let mut authorizer = context.authorizer.clone().unwrap_or_default();
        authorizer.set_context_value(key, value)?;
        context.authorizer = Some(authorizer);
        Ok(self)
    }

    /// Marks the caller as a Cognito user pool user.
    ///
    /// Any claims set earlier are dropped; the new claims hold only the
    /// subject.
    pub fn cognito_user_pool(&mut self, identity_id: impl Into<String>) -> &mut Self {
        let identity_id = identity_id.into();
        let context = &mut self.request.request_context;
        context.identity.cognito_authentication_type = Some(CognitoAuthenticationType::Pool);
        context.identity.cognito_identity_id = Some(identity_id.clone());
        context.authorizer_mut().claims = Some(Claims::with_subject(identity_id));
        self
    }

    /// Sets a named claim on the authorizer claims.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::MissingPrerequisite` unless
    /// [`cognito_user_pool`](Self::cognito_user_pool) or
    /// [`authorizer_principal`](Self::authorizer_principal) ran first.
    pub fn claim(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, FixtureError> {
        let claims = self
            .request
            .request_context
            .authorizer
            .as_mut()
            .ok_or_else(|| {
                FixtureError::MissingPrerequisite("request has no authorizer".to_string())
            })?
            .claims
            .as_mut()
            .ok_or_else(|| {
                FixtureError::MissingPrerequisite("authorizer has no claims".to_string())
            })?;
        claims.set_claim(name, value);
        Ok(self)
    }

    /// Marks the caller as authenticated through a Cognito identity pool.
    pub fn cognito_identity(
        &mut self,
        identity_id: impl Into<String>,
        identity_pool_id: impl Into<String>,
    ) -> &mut Self {
        let identity = &mut self.request.request_context.identity;
        identity.cognito_authentication_type = Some(CognitoAuthenticationType::Identity);
        identity.cognito_identity_id = Some(identity_id.into());
        identity.cognito_identity_pool_id = Some(identity_pool_id.into());
        self
    }

    /// Adds a cookie to the single combined `Cookie` header value.
    pub fn cookie(&mut self, name: &str, value: &str) -> &mut Self {
        let cookie = format!("{name}={value}");
        let cookies = match self.request.multi_value_headers.first(COOKIE) {
            Some(existing) if !existing.is_empty() => format!("{existing}; {cookie}"),
            _ => cookie,
        };
        self.request.multi_value_headers.put_single(COOKIE, cookies);
        self
    }

    /// Sets the scheme the client connected with (`http` or `https`).
    pub fn scheme(&mut self, scheme: impl Into<String>) -> &mut Self {
        self.request
            .multi_value_headers
            .put_single(FORWARDED_PROTO, scheme);
        self
    }

    pub fn server_name(&mut self, server_name: impl Into<String>) -> &mut Self {
        self.request.multi_value_headers.put_single(HOST, server_name);
        self
    }

    pub fn user_agent(&mut self, agent: impl Into<String>) -> &mut Self {
        self.request.request_context.identity.user_agent = Some(agent.into());
        self
    }

    pub fn referer(&mut self, referer: impl Into<String>) -> &mut Self {
        self.request.request_context.identity.caller = Some(referer.into());
        self
    }

    pub fn path_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.request
            .path_parameters
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn stage_variable(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.request
            .stage_variables
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Pins the request time, keeping `requestTime` in step.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::UnsupportedOperation` if `epoch_millis` is not a
    /// representable date.
    pub fn request_time_epoch(&mut self, epoch_millis: i64) -> Result<&mut Self, FixtureError> {
        let request_time = format_request_time(epoch_millis).ok_or_else(|| {
            FixtureError::UnsupportedOperation(format!(
                "Request time out of range: {epoch_millis}"
            ))
        })?;

        let context = &mut self.request.request_context;
        context.request_time_epoch = epoch_millis;
        context.request_time = Some(request_time);
        Ok(self)
    }

    /// Replaces the request with one parsed from `json`.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Format` if `json` is not a valid request; the
    /// current request is kept in that case.
    pub fn from_json_string(&mut self, json: &str) -> Result<&mut Self, FixtureError> {
        debug!(json_len = json.len(), "Replacing request from JSON document");
        self.request = self.codec.decode(json)?;
        Ok(self)
    }

    /// Replaces the request with one read from a JSON file.
    ///
    /// The path is used as given.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Io` if the file cannot be read as UTF-8 text and
    /// `FixtureError::Format` if its content is not a valid request.
    pub fn from_json_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, FixtureError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading request fixture");
        let json = fs::read_to_string(path)?;
        self.from_json_string(&json)
    }

    /// Borrows the request being built.
    #[must_use]
    pub const fn build(&self) -> &AwsProxyRequest {
        &self.request
    }

    pub const fn build_mut(&mut self) -> &mut AwsProxyRequest {
        &mut self.request
    }

    #[must_use]
    pub fn into_request(self) -> AwsProxyRequest {
        self.request
    }

    /// The request as UTF-8 JSON, or `None` if it cannot be serialized.
    #[must_use]
    pub fn build_stream(&self) -> Option<Vec<u8>> {
        self.codec
            .encode(&self.request)
            .map(String::into_bytes)
            .inspect_err(|e| debug!(error = %e, "Request serialization failed, no stream produced"))
            .ok()
    }

    /// Wraps the request in a Lambda event, the way the runtime hands it to a
    /// handler. The context carries the gateway request id.
    ///
    /// # Errors
    ///
    /// Returns the codec's error if the request cannot be serialized.
    pub fn build_event(&self) -> Result<LambdaEvent<Value>, FixtureError> {
        let json = self.codec.encode(&self.request)?;
        let payload = serde_json::from_str(&json).map_err(FixtureError::Format)?;

        let mut context = Context::default();
        context.request_id = self.request.request_context.request_id().to_string();
        Ok(LambdaEvent::new(payload, context))
    }
}

fn not_serializable(error: &impl Display) -> FixtureError {
    FixtureError::UnsupportedOperation(format!("Could not serialize object: {error}"))
}
