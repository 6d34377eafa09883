//! API Gateway proxy request event, as delivered to a Lambda handler.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::context::RequestContext;
use super::multi_valued::{Headers, QueryParameters};

/// One inbound proxy integration event (REST API, payload format 1.0).
///
/// Only the multi-value header and query containers are modelled; the gateway
/// derives the single-value views from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwsProxyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub multi_value_headers: Headers,
    #[serde(default)]
    pub multi_value_query_string_parameters: QueryParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_parameters: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_variables: Option<BTreeMap<String, String>>,
    #[serde(default = "RequestContext::new")]
    pub request_context: RequestContext,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl AwsProxyRequest {
    /// Empty request with a fresh [`RequestContext`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            resource: None,
            path: None,
            http_method: None,
            multi_value_headers: Headers::new(),
            multi_value_query_string_parameters: QueryParameters::new(),
            path_parameters: None,
            stage_variables: None,
            request_context: RequestContext::new(),
            body: None,
            is_base64_encoded: false,
        }
    }

    /// First value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.multi_value_headers.first(name)
    }

    /// First value of a query string parameter.
    #[must_use]
    pub fn query_parameter(&self, name: &str) -> Option<&str> {
        self.multi_value_query_string_parameters.first(name)
    }
}

impl Default for AwsProxyRequest {
    fn default() -> Self {
        Self::new()
    }
}
