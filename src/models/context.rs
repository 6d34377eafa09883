//! Request context records: where the request came from and who made it.

use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::defaults::{DEFAULT_SOURCE_IP, default_protocol, default_stage};
use super::error::FixtureError;
use crate::utils::{format_request_time, new_request_id};

/// Gateway metadata attached to every proxy request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default = "new_request_id")]
    request_id: String,
    #[serde(default = "new_request_id")]
    extended_request_id: String,
    #[serde(default = "default_stage")]
    pub stage: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub request_time_epoch: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub identity: Identity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizer: Option<Authorizer>,
}

impl RequestContext {
    /// Fresh context: new request ids, default stage and protocol, the current
    /// time, and a local caller identity.
    #[must_use]
    pub fn new() -> Self {
        let request_time_epoch = chrono::Utc::now().timestamp_millis();
        Self {
            request_id: new_request_id(),
            extended_request_id: new_request_id(),
            stage: default_stage(),
            protocol: default_protocol(),
            request_time_epoch,
            request_time: format_request_time(request_time_epoch),
            account_id: None,
            resource_id: None,
            api_id: None,
            resource_path: None,
            http_method: None,
            path: None,
            domain_name: None,
            identity: Identity::local(),
            authorizer: None,
        }
    }

    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    #[must_use]
    pub fn extended_request_id(&self) -> &str {
        &self.extended_request_id
    }

    /// Returns the authorizer, creating an empty one first if needed.
    pub fn authorizer_mut(&mut self) -> &mut Authorizer {
        self.authorizer.get_or_insert_with(Authorizer::default)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// How Cognito authenticated the caller.
///
/// Values other than `POOL` and `IDENTITY` are kept verbatim so that real
/// gateway samples survive a load and save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CognitoAuthenticationType {
    /// Authenticated against a user pool
    Pool,
    /// Authenticated through an identity pool
    Identity,
    Other(String),
}

impl CognitoAuthenticationType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pool => "POOL",
            Self::Identity => "IDENTITY",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for CognitoAuthenticationType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "POOL" => Self::Pool,
            "IDENTITY" => Self::Identity,
            _ => Self::Other(value),
        }
    }
}

impl From<CognitoAuthenticationType> for String {
    fn from(value: CognitoAuthenticationType) -> Self {
        match value {
            CognitoAuthenticationType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

/// Caller identity as seen by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Doubles as the referer in fixtures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub cognito_authentication_type: Option<CognitoAuthenticationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognito_identity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognito_identity_pool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognito_authentication_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_arn: Option<String>,
}

impl Identity {
    /// Identity of a caller on the loopback address.
    #[must_use]
    pub fn local() -> Self {
        Self {
            source_ip: Some(DEFAULT_SOURCE_IP.to_string()),
            ..Self::default()
        }
    }
}

/// Output of a custom or Cognito authorizer.
///
/// Context values are flattened into the authorizer object on the wire, next
/// to `principalId` and `claims`. Numbers and booleans returned by a Lambda
/// authorizer (or the gateway's own `integrationLatency`) load as strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Authorizer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<Claims>,
    #[serde(flatten, deserialize_with = "scalars_as_strings")]
    #[schemars(with = "BTreeMap<String, String>")]
    pub context: BTreeMap<String, String>,
}

const PRINCIPAL_ID_KEY: &str = "principalId";
const CLAIMS_KEY: &str = "claims";

impl Authorizer {
    #[must_use]
    pub fn context_value(&self, key: &str) -> Option<&str> {
        if key == PRINCIPAL_ID_KEY {
            self.principal_id.as_deref()
        } else {
            self.context.get(key).map(String::as_str)
        }
    }

    /// Sets a context entry. `principalId` is the principal.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::UnsupportedOperation` for `claims`, which names
    /// the claims object on the wire and cannot hold a string.
    pub fn set_context_value(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), FixtureError> {
        let key = key.into();
        match key.as_str() {
            PRINCIPAL_ID_KEY => self.principal_id = Some(value.into()),
            CLAIMS_KEY => {
                return Err(FixtureError::UnsupportedOperation(
                    "`claims` is reserved for authorizer claims".to_string(),
                ));
            }
            _ => {
                self.context.insert(key, value.into());
            }
        }
        Ok(())
    }
}

// Gateway context values are scalars; `null` entries are dropped
fn scalars_as_strings<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    let mut values = BTreeMap::new();
    for (key, value) in raw {
        let value = match value {
            Value::Null => continue,
            Value::String(text) => text,
            Value::Bool(flag) => flag.to_string(),
            Value::Number(number) => number.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(D::Error::custom(format!(
                    "expected a scalar value for `{key}`"
                )));
            }
        };
        values.insert(key, value);
    }
    Ok(values)
}

/// Cognito user pool claims.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Claims {
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(flatten, deserialize_with = "scalars_as_strings")]
    #[schemars(with = "BTreeMap<String, String>")]
    pub values: BTreeMap<String, String>,
}

impl Claims {
    #[must_use]
    pub fn with_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            values: BTreeMap::new(),
        }
    }

    /// Sets a named claim. `sub` is the subject.
    pub fn set_claim(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if name == "sub" {
            self.subject = Some(value.into());
        } else {
            self.values.insert(name, value.into());
        }
    }

    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&str> {
        if name == "sub" {
            self.subject.as_deref()
        } else {
            self.values.get(name).map(String::as_str)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_context_defaults() {
        let context = RequestContext::new();
        assert_eq!(context.stage, "test");
        assert_eq!(context.protocol, "HTTP/1.1");
        assert_eq!(context.identity.source_ip.as_deref(), Some("127.0.0.1"));
        assert!(context.authorizer.is_none());
        assert!(context.request_time_epoch > 0);
        assert!(context.request_time.is_some());
        assert_ne!(context.request_id(), context.extended_request_id());
    }

    #[test]
    fn test_authorizer_mut_creates_once() {
        let mut context = RequestContext::new();
        context.authorizer_mut().principal_id = Some("alice".into());
        context
            .authorizer_mut()
            .context
            .insert("tenant".into(), "acme".into());

        let authorizer = context.authorizer.unwrap();
        assert_eq!(authorizer.principal_id.as_deref(), Some("alice"));
        assert_eq!(authorizer.context_value("tenant"), Some("acme"));
    }

    #[test]
    fn test_cognito_authentication_type_wire_values() {
        assert_eq!(
            serde_json::to_value(CognitoAuthenticationType::Pool).unwrap(),
            json!("POOL")
        );
        let loaded: CognitoAuthenticationType =
            serde_json::from_value(json!("authenticated")).unwrap();
        assert_eq!(
            loaded,
            CognitoAuthenticationType::Other("authenticated".into())
        );
        assert_eq!(loaded.as_str(), "authenticated");
    }

    #[test]
    fn test_claims_flatten_next_to_sub() {
        let mut claims = Claims::with_subject("user-1");
        claims.set_claim("email", "user@example.com");

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value, json!({"sub": "user-1", "email": "user@example.com"}));

        let loaded: Claims = serde_json::from_value(value).unwrap();
        assert_eq!(loaded, claims);
    }

    #[test]
    fn test_setting_sub_claim_sets_subject() {
        let mut claims = Claims::default();
        claims.set_claim("sub", "user-2");
        assert_eq!(claims.subject.as_deref(), Some("user-2"));
        assert!(claims.values.is_empty());
        assert_eq!(claims.claim("sub"), Some("user-2"));
    }

    #[test]
    fn test_authorizer_context_flattens() {
        let value = json!({
            "principalId": "alice",
            "claims": {"sub": "alice"},
            "tenant": "acme"
        });
        let authorizer: Authorizer = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(authorizer.context_value("tenant"), Some("acme"));
        assert_eq!(
            authorizer.claims.as_ref().and_then(|c| c.subject.as_deref()),
            Some("alice")
        );
        assert_eq!(serde_json::to_value(&authorizer).unwrap(), value);
    }

    #[test]
    fn test_authorizer_scalars_load_as_strings() {
        let authorizer: Authorizer = serde_json::from_value(json!({
            "principalId": "u",
            "integrationLatency": 0,
            "admin": true,
            "quota": 2.5,
            "unused": null
        }))
        .unwrap();

        assert_eq!(authorizer.context_value("integrationLatency"), Some("0"));
        assert_eq!(authorizer.context_value("admin"), Some("true"));
        assert_eq!(authorizer.context_value("quota"), Some("2.5"));
        assert!(!authorizer.context.contains_key("unused"));
    }

    #[test]
    fn test_authorizer_rejects_nested_context_values() {
        let result = serde_json::from_value::<Authorizer>(json!({"groups": ["a", "b"]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_reserved_context_keys() {
        let mut authorizer = Authorizer::default();
        authorizer.set_context_value("principalId", "ctx").unwrap();
        assert_eq!(authorizer.principal_id.as_deref(), Some("ctx"));
        assert!(authorizer.context.is_empty());
        assert_eq!(authorizer.context_value("principalId"), Some("ctx"));

        let result = authorizer.set_context_value("claims", "x");
        assert!(matches!(result, Err(FixtureError::UnsupportedOperation(_))));
        assert!(authorizer.claims.is_none());
    }

    #[test]
    fn test_claims_scalars_load_as_strings() {
        let claims: Claims =
            serde_json::from_value(json!({"sub": "u", "exp": 1_700_000_000})).unwrap();
        assert_eq!(claims.claim("exp"), Some("1700000000"));
    }
}
