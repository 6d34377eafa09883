//! Tests for the wire format schema

use apigw_fixtures::AwsProxyRequest;
use schemars::schema_for;
use serde_json::Value;

fn request_schema() -> Value {
    serde_json::to_value(schema_for!(AwsProxyRequest)).unwrap_or(Value::Null)
}

#[test]
fn test_schema_describes_top_level_fields() {
    let schema = request_schema();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    for field in [
        "httpMethod",
        "path",
        "multiValueHeaders",
        "multiValueQueryStringParameters",
        "body",
        "isBase64Encoded",
        "requestContext",
    ] {
        assert!(properties.contains_key(field), "Schema missing '{field}'");
    }
}

#[test]
fn test_multi_valued_maps_are_string_list_objects() {
    let schema = request_schema();
    let headers = &schema["properties"]["multiValueHeaders"];

    assert_eq!(headers["type"], "object");
    assert_eq!(headers["additionalProperties"]["type"], "array");
    assert_eq!(headers["additionalProperties"]["items"]["type"], "string");
}
