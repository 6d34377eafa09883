// Drives a Lambda handler with built fixtures
#![allow(clippy::unwrap_used)]

use apigw_fixtures::AwsProxyRequestBuilder;
use lambda_runtime::{Diagnostic, LambdaEvent};
use serde_json::{Value, json};

/// Minimal proxy handler: greets the `name` from a JSON body, or the
/// authorizer principal when there is no body.
async fn greeting_handler(event: LambdaEvent<Value>) -> Result<Value, Diagnostic> {
    let (payload, context) = event.into_parts();

    let name = match payload.get("body").and_then(Value::as_str) {
        Some(body) => serde_json::from_str::<Value>(body)
            .map_err(|e| Diagnostic {
                error_type: "InvalidInput".to_string(),
                error_message: format!("Failed to parse body: {e}"),
            })?
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("there")
            .to_string(),
        None => payload["requestContext"]["authorizer"]["principalId"]
            .as_str()
            .unwrap_or("there")
            .to_string(),
    };

    Ok(json!({
        "statusCode": 200,
        "headers": {"x-request-id": context.request_id},
        "body": format!("Hello, {name}!")
    }))
}

#[tokio::test]
async fn test_handler_reads_json_body() {
    let mut builder = AwsProxyRequestBuilder::with_path_and_method("/greet", "POST");
    builder.json();
    builder.json_body(&json!({"name": "Ada"})).unwrap();

    let response = greeting_handler(builder.build_event().unwrap())
        .await
        .unwrap();

    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["body"], "Hello, Ada!");
}

#[tokio::test]
async fn test_handler_reads_authorizer_principal() {
    let mut builder = AwsProxyRequestBuilder::with_path_and_method("/greet", "GET");
    builder.authorizer_principal("grace");

    let response = greeting_handler(builder.build_event().unwrap())
        .await
        .unwrap();

    assert_eq!(response["body"], "Hello, grace!");
}

#[tokio::test]
async fn test_handler_rejects_malformed_body() {
    let mut builder = AwsProxyRequestBuilder::with_path_and_method("/greet", "POST");
    builder.body("{not json");

    let err = greeting_handler(builder.build_event().unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.error_type, "InvalidInput");
}

#[test]
fn test_event_context_carries_request_id() {
    let builder = AwsProxyRequestBuilder::with_path_and_method("/greet", "GET");
    let event = builder.build_event().unwrap();

    assert_eq!(
        event.context.request_id,
        builder.build().request_context.request_id()
    );
    assert_eq!(event.payload["path"], "/greet");
    assert_eq!(event.payload["requestContext"]["stage"], "test");
}

#[test]
fn test_stream_is_readable_by_handler_side_parsing() {
    let mut builder = AwsProxyRequestBuilder::with_path_and_method("/greet", "GET");
    builder.query_string("lang", "en");

    let stream = std::io::Cursor::new(builder.build_stream().unwrap());
    let payload: Value = serde_json::from_reader(stream).unwrap();

    assert_eq!(payload["multiValueQueryStringParameters"]["lang"][0], "en");
}
