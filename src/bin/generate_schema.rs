//! Schema generator for the proxy request wire format.
//!
//! Writes `aws_proxy_request.schema.json`, the JSON Schema of the event the
//! builder produces, so fixtures kept as files can be validated by editors and
//! other tooling.

use anyhow::{Context, Result};
use apigw_fixtures::AwsProxyRequest;
use lambda_runtime::tracing::info;
use schemars::schema_for;
use serde_json::Value;
use std::fs;

const SCHEMA_FILE: &str = "aws_proxy_request.schema.json";

fn main() -> Result<()> {
    lambda_runtime::tracing::init_default_subscriber();

    let schema = generate_schema()?;
    let json = serde_json::to_string_pretty(&schema).context("Failed to serialize schema")?;
    fs::write(SCHEMA_FILE, json).with_context(|| format!("Failed to write {SCHEMA_FILE}"))?;

    info!(file = SCHEMA_FILE, "Generated request schema");
    Ok(())
}

// Schema for the request, titled after the event rather than the Rust type
fn generate_schema() -> Result<Value> {
    let mut schema = serde_json::to_value(schema_for!(AwsProxyRequest))
        .context("Failed to convert schema to JSON")?;

    if let Some(obj) = schema.as_object_mut() {
        obj.insert(
            "title".to_string(),
            Value::String("API Gateway proxy request".to_string()),
        );
    }

    Ok(schema)
}
