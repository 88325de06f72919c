// ABOUTME: Tests for ToolDescriptor and ToolBuilder - signature checks,
// ABOUTME: typed validation, invocation, and handler failure wrapping.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::*;
use crate::conversation::Conversation;
use crate::error::ToolError;

#[derive(Debug, Deserialize)]
struct CalculatorParams {
    operation: String,
    a: f64,
    b: f64,
}

impl ToolParameters for CalculatorParams {
    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {"type": "string", "enum": ["add", "subtract", "multiply", "divide"]},
                "a": {"type": "number"},
                "b": {"type": "number"}
            },
            "required": ["operation", "a", "b"]
        })
    }
}

#[derive(Debug, Serialize)]
struct CalculatorResult {
    result: f64,
    operation: String,
}

struct Ctx {
    precision: u32,
}

async fn calculate(_ctx: Arc<Ctx>, params: CalculatorParams) -> anyhow::Result<CalculatorResult> {
    let result = match params.operation.as_str() {
        "add" => params.a + params.b,
        "subtract" => params.a - params.b,
        "multiply" => params.a * params.b,
        "divide" if params.b == 0.0 => anyhow::bail!("Division by zero"),
        "divide" => params.a / params.b,
        other => anyhow::bail!("Unknown operation: {other}"),
    };
    Ok(CalculatorResult {
        result,
        operation: params.operation,
    })
}

fn calculator() -> ToolDescriptor<Ctx> {
    ToolDescriptor::builder("calculator")
        .description("Perform basic arithmetic")
        .parameters_of::<CalculatorParams>()
        .handler(calculate)
        .build()
        .unwrap()
}

#[test]
fn test_descriptor_exposes_metadata() {
    let tool = calculator();
    assert_eq!(tool.name(), "calculator");
    assert_eq!(tool.description(), "Perform basic arithmetic");
    assert_eq!(tool.parameter_schema()["required"], json!(["operation", "a", "b"]));

    let def = tool.definition();
    assert_eq!(def.name, "calculator");
    assert_eq!(def.input_schema, CalculatorParams::schema());
}

#[test]
fn test_description_defaults_to_empty() {
    let tool = ToolDescriptor::builder("calculator")
        .parameters_of::<CalculatorParams>()
        .handler(calculate)
        .build()
        .unwrap();
    assert_eq!(tool.description(), "");
}

#[test]
fn test_missing_schema_is_invalid_signature() {
    let err = ToolDescriptor::builder("calculator")
        .handler(calculate)
        .build()
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidSignature(msg) if msg.contains("no parameter schema")));
}

#[test]
fn test_non_object_schema_is_invalid_signature() {
    let err = ToolDescriptor::builder("calculator")
        .parameters(json!({"type": "string"}))
        .handler(calculate)
        .build()
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidSignature(_)));
}

#[test]
fn test_missing_handler_is_invalid_signature() {
    let err = ToolDescriptor::<Ctx>::builder("calculator")
        .parameters_of::<CalculatorParams>()
        .build()
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidSignature(msg) if msg.contains("no handler")));
}

#[test]
fn test_empty_name_is_invalid_signature() {
    let err = ToolDescriptor::builder("  ")
        .parameters_of::<CalculatorParams>()
        .handler(calculate)
        .build()
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidSignature(_)));
}

#[test]
fn test_two_handlers_is_invalid_signature() {
    let err = ToolDescriptor::builder("calculator")
        .parameters_of::<CalculatorParams>()
        .handler(calculate)
        .handler(calculate)
        .build()
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidSignature(msg) if msg.contains("more than one")));
}

#[test]
fn test_validate_checks_schema_and_type() {
    let tool = calculator();
    assert!(tool.validate(&json!({"operation": "add", "a": 1, "b": 2})).is_ok());
    assert!(matches!(
        tool.validate(&json!({"operation": "add", "a": 1})),
        Err(ToolError::InvalidArguments { tool, .. }) if tool == "calculator"
    ));
}

#[test]
fn test_validate_catches_decode_failures_schema_misses() {
    // The schema does not declare `a` numeric, but the parameter type does.
    let tool = ToolDescriptor::builder("loose")
        .parameters(json!({"type": "object"}))
        .handler(calculate)
        .build()
        .unwrap();
    let err = tool
        .validate(&json!({"operation": "add", "a": "x", "b": 1}))
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments { .. }));
}

#[tokio::test]
async fn test_invoke_returns_serialized_output() {
    let tool = calculator();
    let out = tool
        .invoke(
            Arc::new(Ctx { precision: 2 }),
            json!({"operation": "multiply", "a": 125, "b": 37}),
            Conversation::new().view(),
        )
        .await
        .unwrap();
    assert_eq!(out, json!({"result": 4625.0, "operation": "multiply"}));
}

#[tokio::test]
async fn test_invoke_wraps_handler_failure() {
    let tool = calculator();
    let err = tool
        .invoke(
            Arc::new(Ctx { precision: 2 }),
            json!({"operation": "divide", "a": 10, "b": 0}),
            Conversation::new().view(),
        )
        .await
        .unwrap_err();
    match err {
        ToolError::HandlerExecution { tool, source } => {
            assert_eq!(tool, "calculator");
            assert_eq!(source.to_string(), "Division by zero");
        }
        other => panic!("expected HandlerExecution, got {other}"),
    }
}

#[tokio::test]
async fn test_handler_with_conversation_and_context() {
    #[derive(Deserialize)]
    struct Empty {}

    let tool = ToolDescriptor::builder("recall")
        .parameters(json!({"type": "object", "properties": {}}))
        .handler_with_conversation(|ctx: Arc<Ctx>, _params: Empty, conversation| async move {
            Ok::<_, anyhow::Error>(json!({
                "last": conversation.last_user_message(),
                "precision": ctx.precision,
            }))
        })
        .build()
        .unwrap();

    let mut conversation = Conversation::new();
    conversation.add_user_message("remember me");

    let out = tool
        .invoke(Arc::new(Ctx { precision: 3 }), json!({}), conversation.view())
        .await
        .unwrap();
    assert_eq!(out, json!({"last": "remember me", "precision": 3}));
}
