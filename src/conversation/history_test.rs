// ABOUTME: Tests for Conversation - appends, call-id pairing, rendering, rollback.
// ABOUTME: Covers the dangling-result and single-system-message rules.

use serde_json::json;

use super::*;
use crate::error::ConversationError;

fn conversation_with_tool_call() -> Conversation {
    let mut conversation = Conversation::with_system_message("You are helpful.");
    conversation.add_user_message("What is 2 + 3?");
    conversation.add_assistant_message("Let me calculate that.");
    conversation
        .begin_tool_invocation("call_1", "calculator", json!({"operation": "add", "a": 2, "b": 3}))
        .unwrap();
    conversation
        .complete_tool_result("call_1", ToolOutcome::Value(json!({"result": 5})))
        .unwrap();
    conversation
}

#[test]
fn test_set_system_message_replaces() {
    let mut conversation = Conversation::new();
    conversation.set_system_message("first");
    conversation.set_system_message("second");

    assert_eq!(conversation.system_message().unwrap().text(), "second");
    assert!(conversation.is_empty());

    let rendered = conversation.render();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].role, MessageRole::System);
    assert_eq!(rendered[0].content(), "second");
}

#[test]
fn test_appends_preserve_order() {
    let mut conversation = Conversation::new();
    conversation.add_user_message("Hello");
    conversation.add_assistant_message("Hi there!");

    let kinds: Vec<_> = conversation.turns().iter().map(Turn::kind).collect();
    assert_eq!(kinds, vec![TurnKind::User, TurnKind::Assistant]);
    assert_eq!(conversation.last_turn().unwrap().text(), "Hi there!");
}

#[test]
fn test_tool_result_without_invocation_is_dangling() {
    let mut conversation = Conversation::new();
    let err = conversation
        .complete_tool_result("missing", ToolOutcome::Value(json!(1)))
        .unwrap_err();

    assert!(matches!(err, ConversationError::DanglingToolResult(id) if id == "missing"));
    assert!(conversation.is_empty());
}

#[test]
fn test_second_result_for_same_call_is_dangling() {
    let mut conversation = conversation_with_tool_call();
    let err = conversation
        .complete_tool_result("call_1", ToolOutcome::Error("again".into()))
        .unwrap_err();

    assert!(matches!(err, ConversationError::DanglingToolResult(_)));
}

#[test]
fn test_duplicate_call_id_rejected() {
    let mut conversation = conversation_with_tool_call();
    let err = conversation
        .begin_tool_invocation("call_1", "calculator", json!({}))
        .unwrap_err();

    assert!(matches!(err, ConversationError::DuplicateCallId(id) if id == "call_1"));
}

#[test]
fn test_render_pairs_call_and_response() {
    let rendered = conversation_with_tool_call().render();

    let roles: Vec<_> = rendered.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            MessageRole::System,
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::Assistant,
            MessageRole::Tool,
        ]
    );

    let call = rendered[3].tool_call.as_ref().unwrap();
    assert_eq!(call.id, "call_1");
    assert_eq!(call.name, "calculator");
    assert_eq!(call.arguments["operation"], "add");

    assert_eq!(rendered[4].tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(rendered[4].content(), r#"{"result":5}"#);
    assert!(!rendered[4].is_error);
}

#[test]
fn test_render_skips_open_invocation() {
    let mut conversation = Conversation::new();
    conversation.add_user_message("Go");
    conversation
        .begin_tool_invocation("call_1", "slow", json!({}))
        .unwrap();

    let rendered = conversation.render();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].role, MessageRole::User);
}

#[test]
fn test_render_marks_error_results() {
    let mut conversation = Conversation::new();
    conversation
        .begin_tool_invocation("call_1", "calculator", json!({}))
        .unwrap();
    conversation
        .complete_tool_result("call_1", ToolOutcome::Error("Division by zero".into()))
        .unwrap();

    let rendered = conversation.render();
    assert!(rendered[1].is_error);
    assert_eq!(rendered[1].content(), "Division by zero");
}

#[test]
fn test_transaction_rolls_back_on_drop() {
    let mut conversation = Conversation::with_system_message("sys");
    conversation.add_user_message("kept");

    {
        let mut tx = conversation.transaction();
        tx.add_assistant_message("discarded");
        tx.set_system_message("replaced");
        tx.begin_tool_invocation("call_1", "noop", json!({})).unwrap();
        assert_eq!(tx.appended().len(), 2);
    }

    assert_eq!(conversation.len(), 1);
    assert_eq!(conversation.turns()[0].text(), "kept");
    assert_eq!(conversation.system_message().unwrap().text(), "sys");
}

#[test]
fn test_transaction_commit_keeps_turns() {
    let mut conversation = Conversation::new();
    conversation.add_user_message("hi");

    let mut tx = conversation.transaction();
    tx.add_assistant_message("hello");
    tx.commit();

    assert_eq!(conversation.len(), 2);
}

#[test]
fn test_view_is_detached_snapshot() {
    let mut conversation = Conversation::new();
    conversation.add_user_message("first");
    let view = conversation.view();

    conversation.add_user_message("second");

    assert_eq!(view.turns().len(), 1);
    assert_eq!(view.last_user_message().as_deref(), Some("first"));
}
