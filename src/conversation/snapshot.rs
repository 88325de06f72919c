// ABOUTME: Snapshot/restore of a conversation as an ordered list of turn records.
// ABOUTME: Restore validates structure and rejects corrupt input.

use serde::{Deserialize, Serialize};

use super::history::Conversation;
use super::turn::{Part, ToolOutcome, Turn, TurnKind};
use crate::error::ConversationError;

/// Persisted form of a single turn.
///
/// Tool call records carry the JSON-encoded arguments as their only part;
/// tool result records carry the JSON-encoded value, or the error text when
/// `is_error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub role: TurnKind,
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl TurnRecord {
    fn text(role: TurnKind, parts: &[Part]) -> Self {
        Self {
            role,
            parts: parts.to_vec(),
            call_id: None,
            tool_name: None,
            is_error: false,
        }
    }
}

impl From<&Turn> for TurnRecord {
    fn from(turn: &Turn) -> Self {
        match turn {
            Turn::System { parts } => TurnRecord::text(TurnKind::System, parts),
            Turn::User { parts } => TurnRecord::text(TurnKind::User, parts),
            Turn::Assistant { parts } => TurnRecord::text(TurnKind::Assistant, parts),
            Turn::ToolInvocation {
                call_id,
                tool_name,
                arguments,
            } => TurnRecord {
                role: TurnKind::ToolCall,
                parts: vec![Part::text(arguments.to_string())],
                call_id: Some(call_id.clone()),
                tool_name: Some(tool_name.clone()),
                is_error: false,
            },
            Turn::ToolResult { call_id, outcome } => TurnRecord {
                role: TurnKind::ToolResult,
                parts: vec![Part::text(outcome.to_content())],
                call_id: Some(call_id.clone()),
                tool_name: None,
                is_error: outcome.is_error(),
            },
        }
    }
}

impl Conversation {
    /// The conversation as persisted records, system message first.
    pub fn records(&self) -> Vec<TurnRecord> {
        self.system
            .iter()
            .chain(self.turns.iter())
            .map(TurnRecord::from)
            .collect()
    }

    /// Serialize the conversation for persistence.
    pub fn snapshot(&self) -> Result<String, ConversationError> {
        serde_json::to_string(&self.records()).map_err(ConversationError::Encode)
    }

    /// Rebuild a conversation from [`Conversation::snapshot`] output.
    pub fn restore(snapshot: &str) -> Result<Self, ConversationError> {
        let records: Vec<TurnRecord> = serde_json::from_str(snapshot)
            .map_err(|e| ConversationError::Corrupt(format!("invalid snapshot: {e}")))?;
        Self::from_records(records)
    }

    /// Rebuild a conversation from persisted records.
    pub fn from_records(records: Vec<TurnRecord>) -> Result<Self, ConversationError> {
        let mut conversation = Conversation::new();

        for (index, record) in records.into_iter().enumerate() {
            if record.parts.is_empty() {
                return Err(corrupt(index, "record has no parts"));
            }

            match record.role {
                TurnKind::System | TurnKind::User | TurnKind::Assistant => {
                    if record.call_id.is_some() || record.tool_name.is_some() {
                        return Err(corrupt(index, "text turn carries tool fields"));
                    }
                    match record.role {
                        TurnKind::System if index != 0 => {
                            return Err(corrupt(index, "system message must be the first record"));
                        }
                        TurnKind::System => conversation.set_system_parts(record.parts),
                        TurnKind::User => conversation.turns.push(Turn::User {
                            parts: record.parts,
                        }),
                        _ => conversation.turns.push(Turn::Assistant {
                            parts: record.parts,
                        }),
                    }
                }
                TurnKind::ToolCall => {
                    let call_id = record
                        .call_id
                        .ok_or_else(|| corrupt(index, "tool call without call_id"))?;
                    let tool_name = record
                        .tool_name
                        .ok_or_else(|| corrupt(index, "tool call without tool_name"))?;
                    let arguments = serde_json::from_str(&single_part(index, &record.parts)?)
                        .map_err(|e| corrupt(index, &format!("invalid tool arguments: {e}")))?;
                    conversation
                        .begin_tool_invocation(call_id, tool_name, arguments)
                        .map_err(|e| corrupt(index, &e.to_string()))?;
                }
                TurnKind::ToolResult => {
                    let call_id = record
                        .call_id
                        .ok_or_else(|| corrupt(index, "tool result without call_id"))?;
                    let content = single_part(index, &record.parts)?;
                    let outcome = if record.is_error {
                        ToolOutcome::Error(content)
                    } else {
                        ToolOutcome::Value(serde_json::from_str(&content).map_err(|e| {
                            corrupt(index, &format!("invalid tool result value: {e}"))
                        })?)
                    };
                    conversation
                        .complete_tool_result(call_id, outcome)
                        .map_err(|e| corrupt(index, &e.to_string()))?;
                }
            }
        }

        Ok(conversation)
    }
}

fn single_part(index: usize, parts: &[Part]) -> Result<String, ConversationError> {
    match parts {
        [part] => Ok(part.content.clone()),
        _ => Err(corrupt(index, "tool record must have exactly one part")),
    }
}

fn corrupt(index: usize, reason: &str) -> ConversationError {
    ConversationError::Corrupt(format!("record {index}: {reason}"))
}
