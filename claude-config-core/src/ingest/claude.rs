//! Claude Code session log → [`Conversation`]
//!
//! Session logs live at `~/.claude/projects/[encoded-path]/[session-id].jsonl`.
//! Each line carries a `type` discriminator; the shape of the nested
//! `message` payload depends on it:
//!
//! | `type` | Payload | Becomes |
//! |--------|---------|---------|
//! | `user` | `message.content`: string or block list | one user [`Message`] |
//! | `assistant` | `message.content`: block list of `text` / `tool_use` | one assistant [`Message`] |
//! | `tool_result` | top-level `content` | appended to the last assistant message |
//!
//! Anything else (summaries, snapshots, unknown types) is ignored.
//!
//! # Error Handling
//!
//! - **Malformed JSON lines**: skipped by [`JsonlRecords`].
//! - **Missing fields**: every field is optional via `#[serde(default)]`.
//! - **Records that do not fit the expected shape**: ignored rather than failing the file.

use crate::error::Result;
use crate::ingest::jsonl::JsonlRecords;
use crate::types::{Conversation, Message, ToolCall};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

// ============================================
// Raw JSONL record types (serde deserialization)
// ============================================

/// Represents a single line from Claude Code JSONL.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawRecord {
    #[serde(rename = "type")]
    record_type: Option<String>,
    /// Kept loose so a non-string timestamp never drops the record
    timestamp: Option<serde_json::Value>,
    message: Option<RawMessage>,
    /// Payload of `tool_result` records
    content: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMessage {
    Structured(RawMessageBody),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawMessageBody {
    content: Option<RawContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawContent {
    Text(String),
    Blocks(Vec<RawBlock>),
    Other(serde_json::Value),
}

/// A list item that may or may not be a recognizable content block.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBlock {
    Block(ContentBlock),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: String,
    },
    #[serde(rename = "tool_use")]
    ToolUse {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        input: Option<serde_json::Value>,
    },
    #[serde(rename = "tool_result")]
    ToolResult {
        #[serde(default)]
        content: serde_json::Value,
    },
    // Catch-all for image, thinking and future block types
    #[serde(other)]
    Unknown,
}

// ============================================
// Content coercion
// ============================================

/// Flatten a tool_result payload (string or block list) to text.
fn tool_result_text(content: &serde_json::Value) -> String {
    match content {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join(" "),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Text of a user message, whatever shape its content takes.
fn user_text(message: Option<&RawMessage>) -> String {
    let body = match message {
        Some(RawMessage::Structured(body)) => body,
        Some(RawMessage::Other(serde_json::Value::String(s))) => return s.clone(),
        Some(RawMessage::Other(serde_json::Value::Null)) | None => return String::new(),
        Some(RawMessage::Other(other)) => return other.to_string(),
    };

    match &body.content {
        Some(RawContent::Text(text)) => text.clone(),
        Some(RawContent::Blocks(blocks)) => blocks
            .iter()
            .filter_map(|block| match block {
                RawBlock::Block(ContentBlock::Text { text }) => Some(text.clone()),
                RawBlock::Block(ContentBlock::ToolResult { content }) => {
                    Some(tool_result_text(content))
                }
                RawBlock::Block(_) => None,
                RawBlock::Other(serde_json::Value::String(s)) => Some(s.clone()),
                RawBlock::Other(serde_json::Value::Null) => None,
                RawBlock::Other(other) => Some(other.to_string()),
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Some(RawContent::Other(serde_json::Value::Null)) | None => String::new(),
        Some(RawContent::Other(other)) => other.to_string(),
    }
}

/// Concatenated text segments and tool calls of an assistant message.
fn assistant_parts(message: Option<&RawMessage>) -> (String, Vec<ToolCall>) {
    let mut text = String::new();
    let mut tool_calls = Vec::new();

    let Some(RawMessage::Structured(body)) = message else {
        return (text, tool_calls);
    };

    match &body.content {
        Some(RawContent::Text(t)) => text.push_str(t),
        Some(RawContent::Blocks(blocks)) => {
            for block in blocks {
                match block {
                    RawBlock::Block(ContentBlock::Text { text: t }) => text.push_str(t),
                    RawBlock::Block(ContentBlock::ToolUse { name, input }) => {
                        tool_calls.push(ToolCall {
                            name: name.clone().unwrap_or_else(|| "unknown".to_string()),
                            input: input
                                .clone()
                                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
                        });
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }

    (text, tool_calls)
}

fn parse_timestamp(raw: Option<&serde_json::Value>) -> Option<DateTime<Utc>> {
    raw.and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// ============================================
// Conversation assembly
// ============================================

/// Build a conversation from already-parsed records.
///
/// `path` supplies the session id (file stem) and project path (parent dir).
pub fn conversation_from_records<I>(path: &Path, records: I) -> Conversation
where
    I: IntoIterator<Item = serde_json::Value>,
{
    let session_id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let project_path = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut messages: Vec<Message> = Vec::new();
    let mut started_at = None;
    let mut ended_at = None;

    for value in records {
        let record: RawRecord = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping unexpected record shape");
                continue;
            }
        };

        let timestamp = parse_timestamp(record.timestamp.as_ref());
        if timestamp.is_some() {
            if started_at.is_none() {
                started_at = timestamp;
            }
            ended_at = timestamp;
        }

        match record.record_type.as_deref() {
            Some("user") => {
                let text = user_text(record.message.as_ref());
                messages.push(Message::user(text).with_timestamp(timestamp));
            }
            Some("assistant") => {
                let (text, tool_calls) = assistant_parts(record.message.as_ref());
                messages.push(Message::assistant(text, tool_calls).with_timestamp(timestamp));
            }
            Some("tool_result") => match messages.last_mut() {
                Some(last) if last.is_assistant() => {
                    last.tool_results
                        .push(record.content.unwrap_or(serde_json::Value::String(String::new())));
                }
                _ => {
                    tracing::debug!(path = %path.display(), "Dropping tool_result without a preceding assistant message");
                }
            },
            _ => {}
        }
    }

    Conversation {
        session_id,
        project_path,
        source_path: path.to_path_buf(),
        messages,
        started_at,
        ended_at,
    }
}

/// Read one session file into a [`Conversation`].
pub fn read_conversation(path: &Path) -> Result<Conversation> {
    let mut records = JsonlRecords::open(path)?;
    let conversation = conversation_from_records(path, records.by_ref());

    if records.skipped() > 0 {
        tracing::info!(
            path = %path.display(),
            skipped = records.skipped(),
            "Skipped malformed lines while reading session"
        );
    }

    Ok(conversation)
}
