//! Core domain types for claude-config
//!
//! These types are the normalized conversation model every stage of the
//! pipeline works on, plus the small records the analysis stages hand to
//! each other.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Conversation** | One session log file, read in order |
//! | **Message** | One user or assistant turn within a Conversation |
//! | **ToolCall** | An assistant invoking a tool (Edit, Bash, Read, ...) |
//! | **Tally** | A label with an occurrence count, used for ranked tables |
//! | **Pattern** | A recurring behavior surfaced from the statistics |
//! | **Suggestion** | A document block proposed for one section of `CLAUDE.md` |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================
// Conversation model
// ============================================

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tool invocation captured from an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name (`"unknown"` when the log omits it)
    pub name: String,
    /// Tool input mapping, an empty object when absent
    pub input: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }

    /// String field from the input mapping, if present.
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.input.get(key).and_then(|v| v.as_str())
    }
}

/// One turn of a conversation.
///
/// Multi-part content is already flattened to text by the log reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    /// Tool calls in the order the assistant issued them
    pub tool_calls: Vec<ToolCall>,
    /// Raw tool-result payloads attached after this message
    pub tool_results: Vec<serde_json::Value>,
}

impl Message {
    /// A user message with the given text.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: None,
            tool_calls: Vec::new(),
            tool_results: Vec::new(),
        }
    }

    /// An assistant message with the given text and tool calls.
    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: None,
            tool_calls,
            tool_results: Vec::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

/// A single session log, normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Session identifier (the log file stem)
    pub session_id: String,
    /// Directory holding the session file (one per project)
    pub project_path: PathBuf,
    /// The session file itself
    pub source_path: PathBuf,
    /// Messages in log order
    pub messages: Vec<Message>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Build a conversation that did not come from disk (tests, fixtures).
    pub fn new(session_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            session_id: session_id.into(),
            project_path: PathBuf::new(),
            source_path: PathBuf::new(),
            messages,
            started_at: None,
            ended_at: None,
        }
    }

    /// Iterator over assistant messages.
    pub fn assistant_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_assistant())
    }

    /// Iterator over user messages.
    pub fn user_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_user())
    }

    /// All tool calls of the session, in order.
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.assistant_messages().flat_map(|m| m.tool_calls.iter())
    }
}

// ============================================
// Statistics and suggestions
// ============================================

/// A label with a count. Ranked tables are `Vec<Tally>` so order survives export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub label: String,
    pub count: usize,
}

impl Tally {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Kind of recurring behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    Mistake,
    Preference,
    Workflow,
    Convention,
}

impl PatternCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternCategory::Mistake => "mistake",
            PatternCategory::Preference => "preference",
            PatternCategory::Workflow => "workflow",
            PatternCategory::Convention => "convention",
        }
    }
}

impl std::fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recurring behavior derived from the statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub category: PatternCategory,
    pub description: String,
    pub frequency: usize,
    pub examples: Vec<String>,
    pub suggested_rule: Option<String>,
}

/// A block of text proposed for one section of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Target section name (`permanent`, `validated`, `recent`, `deprecated`, `other`)
    pub section: String,
    /// Markdown block to append
    pub content: String,
    /// Why this was suggested
    pub reason: String,
    /// 1 = high, 2 = medium, 3 = low
    pub priority: u8,
}

impl Suggestion {
    /// Human label for the priority.
    pub fn priority_label(&self) -> &'static str {
        match self.priority {
            1 => "높음",
            2 => "중간",
            3 => "낮음",
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
        assert!(msg.tool_calls.is_empty());
        assert!(msg.tool_results.is_empty());
        assert!(msg.timestamp.is_none());
    }

    #[test]
    fn test_conversation_tool_calls_skip_user_messages() {
        let conv = Conversation::new(
            "test-123",
            vec![
                Message::user("Hi"),
                Message::assistant(
                    "",
                    vec![
                        ToolCall::new("Read", serde_json::json!({})),
                        ToolCall::new("Edit", serde_json::json!({})),
                    ],
                ),
            ],
        );

        let names: Vec<_> = conv.tool_calls().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Read", "Edit"]);
        assert_eq!(conv.user_messages().count(), 1);
    }

    #[test]
    fn test_tool_call_input_str() {
        let call = ToolCall::new("Edit", serde_json::json!({"file_path": "a.rs", "n": 1}));
        assert_eq!(call.input_str("file_path"), Some("a.rs"));
        assert_eq!(call.input_str("n"), None);
        assert_eq!(call.input_str("missing"), None);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(PatternCategory::Convention.to_string(), "convention");
    }

    #[test]
    fn test_priority_label() {
        let suggestion = Suggestion {
            section: "recent".to_string(),
            content: "### 테스트 규칙\n- 테스트 항목".to_string(),
            reason: "테스트 이유".to_string(),
            priority: 2,
        };
        assert_eq!(suggestion.priority_label(), "중간");
    }
}
