//! Per-session tool sequences

use crate::config::Limits;
use crate::types::Conversation;
use serde::Serialize;

/// The tool sequence of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workflow {
    pub session_id: String,
    /// Leading tool names, capped at the configured prefix length
    pub sequence: Vec<String>,
    /// Full number of tool calls in the session
    pub length: usize,
}

pub fn find_workflows(conversations: &[Conversation], limits: &Limits) -> Vec<Workflow> {
    conversations
        .iter()
        .filter_map(|conv| {
            let names: Vec<&str> = conv.tool_calls().map(|t| t.name.as_str()).collect();
            if names.len() < limits.min_workflow_length {
                return None;
            }
            Some(Workflow {
                session_id: conv.session_id.clone(),
                sequence: names
                    .iter()
                    .take(limits.workflow_prefix)
                    .map(|s| s.to_string())
                    .collect(),
                length: names.len(),
            })
        })
        .collect()
}
