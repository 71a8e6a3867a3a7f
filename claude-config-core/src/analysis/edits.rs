//! Edit habits
//!
//! Collects every `Edit` tool call and ranks the file extensions touched.

use crate::config::Limits;
use crate::format::truncate_chars;
use crate::types::{Conversation, Tally};
use serde::Serialize;
use std::collections::HashMap;

const EDIT_TOOL: &str = "Edit";

/// One `Edit` tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditRecord {
    pub file_path: String,
    pub old_preview: String,
    pub new_preview: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditPatterns {
    pub total_edits: usize,
    /// Most edited extensions first
    pub by_extension: Vec<Tally>,
    /// First records in traversal order
    pub recent_edits: Vec<EditRecord>,
}

/// Edited file path from a tool input.
fn extract_file_path(tool_input: &serde_json::Value) -> String {
    tool_input
        .get("file_path")
        .or_else(|| tool_input.get("filePath"))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Suffix after the last `.` of the final path component.
pub fn file_extension(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

pub fn find_edit_patterns(conversations: &[Conversation], limits: &Limits) -> EditPatterns {
    let records: Vec<EditRecord> = conversations
        .iter()
        .flat_map(|c| c.tool_calls())
        .filter(|call| call.name == EDIT_TOOL)
        .map(|call| EditRecord {
            file_path: extract_file_path(&call.input),
            old_preview: truncate_chars(
                call.input_str("old_string").unwrap_or_default(),
                limits.edit_preview_chars,
            ),
            new_preview: truncate_chars(
                call.input_str("new_string").unwrap_or_default(),
                limits.edit_preview_chars,
            ),
        })
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in &records {
        if let Some(ext) = file_extension(&record.file_path) {
            *counts.entry(ext).or_default() += 1;
        }
    }

    let mut by_extension: Vec<Tally> = counts
        .into_iter()
        .map(|(ext, count)| Tally::new(ext, count))
        .collect();
    by_extension.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    by_extension.truncate(limits.top_extensions);

    EditPatterns {
        total_edits: records.len(),
        by_extension,
        recent_edits: records.iter().take(limits.recent_edits).cloned().collect(),
    }
}
