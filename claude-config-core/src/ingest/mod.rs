//! Ingestion layer for Claude Code session logs
//!
//! Discovers session files under the Claude data directory and reads them
//! into [`Conversation`]s.
//!
//! ```text
//! ~/.claude/projects/
//! ├── -home-user-app/            ← project dir (encoded path)
//! │   ├── 3f2a….jsonl            ← one session
//! │   └── 9bc1….jsonl
//! └── -home-user-lib/
//!     └── …
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use claude_config_core::{Config, ingest::LogReader};
//!
//! let config = Config::load().expect("failed to load config");
//! let reader = LogReader::new(config.claude_dir());
//! let conversations = reader.recent_conversations(20, None)?;
//! println!("Read {} sessions", conversations.len());
//! # Ok::<(), claude_config_core::Error>(())
//! ```

pub mod claude;
pub mod jsonl;

pub use claude::read_conversation;
pub use jsonl::JsonlRecords;

use crate::error::Result;
use crate::format::char_len;
use crate::types::{Conversation, Tally};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Locates and reads session logs under a Claude data directory.
#[derive(Debug, Clone)]
pub struct LogReader {
    root: PathBuf,
}

impl LogReader {
    /// `root` is the Claude data directory (normally `~/.claude`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding one subdirectory per project.
    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    /// Project directories, sorted by name. Empty when the log directory is missing.
    pub fn project_dirs(&self) -> Result<Vec<PathBuf>> {
        let projects = self.projects_dir();
        if !projects.is_dir() {
            tracing::debug!(path = %projects.display(), "No projects directory");
            return Ok(Vec::new());
        }

        let mut dirs: Vec<PathBuf> = std::fs::read_dir(&projects)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();
        Ok(dirs)
    }

    /// `*.jsonl` files of one project, newest modification first.
    pub fn session_files(&self, project_dir: &Path) -> Result<Vec<PathBuf>> {
        // Brackets and wildcards in the directory name are literal
        let escaped = glob::Pattern::escape(&project_dir.to_string_lossy());
        let pattern = Path::new(&escaped).join("*.jsonl");

        let mut files: Vec<(PathBuf, SystemTime)> = glob::glob(&pattern.to_string_lossy())?
            .flatten()
            .filter(|path| path.is_file())
            .map(|path| {
                let modified = modified_time(&path);
                (path, modified)
            })
            .collect();

        files.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(files.into_iter().map(|(path, _)| path).collect())
    }

    /// Session files across all projects, newest first.
    ///
    /// With `project_filter`, only projects whose directory path contains it.
    fn all_session_files(&self, project_filter: Option<&str>) -> Result<Vec<PathBuf>> {
        let mut files: Vec<(PathBuf, SystemTime)> = Vec::new();

        for dir in self.project_dirs()? {
            if let Some(filter) = project_filter {
                if !dir.to_string_lossy().contains(filter) {
                    continue;
                }
            }
            for path in self.session_files(&dir)? {
                let modified = modified_time(&path);
                files.push((path, modified));
            }
        }

        files.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(files.into_iter().map(|(path, _)| path).collect())
    }

    /// Up to `limit` non-empty conversations, newest first.
    ///
    /// Files that cannot be read are skipped with a warning.
    pub fn recent_conversations(
        &self,
        limit: usize,
        project_filter: Option<&str>,
    ) -> Result<Vec<Conversation>> {
        let mut conversations = Vec::new();
        if limit == 0 {
            return Ok(conversations);
        }

        for path in self.all_session_files(project_filter)? {
            match read_conversation(&path) {
                Ok(conv) if conv.messages.is_empty() => {
                    tracing::debug!(path = %path.display(), "Skipping empty session");
                }
                Ok(conv) => {
                    conversations.push(conv);
                    if conversations.len() >= limit {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read session");
                }
            }
        }

        tracing::info!(
            count = conversations.len(),
            limit,
            filter = project_filter.unwrap_or(""),
            "Loaded recent conversations"
        );
        Ok(conversations)
    }

    /// Newest session file across all projects.
    pub fn latest_session(&self) -> Result<Option<PathBuf>> {
        Ok(self.all_session_files(None)?.into_iter().next())
    }

    /// `<project>/<session_id>.jsonl` in the first project that has it.
    pub fn find_session(&self, session_id: &str) -> Result<Option<PathBuf>> {
        let file_name = format!("{}.jsonl", session_id);
        for dir in self.project_dirs()? {
            let candidate = dir.join(&file_name);
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

fn modified_time(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

// ============================================
// Aggregates over conversations
// ============================================

/// Tool call counts by name, most used first (ties by name).
pub fn all_tool_usage(conversations: &[Conversation]) -> Vec<Tally> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for call in conversations.iter().flat_map(|c| c.tool_calls()) {
        *counts.entry(call.name.as_str()).or_default() += 1;
    }

    let mut usage: Vec<Tally> = counts
        .into_iter()
        .map(|(name, count)| Tally::new(name, count))
        .collect();
    usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    usage
}

const CODE_KEYWORDS: &[&str] = &[
    "코드", "구현", "함수", "클래스", "작성", "만들어", "생성", "code", "implement", "create",
    "write",
];

/// How the user tends to write their requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatterns {
    pub message_count: usize,
    /// Mean length of user messages in characters
    pub avg_message_length: f64,
    /// Share of messages containing `?`
    pub question_ratio: f64,
    /// Share of messages asking for code
    pub code_request_ratio: f64,
}

/// Summarize user messages. No user messages gives all zeros.
pub fn user_patterns(conversations: &[Conversation]) -> UserPatterns {
    let messages: Vec<&str> = conversations
        .iter()
        .flat_map(|c| c.user_messages())
        .map(|m| m.content.as_str())
        .collect();

    if messages.is_empty() {
        return UserPatterns::default();
    }

    let total = messages.len() as f64;
    let total_chars: usize = messages.iter().map(|m| char_len(m)).sum();
    let questions = messages.iter().filter(|m| m.contains('?')).count();
    let code_requests = messages
        .iter()
        .filter(|m| {
            let lower = m.to_lowercase();
            CODE_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .count();

    UserPatterns {
        message_count: messages.len(),
        avg_message_length: total_chars as f64 / total,
        question_ratio: questions as f64 / total,
        code_request_ratio: code_requests as f64 / total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, ToolCall};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write_session(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    fn set_mtime(path: &Path, secs: u64) {
        let file = fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(secs))
            .unwrap();
    }

    const USER_LINE: &str = r#"{"type":"user","message":{"content":"hello"}}"#;

    #[test]
    fn test_missing_log_dir_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let reader = LogReader::new(tmp.path().join("nope"));

        assert!(reader.project_dirs().unwrap().is_empty());
        assert!(reader.recent_conversations(10, None).unwrap().is_empty());
        assert!(reader.latest_session().unwrap().is_none());
    }

    #[test]
    fn test_recent_conversations_newest_first_and_skips_empty() {
        let tmp = TempDir::new().unwrap();
        let projects = tmp.path().join("projects");

        let old = write_session(&projects.join("-a"), "old.jsonl", &[USER_LINE]);
        let empty = write_session(&projects.join("-a"), "empty.jsonl", &["not json"]);
        let new = write_session(&projects.join("-b"), "new.jsonl", &[USER_LINE]);
        set_mtime(&old, 1_000);
        set_mtime(&empty, 3_000);
        set_mtime(&new, 2_000);

        let reader = LogReader::new(tmp.path());
        let convs = reader.recent_conversations(10, None).unwrap();
        let ids: Vec<_> = convs.iter().map(|c| c.session_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);

        let limited = reader.recent_conversations(1, None).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].session_id, "new");

        let filtered = reader.recent_conversations(10, Some("-a")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].session_id, "old");

        assert_eq!(reader.latest_session().unwrap(), Some(empty));
    }

    #[test]
    fn test_discovery_with_glob_characters_in_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("user[1]").join(".claude");
        write_session(&root.join("projects").join("-a*b?"), "s1.jsonl", &[USER_LINE]);
        let reader = LogReader::new(&root);

        let convs = reader.recent_conversations(10, None).unwrap();
        assert_eq!(convs.len(), 1);
        assert_eq!(convs[0].session_id, "s1");

        let unbalanced = tmp.path().join("odd[").join(".claude");
        write_session(&unbalanced.join("projects").join("-p"), "s2.jsonl", &[USER_LINE]);
        let latest = LogReader::new(&unbalanced).latest_session().unwrap();
        assert!(latest.unwrap().ends_with("s2.jsonl"));
    }

    #[test]
    fn test_find_session() {
        let tmp = TempDir::new().unwrap();
        let path = write_session(
            &tmp.path().join("projects").join("-proj"),
            "abc-123.jsonl",
            &[USER_LINE],
        );

        let reader = LogReader::new(tmp.path());
        assert_eq!(reader.find_session("abc-123").unwrap(), Some(path));
        assert_eq!(reader.find_session("missing").unwrap(), None);
    }

    #[test]
    fn test_all_tool_usage_counts_every_call() {
        let convs = vec![
            Conversation::new(
                "s1",
                vec![
                    Message::user("go"),
                    Message::assistant(
                        "",
                        vec![
                            ToolCall::new("Read", json!({})),
                            ToolCall::new("Edit", json!({})),
                            ToolCall::new("Read", json!({})),
                        ],
                    ),
                ],
            ),
            Conversation::new(
                "s2",
                vec![Message::assistant("", vec![ToolCall::new("Bash", json!({}))])],
            ),
        ];

        let usage = all_tool_usage(&convs);
        assert_eq!(
            usage,
            vec![
                Tally::new("Read", 2),
                Tally::new("Bash", 1),
                Tally::new("Edit", 1)
            ]
        );
        let total: usize = usage.iter().map(|t| t.count).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_all_tool_usage_empty() {
        assert!(all_tool_usage(&[]).is_empty());
    }

    #[test]
    fn test_user_patterns() {
        let convs = vec![Conversation::new(
            "s",
            vec![
                Message::user("이거 뭐야?"),
                Message::assistant("설명", vec![]),
                Message::user("Write a function"),
                Message::user("ok"),
                Message::user("코드 고쳐줘"),
            ],
        )];

        let stats = user_patterns(&convs);
        assert_eq!(stats.message_count, 4);
        assert!((stats.question_ratio - 0.25).abs() < 1e-9);
        assert!((stats.code_request_ratio - 0.5).abs() < 1e-9);
        // 6 + 16 + 2 + 6 characters
        assert!((stats.avg_message_length - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_user_patterns_without_messages() {
        assert_eq!(user_patterns(&[]), UserPatterns::default());
    }
}
