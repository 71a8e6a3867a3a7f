//! Session hand-off notes (`HANDOFF.md`)
//!
//! Summarizes one session so a fresh session can pick up the work: what
//! got done, what the user still asked for, and which files were touched.

use crate::error::{Error, Result};
use crate::format::{char_len, truncate_chars};
use crate::ingest::{read_conversation, LogReader};
use crate::types::Conversation;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub const HANDOFF_MD: &str = "HANDOFF.md";

const DONE_MARKERS: &[&str] = &["완료", "done"];
const REQUEST_MARKERS: &[&str] = &["해줘", "해주세요", "하자", "해야", "필요", "todo"];
const MAX_TASKS: usize = 5;
const MAX_FILES: usize = 10;
const MAX_NEXT_STEPS: usize = 3;
const NO_SUMMARY: &str = "세션 요약 없음";
const NEXT_STEP_PLACEHOLDER: &str = "다음 작업을 정의하세요";

const USAGE_FOOTER: &str = "---

## 사용 방법

이 파일을 새 Claude 세션에 붙여넣으면 컨텍스트가 전달됩니다:

```
아래 HANDOFF.md를 읽고 이전 작업을 이어서 진행해주세요.

[HANDOFF.md 내용 붙여넣기]
```

---

*Generated by [claude-config](https://github.com/besslframework-stack/claude-config)*
";

/// What a hand-off note says about a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffContext {
    pub summary: String,
    pub completed_tasks: Vec<String>,
    pub pending_tasks: Vec<String>,
    pub important_files: Vec<String>,
    pub next_steps: Vec<String>,
}

/// Drop repeats (first occurrence wins), then keep the last `keep`.
fn dedup_keep_last(items: Vec<String>, keep: usize) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    let skip = unique.len().saturating_sub(keep);
    unique.into_iter().skip(skip).collect()
}

impl HandoffContext {
    pub fn from_conversation(conv: &Conversation) -> Self {
        let mut completed = Vec::new();
        let mut pending = Vec::new();
        let mut files: Vec<String> = Vec::new();

        for msg in &conv.messages {
            if msg.is_assistant() {
                let lower = msg.content.to_lowercase();
                if DONE_MARKERS.iter().any(|m| lower.contains(m)) {
                    let line = msg
                        .content
                        .split('\n')
                        .take(3)
                        .find(|l| !l.trim().is_empty() && char_len(l) < 100);
                    if let Some(line) = line {
                        completed.push(truncate_chars(line.trim(), 80));
                    }
                }

                for call in &msg.tool_calls {
                    let Some(path) = call.input_str("file_path").filter(|p| !p.is_empty()) else {
                        continue;
                    };
                    if path.starts_with("/tmp") {
                        continue;
                    }
                    let name = Path::new(path)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.to_string());
                    if !files.contains(&name) && files.len() < MAX_FILES {
                        files.push(name);
                    }
                }
            } else {
                let lower = msg.content.to_lowercase();
                if REQUEST_MARKERS.iter().any(|m| lower.contains(m))
                    && char_len(&msg.content) < 150
                {
                    pending.push(truncate_chars(msg.content.trim(), 100));
                }
            }
        }

        let completed_tasks = dedup_keep_last(completed, MAX_TASKS);
        let pending_tasks = dedup_keep_last(pending, MAX_TASKS);

        let summary = conv
            .user_messages()
            .map(|m| m.content.as_str())
            .find(|c| !c.is_empty())
            .map(|c| truncate_chars(c, 200))
            .unwrap_or_else(|| NO_SUMMARY.to_string());

        let next_steps = if pending_tasks.is_empty() {
            vec![NEXT_STEP_PLACEHOLDER.to_string()]
        } else {
            pending_tasks.iter().take(MAX_NEXT_STEPS).cloned().collect()
        };

        Self {
            summary,
            completed_tasks,
            pending_tasks,
            important_files: files,
            next_steps,
        }
    }
}

fn bullet_list(items: &[String], prefix: &str, empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_handoff(
    context: &HandoffContext,
    session_id: Option<&str>,
    notes: Option<&str>,
    now: DateTime<Local>,
) -> String {
    let files = context
        .important_files
        .iter()
        .map(|f| format!("`{}`", f))
        .collect::<Vec<_>>();
    let next_steps = if context.next_steps.is_empty() {
        format!("1. {}", NEXT_STEP_PLACEHOLDER)
    } else {
        context
            .next_steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut md = format!(
        "# HANDOFF.md\n\n> 세션 인수인계 문서\n> 생성: {}\n> 세션 ID: {}\n\n---\n\n",
        now.format("%Y-%m-%d %H:%M"),
        session_id.unwrap_or("N/A")
    );
    md.push_str(&format!("## 요약\n\n{}\n\n---\n\n", context.summary));
    md.push_str(&format!(
        "## 완료된 작업\n\n{}\n\n---\n\n",
        bullet_list(&context.completed_tasks, "- [x] ", "- 아직 완료된 작업 없음")
    ));
    md.push_str(&format!(
        "## 남은 작업\n\n{}\n\n---\n\n",
        bullet_list(&context.pending_tasks, "- [ ] ", "- 남은 작업 없음")
    ));
    md.push_str(&format!(
        "## 중요 파일\n\n{}\n\n---\n\n",
        bullet_list(&files, "- ", "- 특별히 없음")
    ));
    md.push_str(&format!("## 다음 단계\n\n{}\n", next_steps));
    if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
        md.push_str(&format!("\n## 추가 메모\n\n{}\n", notes));
    }
    md.push('\n');
    md.push_str(USAGE_FOOTER);
    md
}

/// A note written from the given text alone, without reading any log.
pub fn render_quick_handoff(notes: &str, now: DateTime<Local>) -> String {
    format!(
        "# HANDOFF.md\n\n> 빠른 세션 인수인계\n> 생성: {}\n\n---\n\n## 현재 상태\n\n{}\n\n---\n\n## 사용 방법\n\n이 파일을 새 Claude 세션에 붙여넣으면 컨텍스트가 전달됩니다.\n\n---\n\n*Generated by [claude-config](https://github.com/besslframework-stack/claude-config)*\n",
        now.format("%Y-%m-%d %H:%M"),
        notes
    )
}

/// Which session to hand off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSelector {
    Latest,
    Id(String),
}

impl From<&str> for SessionSelector {
    fn from(value: &str) -> Self {
        match value {
            "" | "latest" => SessionSelector::Latest,
            id => SessionSelector::Id(id.to_string()),
        }
    }
}

pub struct HandoffGenerator {
    reader: LogReader,
}

impl HandoffGenerator {
    pub fn new(reader: LogReader) -> Self {
        Self { reader }
    }

    /// Session file for `selector`.
    ///
    /// `Ok(None)` when there are no sessions at all; an unknown id is
    /// [`Error::SessionNotFound`].
    pub fn resolve(&self, selector: &SessionSelector) -> Result<Option<PathBuf>> {
        match selector {
            SessionSelector::Latest => self.reader.latest_session(),
            SessionSelector::Id(id) => match self.reader.find_session(id)? {
                Some(path) => Ok(Some(path)),
                None => Err(Error::SessionNotFound(id.clone())),
            },
        }
    }

    /// Write a hand-off note for the selected session to `output`.
    ///
    /// Returns the written path, or `None` when no session exists.
    pub fn create(
        &self,
        selector: &SessionSelector,
        output: &Path,
        notes: Option<&str>,
    ) -> Result<Option<PathBuf>> {
        let Some(session_path) = self.resolve(selector)? else {
            return Ok(None);
        };

        let conv = read_conversation(&session_path)?;
        let context = HandoffContext::from_conversation(&conv);
        let content = render_handoff(&context, Some(&conv.session_id), notes, Local::now());

        write_output(output, &content)?;
        tracing::info!(
            session = %conv.session_id,
            output = %output.display(),
            "Wrote handoff note"
        );
        Ok(Some(output.to_path_buf()))
    }

    pub fn create_quick(&self, output: &Path, notes: &str) -> Result<PathBuf> {
        write_output(output, &render_quick_handoff(notes, Local::now()))?;
        Ok(output.to_path_buf())
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
