//! `CLAUDE.md` section parsing and merging
//!
//! The document is split into blocks, one per section header, in document
//! order. Text before the first recognized header is an `Other` block.
//! Joining the block texts gives back the input byte for byte, so an
//! untouched document round-trips exactly.
//!
//! Suggestions are appended to the last block of their section unless the
//! section already holds most of the suggestion's words.

use crate::error::Result;
use crate::types::Suggestion;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const CLAUDE_MD: &str = "CLAUDE.md";

/// Managed regions of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Permanent,
    Validated,
    Recent,
    Deprecated,
    Other,
}

impl SectionKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "permanent" => Some(SectionKind::Permanent),
            "validated" => Some(SectionKind::Validated),
            "recent" => Some(SectionKind::Recent),
            "deprecated" => Some(SectionKind::Deprecated),
            "other" => Some(SectionKind::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Permanent => "permanent",
            SectionKind::Validated => "validated",
            SectionKind::Recent => "recent",
            SectionKind::Deprecated => "deprecated",
            SectionKind::Other => "other",
        }
    }

    /// Header used when the section has to be created.
    pub fn canonical_header(&self) -> Option<&'static str> {
        match self {
            SectionKind::Permanent => Some("## 영구 규칙 (Permanent)"),
            SectionKind::Validated => Some("## 검증된 패턴 (Validated)"),
            SectionKind::Recent => Some("## 최근 학습 (Recent)"),
            SectionKind::Deprecated => Some("## 폐기 예정 (Deprecated)"),
            SectionKind::Other => None,
        }
    }
}

static SECTION_HEADERS: LazyLock<Vec<(SectionKind, Regex)>> = LazyLock::new(|| {
    [
        (SectionKind::Permanent, r"(?i)#\s*영구\s*규칙|#\s*Permanent"),
        (SectionKind::Validated, r"(?i)#\s*검증된\s*패턴|#\s*Validated"),
        (SectionKind::Recent, r"(?i)#\s*최근\s*학습|#\s*Recent"),
        (SectionKind::Deprecated, r"(?i)#\s*폐기\s*예정|#\s*Deprecated"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).unwrap()))
    .collect()
});

static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[가-힣]{2,}|[a-zA-Z]{3,}").unwrap());

/// Section a line opens, if it is a recognized header.
pub fn header_kind(line: &str) -> Option<SectionKind> {
    SECTION_HEADERS
        .iter()
        .find(|(_, re)| re.is_match(line))
        .map(|(kind, _)| *kind)
}

/// One contiguous block of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    /// Raw text including the header line and line terminators
    pub text: String,
}

/// A document split into section blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn parse(content: &str) -> Self {
        let mut sections = vec![Section {
            kind: SectionKind::Other,
            text: String::new(),
        }];

        for line in content.split_inclusive('\n') {
            if let Some(kind) = header_kind(line) {
                sections.push(Section {
                    kind,
                    text: line.to_string(),
                });
            } else if let Some(current) = sections.last_mut() {
                current.text.push_str(line);
            }
        }

        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }

    /// All text belonging to `kind`, across blocks.
    pub fn section_text(&self, kind: SectionKind) -> String {
        self.sections
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.text.as_str())
            .collect()
    }

    pub fn render(&self) -> String {
        self.sections.iter().map(|s| s.text.as_str()).collect()
    }

    /// Append `content` to the last block of `kind`, creating the section if needed.
    pub fn append(&mut self, kind: SectionKind, content: &str) {
        if !self.has_section(kind) {
            self.create_section(kind);
        }
        let Some(section) = self.sections.iter_mut().rev().find(|s| s.kind == kind) else {
            return;
        };

        let body_len = section.text.trim_end_matches('\n').len();
        let trailing = section.text.len() - body_len;
        section.text.truncate(body_len);

        if !section.text.is_empty() {
            section.text.push_str("\n\n");
        }
        section.text.push_str(content.trim_end_matches('\n'));
        section.text.push('\n');
        for _ in 1..trailing {
            section.text.push('\n');
        }
    }

    fn create_section(&mut self, kind: SectionKind) {
        let header = match kind.canonical_header() {
            Some(h) => h,
            // Other always exists as the leading block
            None => return,
        };

        if let Some(last) = self.sections.last_mut() {
            if !last.text.is_empty() && !last.text.ends_with('\n') {
                last.text.push('\n');
            }
            if !last.text.is_empty() && !last.text.ends_with("\n\n") {
                last.text.push('\n');
            }
        }
        self.sections.push(Section {
            kind,
            text: format!("{}\n", header),
        });
    }
}

/// True when most of `candidate`'s words already appear in `existing`.
///
/// A candidate with no words counts as a duplicate.
pub fn is_duplicate(existing: &str, candidate: &str, overlap: f64) -> bool {
    let candidate = candidate.to_lowercase();
    let tokens: Vec<&str> = WORD_TOKEN.find_iter(&candidate).map(|m| m.as_str()).collect();
    if tokens.is_empty() {
        return true;
    }

    let existing = existing.to_lowercase();
    let found = tokens.iter().filter(|t| existing.contains(*t)).count();
    found as f64 >= tokens.len() as f64 * overlap
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Compute the merged document without writing it
    Preview,
    /// Write the merged document
    Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Duplicate,
    /// Unknown section name
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedChange {
    pub section: String,
    pub status: ChangeStatus,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// The merged document
    pub content: String,
    pub changes: Vec<PlannedChange>,
}

impl ApplyOutcome {
    pub fn added(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| c.status == ChangeStatus::Added)
            .count()
    }
}

/// Merge `suggestions` into `content` in order.
pub fn merge(content: &str, suggestions: &[Suggestion], overlap: f64) -> ApplyOutcome {
    let mut document = Document::parse(content);
    let mut changes = Vec::with_capacity(suggestions.len());

    for suggestion in suggestions {
        let status = match SectionKind::from_name(&suggestion.section) {
            None => {
                tracing::debug!(section = %suggestion.section, "Dropping suggestion for unknown section");
                ChangeStatus::Dropped
            }
            Some(kind) if is_duplicate(&document.section_text(kind), &suggestion.content, overlap) => {
                ChangeStatus::Duplicate
            }
            Some(kind) => {
                document.append(kind, &suggestion.content);
                ChangeStatus::Added
            }
        };
        changes.push(PlannedChange {
            section: suggestion.section.clone(),
            status,
            reason: suggestion.reason.clone(),
        });
    }

    ApplyOutcome {
        content: document.render(),
        changes,
    }
}

/// Reads and updates one `CLAUDE.md`.
#[derive(Debug, Clone)]
pub struct ClaudeMdUpdater {
    path: PathBuf,
    overlap: f64,
}

impl ClaudeMdUpdater {
    pub fn new(path: impl Into<PathBuf>, overlap: f64) -> Self {
        Self {
            path: path.into(),
            overlap,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current content; empty when the file does not exist.
    pub fn read(&self) -> Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn apply(&self, suggestions: &[Suggestion], mode: ApplyMode) -> Result<ApplyOutcome> {
        let current = self.read()?;
        let outcome = merge(&current, suggestions, self.overlap);

        if mode == ApplyMode::Commit {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, &outcome.content)?;
            tracing::info!(
                path = %self.path.display(),
                added = outcome.added(),
                "Updated CLAUDE.md"
            );
        }

        Ok(outcome)
    }
}

/// First `CLAUDE.md` in `start` or its ancestors, else `start/CLAUDE.md`.
pub fn find_claude_md(start: &Path) -> PathBuf {
    start
        .ancestors()
        .map(|dir| dir.join(CLAUDE_MD))
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| start.join(CLAUDE_MD))
}
