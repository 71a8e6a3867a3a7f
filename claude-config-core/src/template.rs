//! Fresh `CLAUDE.md` generation
//!
//! A [`Profile`] (answered interactively or defaulted) plus an optional
//! [`InitAnalysis`] of past sessions render into the initial document. The
//! output ends with the four managed section headers so later merges land
//! in the right place.

use crate::analysis::PatternReport;
use crate::document::SectionKind;
use crate::error::Result;
use crate::types::Tally;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Roles offered by the interactive setup, in menu order.
pub const ROLE_CHOICES: &[&str] = &[
    "백엔드 개발자",
    "프론트엔드 개발자",
    "풀스택 개발자",
    "데이터/ML 엔지니어",
    "DevOps/인프라 엔지니어",
    "개발자",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// 존댓말
    #[default]
    Formal,
    /// 반말
    Casual,
    English,
}

impl Tone {
    /// Menu choice `1`-`3`; anything else is the default.
    pub fn from_choice(choice: &str) -> Self {
        match choice.trim() {
            "2" => Tone::Casual,
            "3" => Tone::English,
            _ => Tone::Formal,
        }
    }

    fn rule(&self) -> &'static str {
        match self {
            Tone::Formal => "항상 존댓말을 사용합니다.",
            Tone::Casual => "반말로 대화합니다.",
            Tone::English => "Respond in English.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeStyle {
    /// 간결함 우선
    Concise,
    /// 명확함 우선
    Explicit,
    #[default]
    Balanced,
}

impl CodeStyle {
    pub fn from_choice(choice: &str) -> Self {
        match choice.trim() {
            "1" => CodeStyle::Concise,
            "2" => CodeStyle::Explicit,
            _ => CodeStyle::Balanced,
        }
    }

    fn bullets(&self) -> &'static [&'static str] {
        match self {
            CodeStyle::Concise => &["최소한의 코드로 작성", "불필요한 주석 제거", "자명한 코드 선호"],
            CodeStyle::Explicit => &[
                "명시적인 타입 선언",
                "복잡한 로직에 주석 추가",
                "함수/변수명은 설명적으로",
            ],
            CodeStyle::Balanced => &[
                "간결함과 명확함의 균형",
                "필요한 곳에만 주석",
                "일관된 네이밍 컨벤션",
            ],
        }
    }
}

/// Who the document is written for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub role: String,
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub tone: Tone,
    pub code_style: CodeStyle,
    pub extra_rules: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            role: "풀스택 개발자".to_string(),
            languages: vec!["TypeScript".to_string(), "Python".to_string()],
            frameworks: Vec::new(),
            tone: Tone::default(),
            code_style: CodeStyle::default(),
            extra_rules: None,
        }
    }
}

impl Profile {
    /// Role for menu choice `1`-`6`. Blank picks the full-stack default.
    pub fn role_from_choice(choice: &str) -> String {
        let choice = choice.trim();
        if choice.is_empty() {
            return Profile::default().role;
        }
        choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| ROLE_CHOICES.get(idx))
            .unwrap_or(&"개발자")
            .to_string()
    }

    /// Split a comma separated answer, dropping blanks.
    pub fn parse_list(answer: &str) -> Vec<String> {
        answer
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// The slice of past-session statistics the initial document mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitAnalysis {
    pub tone_corrected: bool,
    pub top_requests: Vec<Tally>,
    pub top_extensions: Vec<Tally>,
    pub top_tools: Vec<Tally>,
}

impl InitAnalysis {
    pub fn from_report(report: &PatternReport, tool_usage: &[Tally]) -> Self {
        Self {
            tone_corrected: report.has_tone_correction(),
            top_requests: report.repeated_requests.iter().take(3).cloned().collect(),
            top_extensions: report
                .edit_patterns
                .by_extension
                .iter()
                .take(3)
                .cloned()
                .collect(),
            top_tools: tool_usage.iter().take(5).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.tone_corrected
            && self.top_requests.is_empty()
            && self.top_extensions.is_empty()
            && self.top_tools.is_empty()
    }
}

const COMMIT_CONVENTIONS: &str = "\
```
feat: 새로운 기능
fix: 버그 수정
docs: 문서 변경
style: 코드 포맷팅
refactor: 리팩토링
test: 테스트
chore: 빌드/설정
```
";

pub fn render_claude_md(profile: &Profile, analysis: Option<&InitAnalysis>, date: NaiveDate) -> String {
    let mut md = String::new();

    md.push_str("# CLAUDE.md\n\n");
    md.push_str("> 이 파일은 claude-config에 의해 자동 생성되었습니다.\n");
    md.push_str(&format!("> 생성일: {}\n\n---\n\n", date.format("%Y-%m-%d")));

    md.push_str("## 프로젝트 개요\n\n");
    md.push_str(&format!(
        "이 프로젝트는 {}가 작업하는 코드베이스입니다.\n\n",
        profile.role
    ));
    md.push_str("### 주요 기술 스택\n");
    for lang in &profile.languages {
        md.push_str(&format!("- {}\n", lang));
    }
    if !profile.frameworks.is_empty() {
        md.push_str("\n### 프레임워크\n");
        for fw in &profile.frameworks {
            md.push_str(&format!("- {}\n", fw));
        }
    }

    md.push_str("\n---\n\n## 코딩 규칙\n\n### 말투\n");
    md.push_str(&format!("- {}\n\n", profile.tone.rule()));
    md.push_str("### 코드 스타일\n");
    for bullet in profile.code_style.bullets() {
        md.push_str(&format!("- {}\n", bullet));
    }

    if let Some(extra) = profile.extra_rules.as_deref().filter(|s| !s.trim().is_empty()) {
        md.push_str(&format!("\n### 추가 규칙\n- {}\n", extra.trim()));
    }

    if let Some(analysis) = analysis.filter(|a| !a.is_empty()) {
        md.push_str("\n---\n\n## 학습된 패턴 (대화 로그 분석)\n\n");
        if analysis.tone_corrected {
            md.push_str("### 말투 교정 이력\n- 말투 관련 교정이 감지되었습니다. 위 말투 규칙을 준수해주세요.\n\n");
        }
        if !analysis.top_requests.is_empty() {
            md.push_str("### 자주 하는 작업\n");
            for t in &analysis.top_requests {
                md.push_str(&format!("- {}: {}회\n", t.label, t.count));
            }
            md.push('\n');
        }
        if !analysis.top_extensions.is_empty() {
            md.push_str("### 주요 작업 파일\n");
            for t in &analysis.top_extensions {
                md.push_str(&format!("- .{}: {}회 편집\n", t.label, t.count));
            }
            md.push('\n');
        }
        if !analysis.top_tools.is_empty() {
            md.push_str("### 자주 쓰는 도구\n");
            for t in &analysis.top_tools {
                md.push_str(&format!("- {}: {}회\n", t.label, t.count));
            }
            md.push('\n');
        }
    } else {
        md.push('\n');
    }

    md.push_str("---\n\n## 커밋 메시지 규칙\n\n");
    md.push_str(COMMIT_CONVENTIONS);
    md.push_str("\n---\n\n");

    // Managed sections, filled in by `claude-config learn`
    for kind in [
        SectionKind::Permanent,
        SectionKind::Validated,
        SectionKind::Recent,
        SectionKind::Deprecated,
    ] {
        if let Some(header) = kind.canonical_header() {
            md.push_str(header);
            md.push_str("\n\n");
        }
    }

    md.push_str("---\n\n*이 파일은 `claude-config learn` 명령으로 자동 업데이트됩니다.*\n");
    md
}

/// Backup location for an existing document (`CLAUDE.md` → `CLAUDE.md.backup`).
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".backup");
    path.with_file_name(name)
}

/// Write `content` to `path`, first moving any existing file aside.
///
/// Returns the backup path when a backup was made.
pub fn write_with_backup(path: &Path, content: &str) -> Result<Option<PathBuf>> {
    let backup = if path.exists() {
        let backup = backup_path(path);
        std::fs::rename(path, &backup)?;
        tracing::info!(backup = %backup.display(), "Backed up existing document");
        Some(backup)
    } else {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        None
    };

    std::fs::write(path, content)?;
    Ok(backup)
}
