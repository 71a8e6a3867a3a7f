//! `.claude/settings.json` hook management
//!
//! Claude Code runs shell commands before or after tool calls whose name
//! matches a pattern. They are configured per project:
//!
//! ```json
//! {
//!   "hooks": {
//!     "preToolUse": [],
//!     "postToolUse": [
//!       { "matcher": "Edit", "hooks": [{ "type": "command", "command": "npx eslint $FILE" }] }
//!     ]
//!   }
//! }
//! ```
//!
//! Keys this module does not manage are carried through unchanged.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::str::FromStr;

/// A ready-made hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HookTemplate {
    pub name: &'static str,
    pub matcher: &'static str,
    pub command: &'static str,
    pub description: &'static str,
}

pub const HOOK_TEMPLATES: &[HookTemplate] = &[
    HookTemplate {
        name: "lint-python",
        matcher: "Edit",
        command: "python -m black --check $FILE && python -m isort --check-only $FILE",
        description: "Python 파일 편집 시 Black/isort 체크",
    },
    HookTemplate {
        name: "lint-js",
        matcher: "Edit",
        command: "npx eslint $FILE",
        description: "JavaScript/TypeScript 파일 편집 시 ESLint 체크",
    },
    HookTemplate {
        name: "test-python",
        matcher: "Edit",
        command: "python -m pytest --tb=short -q",
        description: "Python 파일 편집 후 테스트 실행",
    },
    HookTemplate {
        name: "test-js",
        matcher: "Edit",
        command: "npm test -- --passWithNoTests",
        description: "JS 파일 편집 후 테스트 실행",
    },
    HookTemplate {
        name: "no-env-commit",
        matcher: "Bash",
        command: r#"! grep -q '\.env' <<< "$COMMAND" || echo 'Warning: .env file operation detected'"#,
        description: ".env 파일 조작 경고",
    },
    HookTemplate {
        name: "no-force-push",
        matcher: "Bash",
        command: r#"! grep -q 'push.*--force\|push.*-f' <<< "$COMMAND" || exit 1"#,
        description: "force push 방지",
    },
    HookTemplate {
        name: "build-check",
        matcher: "Write",
        command: "npm run build --if-present || true",
        description: "파일 작성 후 빌드 체크",
    },
    HookTemplate {
        name: "type-check",
        matcher: "Edit",
        command: "npx tsc --noEmit",
        description: "TypeScript 타입 체크",
    },
];

pub fn find_template(name: &str) -> Option<&'static HookTemplate> {
    HOOK_TEMPLATES.iter().find(|t| t.name == name)
}

/// When a hook runs relative to the tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookEvent {
    PreToolUse,
    #[default]
    PostToolUse,
}

impl HookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::PreToolUse => "preToolUse",
            HookEvent::PostToolUse => "postToolUse",
        }
    }
}

impl std::fmt::Display for HookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HookEvent {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretooluse" | "pre" => Ok(HookEvent::PreToolUse),
            "posttooluse" | "post" => Ok(HookEvent::PostToolUse),
            other => Err(format!(
                "unknown hook event '{}' (expected preToolUse or postToolUse)",
                other
            )),
        }
    }
}

// ============================================
// settings.json model
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<HooksSection>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HooksSection {
    #[serde(rename = "preToolUse", default)]
    pub pre_tool_use: Vec<HookEntry>,
    #[serde(rename = "postToolUse", default)]
    pub post_tool_use: Vec<HookEntry>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl HooksSection {
    pub fn entries(&self, event: HookEvent) -> &[HookEntry] {
        match event {
            HookEvent::PreToolUse => &self.pre_tool_use,
            HookEvent::PostToolUse => &self.post_tool_use,
        }
    }

    fn entries_mut(&mut self, event: HookEvent) -> &mut Vec<HookEntry> {
        match event {
            HookEvent::PreToolUse => &mut self.pre_tool_use,
            HookEvent::PostToolUse => &mut self.post_tool_use,
        }
    }
}

/// Commands run for tool calls matching `matcher`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookEntry {
    #[serde(default)]
    pub matcher: String,
    #[serde(default)]
    pub hooks: Vec<HookCommand>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookCommand {
    #[serde(rename = "type", default = "default_command_type")]
    pub kind: String,
    #[serde(default)]
    pub command: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

fn default_command_type() -> String {
    "command".to_string()
}

impl HookCommand {
    pub fn shell(command: impl Into<String>) -> Self {
        Self {
            kind: default_command_type(),
            command: command.into(),
            other: Map::new(),
        }
    }
}

// ============================================
// Manager
// ============================================

/// Reads and edits the hooks of one project.
#[derive(Debug, Clone)]
pub struct HooksManager {
    project_dir: PathBuf,
}

impl HooksManager {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.project_dir.join(".claude").join("settings.json")
    }

    /// Current settings; defaults when the file does not exist.
    pub fn read_settings(&self) -> Result<Settings> {
        let path = self.settings_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| Error::Settings {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn write_settings(&self, settings: &Settings) -> Result<()> {
        let path = self.settings_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(settings)?;
        json.push('\n');
        std::fs::write(&path, json)?;
        tracing::debug!(path = %path.display(), "Wrote settings");
        Ok(())
    }

    /// Configured hooks, if the section exists.
    pub fn hooks(&self) -> Result<Option<HooksSection>> {
        Ok(self.read_settings()?.hooks)
    }

    /// Create an empty hooks section. `false` when one already exists.
    pub fn init_hooks(&self) -> Result<bool> {
        let mut settings = self.read_settings()?;
        if settings.hooks.is_some() {
            return Ok(false);
        }
        settings.hooks = Some(HooksSection::default());
        self.write_settings(&settings)?;
        Ok(true)
    }

    /// Add a catalog hook. Joins an existing entry with the same matcher.
    pub fn add_template(&self, name: &str, event: HookEvent) -> Result<&'static HookTemplate> {
        let template =
            find_template(name).ok_or_else(|| Error::HookTemplateNotFound(name.to_string()))?;

        let mut settings = self.read_settings()?;
        let entries = settings
            .hooks
            .get_or_insert_with(HooksSection::default)
            .entries_mut(event);

        match entries.iter_mut().find(|e| e.matcher == template.matcher) {
            Some(existing) => existing.hooks.push(HookCommand::shell(template.command)),
            None => entries.push(HookEntry {
                matcher: template.matcher.to_string(),
                hooks: vec![HookCommand::shell(template.command)],
                other: Map::new(),
            }),
        }

        self.write_settings(&settings)?;
        tracing::info!(template = name, event = %event, "Added hook template");
        Ok(template)
    }

    /// Add a new entry with a single command.
    pub fn add_custom(&self, matcher: &str, command: &str, event: HookEvent) -> Result<()> {
        let mut settings = self.read_settings()?;
        settings
            .hooks
            .get_or_insert_with(HooksSection::default)
            .entries_mut(event)
            .push(HookEntry {
                matcher: matcher.to_string(),
                hooks: vec![HookCommand::shell(command)],
                other: Map::new(),
            });
        self.write_settings(&settings)?;
        tracing::info!(matcher, event = %event, "Added custom hook");
        Ok(())
    }

    /// Remove every entry for `matcher`. `true` when something was removed.
    pub fn remove(&self, matcher: &str, event: HookEvent) -> Result<bool> {
        let mut settings = self.read_settings()?;
        let Some(section) = settings.hooks.as_mut() else {
            return Ok(false);
        };

        let entries = section.entries_mut(event);
        let before = entries.len();
        entries.retain(|e| e.matcher != matcher);
        if entries.len() == before {
            return Ok(false);
        }

        self.write_settings(&settings)?;
        Ok(true)
    }

    pub fn templates(&self) -> &'static [HookTemplate] {
        HOOK_TEMPLATES
    }

    /// Template names that fit the files present in the project.
    pub fn suggest(&self) -> Vec<&'static str> {
        let has = |name: &str| self.project_dir.join(name).exists();
        let mut names = Vec::new();

        if has("pyproject.toml") || has("requirements.txt") {
            names.extend(["lint-python", "test-python"]);
        }
        if has("package.json") {
            names.extend(["lint-js", "test-js"]);
            if has("tsconfig.json") {
                names.push("type-check");
            }
        }
        if has(".git") {
            names.push("no-force-push");
        }
        if has(".env") || has(".env.local") {
            names.push("no-env-commit");
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn manager() -> (TempDir, HooksManager) {
        let tmp = TempDir::new().unwrap();
        let manager = HooksManager::new(tmp.path());
        (tmp, manager)
    }

    fn raw_settings(manager: &HooksManager) -> Value {
        serde_json::from_str(&std::fs::read_to_string(manager.settings_path()).unwrap()).unwrap()
    }

    #[test]
    fn test_catalog() {
        assert_eq!(HOOK_TEMPLATES.len(), 8);
        assert_eq!(find_template("type-check").unwrap().command, "npx tsc --noEmit");
        assert!(find_template("nope").is_none());
    }

    #[test]
    fn test_event_parsing() {
        assert_eq!("preToolUse".parse::<HookEvent>().unwrap(), HookEvent::PreToolUse);
        assert_eq!("post".parse::<HookEvent>().unwrap(), HookEvent::PostToolUse);
        assert!("during".parse::<HookEvent>().is_err());
    }

    #[test]
    fn test_init_hooks_once() {
        let (_tmp, manager) = manager();
        assert!(manager.hooks().unwrap().is_none());
        assert!(manager.init_hooks().unwrap());
        assert!(!manager.init_hooks().unwrap());

        assert_eq!(
            raw_settings(&manager),
            json!({"hooks": {"preToolUse": [], "postToolUse": []}})
        );
    }

    #[test]
    fn test_add_template_merges_same_matcher() {
        let (_tmp, manager) = manager();
        manager.add_template("lint-js", HookEvent::PostToolUse).unwrap();
        manager.add_template("type-check", HookEvent::PostToolUse).unwrap();
        manager.add_template("no-force-push", HookEvent::PreToolUse).unwrap();

        let hooks = manager.hooks().unwrap().unwrap();
        let post = hooks.entries(HookEvent::PostToolUse);
        assert_eq!(post.len(), 1);
        assert_eq!(post[0].matcher, "Edit");
        let commands: Vec<_> = post[0].hooks.iter().map(|h| h.command.as_str()).collect();
        assert_eq!(commands, vec!["npx eslint $FILE", "npx tsc --noEmit"]);
        assert_eq!(hooks.entries(HookEvent::PreToolUse)[0].matcher, "Bash");
    }

    #[test]
    fn test_add_unknown_template_is_error() {
        let (_tmp, manager) = manager();
        let err = manager.add_template("lint-cobol", HookEvent::PostToolUse).unwrap_err();
        assert!(matches!(err, Error::HookTemplateNotFound(name) if name == "lint-cobol"));
        assert!(!manager.settings_path().exists());
    }

    #[test]
    fn test_custom_and_remove() {
        let (_tmp, manager) = manager();
        assert!(!manager.remove("Bash", HookEvent::PostToolUse).unwrap());

        manager.add_custom("Bash", "echo one", HookEvent::PostToolUse).unwrap();
        manager.add_custom("Bash", "echo two", HookEvent::PostToolUse).unwrap();
        manager.add_custom("Read", "echo three", HookEvent::PostToolUse).unwrap();
        assert_eq!(
            manager.hooks().unwrap().unwrap().entries(HookEvent::PostToolUse).len(),
            3
        );

        assert!(!manager.remove("Bash", HookEvent::PreToolUse).unwrap());
        assert!(manager.remove("Bash", HookEvent::PostToolUse).unwrap());
        let remaining = manager.hooks().unwrap().unwrap();
        assert_eq!(remaining.entries(HookEvent::PostToolUse).len(), 1);
        assert_eq!(remaining.entries(HookEvent::PostToolUse)[0].matcher, "Read");
    }

    #[test]
    fn test_unknown_keys_survive() {
        let (_tmp, manager) = manager();
        std::fs::create_dir_all(manager.settings_path().parent().unwrap()).unwrap();
        std::fs::write(
            manager.settings_path(),
            r#"{"permissions": {"allow": ["Bash(ls)"]}, "hooks": {"postToolUse": [{"matcher": "Edit", "hooks": [{"type": "command", "command": "x", "timeout": 5}]}]}}"#,
        )
        .unwrap();

        manager.add_custom("Write", "y", HookEvent::PreToolUse).unwrap();

        let raw = raw_settings(&manager);
        assert_eq!(raw["permissions"], json!({"allow": ["Bash(ls)"]}));
        assert_eq!(raw["hooks"]["postToolUse"][0]["hooks"][0]["timeout"], 5);
        assert_eq!(raw["hooks"]["preToolUse"][0]["matcher"], "Write");
    }

    #[test]
    fn test_malformed_settings_is_error() {
        let (_tmp, manager) = manager();
        std::fs::create_dir_all(manager.settings_path().parent().unwrap()).unwrap();
        std::fs::write(manager.settings_path(), "{not json").unwrap();

        assert!(matches!(manager.read_settings(), Err(Error::Settings { .. })));
    }

    #[test]
    fn test_suggest_from_project_files() {
        let (tmp, manager) = manager();
        assert!(manager.suggest().is_empty());

        for file in ["package.json", "tsconfig.json", ".env"] {
            std::fs::write(tmp.path().join(file), "{}").unwrap();
        }
        std::fs::create_dir(tmp.path().join(".git")).unwrap();

        assert_eq!(
            manager.suggest(),
            vec!["lint-js", "test-js", "type-check", "no-force-push", "no-env-commit"]
        );
    }
}
