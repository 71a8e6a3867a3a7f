//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/claude-config/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/claude-config/` (~/.config/claude-config/)
//! - State/Logs: `$XDG_STATE_HOME/claude-config/` (~/.local/state/claude-config/)
//!
//! Every heuristic threshold and truncation length used by the analysis
//! pipeline lives here so it can be tuned without a rebuild.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
pub(crate) fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Log location overrides
    #[serde(default)]
    pub paths: PathsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Frequency thresholds for suggestions and duplicate detection
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Preview lengths and list caps
    #[serde(default)]
    pub limits: Limits,
}

/// Path overrides
#[derive(Debug, Deserialize, Default)]
pub struct PathsConfig {
    /// Override for the Claude Code data directory (default `~/.claude`)
    pub claude_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Thresholds that decide when a statistic turns into a suggestion.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Thresholds {
    /// Corrections needed before the tone rule is considered
    #[serde(default = "default_min_corrections")]
    pub min_corrections: usize,

    /// Occurrences of the top request category needed for a suggestion
    #[serde(default = "default_frequent_request")]
    pub frequent_request: usize,

    /// Edits to the dominant extension needed for a suggestion
    #[serde(default = "default_frequent_extension")]
    pub frequent_extension: usize,

    /// Occurrences of the top adjacent tool pair needed for a suggestion
    #[serde(default = "default_recurring_tool_pair")]
    pub recurring_tool_pair: usize,

    /// Fraction of candidate tokens already present for a rule to count as duplicate
    #[serde(default = "default_duplicate_overlap")]
    pub duplicate_overlap: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_corrections: default_min_corrections(),
            frequent_request: default_frequent_request(),
            frequent_extension: default_frequent_extension(),
            recurring_tool_pair: default_recurring_tool_pair(),
            duplicate_overlap: default_duplicate_overlap(),
        }
    }
}

fn default_min_corrections() -> usize {
    2
}

fn default_frequent_request() -> usize {
    5
}

fn default_frequent_extension() -> usize {
    10
}

fn default_recurring_tool_pair() -> usize {
    3
}

fn default_duplicate_overlap() -> f64 {
    0.7
}

/// Truncation lengths and list caps used by the extractor.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Limits {
    /// Characters kept from correction texts
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Characters kept from edit old/new strings
    #[serde(default = "default_edit_preview_chars")]
    pub edit_preview_chars: usize,

    /// Extensions kept in the edit ranking
    #[serde(default = "default_top_extensions")]
    pub top_extensions: usize,

    /// Raw edit records kept
    #[serde(default = "default_recent_edits")]
    pub recent_edits: usize,

    /// Tool names kept per workflow sequence
    #[serde(default = "default_workflow_prefix")]
    pub workflow_prefix: usize,

    /// Tool calls a session needs before it counts as a workflow
    #[serde(default = "default_min_workflow_length")]
    pub min_workflow_length: usize,

    /// Adjacent tool pairs listed in the workflow suggestion
    #[serde(default = "default_top_tool_pairs")]
    pub top_tool_pairs: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
            edit_preview_chars: default_edit_preview_chars(),
            top_extensions: default_top_extensions(),
            recent_edits: default_recent_edits(),
            workflow_prefix: default_workflow_prefix(),
            min_workflow_length: default_min_workflow_length(),
            top_tool_pairs: default_top_tool_pairs(),
        }
    }
}

fn default_preview_chars() -> usize {
    200
}

fn default_edit_preview_chars() -> usize {
    100
}

fn default_top_extensions() -> usize {
    10
}

fn default_recent_edits() -> usize {
    5
}

fn default_workflow_prefix() -> usize {
    10
}

fn default_min_workflow_length() -> usize {
    3
}

fn default_top_tool_pairs() -> usize {
    3
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        if !(0.0..=1.0).contains(&config.thresholds.duplicate_overlap) {
            return Err(Error::Config(
                "thresholds.duplicate_overlap must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/claude-config/config.toml` (~/.config/claude-config/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("claude-config").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/claude-config/` (~/.local/state/claude-config/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("claude-config")
    }

    /// Returns the log file path
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("claude-config.log")
    }

    /// Claude Code data directory: the configured override or `~/.claude`.
    pub fn claude_dir(&self) -> PathBuf {
        self.paths
            .claude_dir
            .clone()
            .unwrap_or_else(|| home_dir().join(".claude"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.paths.claude_dir.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.thresholds.min_corrections, 2);
        assert_eq!(config.thresholds.frequent_request, 5);
        assert_eq!(config.thresholds.frequent_extension, 10);
        assert_eq!(config.thresholds.recurring_tool_pair, 3);
        assert!((config.thresholds.duplicate_overlap - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.limits.preview_chars, 200);
        assert_eq!(config.limits.edit_preview_chars, 100);
        assert_eq!(config.limits.min_workflow_length, 3);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[paths]
claude_dir = "/tmp/claude-home"

[thresholds]
frequent_request = 8
duplicate_overlap = 0.5

[limits]
top_extensions = 3

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.claude_dir(), PathBuf::from("/tmp/claude-home"));
        assert_eq!(config.thresholds.frequent_request, 8);
        // Unspecified keys keep their defaults
        assert_eq!(config.thresholds.frequent_extension, 10);
        assert!((config.thresholds.duplicate_overlap - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.limits.top_extensions, 3);
        assert_eq!(config.limits.recent_edits, 5);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_rejects_bad_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[thresholds]\nduplicate_overlap = 1.5\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_missing_file_is_config_error() {
        let err = Config::load_from(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
