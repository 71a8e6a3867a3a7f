//! Error types for claude-config-core

use thiserror::Error;

/// Main error type for the claude-config-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid glob pattern built from a log directory path
    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Session not found
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Unknown hook template name
    #[error("unknown hook template: {0}")]
    HookTemplateNotFound(String),

    /// settings.json exists but has an unexpected shape
    #[error("invalid settings file {path}: {message}")]
    Settings { path: String, message: String },
}

/// Result type alias for claude-config-core
pub type Result<T> = std::result::Result<T, Error>;
