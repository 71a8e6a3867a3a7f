//! # claude-config-core
//!
//! Core library for claude-config - learns from Claude Code session logs and
//! keeps `CLAUDE.md` in step with how you actually work.
//!
//! This library provides:
//! - A reader for Claude Code JSONL session logs
//! - Pattern extraction (corrections, repeated requests, edit habits, tool sequences)
//! - Suggestion generation and section-aware merging into `CLAUDE.md`
//! - Initial `CLAUDE.md` generation, hook management and hand-off notes
//! - Configuration management and logging infrastructure
//!
//! ## Pipeline
//!
//! ```text
//! session logs ─► ingest ─► analysis ─► suggest ─► document
//!  (JSONL)       Conversation  PatternReport  Suggestion  CLAUDE.md
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use claude_config_core::{Config, LogReader, PatternExtractor, SuggestionGenerator};
//!
//! let config = Config::load().expect("failed to load config");
//! let reader = LogReader::new(config.claude_dir());
//! let conversations = reader.recent_conversations(30, None).expect("failed to read logs");
//!
//! let report = PatternExtractor::new(config.limits).analyze(&conversations);
//! let suggestions = SuggestionGenerator::new(config.thresholds, &config.limits).generate(&report);
//! println!("{} suggestions", suggestions.len());
//! ```

// Re-export commonly used items at the crate root
pub use analysis::{PatternExtractor, PatternReport};
pub use config::Config;
pub use document::{ApplyMode, ClaudeMdUpdater};
pub use error::{Error, Result};
pub use ingest::LogReader;
pub use suggest::SuggestionGenerator;
pub use types::*;

// Public modules
pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod handoff;
pub mod hooks;
pub mod ingest;
pub mod logging;
pub mod suggest;
pub mod template;
pub mod types;
