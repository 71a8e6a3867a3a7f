//! `claude-config learn`

use crate::{load_conversations, prompt};
use anyhow::{Context, Result};
use chrono::Local;
use claude_config_core::document::{find_claude_md, ApplyOutcome, ChangeStatus};
use claude_config_core::suggest::render_update_report;
use claude_config_core::{ApplyMode, ClaudeMdUpdater, Config, PatternExtractor, SuggestionGenerator};
use std::path::{Path, PathBuf};

pub fn cmd_learn(
    config: &Config,
    cwd: &Path,
    limit: usize,
    claude_md: Option<PathBuf>,
    apply: bool,
    yes: bool,
) -> Result<()> {
    let conversations = load_conversations(config, limit, None);
    if conversations.is_empty() {
        println!("No conversations to learn from.");
        return Ok(());
    }

    let report = PatternExtractor::new(config.limits).analyze(&conversations);
    let suggestions = SuggestionGenerator::new(config.thresholds, &config.limits).generate(&report);

    print!("{}", render_update_report(&suggestions, Local::now()));
    if suggestions.is_empty() {
        return Ok(());
    }

    let path = claude_md.unwrap_or_else(|| find_claude_md(cwd));
    let updater = ClaudeMdUpdater::new(&path, config.thresholds.duplicate_overlap);

    let preview = updater
        .apply(&suggestions, ApplyMode::Preview)
        .with_context(|| format!("failed to read {}", path.display()))?;
    print_changes(&preview);

    if preview.added() == 0 {
        println!("Nothing new to add to {}", path.display());
        return Ok(());
    }

    if !apply {
        println!();
        println!("Run with --apply to write these changes to {}", path.display());
        return Ok(());
    }

    if !yes && !prompt::confirm(&format!("Apply {} change(s) to {}?", preview.added(), path.display()))? {
        println!("Cancelled.");
        return Ok(());
    }

    let outcome = updater
        .apply(&suggestions, ApplyMode::Commit)
        .with_context(|| format!("failed to update {}", path.display()))?;
    println!("Updated {} ({} added)", path.display(), outcome.added());
    Ok(())
}

fn print_changes(outcome: &ApplyOutcome) {
    println!("Planned changes:");
    for change in &outcome.changes {
        let status = match change.status {
            ChangeStatus::Added => "add",
            ChangeStatus::Duplicate => "skip (already present)",
            ChangeStatus::Dropped => "skip (unknown section)",
        };
        println!("  [{}] {}: {}", change.section, status, change.reason);
    }
}
