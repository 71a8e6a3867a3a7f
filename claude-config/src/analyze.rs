//! `claude-config analyze`

use crate::load_conversations;
use anyhow::{Context, Result};
use claude_config_core::ingest::{all_tool_usage, user_patterns, UserPatterns};
use claude_config_core::{Config, Pattern, PatternExtractor, PatternReport, Tally};
use serde::Serialize;
use std::path::Path;

const TOP_TOOLS: usize = 10;
const SHOWN_CORRECTIONS: usize = 3;

/// Shape of the `--output` JSON file.
#[derive(Serialize)]
struct AnalysisExport<'a> {
    conversations: usize,
    tool_usage: &'a [Tally],
    user_patterns: &'a UserPatterns,
    report: &'a PatternReport,
    patterns: &'a [Pattern],
}

pub fn cmd_analyze(
    config: &Config,
    limit: usize,
    project: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let conversations = load_conversations(config, limit, project);
    if conversations.is_empty() {
        println!("No conversations found.");
        return Ok(());
    }

    let usage = all_tool_usage(&conversations);
    let user = user_patterns(&conversations);
    let report = PatternExtractor::new(config.limits).analyze(&conversations);
    let patterns = report.patterns();

    println!("Analyzed {} sessions", conversations.len());
    println!("====================");

    println!();
    println!("Tool usage:");
    if usage.is_empty() {
        println!("  (none)");
    }
    for tally in usage.iter().take(TOP_TOOLS) {
        println!("  {:<16} {:>5}", tally.label, tally.count);
    }

    println!();
    println!("User messages:");
    println!("  Count:            {}", user.message_count);
    println!("  Average length:   {:.1} chars", user.avg_message_length);
    println!("  Questions:        {:.1}%", user.question_ratio * 100.0);
    println!("  Code requests:    {:.1}%", user.code_request_ratio * 100.0);

    println!();
    println!("Corrections: {}", report.corrections.len());
    for correction in report.corrections.iter().take(SHOWN_CORRECTIONS) {
        println!("  [{}] {}", correction.keyword, correction.user_correction);
    }

    println!();
    println!("Repeated requests:");
    if report.repeated_requests.is_empty() {
        println!("  (none)");
    }
    for tally in &report.repeated_requests {
        println!("  {}: {}", tally.label, tally.count);
    }

    println!();
    println!("Edits: {}", report.edit_patterns.total_edits);
    for tally in &report.edit_patterns.by_extension {
        println!("  .{}: {}", tally.label, tally.count);
    }

    println!();
    println!("Workflows (3+ tool calls): {}", report.workflows.len());

    if !patterns.is_empty() {
        println!();
        println!("Detected patterns:");
        for pattern in &patterns {
            println!(
                "  [{}] {} ({}x)",
                pattern.category, pattern.description, pattern.frequency
            );
            if let Some(rule) = &pattern.suggested_rule {
                println!("      -> {}", rule);
            }
        }
    }

    if let Some(path) = output {
        let export = AnalysisExport {
            conversations: conversations.len(),
            tool_usage: &usage,
            user_patterns: &user,
            report: &report,
            patterns: &patterns,
        };
        let json = serde_json::to_string_pretty(&export).context("failed to serialize analysis")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!();
        println!("Saved analysis: {}", path.display());
    }

    Ok(())
}
