//! `claude-config init`

use crate::{load_conversations, prompt};
use anyhow::{Context, Result};
use chrono::Local;
use claude_config_core::ingest::all_tool_usage;
use claude_config_core::template::{
    render_claude_md, write_with_backup, CodeStyle, InitAnalysis, Profile, Tone, ROLE_CHOICES,
};
use claude_config_core::{Config, PatternExtractor};
use std::path::PathBuf;

/// Sessions analyzed for the initial document.
const INIT_SESSION_LIMIT: usize = 20;

pub fn cmd_init(config: &Config, output: PathBuf, yes: bool) -> Result<()> {
    let profile = if yes {
        Profile::default()
    } else {
        ask_profile()?
    };

    println!();
    println!("Analyzing recent sessions...");
    let conversations = load_conversations(config, INIT_SESSION_LIMIT, None);
    let analysis = if conversations.is_empty() {
        println!("  No session logs to analyze.");
        None
    } else {
        let report = PatternExtractor::new(config.limits).analyze(&conversations);
        let usage = all_tool_usage(&conversations);
        println!("  Analyzed {} sessions.", conversations.len());
        Some(InitAnalysis::from_report(&report, &usage))
    };

    let content = render_claude_md(&profile, analysis.as_ref(), Local::now().date_naive());
    let backup = write_with_backup(&output, &content)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if let Some(backup) = backup {
        println!();
        println!("Backed up existing file: {}", backup.display());
    }
    println!();
    println!("Created CLAUDE.md: {}", output.display());
    Ok(())
}

fn ask_profile() -> Result<Profile> {
    let defaults = Profile::default();

    println!();
    println!("=== claude-config setup ===");
    println!();
    println!("1. What is your main role?");
    for (i, role) in ROLE_CHOICES.iter().enumerate() {
        println!("   {}) {}", i + 1, role);
    }
    let role = Profile::role_from_choice(&prompt::ask("   Choice (1-6): ", "")?);

    println!();
    println!("2. Main programming languages? (comma separated)");
    let languages = Profile::parse_list(&prompt::ask(
        "   Languages [TypeScript, Python]: ",
        &defaults.languages.join(", "),
    )?);

    println!();
    println!("3. Frameworks you use? (comma separated, Enter to skip)");
    let frameworks = Profile::parse_list(&prompt::ask("   Frameworks: ", "")?);

    println!();
    println!("4. Preferred tone?");
    println!("   1) 존댓말 (formal)");
    println!("   2) 반말 (casual)");
    println!("   3) English");
    let tone = Tone::from_choice(&prompt::ask("   Choice (1-3): ", "1")?);

    println!();
    println!("5. Preferred code style?");
    println!("   1) Concise");
    println!("   2) Explicit (comments, type annotations)");
    println!("   3) Balanced");
    let code_style = CodeStyle::from_choice(&prompt::ask("   Choice (1-3): ", "3")?);

    println!();
    println!("6. Any extra rule? (Enter to skip)");
    let extra = prompt::ask("   Rule: ", "")?;

    Ok(Profile {
        role,
        languages: if languages.is_empty() {
            defaults.languages
        } else {
            languages
        },
        frameworks,
        tone,
        code_style,
        extra_rules: (!extra.is_empty()).then_some(extra),
    })
}
