//! claude-config - learn from Claude Code session logs
//!
//! Generates and maintains `CLAUDE.md`, project hooks and hand-off notes
//! from the sessions stored under `~/.claude/projects/`.

mod analyze;
mod handoff;
mod hooks;
mod init;
mod learn;
mod progress;
mod prompt;

use anyhow::{Context, Result};
use claude_config_core::hooks::HookEvent;
use claude_config_core::{Config, LogReader};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "claude-config")]
#[command(about = "Tune Claude Code to your habits by learning from its session logs")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a CLAUDE.md from a short questionnaire and recent sessions
    Init {
        /// Output path (default: ./CLAUDE.md)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the questions and use the default profile
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics and patterns from recent sessions
    Analyze {
        /// Number of recent sessions to analyze
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Only sessions whose project path contains this text
        #[arg(short, long)]
        project: Option<String>,

        /// Also write the results as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Suggest CLAUDE.md updates from recent sessions
    Learn {
        /// Number of recent sessions to learn from
        #[arg(short, long, default_value_t = 30)]
        limit: usize,

        /// CLAUDE.md to update (default: nearest CLAUDE.md upward from here)
        #[arg(long)]
        claude_md: Option<PathBuf>,

        /// Write the suggestions instead of previewing them
        #[arg(short, long)]
        apply: bool,

        /// Do not ask for confirmation before writing
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Manage hooks in .claude/settings.json
    Hooks {
        /// Project directory (default: current directory)
        #[arg(long, global = true)]
        project_dir: Option<PathBuf>,

        #[command(subcommand)]
        action: HooksAction,
    },

    /// Write a HANDOFF.md summarizing a session
    Handoff {
        /// Session id, or "latest"
        #[arg(short, long, default_value = "latest")]
        session: String,

        /// Output path (default: ./HANDOFF.md)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extra notes to include
        #[arg(short, long)]
        notes: Option<String>,

        /// Write the notes only, without reading any session
        #[arg(long, requires = "notes")]
        quick: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum HooksAction {
    /// Show configured hooks
    List,

    /// Show available hook templates
    Templates,

    /// Create an empty hooks section
    Init,

    /// Suggest templates for this project
    Suggest,

    /// Add a hook from a template
    Add {
        /// Template name (see `hooks templates`)
        template: String,

        /// preToolUse or postToolUse
        #[arg(long, default_value = "postToolUse")]
        event: HookEvent,
    },

    /// Add a hook with your own command
    AddCustom {
        /// Tool name pattern, e.g. Edit or Bash
        #[arg(long)]
        matcher: String,

        /// Shell command to run
        #[arg(long)]
        command: String,

        /// preToolUse or postToolUse
        #[arg(long, default_value = "postToolUse")]
        event: HookEvent,
    },

    /// Remove all hooks for a matcher
    Remove {
        matcher: String,

        /// preToolUse or postToolUse
        #[arg(long, default_value = "postToolUse")]
        event: HookEvent,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Logging goes to a file; a read-only state dir should not stop the command
    let _log_guard = match claude_config_core::logging::init(&config.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "claude-config starting");

    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    match args.command {
        Command::Init { output, yes } => {
            init::cmd_init(&config, output.unwrap_or_else(|| cwd.join("CLAUDE.md")), yes)
        }
        Command::Analyze {
            limit,
            project,
            output,
        } => analyze::cmd_analyze(&config, limit, project.as_deref(), output.as_deref()),
        Command::Learn {
            limit,
            claude_md,
            apply,
            yes,
        } => learn::cmd_learn(&config, &cwd, limit, claude_md, apply, yes),
        Command::Hooks {
            project_dir,
            action,
        } => hooks::cmd_hooks(project_dir.unwrap_or(cwd), action),
        Command::Handoff {
            session,
            output,
            notes,
            quick,
        } => handoff::cmd_handoff(
            &config,
            &session,
            output.unwrap_or_else(|| cwd.join("HANDOFF.md")),
            notes.as_deref(),
            quick,
        ),
    }
}

/// Read up to `limit` recent sessions. A failed read counts as no data.
pub(crate) fn load_conversations(
    config: &Config,
    limit: usize,
    project: Option<&str>,
) -> Vec<claude_config_core::Conversation> {
    let reader = LogReader::new(config.claude_dir());
    let spinner = progress::spinner("Reading session logs...");
    let result = reader.recent_conversations(limit, project);
    spinner.finish_and_clear();

    match result {
        Ok(convs) => convs,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read session logs");
            eprintln!("warning: could not read session logs: {}", e);
            Vec::new()
        }
    }
}
