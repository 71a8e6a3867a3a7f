//! `claude-config handoff`

use anyhow::{Context, Result};
use claude_config_core::handoff::{HandoffGenerator, SessionSelector};
use claude_config_core::{Config, Error, LogReader};
use std::path::PathBuf;

pub fn cmd_handoff(
    config: &Config,
    session: &str,
    output: PathBuf,
    notes: Option<&str>,
    quick: bool,
) -> Result<()> {
    let generator = HandoffGenerator::new(LogReader::new(config.claude_dir()));

    if quick {
        let notes = notes.context("--quick needs --notes")?;
        let path = generator
            .create_quick(&output, notes)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("Created quick handoff: {}", path.display());
        return Ok(());
    }

    match generator.create(&SessionSelector::from(session), &output, notes) {
        Ok(Some(path)) => {
            println!("Created handoff: {}", path.display());
            println!();
            println!("Paste it into a new session to continue where you left off.");
        }
        Ok(None) => println!("No sessions found."),
        Err(Error::SessionNotFound(id)) => println!("Session not found: {}", id),
        Err(e) => return Err(e).context("failed to create handoff"),
    }
    Ok(())
}
