//! Line-based prompts on stdin/stdout.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Print `question` and read one line. Blank input or EOF gives `default`.
pub fn ask(question: &str, default: &str) -> Result<String> {
    print!("{}", question);
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;

    let answer = line.trim();
    if read == 0 || answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer.to_string())
    }
}

/// Yes/no question, defaulting to no.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = ask(&format!("{} [y/N] ", question), "n")?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}
