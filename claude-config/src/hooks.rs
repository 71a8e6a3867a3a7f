//! `claude-config hooks ...`

use crate::HooksAction;
use anyhow::{Context, Result};
use claude_config_core::hooks::{find_template, HookEvent, HooksManager, HOOK_TEMPLATES};
use claude_config_core::Error;
use std::path::PathBuf;

pub fn cmd_hooks(project_dir: PathBuf, action: HooksAction) -> Result<()> {
    let manager = HooksManager::new(project_dir);

    match action {
        HooksAction::List => list(&manager),
        HooksAction::Templates => {
            templates();
            Ok(())
        }
        HooksAction::Init => {
            if manager.init_hooks().context("failed to initialize hooks")? {
                println!("Initialized hooks in {}", manager.settings_path().display());
            } else {
                println!("Hooks already initialized in {}", manager.settings_path().display());
            }
            Ok(())
        }
        HooksAction::Suggest => {
            let names = manager.suggest();
            if names.is_empty() {
                println!("No hook suggestions for this project.");
                return Ok(());
            }
            println!("Suggested hooks:");
            for name in names {
                let description = find_template(name).map(|t| t.description).unwrap_or_default();
                println!("  {:<14} {}", name, description);
            }
            println!();
            println!("Add one with: claude-config hooks add <TEMPLATE>");
            Ok(())
        }
        HooksAction::Add { template, event } => match manager.add_template(&template, event) {
            Ok(t) => {
                println!("Added '{}' ({} on {})", t.name, event, t.matcher);
                Ok(())
            }
            Err(Error::HookTemplateNotFound(name)) => {
                let available: Vec<_> = HOOK_TEMPLATES.iter().map(|t| t.name).collect();
                anyhow::bail!(
                    "unknown hook template '{}' (available: {})",
                    name,
                    available.join(", ")
                )
            }
            Err(e) => Err(e).context("failed to add hook"),
        },
        HooksAction::AddCustom {
            matcher,
            command,
            event,
        } => {
            manager
                .add_custom(&matcher, &command, event)
                .context("failed to add hook")?;
            println!("Added custom hook ({} on {})", event, matcher);
            Ok(())
        }
        HooksAction::Remove { matcher, event } => {
            if manager.remove(&matcher, event).context("failed to remove hook")? {
                println!("Removed {} hooks for '{}'", event, matcher);
            } else {
                println!("No {} hooks found for '{}'", event, matcher);
            }
            Ok(())
        }
    }
}

fn list(manager: &HooksManager) -> Result<()> {
    let Some(section) = manager.hooks().context("failed to read settings")? else {
        println!("No hooks configured. Run `claude-config hooks init` to start.");
        return Ok(());
    };

    for event in [HookEvent::PreToolUse, HookEvent::PostToolUse] {
        let entries = section.entries(event);
        println!("{}:", event);
        if entries.is_empty() {
            println!("  (none)");
        }
        for entry in entries {
            println!("  {}", entry.matcher);
            for hook in &entry.hooks {
                println!("    - {}", hook.command);
            }
        }
    }
    Ok(())
}

fn templates() {
    for template in HOOK_TEMPLATES {
        println!("{}", template.name);
        println!("  Matcher:     {}", template.matcher);
        println!("  Command:     {}", template.command);
        println!("  Description: {}", template.description);
    }
}
