//! Shared helper functions for CLI commands

use console::style;
use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityId;
use crate::core::project::{Project, ProjectError};
use crate::core::{Config, Store};

/// Everything a command needs to talk to the ledger
pub struct Session {
    pub project: Project,
    pub config: Config,
    pub store: Store,
}

impl Session {
    /// Open the store for an already discovered project and loaded config
    pub fn open(project: Project, config: Config) -> Result<Self> {
        let store = Store::open(config.database_path(&project))?;
        Ok(Self {
            project,
            config,
            store,
        })
    }
}

/// Project named by `--project`, or the nearest one above the working directory
pub fn discover_project(global: &GlobalOpts) -> std::result::Result<Project, ProjectError> {
    match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    }
}

/// Truncate a string to `max_len` characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Report a newly written record. `--format id` prints the bare id.
pub fn print_created(global: &GlobalOpts, kind: &str, id: &EntityId, label: &str) {
    if global.format == OutputFormat::Id {
        println!("{id}");
        return;
    }
    if global.quiet {
        return;
    }
    println!(
        "{} Created {} {}",
        style("✓").green(),
        kind,
        style(id).cyan()
    );
    if !label.is_empty() {
        println!("   {}", style(label).yellow());
    }
}

/// One-line confirmation for updates, deletes and links
pub fn print_done(global: &GlobalOpts, message: impl std::fmt::Display) {
    if !global.quiet && global.format != OutputFormat::Id {
        println!("{} {}", style("✓").green(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_str_counts_chars() {
        assert_eq!(truncate_str("Incêndio Sul", 12), "Incêndio Sul");
        assert_eq!(truncate_str("Incêndio Sul", 8), "Incên...");
    }
}
