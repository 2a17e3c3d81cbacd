//! `relief init` command - Initialize a new ledger project

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::project::{Project, ProjectError};
use crate::core::{Config, Store};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Rewrite the config even if .relief/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let project = match Project::init(&path, args.force) {
        Ok(project) => project,
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} Relief project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to rewrite its config",
                style("relief init --force").yellow()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // Create the database up front so later commands only open it
    let config = Config::load(Some(&project));
    let store = Store::open(config.database_path(&project))?;

    println!(
        "{} Initialized relief project at {}",
        style("✓").green(),
        style(project.root().display()).cyan()
    );
    println!("  {}", style(project.config_path().display()).dim());
    if let Some(db) = store.path() {
        println!("  {}", style(db.display()).dim());
    }
    println!();
    println!("Next steps:");
    println!(
        "  {} Record a disaster",
        style("relief dis new --name <NAME>").yellow()
    );
    println!(
        "  {} Register a beneficiary",
        style("relief ben new --name <NAME>").yellow()
    );
    println!(
        "  {} Record a donation",
        style("relief don new --disaster <ID> --beneficiary <ID>").yellow()
    );
    Ok(())
}
