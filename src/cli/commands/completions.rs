//! Shell completion generation
//!
//! ```bash
//! # Bash - add to ~/.bashrc
//! source <(relief completions bash)
//!
//! # Fish
//! relief completions fish > ~/.config/fish/completions/relief.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "relief", &mut io::stdout());
    Ok(())
}
