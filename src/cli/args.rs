//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, dis::DisCommands, don::DonCommands, init::InitArgs,
    link::LinkCommands, party::PartyCommands, prd::PrdCommands, total::TotalCommands,
};

#[derive(Parser)]
#[command(name = "relief")]
#[command(author, version, about = "Disaster relief donation ledger")]
#[command(
    long_about = "Track disasters, beneficiaries, donors, products and the donations linking them, with quantity totals per donor and product."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .relief/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new ledger project
    Init(InitArgs),

    /// Disaster management
    #[command(subcommand)]
    Dis(DisCommands),

    /// Beneficiary management
    #[command(subcommand)]
    Ben(PartyCommands),

    /// Donor management
    #[command(subcommand)]
    Dnr(PartyCommands),

    /// Product management
    #[command(subcommand)]
    Prd(PrdCommands),

    /// Donation management
    #[command(subcommand)]
    Don(DonCommands),

    /// Links between donations, donors and products
    #[command(subcommand)]
    Link(LinkCommands),

    /// Quantity totals
    #[command(subcommand)]
    Total(TotalCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for terminals, key/value table for single records
    #[default]
    Auto,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Tab-separated values (for piping)
    Tsv,
    /// Just IDs or keys, one per line
    Id,
}
