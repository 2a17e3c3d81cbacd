//! `relief don` command - Donation management
//!
//! A donation points at one disaster and one beneficiary. Both must exist
//! when the donation is written; nothing is written otherwise.

use chrono::NaiveDate;
use clap::Subcommand;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{print_created, print_done, Session};
use crate::cli::table::{print_count, print_list, print_one};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::filter::DonationFilter;
use crate::core::identity::EntityId;
use crate::entities::Donation;

#[derive(Subcommand, Debug)]
pub enum DonCommands {
    /// Record a donation for a disaster and beneficiary
    New(NewArgs),

    /// List donations, optionally filtered
    List(ListArgs),

    /// Show a donation's details
    Show(IdArgs),

    /// Change a donation's references or status
    Edit(EditArgs),

    /// Delete a donation (its links are kept)
    Rm(IdArgs),

    /// Count donations with an exact status
    Count(CountArgs),

    /// Donations for a beneficiary whose disaster occurred after a date
    After(AfterArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Disaster ID (DIS-...)
    #[arg(long)]
    pub disaster: EntityId,

    /// Beneficiary ID (BEN-...)
    #[arg(long)]
    pub beneficiary: EntityId,

    /// Status; defaults to the configured default_status
    #[arg(long, short = 's')]
    pub status: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub disaster: Option<EntityId>,

    #[arg(long)]
    pub beneficiary: Option<EntityId>,

    /// Exact status
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    /// Donation ID (DON-...)
    pub id: EntityId,
}

/// Omitted flags keep the stored value
#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Donation ID (DON-...)
    pub id: EntityId,

    #[arg(long)]
    pub disaster: Option<EntityId>,

    #[arg(long)]
    pub beneficiary: Option<EntityId>,

    #[arg(long, short = 's')]
    pub status: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct CountArgs {
    /// Exact status to count
    #[arg(long, short = 's')]
    pub status: String,
}

#[derive(clap::Args, Debug)]
pub struct AfterArgs {
    /// Beneficiary ID (BEN-...)
    #[arg(long)]
    pub beneficiary: EntityId,

    /// Reference date (YYYY-MM-DD), exclusive
    pub date: NaiveDate,
}

/// Run a donation subcommand
pub fn run(cmd: DonCommands, mut session: Session, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DonCommands::New(args) => {
            let status = args
                .status
                .unwrap_or_else(|| session.config.default_status().to_string());
            let donation = Donation::new(args.disaster, args.beneficiary).with_status(status);
            session.store.insert(&donation)?;
            print_created(
                global,
                "donation",
                &donation.id,
                &format!("{} → {}", donation.disaster_id, donation.beneficiary_id),
            );
            Ok(())
        }
        DonCommands::List(args) => {
            let filter = DonationFilter {
                disaster_id: args.disaster,
                beneficiary_id: args.beneficiary,
                status: args.status,
            };
            let donations = session.store.search_donations(&filter)?;
            if args.count {
                return print_count("count", donations.len() as i64, global);
            }
            print_list(&donations, global, "donation(s)")
        }
        DonCommands::Show(args) => {
            let donation = session.store.get::<Donation>(&args.id)?;
            print_one(&donation, global)
        }
        DonCommands::Edit(args) => {
            let mut donation = session.store.get::<Donation>(&args.id)?;
            if let Some(disaster) = args.disaster {
                donation.disaster_id = disaster;
            }
            if let Some(beneficiary) = args.beneficiary {
                donation.beneficiary_id = beneficiary;
            }
            if let Some(status) = args.status {
                donation.status = Some(status);
            }
            session.store.update(&donation)?;
            print_done(global, format!("Updated donation {}", donation.id));
            Ok(())
        }
        DonCommands::Rm(args) => {
            session.store.delete::<Donation>(&args.id)?;
            print_done(global, format!("Deleted donation {}", args.id));
            Ok(())
        }
        DonCommands::Count(args) => {
            let n = session.store.count_donations_by_status(&args.status)?;
            print_count("count", n as i64, global)
        }
        DonCommands::After(args) => {
            let ids = session
                .store
                .donation_ids_for_beneficiary_after(&args.beneficiary, args.date)?;
            print_ids(&ids, global)
        }
    }
}

/// Bare id listing; JSON renders an array of strings
fn print_ids(ids: &[EntityId], global: &GlobalOpts) -> Result<()> {
    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(ids).into_diagnostic()?;
            println!("{json}");
        }
        _ => {
            for id in ids {
                println!("{id}");
            }
        }
    }
    Ok(())
}
