//! `relief dis` command - Disaster management

use chrono::NaiveDate;
use clap::Subcommand;
use miette::Result;

use crate::cli::helpers::{print_created, print_done, Session};
use crate::cli::table::{print_count, print_list, print_one};
use crate::cli::GlobalOpts;
use crate::core::filter::DisasterFilter;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::Disaster;

#[derive(Subcommand, Debug)]
pub enum DisCommands {
    /// Record a new disaster
    New(NewArgs),

    /// List disasters, optionally filtered
    List(ListArgs),

    /// Show a disaster's details
    Show(ShowArgs),

    /// Replace a disaster's fields
    Edit(EditArgs),

    /// Delete a disaster (donations referencing it are kept)
    Rm(ShowArgs),

    /// Count disasters that occurred strictly after a date
    CountAfter(CountAfterArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Disaster name (required)
    #[arg(long, short = 'n')]
    pub name: String,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Occurrence date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Name contains (case-insensitive)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Location contains (case-insensitive)
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Occurred on or after (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Occurred on or before (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Disaster ID (DIS-...)
    pub id: EntityId,
}

/// Full-field update: omitted optional fields are cleared
#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Disaster ID (DIS-...)
    pub id: EntityId,

    #[arg(long, short = 'n')]
    pub name: String,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long, short = 'l')]
    pub location: Option<String>,

    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(clap::Args, Debug)]
pub struct CountAfterArgs {
    /// Reference date (YYYY-MM-DD), exclusive
    pub date: NaiveDate,
}

/// Run a disaster subcommand
pub fn run(cmd: DisCommands, mut session: Session, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DisCommands::New(args) => run_new(args, &mut session, global),
        DisCommands::List(args) => run_list(args, &session, global),
        DisCommands::Show(args) => {
            let disaster = session.store.get::<Disaster>(&args.id)?;
            print_one(&disaster, global)
        }
        DisCommands::Edit(args) => run_edit(args, &mut session, global),
        DisCommands::Rm(args) => {
            session.store.delete::<Disaster>(&args.id)?;
            print_done(global, format!("Deleted disaster {}", args.id));
            Ok(())
        }
        DisCommands::CountAfter(args) => {
            let n = session.store.count_disasters_after(args.date)?;
            print_count("count", n as i64, global)
        }
    }
}

fn run_new(args: NewArgs, session: &mut Session, global: &GlobalOpts) -> Result<()> {
    let disaster = Disaster {
        id: EntityId::new(EntityPrefix::Dis),
        name: args.name,
        description: args.description,
        location: args.location,
        occurred_on: args.date,
    };
    session.store.insert(&disaster)?;
    print_created(global, "disaster", &disaster.id, &disaster.name);
    Ok(())
}

fn run_list(args: ListArgs, session: &Session, global: &GlobalOpts) -> Result<()> {
    let filter = DisasterFilter {
        name: args.name,
        location: args.location,
        start_date: args.from,
        end_date: args.to,
    };
    let disasters = session.store.search_disasters(&filter)?;

    if args.count {
        return print_count("count", disasters.len() as i64, global);
    }
    print_list(&disasters, global, "disaster(s)")
}

fn run_edit(args: EditArgs, session: &mut Session, global: &GlobalOpts) -> Result<()> {
    let disaster = Disaster {
        id: args.id,
        name: args.name,
        description: args.description,
        location: args.location,
        occurred_on: args.date,
    };
    session.store.update(&disaster)?;
    print_done(global, format!("Updated disaster {}", disaster.id));
    Ok(())
}
