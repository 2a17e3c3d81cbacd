//! `relief ben` and `relief dnr` commands - Beneficiary and donor management
//!
//! Both kinds take the same arguments; the entity type is picked by the
//! top-level command.

use clap::Subcommand;
use miette::Result;

use crate::cli::helpers::{print_created, print_done, Session};
use crate::cli::table::{print_count, print_list, print_one, Tabular};
use crate::cli::GlobalOpts;
use crate::core::identity::EntityId;
use crate::core::Record;
use crate::entities::{Contact, Party};

#[derive(Subcommand, Debug)]
pub enum PartyCommands {
    /// Register a new record
    New(NewArgs),

    /// List records, optionally filtered
    List(ListArgs),

    /// Show one record
    Show(IdArgs),

    /// Replace every contact field of a record
    Edit(EditArgs),

    /// Delete a record (links referencing it are kept)
    Rm(IdArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Name (required)
    #[arg(long, short = 'n')]
    pub name: String,

    /// Affiliated organization
    #[arg(long, short = 'o')]
    pub organization: Option<String>,

    #[arg(long, short = 'e')]
    pub email: Option<String>,

    #[arg(long, short = 'p')]
    pub phone: Option<String>,

    #[arg(long, short = 'a')]
    pub address: Option<String>,
}

/// Full-field update: omitted optional fields are cleared
#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Record ID (BEN-... or DNR-...)
    pub id: EntityId,

    #[command(flatten)]
    pub fields: NewArgs,
}

impl NewArgs {
    fn into_contact(self) -> Contact {
        Contact {
            name: self.name,
            organization: self.organization,
            email: self.email,
            phone: self.phone,
            address: self.address,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Name contains (case-insensitive)
    #[arg(long, short = 'n', conflicts_with_all = ["organization", "email"])]
    pub name: Option<String>,

    /// Organization contains (case-insensitive)
    #[arg(long, short = 'o', conflicts_with = "email")]
    pub organization: Option<String>,

    /// Exact email; shows the first match
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Only report whether a record has exactly this phone number
    #[arg(long, short = 'p', conflicts_with_all = ["name", "organization", "email"])]
    pub phone: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    /// Record ID (BEN-... or DNR-...)
    pub id: EntityId,
}

/// Run a party subcommand for kind `P`
pub fn run<P>(cmd: PartyCommands, mut session: Session, global: &GlobalOpts) -> Result<()>
where
    P: Party + Record + Tabular,
{
    match cmd {
        PartyCommands::New(args) => {
            let party = P::from_contact(args.into_contact());
            session.store.insert(&party)?;
            print_created(global, P::kind(), party.id(), party.name());
            Ok(())
        }
        PartyCommands::List(args) => run_list::<P>(args, &session, global),
        PartyCommands::Show(args) => {
            let party = session.store.get::<P>(&args.id)?;
            print_one(&party, global)
        }
        PartyCommands::Edit(args) => {
            let party = P::from_parts(args.id, args.fields.into_contact());
            session.store.update(&party)?;
            print_done(global, format!("Updated {} {}", P::kind(), args.id));
            Ok(())
        }
        PartyCommands::Rm(args) => {
            session.store.delete::<P>(&args.id)?;
            print_done(global, format!("Deleted {} {}", P::kind(), args.id));
            Ok(())
        }
    }
}

fn run_list<P>(args: ListArgs, session: &Session, global: &GlobalOpts) -> Result<()>
where
    P: Party + Record + Tabular,
{
    let store = &session.store;

    if let Some(phone) = &args.phone {
        let exists = store.party_phone_exists::<P>(phone)?;
        println!("{exists}");
        return Ok(());
    }

    let parties: Vec<P> = if let Some(email) = &args.email {
        store.party_by_email::<P>(email)?.into_iter().collect()
    } else if let Some(org) = &args.organization {
        store.parties_by_organization::<P>(org)?
    } else if let Some(name) = &args.name {
        store.parties_by_name::<P>(name)?
    } else {
        store.list::<P>()?
    };

    if args.count {
        return print_count("count", parties.len() as i64, global);
    }
    print_list(&parties, global, &format!("{}(s)", P::kind()))
}
