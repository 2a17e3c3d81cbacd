//! `relief prd` command - Product catalog

use clap::Subcommand;
use miette::Result;

use crate::cli::helpers::{print_created, print_done, Session};
use crate::cli::table::{print_count, print_list, print_one};
use crate::cli::GlobalOpts;
use crate::core::identity::EntityId;
use crate::entities::Product;

#[derive(Subcommand, Debug)]
pub enum PrdCommands {
    /// Add a product to the catalog
    New(NewArgs),

    /// List products, optionally filtered
    List(ListArgs),

    /// Show a product's details
    Show(IdArgs),

    /// Replace a product's fields
    Edit(EditArgs),

    /// Delete a product (links referencing it are kept)
    Rm(IdArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Product name (required)
    #[arg(long, short = 'n')]
    pub name: String,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Unit of measure (e.g. kg, box, unit)
    #[arg(long, short = 'u')]
    pub unit: Option<String>,

    /// Refuse if a product with exactly this name already exists
    #[arg(long)]
    pub unique: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Name contains (case-insensitive)
    #[arg(long, short = 'n', conflicts_with = "unit")]
    pub name: Option<String>,

    /// Exact unit
    #[arg(long, short = 'u')]
    pub unit: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

/// Full-field update: omitted optional fields are cleared
#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Product ID (PRD-...)
    pub id: EntityId,

    #[arg(long, short = 'n')]
    pub name: String,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long, short = 'u')]
    pub unit: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    /// Product ID (PRD-...)
    pub id: EntityId,
}

/// Run a product subcommand
pub fn run(cmd: PrdCommands, mut session: Session, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PrdCommands::New(args) => {
            let mut product = Product::new(args.name);
            if let Some(description) = args.description {
                product = product.with_description(description);
            }
            if let Some(unit) = args.unit {
                product = product.with_unit(unit);
            }
            if args.unique {
                session.store.insert_unique_product(&product)?;
            } else {
                session.store.insert(&product)?;
            }
            print_created(global, "product", &product.id, &product.name);
            Ok(())
        }
        PrdCommands::List(args) => {
            let products = if let Some(unit) = &args.unit {
                session.store.products_by_unit(unit)?
            } else if let Some(name) = &args.name {
                session.store.products_by_name(name)?
            } else {
                session.store.list::<Product>()?
            };
            if args.count {
                return print_count("count", products.len() as i64, global);
            }
            print_list(&products, global, "product(s)")
        }
        PrdCommands::Show(args) => {
            let product = session.store.get::<Product>(&args.id)?;
            print_one(&product, global)
        }
        PrdCommands::Edit(args) => {
            let product = Product {
                id: args.id,
                name: args.name,
                description: args.description,
                unit: args.unit,
            };
            session.store.update(&product)?;
            print_done(global, format!("Updated product {}", product.id));
            Ok(())
        }
        PrdCommands::Rm(args) => {
            session.store.delete::<Product>(&args.id)?;
            print_done(global, format!("Deleted product {}", args.id));
            Ok(())
        }
    }
}
