//! `relief link` command - Associations between donations, donors and products
//!
//! Three kinds of link are kept independently:
//!
//! - `donor`: a donor contributed to a donation
//! - `product`: a donation carries a quantity of a product
//! - `contribution`: a donor contributed a quantity of a product to a donation
//!
//! Quantities recorded under `product` and `contribution` are never reconciled.

use clap::{Subcommand, ValueEnum};
use miette::Result;

use crate::cli::helpers::{print_done, Session};
use crate::cli::table::{print_list, print_one};
use crate::cli::GlobalOpts;
use crate::core::identity::EntityId;
use crate::core::links::{
    DonationDonor, DonationDonorKey, DonationDonorProduct, DonationDonorProductKey,
    DonationProduct, DonationProductKey,
};
use crate::core::Store;

#[derive(Subcommand, Debug)]
pub enum LinkCommands {
    /// Record that a donor contributed to a donation
    AddDonor(AddDonorArgs),

    /// Record a quantity of a product carried by a donation
    AddProduct(AddProductArgs),

    /// Record a quantity of a product one donor gave to a donation
    AddContribution(AddContributionArgs),

    /// List links of one kind, optionally narrowed to one id
    List(ListArgs),

    /// Show one link by its key
    Show(KeyArgs),

    /// Remove a link by its key
    Rm(KeyArgs),

    /// Donors linked to a donation
    Donors(DonationArg),

    /// Donations a donor is linked to
    Donations(DonorArg),
}

/// Kind of link
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    /// Donation and donor
    Donor,
    /// Donation and product, with quantity
    Product,
    /// Donation, donor and product, with quantity
    Contribution,
}

#[derive(clap::Args, Debug)]
pub struct AddDonorArgs {
    /// Donation ID (DON-...)
    #[arg(long)]
    pub donation: EntityId,

    /// Donor ID (DNR-...)
    #[arg(long)]
    pub donor: EntityId,
}

#[derive(clap::Args, Debug)]
pub struct AddProductArgs {
    /// Donation ID (DON-...)
    #[arg(long)]
    pub donation: EntityId,

    /// Product ID (PRD-...)
    #[arg(long)]
    pub product: EntityId,

    /// Quantity (must be positive)
    #[arg(long, allow_negative_numbers = true)]
    pub quantity: i64,
}

#[derive(clap::Args, Debug)]
pub struct AddContributionArgs {
    /// Donation ID (DON-...)
    #[arg(long)]
    pub donation: EntityId,

    /// Donor ID (DNR-...)
    #[arg(long)]
    pub donor: EntityId,

    /// Product ID (PRD-...)
    #[arg(long)]
    pub product: EntityId,

    /// Quantity (must be positive)
    #[arg(long, allow_negative_numbers = true)]
    pub quantity: i64,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Which links to list
    #[arg(value_enum)]
    pub kind: LinkKind,

    #[arg(long, conflicts_with_all = ["donor", "product"])]
    pub donation: Option<EntityId>,

    #[arg(long, conflicts_with = "product")]
    pub donor: Option<EntityId>,

    #[arg(long)]
    pub product: Option<EntityId>,
}

#[derive(clap::Args, Debug)]
pub struct KeyArgs {
    /// Which kind of link
    #[arg(value_enum)]
    pub kind: LinkKind,

    #[arg(long)]
    pub donation: EntityId,

    /// Required for `donor` and `contribution`
    #[arg(long)]
    pub donor: Option<EntityId>,

    /// Required for `product` and `contribution`
    #[arg(long)]
    pub product: Option<EntityId>,
}

#[derive(clap::Args, Debug)]
pub struct DonationArg {
    /// Donation ID (DON-...)
    pub donation: EntityId,
}

#[derive(clap::Args, Debug)]
pub struct DonorArg {
    /// Donor ID (DNR-...)
    pub donor: EntityId,
}

/// Run a link subcommand
pub fn run(cmd: LinkCommands, mut session: Session, global: &GlobalOpts) -> Result<()> {
    let store = &mut session.store;
    match cmd {
        LinkCommands::AddDonor(args) => {
            store.link(&DonationDonor::new(args.donation, args.donor))?;
            print_done(
                global,
                format!("Linked donor {} to {}", args.donor, args.donation),
            );
            Ok(())
        }
        LinkCommands::AddProduct(args) => {
            store.link(&DonationProduct::new(
                args.donation,
                args.product,
                args.quantity,
            ))?;
            print_done(
                global,
                format!(
                    "Linked {} × {} to {}",
                    args.quantity, args.product, args.donation
                ),
            );
            Ok(())
        }
        LinkCommands::AddContribution(args) => {
            store.link(&DonationDonorProduct::new(
                args.donation,
                args.donor,
                args.product,
                args.quantity,
            ))?;
            print_done(
                global,
                format!(
                    "Linked {} × {} from {} to {}",
                    args.quantity, args.product, args.donor, args.donation
                ),
            );
            Ok(())
        }
        LinkCommands::List(args) => run_list(args, store, global),
        LinkCommands::Show(args) => run_show(args, store, global),
        LinkCommands::Rm(args) => run_rm(args, store, global),
        LinkCommands::Donors(args) => {
            let donors = store.donors_of_donation(&args.donation)?;
            print_list(&donors, global, "donor(s)")
        }
        LinkCommands::Donations(args) => {
            let donations = store.donations_of_donor(&args.donor)?;
            print_list(&donations, global, "donation(s)")
        }
    }
}

fn run_list(args: ListArgs, store: &Store, global: &GlobalOpts) -> Result<()> {
    match args.kind {
        LinkKind::Donor => {
            if args.product.is_some() {
                miette::bail!("donor links have no product; use `link list contribution`");
            }
            let links: Vec<DonationDonor> = match (args.donation, args.donor) {
                (Some(donation), _) => store.links_for_donation(&donation)?,
                (None, Some(donor)) => store.links_for_donor(&donor)?,
                (None, None) => store.list_links()?,
            };
            print_list(&links, global, "donor link(s)")
        }
        LinkKind::Product => {
            if args.donor.is_some() {
                miette::bail!("product links have no donor; use `link list contribution`");
            }
            let links: Vec<DonationProduct> = match (args.donation, args.product) {
                (Some(donation), _) => store.links_for_donation(&donation)?,
                (None, Some(product)) => store.links_for_product(&product)?,
                (None, None) => store.list_links()?,
            };
            print_list(&links, global, "product link(s)")
        }
        LinkKind::Contribution => {
            let links: Vec<DonationDonorProduct> =
                match (args.donation, args.donor, args.product) {
                    (Some(donation), _, _) => store.links_for_donation(&donation)?,
                    (None, Some(donor), _) => store.links_for_donor(&donor)?,
                    (None, None, Some(product)) => store.links_for_product(&product)?,
                    (None, None, None) => store.list_links()?,
                };
            print_list(&links, global, "contribution(s)")
        }
    }
}

fn run_show(args: KeyArgs, store: &Store, global: &GlobalOpts) -> Result<()> {
    match args.kind {
        LinkKind::Donor => {
            let donor = required(args.donor, "--donor", "donor")?;
            let key = DonationDonorKey::new(args.donation, donor);
            print_one(&store.get_link::<DonationDonor>(&key)?, global)
        }
        LinkKind::Product => {
            let product = required(args.product, "--product", "product")?;
            let key = DonationProductKey::new(args.donation, product);
            print_one(&store.get_link::<DonationProduct>(&key)?, global)
        }
        LinkKind::Contribution => {
            let donor = required(args.donor, "--donor", "contribution")?;
            let product = required(args.product, "--product", "contribution")?;
            let key = DonationDonorProductKey::new(args.donation, donor, product);
            print_one(&store.get_link::<DonationDonorProduct>(&key)?, global)
        }
    }
}

fn run_rm(args: KeyArgs, store: &mut Store, global: &GlobalOpts) -> Result<()> {
    let key = match args.kind {
        LinkKind::Donor => {
            let donor = required(args.donor, "--donor", "donor")?;
            let key = DonationDonorKey::new(args.donation, donor);
            store.unlink::<DonationDonor>(&key)?;
            key.to_string()
        }
        LinkKind::Product => {
            let product = required(args.product, "--product", "product")?;
            let key = DonationProductKey::new(args.donation, product);
            store.unlink::<DonationProduct>(&key)?;
            key.to_string()
        }
        LinkKind::Contribution => {
            let donor = required(args.donor, "--donor", "contribution")?;
            let product = required(args.product, "--product", "contribution")?;
            let key = DonationDonorProductKey::new(args.donation, donor, product);
            store.unlink::<DonationDonorProduct>(&key)?;
            key.to_string()
        }
    };
    print_done(global, format!("Removed link {key}"));
    Ok(())
}

fn required(value: Option<EntityId>, flag: &str, kind: &str) -> Result<EntityId> {
    value.ok_or_else(|| miette::miette!("{flag} is required to address a {kind} link"))
}
