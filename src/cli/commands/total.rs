//! `relief total` command - Quantity totals over product links

use clap::{Subcommand, ValueEnum};
use miette::Result;

use crate::cli::helpers::Session;
use crate::cli::table::print_count;
use crate::cli::GlobalOpts;
use crate::core::identity::EntityId;
use crate::core::links::{DonationDonorProduct, DonationProduct};

#[derive(Subcommand, Debug)]
pub enum TotalCommands {
    /// Total quantity of a product
    Product(ProductArgs),

    /// Total quantity recorded against a donation
    Donation(DonationArgs),
}

/// Which quantities to add up
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QuantitySource {
    /// Donation product links
    Product,
    /// Per-donor contributions
    #[default]
    Contribution,
}

#[derive(clap::Args, Debug)]
pub struct ProductArgs {
    /// Product ID (PRD-...)
    pub product: EntityId,

    #[arg(long, value_enum, default_value_t)]
    pub source: QuantitySource,

    /// Only count what this donor contributed (contributions only)
    #[arg(long)]
    pub donor: Option<EntityId>,
}

#[derive(clap::Args, Debug)]
pub struct DonationArgs {
    /// Donation ID (DON-...)
    pub donation: EntityId,

    #[arg(long, value_enum, default_value_t)]
    pub source: QuantitySource,
}

/// Run a total subcommand
pub fn run(cmd: TotalCommands, session: Session, global: &GlobalOpts) -> Result<()> {
    let store = &session.store;
    let total = match cmd {
        TotalCommands::Product(args) => match (args.source, args.donor) {
            (QuantitySource::Product, Some(_)) => {
                miette::bail!("--donor only applies to contributions")
            }
            (QuantitySource::Product, None) => {
                store.sum_quantity_by_product::<DonationProduct>(&args.product)?
            }
            (QuantitySource::Contribution, Some(donor)) => {
                store.sum_quantity_by_donor_and_product(&donor, &args.product)?
            }
            (QuantitySource::Contribution, None) => {
                store.sum_quantity_by_product::<DonationDonorProduct>(&args.product)?
            }
        },
        TotalCommands::Donation(args) => match args.source {
            QuantitySource::Product => {
                store.sum_quantity_by_donation::<DonationProduct>(&args.donation)?
            }
            QuantitySource::Contribution => {
                store.sum_quantity_by_donation::<DonationDonorProduct>(&args.donation)?
            }
        },
    };
    print_count("total", total, global)
}
