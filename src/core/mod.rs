//! Core module - identity, errors, query composition, associations and storage

pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod identity;
pub mod integrity;
pub mod links;
pub mod logging;
pub mod project;
pub mod store;

pub use config::Config;
pub use entity::Entity;
pub use error::{LedgerError, LedgerResult, ValidationError};
pub use filter::{Conjunction, Criterion, DisasterFilter, DonationFilter, Filterable};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use integrity::{Reference, ReferenceSet};
pub use links::{
    Association, CompositeKey, DonationDonor, DonationDonorKey, DonationDonorProduct,
    DonationDonorProductKey, DonationProduct, DonationProductKey, LinksDonor, LinksProduct,
    Quantified,
};
pub use project::{Project, ProjectError};
pub use store::{Record, Store};
