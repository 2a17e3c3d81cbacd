//! CLI command implementations

pub mod completions;
pub mod dis;
pub mod don;
pub mod init;
pub mod link;
pub mod party;
pub mod prd;
pub mod total;
