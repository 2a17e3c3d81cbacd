//! Relief Ledger: a donation ledger for disaster relief
//!
//! Records disasters, the beneficiaries and donors involved, the products
//! donated, and donations tying them together. Everything lives in one
//! SQLite file inside a `.relief/` project directory.

pub mod cli;
pub mod core;
pub mod entities;
