//! Output formatting for list, show and count commands
//!
//! Every printable record implements [`Tabular`]. The same header and cell
//! definitions drive the terminal table (`tabled`), CSV (`csv`), TSV, JSON
//! (`serde_json`, from the record's own serialization) and bare keys.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::links::{DonationDonor, DonationDonorProduct, DonationProduct};
use crate::entities::{Beneficiary, Disaster, Donation, Donor, Party, Product};

/// Widest text cell in terminal tables
const TEXT_WIDTH: usize = 32;

/// A record with a fixed column layout
pub trait Tabular: Serialize {
    const HEADERS: &'static [&'static str];

    /// Id or composite key, used by `--format id`
    fn key(&self) -> String;

    /// One value per header; None for absent fields
    fn cells(&self) -> Vec<Option<String>>;
}

/// Print a list of records; `plural` names them in the summary line
pub fn print_list<T: Tabular>(records: &[T], global: &GlobalOpts, plural: &str) -> Result<()> {
    match global.format {
        OutputFormat::Auto => {
            if records.is_empty() {
                if !global.quiet {
                    println!("No {plural} found.");
                }
                return Ok(());
            }
            let mut builder = Builder::default();
            builder.push_record(T::HEADERS.iter().copied());
            for record in records {
                builder.push_record(record.cells().into_iter().map(terminal_cell));
            }
            println!("{}", builder.build().with(Style::sharp()));
            if !global.quiet {
                println!(
                    "{} {} found.",
                    style(records.len()).cyan(),
                    style(plural).dim()
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(T::HEADERS).into_diagnostic()?;
            for record in records {
                wtr.write_record(record.cells().into_iter().map(Option::unwrap_or_default))
                    .into_diagnostic()?;
            }
            wtr.flush().into_diagnostic()?;
        }
        OutputFormat::Tsv => {
            println!("{}", T::HEADERS.join("\t"));
            for record in records {
                println!("{}", tsv_row(&record.cells()));
            }
        }
        OutputFormat::Id => {
            for record in records {
                println!("{}", record.key());
            }
        }
    }
    Ok(())
}

/// Print a single record; the terminal form is a field/value table
pub fn print_one<T: Tabular>(record: &T, global: &GlobalOpts) -> Result<()> {
    match global.format {
        OutputFormat::Auto => {
            let mut builder = Builder::default();
            for (header, cell) in T::HEADERS.iter().zip(record.cells()) {
                builder.push_record([
                    style(header).bold().to_string(),
                    cell.unwrap_or_else(|| "-".to_string()),
                ]);
            }
            println!("{}", builder.build().with(Style::blank()));
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record).into_diagnostic()?);
            Ok(())
        }
        _ => print_list(std::slice::from_ref(record), global, ""),
    }
}

/// Print a single number (count or total)
pub fn print_count(name: &str, value: i64, global: &GlobalOpts) -> Result<()> {
    match global.format {
        OutputFormat::Json => {
            let mut body = serde_json::Map::new();
            body.insert(name.to_string(), value.into());
            println!("{}", serde_json::to_string_pretty(&body).into_diagnostic()?);
        }
        _ => println!("{value}"),
    }
    Ok(())
}

fn terminal_cell(cell: Option<String>) -> String {
    match cell {
        Some(text) => truncate_str(&text, TEXT_WIDTH),
        None => "-".to_string(),
    }
}

fn tsv_row(cells: &[Option<String>]) -> String {
    cells
        .iter()
        .map(|c| {
            c.as_deref()
                .unwrap_or("")
                .replace(['\t', '\n', '\r'], " ")
        })
        .collect::<Vec<_>>()
        .join("\t")
}

fn opt(value: Option<&str>) -> Option<String> {
    value.map(String::from)
}

// ----------------------------------------------------------------------------
// Layouts
// ----------------------------------------------------------------------------

impl Tabular for Disaster {
    const HEADERS: &'static [&'static str] = &["id", "name", "location", "date", "description"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.id.to_string()),
            Some(self.name.clone()),
            opt(self.location.as_deref()),
            self.occurred_on.map(|d| d.format("%Y-%m-%d").to_string()),
            opt(self.description.as_deref()),
        ]
    }
}

const PARTY_HEADERS: &[&str] = &["id", "name", "organization", "email", "phone", "address"];

fn party_cells<P: Party>(party: &P) -> Vec<Option<String>> {
    vec![
        Some(party.id().to_string()),
        Some(party.name().to_string()),
        opt(party.organization()),
        opt(party.email()),
        opt(party.phone()),
        opt(party.address()),
    ]
}

impl Tabular for Beneficiary {
    const HEADERS: &'static [&'static str] = PARTY_HEADERS;

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<Option<String>> {
        party_cells(self)
    }
}

impl Tabular for Donor {
    const HEADERS: &'static [&'static str] = PARTY_HEADERS;

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<Option<String>> {
        party_cells(self)
    }
}

impl Tabular for Product {
    const HEADERS: &'static [&'static str] = &["id", "name", "unit", "description"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.id.to_string()),
            Some(self.name.clone()),
            opt(self.unit.as_deref()),
            opt(self.description.as_deref()),
        ]
    }
}

impl Tabular for Donation {
    const HEADERS: &'static [&'static str] = &["id", "disaster", "beneficiary", "status"];

    fn key(&self) -> String {
        self.id.to_string()
    }

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.id.to_string()),
            Some(self.disaster_id.to_string()),
            Some(self.beneficiary_id.to_string()),
            opt(self.status.as_deref()),
        ]
    }
}

impl Tabular for DonationDonor {
    const HEADERS: &'static [&'static str] = &["donation", "donor"];

    fn key(&self) -> String {
        format!("{}/{}", self.donation_id, self.donor_id)
    }

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.donation_id.to_string()),
            Some(self.donor_id.to_string()),
        ]
    }
}

impl Tabular for DonationProduct {
    const HEADERS: &'static [&'static str] = &["donation", "product", "quantity"];

    fn key(&self) -> String {
        format!("{}/{}", self.donation_id, self.product_id)
    }

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.donation_id.to_string()),
            Some(self.product_id.to_string()),
            Some(self.quantity.to_string()),
        ]
    }
}

impl Tabular for DonationDonorProduct {
    const HEADERS: &'static [&'static str] = &["donation", "donor", "product", "quantity"];

    fn key(&self) -> String {
        format!("{}/{}/{}", self.donation_id, self.donor_id, self.product_id)
    }

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.donation_id.to_string()),
            Some(self.donor_id.to_string()),
            Some(self.product_id.to_string()),
            Some(self.quantity.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cells_line_up_with_headers() {
        let dis = Disaster::new("Enchente").with_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(dis.cells().len(), Disaster::HEADERS.len());
        assert_eq!(dis.cells()[3].as_deref(), Some("2025-06-01"));
        assert_eq!(dis.cells()[2], None);

        let dnr = Donor::new("Cáritas").with_email("c@caritas.org");
        assert_eq!(dnr.cells().len(), Donor::HEADERS.len());
        assert_eq!(dnr.cells()[3].as_deref(), Some("c@caritas.org"));
    }

    #[test]
    fn test_tsv_row_flattens_whitespace() {
        let row = tsv_row(&[Some("a\tb".into()), None, Some("line\nbreak".into())]);
        assert_eq!(row, "a b\t\tline break");
    }

    #[test]
    fn test_terminal_cell_placeholder() {
        assert_eq!(terminal_cell(None), "-");
        assert_eq!(terminal_cell(Some("Recife".into())), "Recife");
    }
}
