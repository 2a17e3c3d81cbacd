//! Database schema initialization

use rusqlite::{params, OptionalExtension};

use super::{Store, SCHEMA_VERSION};
use crate::core::error::LedgerResult;

impl Store {
    /// Create tables that do not exist yet and record the schema version
    pub(super) fn init_schema(&mut self) -> LedgerResult<()> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- *_key columns hold Unicode-lowercased copies for substring search.
            -- Dates are day counts from 0001-01-01 (chrono num_days_from_ce).

            CREATE TABLE IF NOT EXISTS disasters (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                description TEXT,
                location TEXT,
                location_key TEXT,
                occurred_on INTEGER
            );
            CREATE INDEX IF NOT EXISTS idx_disasters_occurred_on ON disasters(occurred_on);

            CREATE TABLE IF NOT EXISTS beneficiaries (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                organization TEXT,
                organization_key TEXT,
                email TEXT,
                phone TEXT,
                address TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_beneficiaries_email ON beneficiaries(email);

            CREATE TABLE IF NOT EXISTS donors (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                organization TEXT,
                organization_key TEXT,
                email TEXT,
                phone TEXT,
                address TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_donors_email ON donors(email);

            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                description TEXT,
                unit TEXT
            );

            CREATE TABLE IF NOT EXISTS donations (
                id TEXT PRIMARY KEY,
                disaster_id TEXT NOT NULL,
                beneficiary_id TEXT NOT NULL,
                status TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_donations_disaster ON donations(disaster_id);
            CREATE INDEX IF NOT EXISTS idx_donations_beneficiary ON donations(beneficiary_id);
            CREATE INDEX IF NOT EXISTS idx_donations_status ON donations(status);

            -- Associations are keyed by the ids they link

            CREATE TABLE IF NOT EXISTS donation_donors (
                donation_id TEXT NOT NULL,
                donor_id TEXT NOT NULL,
                PRIMARY KEY (donation_id, donor_id)
            );
            CREATE INDEX IF NOT EXISTS idx_donation_donors_donor ON donation_donors(donor_id);

            CREATE TABLE IF NOT EXISTS donation_products (
                donation_id TEXT NOT NULL,
                product_id TEXT NOT NULL,
                quantity INTEGER NOT NULL CHECK (quantity > 0),
                PRIMARY KEY (donation_id, product_id)
            );
            CREATE INDEX IF NOT EXISTS idx_donation_products_product ON donation_products(product_id);

            CREATE TABLE IF NOT EXISTS donation_donor_products (
                donation_id TEXT NOT NULL,
                donor_id TEXT NOT NULL,
                product_id TEXT NOT NULL,
                quantity INTEGER NOT NULL CHECK (quantity > 0),
                PRIMARY KEY (donation_id, donor_id, product_id)
            );
            CREATE INDEX IF NOT EXISTS idx_donation_donor_products_donor ON donation_donor_products(donor_id);
            CREATE INDEX IF NOT EXISTS idx_donation_donor_products_product ON donation_donor_products(product_id);
            "#,
        )?;

        if self.schema_version()? == 0 {
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )?;
        }

        Ok(())
    }

    /// Recorded schema version, 0 when none has been written
    pub fn schema_version(&self) -> LedgerResult<i32> {
        let version: Option<i32> = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get(0)
            })
            .optional()?
            .flatten();
        Ok(version.unwrap_or(0))
    }
}
