//! Product finders

use rusqlite::{params, Connection};
use tracing::warn;

use super::Store;
use crate::core::error::{LedgerError, LedgerResult};
use crate::core::filter::{Conjunction, Criterion};
use crate::entities::Product;

impl Store {
    /// Name contains `fragment`, ignoring case
    pub fn products_by_name(&self, fragment: &str) -> LedgerResult<Vec<Product>> {
        let mut filter = Conjunction::new();
        if !fragment.trim().is_empty() {
            filter.push(Criterion::contains("name_key", fragment));
        }
        self.select(&filter)
    }

    /// Unit of measure equals `unit` exactly
    pub fn products_by_unit(&self, unit: &str) -> LedgerResult<Vec<Product>> {
        self.select(&Conjunction::new().and(Criterion::equals("unit", unit)))
    }

    /// Whether a product is named exactly `name`
    pub fn product_name_exists(&self, name: &str) -> LedgerResult<bool> {
        name_taken(&self.conn, name)
    }

    /// Insert `product` unless one is already named exactly the same.
    ///
    /// The check and the write share one immediate transaction, so two
    /// concurrent callers cannot both succeed.
    pub fn insert_unique_product(&mut self, product: &Product) -> LedgerResult<()> {
        self.insert_guarded(product, |tx| {
            if name_taken(tx, &product.name)? {
                warn!(name = %product.name, "rejecting duplicate product name");
                return Err(LedgerError::conflict("product", &product.name));
            }
            Ok(())
        })
    }
}

fn name_taken(conn: &Connection, name: &str) -> LedgerResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM products WHERE name = ?1)",
        params![name],
        |row| row.get(0),
    )?;
    Ok(exists)
}
