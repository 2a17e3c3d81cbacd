//! Generic operations on primary records
//!
//! Every primary kind maps to one table named by its prefix. Listings come
//! back in insertion order.

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};
use tracing::{debug, info, warn};

use super::{conflict_on_duplicate, placeholders, Store};
use crate::core::entity::Entity;
use crate::core::error::{LedgerError, LedgerResult};
use crate::core::filter::{date_from_days, date_value, fold, Conjunction, Filterable};
use crate::core::identity::EntityId;
use crate::core::integrity;
use crate::entities::{Beneficiary, Contact, Disaster, Donation, Donor, Party, Product};

/// Mapping between an entity and its table row
pub trait Record: Entity + Filterable + Sized {
    /// Stored columns other than `id`
    const COLUMNS: &'static [&'static str];

    /// Column values in [`Record::COLUMNS`] order
    fn values(&self) -> Vec<Value>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn table() -> &'static str {
        Self::PREFIX.table()
    }
}

impl Store {
    /// Validate and write a new record
    pub fn insert<T: Record>(&mut self, record: &T) -> LedgerResult<()> {
        self.insert_guarded(record, |_| Ok(()))
    }

    /// Insert after `guard` passes on the same transaction as the write
    pub(super) fn insert_guarded<T: Record>(
        &mut self,
        record: &T,
        guard: impl FnOnce(&Transaction<'_>) -> LedgerResult<()>,
    ) -> LedgerResult<()> {
        reject_invalid(record)?;
        let id = *record.id();

        self.write(|tx| {
            integrity::verify(tx, &record.references())?;
            guard(tx)?;

            let sql = format!(
                "INSERT INTO {} (id, {}) VALUES (?, {})",
                T::table(),
                T::COLUMNS.join(", "),
                placeholders(T::COLUMNS.len())
            );
            let mut values = vec![Value::Text(id.to_string())];
            values.extend(record.values());
            tx.execute(&sql, params_from_iter(values))
                .map_err(|e| conflict_on_duplicate(e, T::kind(), id))?;
            Ok(())
        })?;

        info!(kind = T::kind(), %id, "created");
        Ok(())
    }

    /// Fetch a record, NotFound when absent
    pub fn get<T: Record>(&self, id: &EntityId) -> LedgerResult<T> {
        self.find(id)?
            .ok_or_else(|| LedgerError::not_found(T::kind(), id))
    }

    /// Fetch a record if it exists
    pub fn find<T: Record>(&self, id: &EntityId) -> LedgerResult<Option<T>> {
        debug!(kind = T::kind(), %id, "get");
        if id.prefix() != T::PREFIX {
            return Ok(None);
        }

        let sql = format!(
            "SELECT id, {} FROM {} WHERE id = ?1",
            T::COLUMNS.join(", "),
            T::table()
        );
        let record = self
            .conn
            .query_row(&sql, params![id], |row| T::from_row(row))
            .optional()?;
        Ok(record)
    }

    /// Every record of a kind
    pub fn list<T: Record>(&self) -> LedgerResult<Vec<T>> {
        self.select(&Conjunction::new())
    }

    /// Records satisfying every criterion of `filter`
    pub fn select<T: Record>(&self, filter: &Conjunction) -> LedgerResult<Vec<T>> {
        let (clause, params) = filter.where_clause();
        let sql = format!(
            "SELECT id, {} FROM {}{} ORDER BY rowid",
            T::COLUMNS.join(", "),
            T::table(),
            clause
        );
        debug!(kind = T::kind(), criteria = filter.len(), "select");
        query_all(&self.conn, &sql, params, T::from_row)
    }

    /// Count records satisfying `filter`
    pub fn count_where<T: Record>(&self, filter: &Conjunction) -> LedgerResult<u64> {
        let (clause, params) = filter.where_clause();
        let sql = format!("SELECT COUNT(*) FROM {}{}", T::table(), clause);
        let n: i64 = self
            .conn
            .query_row(&sql, params_from_iter(params), |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }

    pub fn count<T: Record>(&self) -> LedgerResult<u64> {
        self.count_where::<T>(&Conjunction::new())
    }

    pub fn exists<T: Record>(&self, id: &EntityId) -> LedgerResult<bool> {
        Ok(self.find::<T>(id)?.is_some())
    }

    /// Replace every field of an existing record
    pub fn update<T: Record>(&mut self, record: &T) -> LedgerResult<()> {
        reject_invalid(record)?;
        let id = *record.id();
        if id.prefix() != T::PREFIX {
            return Err(LedgerError::not_found(T::kind(), id));
        }

        self.write(|tx| {
            if !row_exists(tx, T::table(), &id)? {
                return Err(LedgerError::not_found(T::kind(), id));
            }
            integrity::verify(tx, &record.references())?;

            let assignments = T::COLUMNS
                .iter()
                .map(|c| format!("{c} = ?"))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!("UPDATE {} SET {} WHERE id = ?", T::table(), assignments);
            let mut values = record.values();
            values.push(Value::Text(id.to_string()));
            tx.execute(&sql, params_from_iter(values))?;
            Ok(())
        })?;

        debug!(kind = T::kind(), %id, "updated");
        Ok(())
    }

    /// Remove a record. Links pointing at it are left in place.
    pub fn delete<T: Record>(&mut self, id: &EntityId) -> LedgerResult<()> {
        if id.prefix() != T::PREFIX {
            return Err(LedgerError::not_found(T::kind(), id));
        }

        let sql = format!("DELETE FROM {} WHERE id = ?1", T::table());
        let removed = self.write(|tx| Ok(tx.execute(&sql, params![id])?))?;
        if removed == 0 {
            return Err(LedgerError::not_found(T::kind(), id));
        }

        info!(kind = T::kind(), %id, "deleted");
        Ok(())
    }
}

fn reject_invalid<T: Entity>(record: &T) -> LedgerResult<()> {
    record.validate().map_err(|e| {
        warn!(kind = T::kind(), id = %record.id(), error = %e, "rejecting invalid record");
        LedgerError::from(e)
    })
}

fn row_exists(conn: &Connection, table: &str, id: &EntityId) -> LedgerResult<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)");
    Ok(conn.query_row(&sql, params![id], |row| row.get(0))?)
}

/// Run a query and map every row
pub(super) fn query_all<T>(
    conn: &Connection,
    sql: &str,
    params: Vec<Value>,
    map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> LedgerResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(params), map)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::Text(s.to_string()))
}

fn key(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::Text(fold(s)))
}

fn date(value: Option<NaiveDate>) -> Value {
    value.as_ref().map_or(Value::Null, date_value)
}

fn read_date(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<NaiveDate>> {
    let Some(days) = row.get::<_, Option<i64>>(column)? else {
        return Ok(None);
    };
    match date_from_days(days) {
        Some(date) => Ok(Some(date)),
        None => Err(rusqlite::Error::IntegralValueOutOfRange(
            row.as_ref().column_index(column)?,
            days,
        )),
    }
}

// ----------------------------------------------------------------------------
// Row mappings
// ----------------------------------------------------------------------------

impl Record for Disaster {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "name_key",
        "description",
        "location",
        "location_key",
        "occurred_on",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            text(Some(&self.name)),
            key(Some(&self.name)),
            text(self.description.as_deref()),
            text(self.location.as_deref()),
            key(self.location.as_deref()),
            date(self.occurred_on),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Disaster {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            location: row.get("location")?,
            occurred_on: read_date(row, "occurred_on")?,
        })
    }
}

const PARTY_COLUMNS: &[&str] = &[
    "name",
    "name_key",
    "organization",
    "organization_key",
    "email",
    "phone",
    "address",
];

fn party_values<P: Party>(party: &P) -> Vec<Value> {
    vec![
        text(Some(party.name())),
        key(Some(party.name())),
        text(party.organization()),
        key(party.organization()),
        text(party.email()),
        text(party.phone()),
        text(party.address()),
    ]
}

fn party_from_row<P: Party>(row: &Row<'_>) -> rusqlite::Result<P> {
    let contact = Contact {
        name: row.get("name")?,
        organization: row.get("organization")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        address: row.get("address")?,
    };
    Ok(P::from_parts(row.get("id")?, contact))
}

impl Record for Beneficiary {
    const COLUMNS: &'static [&'static str] = PARTY_COLUMNS;

    fn values(&self) -> Vec<Value> {
        party_values(self)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        party_from_row(row)
    }
}

impl Record for Donor {
    const COLUMNS: &'static [&'static str] = PARTY_COLUMNS;

    fn values(&self) -> Vec<Value> {
        party_values(self)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        party_from_row(row)
    }
}

impl Record for Product {
    const COLUMNS: &'static [&'static str] = &["name", "name_key", "description", "unit"];

    fn values(&self) -> Vec<Value> {
        vec![
            text(Some(&self.name)),
            key(Some(&self.name)),
            text(self.description.as_deref()),
            text(self.unit.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Product {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            unit: row.get("unit")?,
        })
    }
}

impl Record for Donation {
    const COLUMNS: &'static [&'static str] = &["disaster_id", "beneficiary_id", "status"];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.disaster_id.to_string()),
            Value::Text(self.beneficiary_id.to_string()),
            text(self.status.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Donation {
            id: row.get("id")?,
            disaster_id: row.get("disaster_id")?,
            beneficiary_id: row.get("beneficiary_id")?,
            status: row.get("status")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_insert_get_roundtrip() {
        let mut store = Store::open_in_memory().unwrap();
        let dis = Disaster::new("Enchente Norte")
            .with_location("Recife")
            .with_description("Cheia do rio")
            .with_date(d(2025, 6, 1));
        store.insert(&dis).unwrap();

        assert_eq!(store.get::<Disaster>(&dis.id).unwrap(), dis);
        assert!(store.exists::<Disaster>(&dis.id).unwrap());
        assert_eq!(store.count::<Disaster>().unwrap(), 1);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = Store::open_in_memory().unwrap();
        let err = store
            .get::<Product>(&EntityId::new(EntityPrefix::Prd))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_wrong_prefix_is_absent() {
        let mut store = Store::open_in_memory().unwrap();
        let dis = Disaster::new("Seca");
        store.insert(&dis).unwrap();
        assert_eq!(store.find::<Product>(&dis.id).unwrap(), None);
    }

    #[test]
    fn test_blank_name_is_rejected_and_not_written() {
        let mut store = Store::open_in_memory().unwrap();
        let err = store.insert(&Donor::new(" ")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.count::<Donor>().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_id_conflicts() {
        let mut store = Store::open_in_memory().unwrap();
        let prd = Product::new("Água");
        store.insert(&prd).unwrap();
        assert!(store.insert(&prd).unwrap_err().is_conflict());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut store = Store::open_in_memory().unwrap();
        let names = ["Zeta", "Alfa", "Meio"];
        for name in names {
            store.insert(&Beneficiary::new(name)).unwrap();
        }
        let listed: Vec<_> = store
            .list::<Beneficiary>()
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let mut store = Store::open_in_memory().unwrap();
        let mut ben = Beneficiary::new("Abrigo").with_email("a@abrigo.org");
        store.insert(&ben).unwrap();

        ben.name = "Abrigo Central".to_string();
        ben.email = None;
        ben.phone = Some("+55 81 5555".to_string());
        store.update(&ben).unwrap();

        assert_eq!(store.get::<Beneficiary>(&ben.id).unwrap(), ben);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = Store::open_in_memory().unwrap();
        let err = store.update(&Disaster::new("Nunca gravado")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete() {
        let mut store = Store::open_in_memory().unwrap();
        let dnr = Donor::new("Cruz Vermelha");
        store.insert(&dnr).unwrap();

        store.delete::<Donor>(&dnr.id).unwrap();
        assert!(!store.exists::<Donor>(&dnr.id).unwrap());
        assert!(store.delete::<Donor>(&dnr.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_party_kinds_are_separate() {
        let mut store = Store::open_in_memory().unwrap();
        let ben = Beneficiary::new("Maria");
        store.insert(&ben).unwrap();
        assert_eq!(store.count::<Donor>().unwrap(), 0);
        assert_eq!(store.find::<Donor>(&ben.id).unwrap(), None);
    }
}
