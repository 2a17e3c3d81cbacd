//! Optional-criteria query composition
//!
//! A filter is a conjunction of independent criteria. Each optional parameter
//! that is present appends one [`Criterion`]; absent parameters append
//! nothing. The resulting [`Conjunction`] can be pushed down to SQLite as a
//! `WHERE 1=1 AND ...` clause, or evaluated in memory against any
//! [`Filterable`] record. Both paths give the same answer.
//!
//! Text criteria match case-insensitively on Unicode-lowercased values.
//! Tables keep a pre-folded `*_key` column for every searchable text field
//! so the pushdown does not depend on SQLite's ASCII-only `LOWER()`.

use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::core::identity::EntityId;

/// Read access to the columns a criterion can inspect
pub trait Filterable {
    /// Text value stored under `column`, or None when absent
    fn text(&self, column: &str) -> Option<Cow<'_, str>>;

    /// Date value stored under `column`, or None when absent
    fn date(&self, _column: &str) -> Option<NaiveDate> {
        None
    }
}

/// A single constraint on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Case-insensitive substring match; `fragment` is stored folded
    Contains {
        column: &'static str,
        fragment: String,
    },
    /// Exact text equality
    Equals { column: &'static str, value: String },
    /// `column >= date`
    OnOrAfter { column: &'static str, date: NaiveDate },
    /// `column <= date`
    OnOrBefore { column: &'static str, date: NaiveDate },
    /// `start <= column <= end`
    Between {
        column: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// `column > date`
    After { column: &'static str, date: NaiveDate },
}

impl Criterion {
    pub fn contains(column: &'static str, fragment: &str) -> Self {
        Criterion::Contains {
            column,
            fragment: fold(fragment),
        }
    }

    pub fn equals(column: &'static str, value: impl Into<String>) -> Self {
        Criterion::Equals {
            column,
            value: value.into(),
        }
    }

    pub fn id(column: &'static str, id: &EntityId) -> Self {
        Criterion::equals(column, id.to_string())
    }

    /// Date bounds from two optional ends; None when both are absent
    pub fn date_range(
        column: &'static str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Criterion::Between { column, start, end }),
            (Some(date), None) => Some(Criterion::OnOrAfter { column, date }),
            (None, Some(date)) => Some(Criterion::OnOrBefore { column, date }),
            (None, None) => None,
        }
    }

    /// Render as a SQL predicate, appending its parameters
    fn to_sql(&self, params: &mut Vec<Value>) -> String {
        match self {
            Criterion::Contains { column, fragment } => {
                params.push(Value::Text(fragment.clone()));
                format!("instr({column}, ?) > 0")
            }
            Criterion::Equals { column, value } => {
                params.push(Value::Text(value.clone()));
                format!("{column} = ?")
            }
            Criterion::OnOrAfter { column, date } => {
                params.push(date_value(date));
                format!("{column} >= ?")
            }
            Criterion::OnOrBefore { column, date } => {
                params.push(date_value(date));
                format!("{column} <= ?")
            }
            Criterion::Between { column, start, end } => {
                params.push(date_value(start));
                params.push(date_value(end));
                format!("{column} BETWEEN ? AND ?")
            }
            Criterion::After { column, date } => {
                params.push(date_value(date));
                format!("{column} > ?")
            }
        }
    }

    /// Evaluate against a record in memory
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        match self {
            Criterion::Contains { column, fragment } => record
                .text(column)
                .is_some_and(|v| fold(&v).contains(fragment.as_str())),
            Criterion::Equals { column, value } => {
                record.text(column).is_some_and(|v| v == value.as_str())
            }
            Criterion::OnOrAfter { column, date } => record.date(column).is_some_and(|d| d >= *date),
            Criterion::OnOrBefore { column, date } => {
                record.date(column).is_some_and(|d| d <= *date)
            }
            Criterion::Between { column, start, end } => record
                .date(column)
                .is_some_and(|d| *start <= d && d <= *end),
            Criterion::After { column, date } => record.date(column).is_some_and(|d| d > *date),
        }
    }
}

/// Logical AND of zero or more criteria; empty means "match everything"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conjunction {
    criteria: Vec<Criterion>,
}

impl Conjunction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, criterion: Criterion) {
        self.criteria.push(criterion);
    }

    pub fn and(mut self, criterion: Criterion) -> Self {
        self.push(criterion);
        self
    }

    /// Append the criterion only when one was produced
    pub fn and_maybe(mut self, criterion: Option<Criterion>) -> Self {
        if let Some(c) = criterion {
            self.push(c);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// `WHERE 1=1 [AND ...]` plus positional parameters in order
    pub fn where_clause(&self) -> (String, Vec<Value>) {
        let mut sql = String::from(" WHERE 1=1");
        let mut params = Vec::new();
        for criterion in &self.criteria {
            sql.push_str(" AND ");
            sql.push_str(&criterion.to_sql(&mut params));
        }
        (sql, params)
    }

    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.criteria.iter().all(|c| c.matches(record))
    }
}

/// Optional criteria for searching disasters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasterFilter {
    /// Name fragment (case-insensitive substring)
    pub name: Option<String>,
    /// Location fragment (case-insensitive substring)
    pub location: Option<String>,
    /// Earliest occurrence date (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Latest occurrence date (inclusive)
    pub end_date: Option<NaiveDate>,
}

impl DisasterFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, fragment: impl Into<String>) -> Self {
        self.name = Some(fragment.into());
        self
    }

    pub fn location(mut self, fragment: impl Into<String>) -> Self {
        self.location = Some(fragment.into());
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn compose(&self) -> Conjunction {
        Conjunction::new()
            .and_maybe(non_blank(&self.name).map(|f| Criterion::contains("name_key", f)))
            .and_maybe(non_blank(&self.location).map(|f| Criterion::contains("location_key", f)))
            .and_maybe(Criterion::date_range(
                "occurred_on",
                self.start_date,
                self.end_date,
            ))
    }
}

/// Optional criteria for searching donations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationFilter {
    pub disaster_id: Option<EntityId>,
    pub beneficiary_id: Option<EntityId>,
    /// Exact status match
    pub status: Option<String>,
}

impl DonationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disaster(mut self, id: EntityId) -> Self {
        self.disaster_id = Some(id);
        self
    }

    pub fn beneficiary(mut self, id: EntityId) -> Self {
        self.beneficiary_id = Some(id);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn compose(&self) -> Conjunction {
        Conjunction::new()
            .and_maybe(self.disaster_id.as_ref().map(|id| Criterion::id("disaster_id", id)))
            .and_maybe(
                self.beneficiary_id
                    .as_ref()
                    .map(|id| Criterion::id("beneficiary_id", id)),
            )
            .and_maybe(non_blank(&self.status).map(|s| Criterion::equals("status", s)))
    }
}

/// Blank or whitespace-only text counts as absent
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Unicode case folding used for every case-insensitive comparison
pub fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Dates are stored as a day count from 0001-01-01 so that SQL ordering
/// matches `NaiveDate` ordering for every year chrono can represent
pub(crate) fn date_value(date: &NaiveDate) -> Value {
    Value::Integer(i64::from(date.num_days_from_ce()))
}

/// Inverse of [`date_value`]; None when the count is out of chrono's range
pub(crate) fn date_from_days(days: i64) -> Option<NaiveDate> {
    i32::try_from(days)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: String,
        location: Option<String>,
        date: Option<NaiveDate>,
    }

    impl Filterable for Row {
        fn text(&self, column: &str) -> Option<Cow<'_, str>> {
            match column {
                "name_key" => Some(Cow::Borrowed(self.name.as_str())),
                "location_key" => self.location.as_deref().map(Cow::Borrowed),
                _ => None,
            }
        }

        fn date(&self, column: &str) -> Option<NaiveDate> {
            match column {
                "occurred_on" => self.date,
                _ => None,
            }
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(name: &str, location: Option<&str>, date: Option<NaiveDate>) -> Row {
        Row {
            name: name.to_string(),
            location: location.map(String::from),
            date,
        }
    }

    #[test]
    fn test_empty_filter_is_empty_conjunction() {
        let conj = DisasterFilter::new().compose();
        assert!(conj.is_empty());
        assert_eq!(conj.where_clause(), (" WHERE 1=1".to_string(), vec![]));
        assert!(conj.matches(&row("Anything", None, None)));
    }

    #[test]
    fn test_blank_text_criteria_are_absent() {
        let filter = DisasterFilter::new().name("   ").location("");
        assert!(filter.compose().is_empty());
    }

    #[test]
    fn test_text_criteria_fold_case() {
        let conj = DisasterFilter::new().location("RECIFE").compose();
        assert_eq!(
            conj.criteria(),
            &[Criterion::Contains {
                column: "location_key",
                fragment: "recife".to_string()
            }]
        );
        assert!(conj.matches(&row("Enchente", Some("Recife, PE"), None)));
        assert!(!conj.matches(&row("Enchente", Some("Manaus"), None)));
        assert!(!conj.matches(&row("Enchente", None, None)));
    }

    #[test]
    fn test_non_ascii_folding() {
        let conj = DisasterFilter::new().name("INCÊNDIO").compose();
        assert!(conj.matches(&row("Incêndio Sul", None, None)));
    }

    #[test]
    fn test_date_range_shapes() {
        let start = d(2025, 6, 1);
        let end = d(2025, 6, 30);
        assert_eq!(
            Criterion::date_range("occurred_on", Some(start), Some(end)),
            Some(Criterion::Between {
                column: "occurred_on",
                start,
                end
            })
        );
        assert_eq!(
            Criterion::date_range("occurred_on", Some(start), None),
            Some(Criterion::OnOrAfter {
                column: "occurred_on",
                date: start
            })
        );
        assert_eq!(
            Criterion::date_range("occurred_on", None, Some(end)),
            Some(Criterion::OnOrBefore {
                column: "occurred_on",
                date: end
            })
        );
        assert_eq!(Criterion::date_range("occurred_on", None, None), None);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let conj = DisasterFilter::new()
            .start_date(d(2025, 6, 1))
            .end_date(d(2025, 7, 1))
            .compose();
        assert!(conj.matches(&row("a", None, Some(d(2025, 6, 1)))));
        assert!(conj.matches(&row("b", None, Some(d(2025, 7, 1)))));
        assert!(!conj.matches(&row("c", None, Some(d(2025, 7, 2)))));
        assert!(!conj.matches(&row("d", None, None)));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let conj = DisasterFilter::new()
            .start_date(d(2025, 8, 1))
            .end_date(d(2025, 6, 1))
            .compose();
        assert!(!conj.matches(&row("a", None, Some(d(2025, 7, 1)))));
    }

    #[test]
    fn test_where_clause_orders_params() {
        let conj = DisasterFilter::new()
            .name("enchente")
            .location("Recife")
            .start_date(d(2025, 6, 1))
            .end_date(d(2025, 6, 30))
            .compose();
        let (sql, params) = conj.where_clause();
        assert_eq!(
            sql,
            " WHERE 1=1 AND instr(name_key, ?) > 0 AND instr(location_key, ?) > 0 AND occurred_on BETWEEN ? AND ?"
        );
        assert_eq!(
            params,
            vec![
                Value::Text("enchente".into()),
                Value::Text("recife".into()),
                date_value(&d(2025, 6, 1)),
                date_value(&d(2025, 6, 30)),
            ]
        );
    }

    #[test]
    fn test_donation_filter_compose() {
        let disaster = EntityId::new(crate::core::EntityPrefix::Dis);
        let conj = DonationFilter::new().disaster(disaster).status(" ").compose();
        assert_eq!(conj.len(), 1);
        assert_eq!(
            conj.criteria()[0],
            Criterion::Equals {
                column: "disaster_id",
                value: disaster.to_string()
            }
        );
    }
}
