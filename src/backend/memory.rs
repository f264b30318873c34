//! In-process backend.
//!
//! Holds rows as JSON per collection and evaluates [`ListQuery`] with the
//! same semantics the hosted database gives: AND-combined filters, a stable
//! sort where `null` sorts as the largest value (last when ascending, first
//! when descending), then the row cap. Seeds come from a JSON file keyed by
//! table name; tests insert typed records directly.
//!
//! Failures can be injected per collection to exercise degraded pages.

use super::store::{Backend, Collection, Direction, FetchError, Filter, ListQuery};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tracing::{debug, warn};

#[derive(Default)]
pub struct MemoryBackend {
    rows: RwLock<HashMap<Collection, Vec<Value>>>,
    failures: RwLock<HashMap<Collection, String>>,
    queries: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows keyed by table name, as in `{"jobs": [...], "blog_posts": [...]}`.
    ///
    /// Unknown table names are skipped with a warning.
    pub fn from_seed_tables(seed: HashMap<String, Vec<Value>>) -> Self {
        let backend = Self::new();
        for (table, rows) in seed {
            match Collection::from_table(&table) {
                Some(collection) => backend.insert_rows(collection, rows),
                None => warn!(table, "seed contains unknown table, skipping"),
            }
        }
        backend
    }

    pub fn insert_rows(&self, collection: Collection, rows: impl IntoIterator<Item = Value>) {
        let mut guard = self.rows.write().unwrap_or_else(|e| e.into_inner());
        guard.entry(collection).or_default().extend(rows);
    }

    /// Insert typed records (anything that serializes to a JSON object).
    pub fn insert<T: Serialize>(&self, collection: Collection, records: &[T]) {
        let rows = records
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok());
        self.insert_rows(collection, rows);
    }

    /// Make every query against `collection` fail until cleared.
    pub fn fail_collection(&self, collection: Collection, message: &str) {
        let mut guard = self.failures.write().unwrap_or_else(|e| e.into_inner());
        guard.insert(collection, message.to_string());
    }

    pub fn clear_failures(&self) {
        let mut guard = self.failures.write().unwrap_or_else(|e| e.into_inner());
        guard.clear();
    }

    /// Total queries served (including failed ones).
    pub fn query_count(&self) -> usize {
        self.queries.load(AtomicOrdering::SeqCst)
    }

    pub fn row_count(&self, collection: Collection) -> usize {
        let guard = self.rows.read().unwrap_or_else(|e| e.into_inner());
        guard.get(&collection).map_or(0, Vec::len)
    }

    fn evaluate(&self, query: &ListQuery) -> Vec<Value> {
        let guard = self.rows.read().unwrap_or_else(|e| e.into_inner());
        let Some(rows) = guard.get(&query.collection) else {
            return Vec::new();
        };

        let mut matched: Vec<Value> = rows
            .iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|f| matches_filter(row, f, query.collection))
            })
            .cloned()
            .collect();

        if let Some(order) = &query.order {
            matched.sort_by(|a, b| {
                let ord = compare_nulls_last(a.get(&order.column), b.get(&order.column));
                match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        matched.truncate(query.row_limit());
        matched
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn query(&self, query: &ListQuery) -> Result<Vec<Value>, FetchError> {
        self.queries.fetch_add(1, AtomicOrdering::SeqCst);
        let failure = {
            let guard = self.failures.read().unwrap_or_else(|e| e.into_inner());
            guard.get(&query.collection).cloned()
        };
        if let Some(message) = failure {
            return Err(FetchError::Unavailable(message));
        }
        let rows = self.evaluate(query);
        debug!(collection = %query.collection, rows = rows.len(), "memory query");
        Ok(rows)
    }
}

fn column<'a>(row: &'a Value, name: &str) -> &'a Value {
    row.get(name).unwrap_or(&Value::Null)
}

fn matches_filter(row: &Value, filter: &Filter, collection: Collection) -> bool {
    match filter {
        Filter::Eq { column: c, value } => column(row, c) == value,
        Filter::In { column: c, values } => values.contains(column(row, c)),
        Filter::Gte { column: c, value } => {
            let cell = column(row, c);
            !cell.is_null() && compare_values(cell, value) != Ordering::Less
        }
        Filter::Lte { column: c, value } => {
            let cell = column(row, c);
            !cell.is_null() && compare_values(cell, value) != Ordering::Greater
        }
        Filter::ILike { column: c, needle } => column(row, c)
            .as_str()
            .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
        Filter::Contains { column: c, values } => match column(row, c).as_array() {
            Some(items) => values
                .iter()
                .all(|v| items.iter().any(|i| i.as_str() == Some(v.as_str()))),
            None => false,
        },
        Filter::TextSearch { query, .. } => text_matches(row, query, collection),
    }
}

/// Every search word must appear (case-insensitively) in one of the
/// collection's text columns.
fn text_matches(row: &Value, query: &str, collection: Collection) -> bool {
    let haystack: String = collection
        .text_columns()
        .iter()
        .map(|c| match column(row, c) {
            Value::String(s) => s.to_lowercase(),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .join(" "),
            _ => String::new(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    query
        .split_whitespace()
        .all(|word| haystack.contains(&word.to_lowercase()))
}

/// Order where `null`/missing is greater than any value.
fn compare_nulls_last(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare_values(a, b),
    }
}

/// Numbers numerically, timestamps chronologically, other strings
/// lexically, booleans `false < true`.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(x), Ok(y)) => x.with_timezone(&Utc).cmp(&y.with_timezone(&Utc)),
                _ => x.cmp(y),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
