//! Columnar results and the forward-only row cursor.

use crate::rest::protocol::JobResultRows;
use serde_json::Value;

/// Column metadata: a name and an optional server-reported type description.
///
/// RPC results carry type names; control-plane job results do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Server-side type description, when known
    pub type_name: Option<String>,
}

impl ColumnInfo {
    /// Create column metadata with a known type.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
        }
    }

    /// Create column metadata without type information.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
        }
    }
}

/// A fully materialized columnar result.
///
/// Rows are stored as JSON value tuples aligned with `columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Ordered column metadata
    pub columns: Vec<ColumnInfo>,
    /// Row tuples in source order
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from columns and rows.
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// An empty table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of materialized rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Build a table from the control plane's `{columns, results}` job
    /// result shape. Missing cells materialize as NULL.
    pub fn from_rest_rows(data: &JobResultRows) -> Self {
        if data.columns.is_empty() || data.results.is_empty() {
            return Self::empty();
        }
        let columns: Vec<ColumnInfo> = data
            .columns
            .iter()
            .map(|name| ColumnInfo::untyped(name.clone()))
            .collect();
        let rows = data
            .results
            .iter()
            .map(|row| {
                data.columns
                    .iter()
                    .map(|name| row.get(name).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    /// Interpret this table as a mutation result.
    ///
    /// When the statement is DML the server answers with a single-row table
    /// whose only column is named `affected_rows`; its scalar is the count.
    /// Servers that echo rows instead are handled by falling back to the row
    /// count. This is a server convention, not a protocol guarantee.
    pub fn affected_row_count(&self) -> i64 {
        if self.num_columns() == 1 && self.columns[0].name == "affected_rows" {
            if let Some(count) = self.rows.first().and_then(|row| row.first()).and_then(Value::as_i64)
            {
                return count;
            }
        }
        self.num_rows() as i64
    }
}

/// Forward-only cursor over a materialized query result.
///
/// The cursor owns no network resources; it only walks an in-memory table.
/// For DML statements it carries the affected-row count and an empty table.
#[derive(Debug, Clone)]
pub struct ResultSet {
    table: Table,
    affected_rows: Option<i64>,
    cursor: usize,
}

impl ResultSet {
    /// Wrap a materialized table.
    pub fn from_table(table: Table) -> Self {
        Self {
            table,
            affected_rows: None,
            cursor: 0,
        }
    }

    /// Build a mutation result carrying only an affected-row count.
    pub fn from_affected_rows(count: i64) -> Self {
        Self {
            table: Table::empty(),
            affected_rows: Some(count),
            cursor: 0,
        }
    }

    /// Number of rows in the result, or the affected-row count for DML.
    pub fn row_count(&self) -> i64 {
        match self.affected_rows {
            Some(count) => count,
            None => self.table.num_rows() as i64,
        }
    }

    /// The affected-row count, if this is a mutation result.
    pub fn affected_rows(&self) -> Option<i64> {
        self.affected_rows
    }

    /// Column names.
    pub fn columns(&self) -> Vec<&str> {
        self.table.column_names()
    }

    /// Column metadata as `(name, type description)` pairs, or `None` for
    /// results with no columns.
    pub fn description(&self) -> Option<Vec<(String, String)>> {
        if self.table.num_columns() == 0 {
            return None;
        }
        Some(
            self.table
                .columns
                .iter()
                .map(|c| (c.name.clone(), c.type_name.clone().unwrap_or_default()))
                .collect(),
        )
    }

    /// Fetch the next row and advance, or `None` once exhausted.
    ///
    /// Fetching past the end keeps returning `None`.
    pub fn fetch_one(&mut self) -> Option<Vec<Value>> {
        let row = self.table.rows.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(row)
    }

    /// Fetch up to `size` rows.
    pub fn fetch_many(&mut self, size: usize) -> Vec<Vec<Value>> {
        let mut rows = Vec::new();
        for _ in 0..size {
            match self.fetch_one() {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        rows
    }

    /// Fetch all remaining rows.
    pub fn fetch_all(&mut self) -> Vec<Vec<Value>> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch_one() {
            rows.push(row);
        }
        rows
    }

    /// Borrow the underlying table.
    pub fn table(&self) -> &Table {
        &self.table
    }
}
