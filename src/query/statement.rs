//! Statement classification and parameter binding.

use serde_json::Value;

/// Classification of a SQL statement by what it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Returns rows (SELECT, WITH, EXPLAIN, ...)
    Read,
    /// Mutates data or schema and returns an affected-row count
    Mutation,
}

/// Leading keywords that mark a statement as row-returning.
const READ_PREFIXES: [&str; 9] = [
    "SELECT", "WITH", "EXPLAIN", "SHOW", "DESCRIBE", "PRAGMA", "TABLE", "FROM", "VALUES",
];

impl StatementKind {
    /// Detect the statement kind from the leading keyword of the SQL text.
    pub fn from_sql(sql: &str) -> Self {
        let first_word = sql
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_uppercase();
        if READ_PREFIXES.contains(&first_word.as_str()) {
            StatementKind::Read
        } else {
            StatementKind::Mutation
        }
    }

    /// Check if this statement kind returns a result set.
    pub fn returns_rows(&self) -> bool {
        matches!(self, StatementKind::Read)
    }
}

/// Parameter value for server-side binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// NULL value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
    /// Binary data, hex-encoded on the wire
    Binary(Vec<u8>),
}

impl Parameter {
    /// Convert the parameter to its JSON wire value.
    pub fn to_json(&self) -> Value {
        match self {
            Parameter::Null => Value::Null,
            Parameter::Boolean(b) => Value::Bool(*b),
            Parameter::Integer(i) => serde_json::json!(*i),
            Parameter::Float(f) => serde_json::json!(*f),
            Parameter::String(s) => Value::String(s.clone()),
            Parameter::Binary(b) => Value::String(hex::encode(b)),
        }
    }
}

impl From<bool> for Parameter {
    fn from(value: bool) -> Self {
        Parameter::Boolean(value)
    }
}

impl From<i32> for Parameter {
    fn from(value: i32) -> Self {
        Parameter::Integer(i64::from(value))
    }
}

impl From<i64> for Parameter {
    fn from(value: i64) -> Self {
        Parameter::Integer(value)
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Parameter::Float(value)
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Parameter::String(value.to_string())
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Parameter::String(value)
    }
}

impl From<Vec<u8>> for Parameter {
    fn from(value: Vec<u8>) -> Self {
        Parameter::Binary(value)
    }
}

impl<T: Into<Parameter>> From<Option<T>> for Parameter {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Parameter::Null,
        }
    }
}

/// One row of parameter bindings for a single execution.
///
/// Positional parameters are keyed by their stringified position (`"0"`,
/// `"1"`, ...); named parameters keep their names in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSet {
    /// Positional bindings in order
    Positional(Vec<Parameter>),
    /// Named bindings in insertion order
    Named(Vec<(String, Parameter)>),
}

impl ParameterSet {
    /// Build a positional set from anything convertible to parameters.
    pub fn positional<I, P>(values: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Parameter>,
    {
        ParameterSet::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Build a named set, preserving insertion order.
    pub fn named<I, N, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<Parameter>,
    {
        ParameterSet::Named(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        match self {
            ParameterSet::Positional(values) => values.len(),
            ParameterSet::Named(pairs) => pairs.len(),
        }
    }

    /// Check if the set carries no parameters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode the set as a single-row columnar batch, one column per
    /// parameter.
    pub fn to_batch(&self) -> ParamBatch {
        match self {
            ParameterSet::Positional(values) => ParamBatch {
                columns: (0..values.len()).map(|i| i.to_string()).collect(),
                row: values.iter().map(Parameter::to_json).collect(),
            },
            ParameterSet::Named(pairs) => ParamBatch {
                columns: pairs.iter().map(|(name, _)| name.clone()).collect(),
                row: pairs.iter().map(|(_, value)| value.to_json()).collect(),
            },
        }
    }
}

impl From<Vec<Parameter>> for ParameterSet {
    fn from(values: Vec<Parameter>) -> Self {
        ParameterSet::Positional(values)
    }
}

/// A single-row columnar batch of parameter bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamBatch {
    /// One column name per parameter
    pub columns: Vec<String>,
    /// The single row of values, aligned with `columns`
    pub row: Vec<Value>,
}
