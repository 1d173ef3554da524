//! Query execution and result handling.
//!
//! This module provides the core query execution functionality for
//! duckgresql-rs:
//! - `statement` - statement classification and parameter binding
//! - `flight` - the Flight SQL client and prepared-statement sequence
//! - `results` - columnar tables and the forward-only row cursor

pub mod flight;
pub mod results;
pub mod statement;

// Re-export commonly used types
pub use flight::FlightSqlClient;
pub use results::{ColumnInfo, ResultSet, Table};
pub use statement::{ParamBatch, Parameter, ParameterSet, StatementKind};
