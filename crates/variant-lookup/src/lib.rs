//! Variant Lookup Service
//!
//! Loads a delimited feature table once per process and answers exact
//! coordinate queries against it. Lookup failures are absences, never
//! errors.

mod query;
mod table;

pub use query::VariantQuery;
pub use table::{LookupTable, TableState, VariantRecord, DEFAULT_ROW_CAP};

use thiserror::Error;

/// Errors while loading the lookup table
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("failed to read lookup table: {0}")]
    Read(#[from] csv::Error),
    #[error("lookup table missing required column '{0}'")]
    MissingColumn(&'static str),
}
