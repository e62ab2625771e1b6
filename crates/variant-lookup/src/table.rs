//! Lookup Table Loading and Matching

use crate::{LookupError, VariantQuery};
use data_validator::{coerce_f64, normalize_allele, normalize_chromosome, parse_position};
use feature_engine::{FeatureName, LookupFeatures};
use std::path::Path;
use tracing::{debug, info, warn};

/// Default row cap when loading the table
pub const DEFAULT_ROW_CAP: usize = 200_000;

/// One normalized row of the feature table
#[derive(Debug, Clone)]
pub struct VariantRecord {
    /// Chromosome, normalized like queries
    pub chromosome: String,
    /// Position; `None` when the cell did not parse (such rows never
    /// match)
    pub position: Option<i64>,
    /// Reference allele, trimmed
    pub reference: String,
    /// Alternate allele, trimmed
    pub alternate: String,
    /// Feature values the row carried
    pub features: LookupFeatures,
}

/// In-memory lookup table, loaded once and queried read-only
#[derive(Debug)]
pub struct LookupTable {
    records: Vec<VariantRecord>,
}

impl LookupTable {
    /// Load a table from a CSV file, keeping at most `row_cap` rows.
    ///
    /// The header must contain `chr`, `pos`, `ref` and `alt`; feature
    /// columns matching the vocabulary are picked up, everything else is
    /// ignored. Rows the CSV reader cannot decode are skipped.
    pub fn from_csv_path(path: &Path, row_cap: usize) -> Result<Self, LookupError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let chr_idx = column(&headers, "chr")?;
        let pos_idx = column(&headers, "pos")?;
        let ref_idx = column(&headers, "ref")?;
        let alt_idx = column(&headers, "alt")?;

        let feature_columns: Vec<(usize, FeatureName)> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| FeatureName::from_column(h).map(|f| (i, f)))
            .collect();

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for result in reader.records() {
            if records.len() >= row_cap {
                debug!("row cap {row_cap} reached, truncating table");
                break;
            }
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    debug!("skipping undecodable row: {e}");
                    skipped += 1;
                    continue;
                }
            };

            let mut features = LookupFeatures::default();
            for (idx, name) in &feature_columns {
                let cell = record.get(*idx).unwrap_or("");
                if !cell.trim().is_empty() {
                    features.set(*name, coerce_f64(cell));
                }
            }

            records.push(VariantRecord {
                chromosome: normalize_chromosome(record.get(chr_idx).unwrap_or("")),
                position: parse_position(record.get(pos_idx).unwrap_or("")).ok(),
                reference: normalize_allele(record.get(ref_idx).unwrap_or("")),
                alternate: normalize_allele(record.get(alt_idx).unwrap_or("")),
                features,
            });
        }

        info!(
            rows = records.len(),
            skipped, "lookup table loaded from {}",
            path.display()
        );
        Ok(Self { records })
    }

    /// First row matching the query in table order, if any. Pure read.
    pub fn find(&self, query: &VariantQuery) -> Option<&VariantRecord> {
        self.records.iter().find(|r| {
            r.position == Some(query.position)
                && r.chromosome == query.chromosome
                && r.reference == query.reference
                && r.alternate == query.alternate
        })
    }

    /// Number of rows held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no rows loaded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn column(headers: &[String], name: &'static str) -> Result<usize, LookupError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(LookupError::MissingColumn(name))
}

/// Lookup table resource state.
///
/// A missing or unreadable table degrades every request to
/// manual-features-only; it never fails startup.
pub enum TableState {
    /// Table loaded and queryable
    Loaded(LookupTable),
    /// No file at the configured path
    Missing,
    /// File present but unusable (unreadable, or required columns absent)
    Failed(String),
}

impl TableState {
    /// Load the table from disk
    pub fn load(path: &Path, row_cap: usize) -> Self {
        if !path.exists() {
            warn!("no lookup table at {}, lookups disabled", path.display());
            return TableState::Missing;
        }
        match LookupTable::from_csv_path(path, row_cap) {
            Ok(table) => TableState::Loaded(table),
            Err(e) => {
                warn!("lookup table rejected: {e}");
                TableState::Failed(e.to_string())
            }
        }
    }

    /// The loaded table, if any
    pub fn table(&self) -> Option<&LookupTable> {
        match self {
            TableState::Loaded(table) => Some(table),
            _ => None,
        }
    }

    /// Status string for the health surface
    pub fn status(&self) -> &'static str {
        match self {
            TableState::Loaded(_) => "loaded",
            TableState::Missing => "missing",
            TableState::Failed(_) => "failed",
        }
    }

    /// Row count when loaded
    pub fn row_count(&self) -> Option<usize> {
        self.table().map(LookupTable::len)
    }
}
