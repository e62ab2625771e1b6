//! Input Validation and Normalization
//!
//! Normalizes raw variant-query fields and applies the lenient numeric
//! coercion policy used across the pipeline.

mod coerce;
mod error;
mod normalize;

pub use coerce::{coerce_f64, coerce_flag, sanitize};
pub use error::InputError;
pub use normalize::{normalize_allele, normalize_chromosome, parse_position};
