//! Rule-Based Fallback System
//!
//! Provides a deterministic heuristic verdict when no trained classifier
//! is available.

mod rules;

pub use rules::{HeuristicEngine, HeuristicRule, HeuristicVerdict, PROB_BENIGN, PROB_PATHOGENIC};
