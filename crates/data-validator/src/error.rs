//! Input Error Types

use thiserror::Error;

/// Errors during input normalization
#[derive(Debug, Clone, Error)]
pub enum InputError {
    /// Position string did not parse as an integer
    #[error("position '{0}' is not a valid integer")]
    InvalidPosition(String),
}
