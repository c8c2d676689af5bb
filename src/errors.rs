use thiserror::Error;

/// Errors raised at entry, before any search work is done.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnumerateError {
    #[error("Weights must not repeat: {0} appears more than once")]
    DuplicateWeight(f64),
    #[error("Weights must be positive and finite, got {0}")]
    InvalidWeight(f64),
    #[error("Target must be finite, got {0}")]
    InvalidTarget(f64),
    #[error("Weight {weight} is too small for target {target}: its count cannot be bounded")]
    BoundOverflow { weight: f64, target: f64 },
}
