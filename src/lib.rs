//! Weightsum - enumerate every way of reaching a target with unlimited unit weights
//!
//! Given a set of distinct positive weights, each available in any quantity, the search
//! finds all multisets of them whose total equals the target exactly, together with how
//! many there are.

pub mod combinations;
pub mod errors;
pub mod weight;

// Re-export the main public API
pub use combinations::{
    Combination, Enumeration, ResultSet, compute_bounds, enumerate, enumerate_into,
};
pub use errors::EnumerateError;
pub use weight::{Weight, validate_weights};

/// Computes the combinations of `weights` reaching `target` and their number.
///
/// This is a convenience function over [`enumerate`] returning the plain pair.
/// Combinations come in discovery order, weights inside each one in input order.
///
/// # Errors
///
/// This function will return an error if:
/// * a weight appears more than once
/// * a weight is zero, negative or not finite
/// * the target is not finite
/// * a weight is so small against the target that its count overflows
///
/// # Examples
///
/// ```
/// use weightsum::compute_combinations;
///
/// let (combinations, count) = compute_combinations(5.0, &[1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(count, 5);
/// assert_eq!(combinations[0].to_string(), "{2: 1, 3: 1}");
/// assert_eq!(combinations[4].to_string(), "{1: 5}");
///
/// // No multiple of 2 reaches 5
/// assert_eq!(compute_combinations(5.0, &[2.0]).unwrap(), (vec![], 0));
/// ```
///
/// Repeated weights are rejected before any search:
///
/// ```
/// use weightsum::{EnumerateError, compute_combinations};
///
/// let err = compute_combinations(5.0, &[0.5, 2.0, 3.0, 0.5]).unwrap_err();
/// assert_eq!(err, EnumerateError::DuplicateWeight(0.5));
/// assert_eq!(err.to_string(), "Weights must not repeat: 0.5 appears more than once");
/// ```
pub fn compute_combinations(
    target: f64,
    weights: &[f64],
) -> Result<(Vec<Combination>, usize), EnumerateError> {
    Ok(enumerate(target, weights)?.into_parts())
}
