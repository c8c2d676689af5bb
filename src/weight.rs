use std::fmt;

use ahash::HashSetExt;
use fxhash::FxHashSet;
use log::{debug, warn};
use ordered_float::OrderedFloat;

use crate::errors::EnumerateError;

/// A positive, finite unit weight.
/// Wraps the value in `OrderedFloat` so weights can key hash sets and be sorted.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Weight(OrderedFloat<f64>);

impl Weight {
    /// Constructor, rejects zero, negative and non-finite values.
    pub fn new(value: f64) -> Result<Self, EnumerateError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(EnumerateError::InvalidWeight(value));
        }
        Ok(Self(OrderedFloat(value)))
    }

    #[inline(always)]
    pub fn value(self) -> f64 {
        self.0.into_inner()
    }

    /// Largest number of units of this weight that fit in `target`, `target // w`.
    /// Negative when the target is negative, meaning not even a zero count is admissible.
    #[inline(always)]
    pub fn bound(self, target: f64) -> i64 {
        floor_div(target, self.value()) as i64
    }

    /// Same as `bound`, but `None` when the quotient is not finite or does not fit an `i64`.
    pub fn checked_bound(self, target: f64) -> Option<i64> {
        let quotient = floor_div(target, self.value());
        if !quotient.is_finite() || quotient.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(quotient as i64)
    }
}

/// Floor division on the exact quotient of `a` and `b`, not on the rounded `a / b`.
/// `1.0 / 0.1` rounds up to `10.0` while `floor_div(1.0, 0.1)` is `9.0`.
fn floor_div(a: f64, b: f64) -> f64 {
    // `%` is fmod: exact, with the sign of `a`
    let rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 && ((b < 0.0) != (rem < 0.0)) {
        div -= 1.0;
    }

    if div == 0.0 {
        return 0.0_f64.copysign(a / b);
    }

    // Snap to the nearest integer, `div` is integral up to rounding
    let mut floored = div.floor();
    if div - floored > 0.5 {
        floored += 1.0;
    }
    floored
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Checks a raw weight list and converts it, keeping the input order.
///
/// # Errors
///
/// Returns `InvalidWeight` for a non-positive or non-finite value and
/// `DuplicateWeight` for the first value seen twice.
pub fn validate_weights(weights: &[f64]) -> Result<Vec<Weight>, EnumerateError> {
    debug!("Validating {} weights", weights.len());

    let mut seen: FxHashSet<Weight> = FxHashSet::with_capacity(weights.len());
    let mut validated = Vec::with_capacity(weights.len());

    for &value in weights {
        let weight = Weight::new(value).inspect_err(|_| warn!("Invalid weight: {}", value))?;
        if !seen.insert(weight) {
            warn!("Weight {} appears more than once", value);
            return Err(EnumerateError::DuplicateWeight(value));
        }
        validated.push(weight);
    }

    Ok(validated)
}
