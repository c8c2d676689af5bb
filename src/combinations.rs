use std::fmt;
use std::hash::{Hash, Hasher};

use ahash::HashSetExt;
use fxhash::FxHashSet;
use log::{debug, info, trace, warn};

use crate::errors::EnumerateError;
use crate::weight::{Weight, validate_weights};

/// One way of reaching a target: distinct weights with their positive counts.
/// Weights keep the order they had in the input; equality and hashing ignore that order.
#[derive(Clone, Debug, Default)]
pub struct Combination {
    counts: Vec<(Weight, u64)>,
}

impl Combination {
    /// Builds a combination from the working counts, dropping unused weights.
    fn from_counts(weights: &[Weight], counts: &[u64]) -> Self {
        debug_assert_eq!(weights.len(), counts.len());
        let counts = weights
            .iter()
            .zip(counts)
            .filter(|(_, count)| **count > 0)
            .map(|(weight, count)| (*weight, *count))
            .collect();
        Self { counts }
    }

    /// Number of units of `weight` used, 0 if absent.
    pub fn count_of(&self, weight: f64) -> u64 {
        self.counts
            .iter()
            .find(|(w, _)| w.value() == weight)
            .map_or(0, |(_, count)| *count)
    }

    /// Iterates over `(weight, count)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.counts.iter().map(|(w, count)| (w.value(), *count))
    }

    /// Number of distinct weights used.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of units across all weights.
    pub fn units(&self) -> u64 {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Weighted sum of the combination.
    pub fn total(&self) -> f64 {
        self.counts
            .iter()
            .map(|(w, count)| w.value() * *count as f64)
            .sum()
    }

    /// Flat list with every weight repeated by its count.
    pub fn to_flat(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.units() as usize);
        for (w, count) in &self.counts {
            flat.extend(std::iter::repeat_n(w.value(), *count as usize));
        }
        flat
    }

    /// Order-independent form used for equality, hashing and dedup.
    fn canonical(&self) -> Vec<(Weight, u64)> {
        let mut key = self.counts.clone();
        key.sort_unstable();
        key
    }
}

impl PartialEq for Combination {
    fn eq(&self, other: &Self) -> bool {
        self.counts.len() == other.counts.len() && self.canonical() == other.canonical()
    }
}

impl Eq for Combination {}

impl Hash for Combination {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (w, count)) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", w, count)?;
        }
        write!(f, "}}")
    }
}

/// Ordered accumulator of distinct combinations.
/// Insertion order is discovery order; a combination already present is not added again.
#[derive(Clone, Debug)]
pub struct ResultSet {
    combinations: Vec<Combination>,
    seen: FxHashSet<Combination>,
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSet {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self {
            combinations: Vec::new(),
            seen: FxHashSet::new(),
        }
    }

    /// Adds the combination unless a structurally equal one is present. Returns true if added.
    pub fn insert(&mut self, combination: Combination) -> bool {
        if !self.seen.insert(combination.clone()) {
            return false;
        }
        self.combinations.push(combination);
        true
    }

    pub fn contains(&self, combination: &Combination) -> bool {
        self.seen.contains(combination)
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Combination> {
        self.combinations.iter()
    }

    pub fn as_slice(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn into_vec(self) -> Vec<Combination> {
        self.combinations
    }
}

/// What a top-level enumeration returns: the combinations and how many there are.
#[derive(Clone, Debug, PartialEq)]
pub struct Enumeration {
    combinations: Vec<Combination>,
    count: usize,
}

impl Enumeration {
    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns a reference to the i-th combination, in discovery order
    pub fn get_set(&self, i: usize) -> &Combination {
        assert!(i < self.combinations.len());
        &self.combinations[i]
    }

    pub fn into_parts(self) -> (Vec<Combination>, usize) {
        (self.combinations, self.count)
    }
}

impl From<ResultSet> for Enumeration {
    fn from(results: ResultSet) -> Self {
        let combinations = results.into_vec();
        let count = combinations.len();
        Self {
            combinations,
            count,
        }
    }
}

/// One combination per line
impl fmt::Display for Enumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for combination in &self.combinations {
            writeln!(f, "{}", combination)?;
        }
        Ok(())
    }
}

/// Mutable state passed during the recursive search, kept apart from the read-only weights.
/// `counts` has one slot per weight in input order, so results keep that order.
struct SearchState<'a> {
    counts: Vec<u64>,
    results: &'a mut ResultSet,
}

/// Runs the search for `target` over already validated weights, appending to `results`.
fn search(target: f64, weights: &[Weight], results: &mut ResultSet) {
    if weights.is_empty() {
        debug!("Empty weight set, nothing to combine");
        return;
    }

    let before = results.len();
    let mut state = SearchState {
        counts: vec![0; weights.len()],
        results,
    };
    let available: Vec<usize> = (0..weights.len()).collect();
    combine(weights, &available, target, &mut state);

    debug!("Search added {} combinations", state.results.len() - before);
}

/// Recursive combination generation. Every weight in `available` is tried in turn as the
/// next one to assign, the others are left to the recursion with what remains of the target.
/// The same multiset is reached along several assignment orders, each with its own float
/// rounding of `remaining`; the result set drops the repeats.
fn combine(
    weights: &[Weight],
    available: &[usize],
    remaining: f64,
    state: &mut SearchState<'_>,
) {
    debug_assert!(!available.is_empty());

    let is_last = available.len() == 1;
    for (position, &index) in available.iter().enumerate() {
        let weight = weights[index];
        let bound = weight.bound(remaining);

        // Prune
        if bound < 0 {
            continue;
        }

        let rest: Vec<usize> = available
            .iter()
            .enumerate()
            .filter(|(p, _)| *p != position)
            .map(|(_, &i)| i)
            .collect();

        for count in 0..=bound as u64 {
            state.counts[index] = count;
            let used = weight.value() * count as f64;

            // Terminal case, exact equality
            if is_last {
                if used != remaining {
                    continue;
                }
                let combination = Combination::from_counts(weights, &state.counts);
                if state.results.insert(combination) {
                    trace!("Found combination {:?}", state.counts);
                }
                continue;
            }

            // Recursive part
            combine(weights, &rest, remaining - used, state);
        }
    }
}

fn validate_input(target: f64, weights: &[f64]) -> Result<Vec<Weight>, EnumerateError> {
    let weights = validate_weights(weights)?;
    if !target.is_finite() {
        warn!("Target is not finite: {}", target);
        return Err(EnumerateError::InvalidTarget(target));
    }
    // Deeper levels never see a larger remainder, so checking the top level is enough
    for weight in &weights {
        if weight.checked_bound(target).is_none() {
            warn!("Bound of weight {} for target {} overflows", weight, target);
            return Err(EnumerateError::BoundOverflow {
                weight: weight.value(),
                target,
            });
        }
    }
    Ok(weights)
}

/// Upper bound on the count of each weight for `target`, `target // w`, in input order.
///
/// # Errors
///
/// Same validation as [`enumerate`].
pub fn compute_bounds(target: f64, weights: &[f64]) -> Result<Vec<(f64, i64)>, EnumerateError> {
    let weights = validate_input(target, weights)?;
    Ok(weights
        .iter()
        .map(|w| (w.value(), w.bound(target)))
        .collect())
}

/// Enumerates every distinct combination of `weights` summing exactly to `target`.
/// Each call starts from an empty working state.
///
/// # Errors
///
/// Returns `DuplicateWeight` if a weight repeats, `InvalidWeight` if one is not positive
/// and finite, `InvalidTarget` if the target is not finite, `BoundOverflow` if a weight is
/// so small against the target that its count cannot be bounded. No partial result is produced.
pub fn enumerate(target: f64, weights: &[f64]) -> Result<Enumeration, EnumerateError> {
    let mut results = ResultSet::new();
    enumerate_into(target, weights, &mut results)?;
    Ok(Enumeration::from(results))
}

/// Like [`enumerate`], but appends to a caller-owned result set and returns its new length.
/// Combinations already in `results` are not added twice.
///
/// # Errors
///
/// Same as [`enumerate`]; `results` is left untouched on error.
pub fn enumerate_into(
    target: f64,
    weights: &[f64],
    results: &mut ResultSet,
) -> Result<usize, EnumerateError> {
    let weights = validate_input(target, weights)?;
    info!(
        "Enumerating combinations of {} weights for target {}",
        weights.len(),
        target
    );

    search(target, &weights, results);

    info!("Result set holds {} combinations", results.len());
    Ok(results.len())
}
