use std::collections::BTreeSet;

use crate::constants::ONE_SIDED_SIMILARITY;

/// Tag similarity in [0, 1].
///
/// Jaccard index of the two sets. Two untagged entries score 0.0 so they do
/// not cluster by default; a tagged/untagged pair gets a small baseline.
pub fn similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => 0.0,
        (true, false) | (false, true) => ONE_SIDED_SIMILARITY,
        (false, false) => {
            let shared = a.intersection(b).count();
            let union = a.len() + b.len() - shared;
            shared as f64 / union as f64
        }
    }
}
