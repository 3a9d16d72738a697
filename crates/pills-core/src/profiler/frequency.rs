//! Frequency analysis for categorical columns.

use crate::types::Cardinality;
use crate::utils::normalize_category;
use std::collections::{BTreeMap, HashSet};

/// Occurrence counts of the non-missing values, keyed in sorted order.
pub(crate) fn value_counts<'a, I>(values: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.clone()).or_insert(0) += 1;
    }
    counts
}

/// Most frequent value and its count; ties resolve to the lexicographically smallest value.
pub(crate) fn most_frequent(counts: &BTreeMap<String, usize>) -> Option<(&str, usize)> {
    let mut best: Option<(&str, usize)> = None;
    for (value, &count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value.as_str(), count));
        }
    }
    best
}

/// Values whose relative frequency is strictly below `threshold`, with their combined count.
pub(crate) fn rare_categories(
    counts: &BTreeMap<String, usize>,
    total: usize,
    threshold: f64,
) -> (Vec<String>, usize) {
    if total == 0 {
        return (Vec::new(), 0);
    }

    let mut rare = Vec::new();
    let mut rare_count = 0;
    for (value, &count) in counts {
        if (count as f64 / total as f64) < threshold {
            rare.push(value.clone());
            rare_count += count;
        }
    }
    (rare, rare_count)
}

/// Shannon entropy in bits of the value distribution.
pub(crate) fn entropy(counts: &BTreeMap<String, usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let entropy: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total as f64;
            -p * p.log2()
        })
        .sum();
    entropy.max(0.0)
}

/// Whether some distinct values collapse together once case and whitespace are ignored.
pub(crate) fn has_inconsistent_spelling(counts: &BTreeMap<String, usize>) -> bool {
    let normalized: HashSet<String> = counts.keys().map(|v| normalize_category(v)).collect();
    normalized.len() < counts.len()
}

/// Bucket a unique count into a cardinality class.
pub(crate) fn cardinality(n_unique: usize, low_max: usize, medium_max: usize) -> Cardinality {
    if n_unique <= low_max {
        Cardinality::Low
    } else if n_unique <= medium_max {
        Cardinality::Medium
    } else {
        Cardinality::High
    }
}
