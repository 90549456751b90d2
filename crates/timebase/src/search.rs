//! Binary-search helpers over a strictly increasing reference timeline.
//!
//! Callers validate the timeline once with [`validate_reference`]; the helpers
//! here assume that has happened and run in O(log m) per query.

pub use contracts::validate_reference;

/// Where a query time falls relative to the reference timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Strictly before the first entry
    BeforeStart,
    /// `reference[i] <= t <= reference[i + 1]`
    Within(usize),
    /// Strictly after the last entry
    AfterEnd,
}

/// First index whose value is `>= t` (bisect-left insertion point)
#[inline]
pub fn insertion_point(reference: &[f64], t: f64) -> usize {
    reference.partition_point(|&r| r < t)
}

/// Locate `t` against a timeline with at least two entries.
///
/// A sample exactly on an interior entry `k` resolves to `Within(k - 1)`, and
/// one on the last entry to `Within(m - 2)`, so the upper neighbour always exists.
#[inline]
pub fn locate(reference: &[f64], t: f64) -> Position {
    debug_assert!(reference.len() >= 2);
    let last = reference.len() - 1;

    if t < reference[0] {
        return Position::BeforeStart;
    }
    if t > reference[last] {
        return Position::AfterEnd;
    }

    let lower = insertion_point(reference, t).saturating_sub(1);
    Position::Within(lower.min(last - 1))
}
