//! Sample mapping strategies.
//!
//! Both strategies project sample times onto a reference timeline and record
//! the residual timing error per sample:
//!
//! - **nearest**: closest reference tick, exact ties go to the later tick
//! - **linear**: bracketing pair plus interpolation weights; exact inside the
//!   reference range, clamped to the edge pair outside it

use contracts::{Alignment, AlignmentError, AlignmentResult, Bracket, MappingStrategy};
use tracing::instrument;

use crate::search::{insertion_point, locate, validate_reference, Position};

/// Map `samples` onto `reference` with the given strategy.
///
/// # Errors
/// - `InvalidReference` if the reference is empty or not strictly increasing
/// - `InvalidSample` if a sample time is not finite
pub fn map_samples(
    samples: &[f64],
    reference: &[f64],
    strategy: MappingStrategy,
) -> Result<AlignmentResult, AlignmentError> {
    validate_reference(reference)?;
    validate_samples(samples)?;
    Ok(map_validated(samples, reference, strategy))
}

/// Nearest-index mapping
pub fn map_nearest(samples: &[f64], reference: &[f64]) -> Result<AlignmentResult, AlignmentError> {
    map_samples(samples, reference, MappingStrategy::Nearest)
}

/// Bracketing-pair linear mapping
pub fn map_linear(samples: &[f64], reference: &[f64]) -> Result<AlignmentResult, AlignmentError> {
    map_samples(samples, reference, MappingStrategy::Linear)
}

/// Dispatch on the strategy once inputs have been checked
pub(crate) fn map_validated(
    samples: &[f64],
    reference: &[f64],
    strategy: MappingStrategy,
) -> AlignmentResult {
    match strategy {
        MappingStrategy::Nearest => nearest(samples, reference),
        MappingStrategy::Linear => linear(samples, reference),
    }
}

pub(crate) fn validate_samples(samples: &[f64]) -> Result<(), AlignmentError> {
    match samples.iter().position(|t| !t.is_finite()) {
        Some(index) => Err(AlignmentError::InvalidSample {
            index,
            value: samples[index],
        }),
        None => Ok(()),
    }
}

#[instrument(
    name = "mapping_nearest",
    level = "trace",
    skip_all,
    fields(samples = samples.len(), reference = reference.len())
)]
fn nearest(samples: &[f64], reference: &[f64]) -> AlignmentResult {
    let mut indices = Vec::with_capacity(samples.len());
    let mut residuals = Vec::with_capacity(samples.len());

    for &t in samples {
        let index = nearest_index(reference, t);
        indices.push(index);
        residuals.push((t - reference[index]).abs());
    }

    AlignmentResult {
        alignment: Alignment::Nearest(indices),
        residuals,
    }
}

/// Closest reference index; on an exact tie the higher index wins
#[inline]
fn nearest_index(reference: &[f64], t: f64) -> usize {
    let upper = insertion_point(reference, t);
    if upper == 0 {
        return 0;
    }
    if upper == reference.len() {
        return reference.len() - 1;
    }

    let lower = upper - 1;
    if t - reference[lower] < reference[upper] - t {
        lower
    } else {
        upper
    }
}

#[instrument(
    name = "mapping_linear",
    level = "trace",
    skip_all,
    fields(samples = samples.len(), reference = reference.len())
)]
fn linear(samples: &[f64], reference: &[f64]) -> AlignmentResult {
    let mut brackets = Vec::with_capacity(samples.len());
    let mut residuals = Vec::with_capacity(samples.len());

    for &t in samples {
        let (bracket, residual) = bracket_for(reference, t);
        brackets.push(bracket);
        residuals.push(residual);
    }

    AlignmentResult {
        alignment: Alignment::Linear(brackets),
        residuals,
    }
}

/// Bracketing pair and residual for one sample
#[inline]
fn bracket_for(reference: &[f64], t: f64) -> (Bracket, f64) {
    let last = reference.len() - 1;

    // A single tick has no pair; pin the sample to it.
    if last == 0 {
        let bracket = Bracket {
            indices: (0, 0),
            weights: (1.0, 0.0),
        };
        return (bracket, (t - reference[0]).abs());
    }

    match locate(reference, t) {
        Position::BeforeStart => (
            Bracket {
                indices: (0, 1),
                weights: (1.0, 0.0),
            },
            reference[0] - t,
        ),
        Position::AfterEnd => (
            Bracket {
                indices: (last - 1, last),
                weights: (0.0, 1.0),
            },
            t - reference[last],
        ),
        Position::Within(i) => {
            let w = (t - reference[i]) / (reference[i + 1] - reference[i]);
            (
                Bracket {
                    indices: (i, i + 1),
                    weights: (1.0 - w, w),
                },
                0.0,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_reference(rng: &mut StdRng, len: usize) -> Vec<f64> {
        let mut t = rng.random_range(-10.0..10.0);
        (0..len)
            .map(|_| {
                t += rng.random_range(0.001..0.1);
                t
            })
            .collect()
    }

    #[test]
    fn test_nearest_ties_go_to_later_index() {
        let result = map_nearest(&[0.5, 1.5, 2.5], &[0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(result.indices(), Some(&[1usize, 2, 3][..]));
        assert_eq!(result.residuals, vec![0.5, 0.5, 0.5]);
        assert_eq!(result.mapping(), MappingStrategy::Nearest);
    }

    #[test]
    fn test_nearest_picks_closer_neighbour() {
        let result = map_nearest(&[0.4, 0.6, 2.0], &[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(result.indices(), Some(&[0usize, 1, 2][..]));
        assert!((result.residuals[0] - 0.4).abs() < 1e-12);
        assert_eq!(result.residuals[2], 0.0);
    }

    #[test]
    fn test_nearest_out_of_range_snaps_to_edges() {
        let result = map_nearest(&[-2.0, 7.0], &[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(result.indices(), Some(&[0usize, 2][..]));
        assert_eq!(result.residuals, vec![2.0, 5.0]);
    }

    #[test]
    fn test_linear_midpoints() {
        let result = map_linear(&[0.5, 1.5], &[0.0, 1.0, 2.0]).unwrap();
        let brackets = result.brackets().unwrap();
        assert_eq!(brackets[0].indices, (0, 1));
        assert_eq!(brackets[1].indices, (1, 2));
        assert_eq!(brackets[0].weights, (0.5, 0.5));
        assert_eq!(brackets[1].weights, (0.5, 0.5));
        assert_eq!(result.residuals, vec![0.0, 0.0]);
    }

    #[test]
    fn test_linear_clamps_outside_range() {
        let result = map_linear(&[-0.25, 2.5], &[0.0, 1.0, 2.0]).unwrap();
        let brackets = result.brackets().unwrap();
        assert_eq!(brackets[0].indices, (0, 1));
        assert_eq!(brackets[0].weights, (1.0, 0.0));
        assert_eq!(brackets[1].indices, (1, 2));
        assert_eq!(brackets[1].weights, (0.0, 1.0));
        assert_eq!(result.residuals, vec![0.25, 0.5]);
    }

    #[test]
    fn test_linear_on_range_edges_is_exact() {
        let reference = [0.0, 1.0, 2.0];
        let result = map_linear(&[0.0, 2.0], &reference).unwrap();
        let brackets = result.brackets().unwrap();
        assert_eq!(brackets[0].weights, (1.0, 0.0));
        assert_eq!(brackets[1].indices, (1, 2));
        assert_eq!(brackets[1].weights, (0.0, 1.0));
        assert_eq!(result.residuals, vec![0.0, 0.0]);
    }

    #[test]
    fn test_linear_single_tick_reference() {
        let result = map_linear(&[4.0, 5.0], &[5.0]).unwrap();
        let brackets = result.brackets().unwrap();
        assert_eq!(brackets[0].indices, (0, 0));
        assert_eq!(brackets[0].weights, (1.0, 0.0));
        assert_eq!(result.residuals, vec![1.0, 0.0]);
    }

    #[test]
    fn test_empty_reference_rejected_by_both_strategies() {
        for strategy in [MappingStrategy::Nearest, MappingStrategy::Linear] {
            let err = map_samples(&[0.1, 0.2], &[], strategy).unwrap_err();
            assert!(
                matches!(err, AlignmentError::InvalidReference { .. }),
                "{strategy}: {err}"
            );
        }
    }

    #[test]
    fn test_non_monotonic_reference_rejected() {
        let err = map_nearest(&[0.5], &[0.0, 2.0, 1.0]).unwrap_err();
        assert!(matches!(err, AlignmentError::InvalidReference { .. }));
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let err = map_linear(&[0.5, f64::NAN], &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, AlignmentError::InvalidSample { index: 1, .. }));
    }

    #[test]
    fn test_empty_samples_yield_empty_result() {
        let result = map_nearest(&[], &[0.0, 1.0]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_nearest_is_optimal_for_random_inputs() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let len = rng.random_range(1..200);
            let reference = random_reference(&mut rng, len);
            let (lo, hi) = (reference[0], reference[len - 1]);
            let samples: Vec<f64> = (0..100)
                .map(|_| if hi > lo { rng.random_range(lo..=hi) } else { lo })
                .collect();

            let result = map_nearest(&samples, &reference).unwrap();
            let indices = result.indices().unwrap();
            for (&t, &i) in samples.iter().zip(indices) {
                let best = (t - reference[i]).abs();
                for (j, &r) in reference.iter().enumerate() {
                    let d = (t - r).abs();
                    assert!(d >= best, "index {j} closer than {i} for t={t}");
                    if d == best {
                        assert!(j <= i, "tie must resolve to the higher index");
                    }
                }
            }
        }
    }

    #[test]
    fn test_linear_reconstructs_in_range_samples() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let len = rng.random_range(2..200);
            let reference = random_reference(&mut rng, len);
            let (lo, hi) = (reference[0], reference[len - 1]);
            let samples: Vec<f64> = (0..100).map(|_| rng.random_range(lo..=hi)).collect();

            let result = map_linear(&samples, &reference).unwrap();
            for (&t, bracket) in samples.iter().zip(result.brackets().unwrap()) {
                assert_eq!(bracket.indices.1, bracket.indices.0 + 1);
                assert!((bracket.reconstruct(&reference) - t).abs() < 1e-9);
                assert!((bracket.weights.0 + bracket.weights.1 - 1.0).abs() < 1e-12);
            }
            assert!(result.residuals.iter().all(|&r| r == 0.0));
        }
    }
}
