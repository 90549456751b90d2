//! ReferenceTimeline - Timebase provider output
//!
//! The single authoritative per-session sequence of reference timestamps.

use serde::Serialize;
use std::cmp::Ordering;
use std::ops::Deref;

use crate::AlignmentError;

/// Check that `reference` is non-empty, finite and strictly increasing.
pub fn validate_reference(reference: &[f64]) -> Result<(), AlignmentError> {
    if reference.is_empty() {
        return Err(AlignmentError::invalid_reference("reference timeline is empty"));
    }

    if let Some(pos) = reference.iter().position(|t| !t.is_finite()) {
        return Err(AlignmentError::invalid_reference(format!(
            "reference timeline has non-finite entry at index {pos}: {}",
            reference[pos]
        )));
    }

    if let Some(pos) = reference
        .windows(2)
        .position(|w| w[1].partial_cmp(&w[0]) != Some(Ordering::Greater))
    {
        return Err(AlignmentError::invalid_reference(format!(
            "reference timeline is not strictly increasing at index {}: {} -> {}",
            pos + 1,
            reference[pos],
            reference[pos + 1]
        )));
    }

    Ok(())
}

/// Validated reference timeline (seconds)
///
/// Non-empty and strictly increasing by construction. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReferenceTimeline(Vec<f64>);

impl ReferenceTimeline {
    /// Build a timeline, rejecting empty or non-monotonic input
    pub fn new(timestamps: Vec<f64>) -> Result<Self, AlignmentError> {
        validate_reference(&timestamps)?;
        Ok(Self(timestamps))
    }

    /// Borrow the timestamps
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// First timestamp
    pub fn start(&self) -> f64 {
        self.0[0]
    }

    /// Last timestamp
    pub fn end(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Duration covered by the timeline (seconds)
    pub fn span(&self) -> f64 {
        self.end() - self.start()
    }
}

impl Deref for ReferenceTimeline {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[f64]> for ReferenceTimeline {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for ReferenceTimeline {
    type Error = AlignmentError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Sample times belonging to one modality
///
/// Assumed sorted ascending; the engine only reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleSet {
    /// Modality name (e.g. "pose", "facemap", "events")
    pub modality: String,
    /// Sample times (seconds)
    pub times: Vec<f64>,
}

impl SampleSet {
    pub fn new(modality: impl Into<String>, times: Vec<f64>) -> Self {
        Self {
            modality: modality.into(),
            times,
        }
    }
}
