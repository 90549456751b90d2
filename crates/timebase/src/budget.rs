//! Jitter budget gate.
//!
//! Fails closed on the worst-case residual; p95 is carried for diagnostics only.

use contracts::{AlignmentError, JitterStatistics};
use tracing::{debug, warn};

/// Fail with `JitterBudgetExceeded` iff `max_jitter_s > budget_s`.
///
/// Equality passes. A NaN budget admits nothing and always fails.
pub fn enforce_jitter_budget(
    stats: &JitterStatistics,
    budget_s: f64,
) -> Result<(), AlignmentError> {
    if budget_s.is_nan() || stats.max_jitter_s > budget_s {
        warn!(
            max_jitter_s = stats.max_jitter_s,
            p95_jitter_s = stats.p95_jitter_s,
            budget_s,
            "jitter budget exceeded"
        );
        metrics::counter!("timebase_budget_exceeded_total").increment(1);
        return Err(AlignmentError::JitterBudgetExceeded {
            max_jitter_s: stats.max_jitter_s,
            p95_jitter_s: stats.p95_jitter_s,
            budget_s,
        });
    }

    debug!(
        max_jitter_s = stats.max_jitter_s,
        budget_s, "jitter within budget"
    );
    Ok(())
}
