//! Layered error definitions
//!
//! Categorized by source: reference / provider / budget / config / sink

use thiserror::Error;

/// Unified error type for the alignment domain
#[derive(Debug, Error)]
pub enum AlignmentError {
    // ===== Reference Errors =====
    /// Reference timeline is empty or not strictly increasing
    #[error("invalid reference timeline: {reason}")]
    InvalidReference { reason: String },

    /// Sample time cannot be placed on any timeline
    #[error("invalid sample at index {index}: {value} is not a finite time")]
    InvalidSample { index: usize, value: f64 },

    // ===== Provider Errors =====
    /// Timebase provider could not produce a reference timeline
    #[error("timebase provider '{source_name}' error: {message}")]
    TimebaseProvider {
        source_name: String,
        message: String,
    },

    // ===== Budget Errors =====
    /// Observed worst-case jitter exceeds the configured ceiling
    #[error(
        "jitter budget exceeded: max_jitter_s={max_jitter_s:.6} > budget_s={budget_s:.6} \
         (p95_jitter_s={p95_jitter_s:.6})"
    )]
    JitterBudgetExceeded {
        max_jitter_s: f64,
        p95_jitter_s: f64,
        budget_s: f64,
    },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sink Errors =====
    /// Sidecar write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlignmentError {
    /// Create invalid reference error
    pub fn invalid_reference(reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reason: reason.into(),
        }
    }

    /// Create timebase provider error
    pub fn provider(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TimebaseProvider {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from the budget gate
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, Self::JitterBudgetExceeded { .. })
    }
}
