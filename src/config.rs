//! Solver configuration.
//!
//! Controls numeric tolerance, iteration caps, degeneracy handling and
//! step recording. Can be built in code or parsed from JSON:
//!
//! ```
//! use u_allocation::{DegeneracyStrategy, SolverConfig};
//!
//! let config = SolverConfig::from_json_str(r#"{
//!     "epsilon": 1e-6,
//!     "max_pivot_iterations": 500,
//!     "degeneracy": "Fail"
//! }"#).unwrap();
//!
//! assert_eq!(config.max_pivot_iterations, Some(500));
//! assert_eq!(config.degeneracy, DegeneracyStrategy::Fail);
//! assert!(!config.record_steps);
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Default tolerance for zero tests and balance checks.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Floor of the automatic Hungarian iteration cap.
const MIN_ADJUST_CAP: usize = 50;

/// Floor of the automatic MODI iteration cap.
const MIN_PIVOT_CAP: usize = 100;

/// How MODI handles a basis with fewer than m+n-1 positive cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DegeneracyStrategy {
    /// Add zero-allocation "basic zero" cells until the basis spans
    /// every row and column, then pivot normally.
    #[default]
    CompleteBasis,
    /// Use positive cells only and report
    /// [`crate::SolveError::DegenerateLoopSearch`] when stuck.
    Fail,
}

/// Solver settings shared by the Hungarian and transportation solvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Values with `|v| <= epsilon` count as zero. Finite and
    /// non-negative; JSON input is made non-negative on load.
    #[serde(deserialize_with = "deserialize_epsilon")]
    pub epsilon: f64,
    /// Hungarian adjust cap. `None` = `max(n², 50)`.
    pub max_adjust_iterations: Option<usize>,
    /// MODI pivot cap. `None` = `max((m·n)², 100)`.
    pub max_pivot_iterations: Option<usize>,
    /// Degenerate basis handling.
    pub degeneracy: DegeneracyStrategy,
    /// Record intermediate states on the solution.
    pub record_steps: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            max_adjust_iterations: None,
            max_pivot_iterations: None,
            degeneracy: DegeneracyStrategy::CompleteBasis,
            record_steps: false,
        }
    }
}

impl SolverConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing fields take defaults.
    ///
    /// A negative `epsilon` is read as its magnitude. A non-finite one is
    /// an error.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Sets the zero tolerance. Negative values are taken as their
    /// magnitude; non-finite values fall back to [`DEFAULT_EPSILON`].
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = tolerance(epsilon);
        self
    }

    /// Sets the Hungarian adjust cap.
    pub fn with_max_adjust_iterations(mut self, cap: usize) -> Self {
        self.max_adjust_iterations = Some(cap);
        self
    }

    /// Sets the MODI pivot cap.
    pub fn with_max_pivot_iterations(mut self, cap: usize) -> Self {
        self.max_pivot_iterations = Some(cap);
        self
    }

    /// Sets the degeneracy strategy.
    pub fn with_degeneracy(mut self, strategy: DegeneracyStrategy) -> Self {
        self.degeneracy = strategy;
        self
    }

    /// Enables or disables step recording.
    pub fn with_record_steps(mut self, record: bool) -> Self {
        self.record_steps = record;
        self
    }

    /// Effective Hungarian cap for an `n × n` matrix.
    pub fn adjust_cap(&self, n: usize) -> usize {
        self.max_adjust_iterations
            .unwrap_or_else(|| n.saturating_mul(n).max(MIN_ADJUST_CAP))
    }

    /// Effective MODI cap for an `m × n` problem.
    pub fn pivot_cap(&self, m: usize, n: usize) -> usize {
        self.max_pivot_iterations.unwrap_or_else(|| {
            let cells = m.saturating_mul(n);
            cells.saturating_mul(cells).max(MIN_PIVOT_CAP)
        })
    }

    /// Whether `v` counts as zero.
    #[inline]
    pub fn is_zero(&self, v: f64) -> bool {
        v.abs() <= self.epsilon
    }
}

/// Usable tolerance from a caller-supplied value.
pub(crate) fn tolerance(epsilon: f64) -> f64 {
    if epsilon.is_finite() {
        epsilon.abs()
    } else {
        DEFAULT_EPSILON
    }
}

fn deserialize_epsilon<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let epsilon = f64::deserialize(deserializer)?;
    if epsilon.is_finite() {
        Ok(epsilon.abs())
    } else {
        Err(D::Error::custom(format!("epsilon must be finite, got {epsilon}")))
    }
}
