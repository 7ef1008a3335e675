//! Configuration options for the CFR solver.
//!
//! This module provides the configuration struct that selects the CFR
//! variant (averaging scheme, alternation, CFR+, DCFR, predictive CFR) and
//! the statistics tracked while training.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cfr::averager::AveragingScheme;

fn default_dcfr_alpha() -> f64 {
    0.5
}

fn default_dcfr_beta() -> f64 {
    1.0
}

/// Configuration for the CFR solver.
///
/// The flags combine freely. When both `rmplus` and `dcfr` are set, CFR+
/// decides the negative-regret discount (always 0) and DCFR the positive one.
///
/// # Example
/// ```
/// use treeplex_solver::cfr::{AveragingScheme, CfrConf};
///
/// let conf = CfrConf::default();
/// assert!(conf.alternation);
/// assert_eq!(conf.avg, AveragingScheme::Linear);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfrConf {
    /// Weighting of iterates in the average strategy.
    pub avg: AveragingScheme,

    /// Update one player per step (`true`) or both players from the same
    /// gradients (`false`).
    pub alternation: bool,

    /// Discounted CFR: shrink accumulated regrets with a time-dependent
    /// schedule.
    pub dcfr: bool,

    /// Regret matching+: discard all negative regret after every update.
    pub rmplus: bool,

    /// Predictive CFR: propagate the value of the updated strategy instead
    /// of the previous one.
    pub predictive: bool,

    /// DCFR exponent for positive regrets, `1 - 1 / (1 + t^alpha)`.
    #[serde(default = "default_dcfr_alpha")]
    pub dcfr_alpha: f64,

    /// DCFR exponent for negative regrets, `1 - 1 / (1 + t^beta)`.
    #[serde(default = "default_dcfr_beta")]
    pub dcfr_beta: f64,
}

impl Default for CfrConf {
    fn default() -> Self {
        Self {
            avg: AveragingScheme::Linear,
            alternation: true,
            dcfr: false,
            rmplus: false,
            predictive: false,
            dcfr_alpha: default_dcfr_alpha(),
            dcfr_beta: default_dcfr_beta(),
        }
    }
}

impl CfrConf {
    /// Create a new CfrConf with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain CFR with uniform averaging and simultaneous updates.
    pub fn vanilla() -> Self {
        Self {
            avg: AveragingScheme::Uniform,
            alternation: false,
            ..Default::default()
        }
    }

    /// CFR+: regret matching+, alternation and linear averaging.
    pub fn cfr_plus() -> Self {
        Self {
            rmplus: true,
            ..Default::default()
        }
    }

    /// Discounted CFR with the default exponents.
    pub fn dcfr() -> Self {
        Self {
            dcfr: true,
            ..Default::default()
        }
    }

    /// Predictive CFR+ with quadratic averaging.
    pub fn pcfr_plus() -> Self {
        Self {
            avg: AveragingScheme::Quadratic,
            rmplus: true,
            predictive: true,
            ..Default::default()
        }
    }

    /// Builder method: set the averaging scheme.
    pub fn with_avg(mut self, avg: AveragingScheme) -> Self {
        self.avg = avg;
        self
    }

    /// Builder method: set alternation.
    pub fn with_alternation(mut self, enable: bool) -> Self {
        self.alternation = enable;
        self
    }

    /// Builder method: set whether to use DCFR discounting.
    pub fn with_dcfr(mut self, enable: bool) -> Self {
        self.dcfr = enable;
        self
    }

    /// Builder method: set whether to use regret matching+.
    pub fn with_rmplus(mut self, enable: bool) -> Self {
        self.rmplus = enable;
        self
    }

    /// Builder method: set whether to use predictive updates.
    pub fn with_predictive(mut self, enable: bool) -> Self {
        self.predictive = enable;
        self
    }

    /// Builder method: set the DCFR exponents.
    pub fn with_dcfr_exponents(mut self, alpha: f64, beta: f64) -> Self {
        self.dcfr_alpha = alpha;
        self.dcfr_beta = beta;
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("alpha", self.dcfr_alpha), ("beta", self.dcfr_beta)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidExponent(name, value));
            }
        }
        Ok(())
    }

    /// Discount applied to positive regrets after `t` completed updates.
    pub fn pos_discount(&self, t: u64) -> f64 {
        if self.dcfr {
            1.0 - 1.0 / (1.0 + (t as f64).powf(self.dcfr_alpha))
        } else {
            1.0
        }
    }

    /// Discount applied to non-positive regrets after `t` completed updates.
    pub fn neg_discount(&self, t: u64) -> f64 {
        if self.rmplus {
            0.0
        } else if self.dcfr {
            1.0 - 1.0 / (1.0 + (t as f64).powf(self.dcfr_beta))
        } else {
            1.0
        }
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string. Missing fields take their
    /// default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let conf: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        conf.validate()?;
        Ok(conf)
    }
}

/// Errors that can occur when loading or validating a solver configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A DCFR exponent is negative or not finite.
    #[error("DCFR {0} exponent {1} must be finite and nonnegative")]
    InvalidExponent(&'static str, f64),

    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    IoError(String),

    /// The configuration is not valid JSON for `CfrConf`.
    #[error("failed to parse config: {0}")]
    ParseError(String),
}

/// Statistics tracked during CFR training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CfrStats {
    /// Total number of solver steps completed.
    pub iterations: u64,

    /// Number of infosets of each player.
    pub info_sets: [usize; 2],

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Steps per second.
    pub iterations_per_second: f64,

    /// Latest exploitability (nash gap of the average strategies), if measured.
    pub exploitability: Option<f64>,

    /// History of exploitability measurements.
    pub exploitability_history: Vec<ExploitabilityPoint>,
}

/// A single exploitability measurement at a specific step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploitabilityPoint {
    /// Step number when this measurement was taken.
    pub iteration: u64,
    /// Exploitability value.
    pub exploitability: f64,
}

impl CfrStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update steps per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }

    /// Record an exploitability measurement.
    pub fn record_exploitability(&mut self, iteration: u64, exploitability: f64) {
        self.exploitability = Some(exploitability);
        self.exploitability_history.push(ExploitabilityPoint {
            iteration,
            exploitability,
        });
    }
}
