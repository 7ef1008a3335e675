//! Running weighted average of a player's strategies.
//!
//! Strategies are averaged in sequence-form, which is what makes the average
//! of behavioral strategies meaningful: the average of the reach
//! probabilities is converted back to behavioral form on demand.

use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::cfr::error::{check_len, SolverError, SolverResult};
use crate::cfr::treeplex::Treeplex;

/// How iterate `t` is weighted in the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AveragingScheme {
    /// Every iterate weighs 1.
    Uniform,
    /// Iterate `t` weighs `t`.
    Linear,
    /// Iterate `t` weighs `t^2`.
    Quadratic,
}

impl fmt::Display for AveragingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AveragingScheme::Uniform => "uniform",
            AveragingScheme::Linear => "linear",
            AveragingScheme::Quadratic => "quadratic",
        };
        write!(f, "{}", name)
    }
}

/// Weight of iterate `t` (`t >= 1`) under `scheme`.
pub fn iter_weight(scheme: AveragingScheme, t: u64) -> SolverResult<f64> {
    if t == 0 {
        return Err(SolverError::Usage("iteration must be positive".to_string()));
    }
    let t = t as f64;
    Ok(match scheme {
        AveragingScheme::Uniform => 1.0,
        AveragingScheme::Linear => t,
        AveragingScheme::Quadratic => t * t,
    })
}

/// Incremental weighted average of one player's behavioral strategies.
#[derive(Debug, Clone)]
pub struct Averager {
    treeplex: Arc<Treeplex>,
    sum_weights: f64,
    /// Average so far, sequence-form.
    sf: Vec<f64>,
    /// Scratch space for converting pushed strategies.
    buf: Vec<f64>,
}

impl Averager {
    /// Empty averager over `treeplex`.
    pub fn new(treeplex: Arc<Treeplex>) -> Self {
        let len = treeplex.buffer_len();
        Self {
            treeplex,
            sum_weights: 0.0,
            sf: vec![0.0; len],
            buf: vec![0.0; len],
        }
    }

    /// Add a behavioral `strategy` with the given finite, nonnegative `weight`.
    ///
    /// Uses `S = (1 - a) * S + a * sf(strategy)` with `a = weight / W`,
    /// which equals the weighted mean of all pushed strategies.
    pub fn push(&mut self, strategy: &[f64], weight: f64) -> SolverResult<()> {
        check_len(self.sf.len(), strategy.len())?;
        if !(weight >= 0.0 && weight.is_finite()) {
            return Err(SolverError::Usage(format!(
                "averaging weight must be finite and nonnegative (found: {})",
                weight
            )));
        }
        self.treeplex.validate_strategy(strategy)?;

        self.sum_weights += weight;
        if self.sum_weights == 0.0 {
            return Ok(());
        }
        let alpha = weight / self.sum_weights;
        debug!("pushing strategy with weight {} and alpha {}", weight, alpha);

        self.buf.copy_from_slice(strategy);
        self.treeplex.bh_to_sf(&mut self.buf)?;
        for (s, x) in self.sf.iter_mut().zip(&self.buf) {
            *s = (1.0 - alpha) * *s + alpha * x;
        }
        Ok(())
    }

    /// Behavioral form of the current average.
    ///
    /// # Errors
    /// [`SolverError::Usage`] if nothing with positive weight was pushed yet.
    pub fn running_avg(&self) -> SolverResult<Vec<f64>> {
        if !(self.sum_weights > 0.0) {
            return Err(SolverError::Usage("no data to average".to_string()));
        }
        let mut out = self.sf.clone();
        self.treeplex.sf_to_bh(&mut out)?;
        self.treeplex.validate_strategy(&out)?;
        Ok(out)
    }

    /// Forget everything pushed so far.
    pub fn clear(&mut self) {
        self.sum_weights = 0.0;
        self.sf.fill(0.0);
    }

    /// Total weight pushed so far.
    pub fn sum_weights(&self) -> f64 {
        self.sum_weights
    }

    /// The running average in sequence-form.
    pub fn sequence_form(&self) -> &[f64] {
        &self.sf
    }

    /// Treeplex the averaged strategies live on.
    pub fn treeplex(&self) -> &Arc<Treeplex> {
        &self.treeplex
    }
}
