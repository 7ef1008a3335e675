//! Counterfactual Regret Minimization over a treeplex.
//!
//! This module implements the regret-matching loop with several variants:
//! - **Vanilla CFR**: accumulate regrets, play regret matching
//! - **CFR+**: discard negative regret after every update
//! - **Discounted CFR**: shrink old regrets on a time-dependent schedule
//! - **Predictive CFR**: propagate the value of the freshly updated strategy
//!
//! Each step is a full-width traversal: the traverser computes exact
//! gradients for the current strategy pair, and regrets are updated with one
//! backward pass over the treeplex of the player being updated.
//!
//! The solver is generic over any game that implements `GameState`.

use std::time::Instant;

use log::{debug, info};

use crate::cfr::averager::{iter_weight, Averager};
use crate::cfr::config::{CfrConf, CfrStats};
use crate::cfr::error::{check_player, SolverError, SolverResult};
use crate::cfr::game::GameState;
use crate::cfr::infoset::{legal_actions, Player, MAX_ACTIONS};
use crate::cfr::traverser::{EvExpl, Traverser};
use crate::cfr::treeplex::{dot, relu_normalize, Treeplex};

/// The main CFR solver.
///
/// Owns the traverser, the current behavioral strategies and regrets of
/// both players, and one averager per player. Both players start from the
/// uniform strategy, which is pushed into the averagers with weight 1.
///
/// # Example
/// ```ignore
/// use treeplex_solver::cfr::{CfrConf, CfrSolver, Traverser};
/// use treeplex_solver::games::DarkHex2;
///
/// let traverser = Traverser::<DarkHex2>::new()?;
/// let mut solver = CfrSolver::new(traverser, CfrConf::cfr_plus())?;
/// solver.train(1_000)?;
/// let gap = solver.exploitability()?.nash_gap();
/// ```
#[derive(Debug)]
pub struct CfrSolver<G: GameState> {
    conf: CfrConf,
    traverser: Traverser<G>,
    averagers: [Averager; 2],
    regrets: [Vec<f64>; 2],
    bh: [Vec<f64>; 2],
    /// Half-steps taken so far, including the two initial uniform pushes.
    n_iters: u64,
    stats: CfrStats,
}

impl<G: GameState> CfrSolver<G> {
    /// Create a solver on top of a discovered game tree.
    ///
    /// # Errors
    /// [`SolverError::Config`] if `conf` does not validate.
    pub fn new(traverser: Traverser<G>, conf: CfrConf) -> SolverResult<Self> {
        conf.validate()?;

        let bh = traverser.uniform_strategies();
        let mut averagers = [traverser.new_averager(0)?, traverser.new_averager(1)?];
        for (averager, strategy) in averagers.iter_mut().zip(&bh) {
            averager.push(strategy, 1.0)?;
        }
        let regrets = [vec![0.0; bh[0].len()], vec![0.0; bh[1].len()]];

        let stats = CfrStats {
            info_sets: [
                traverser.treeplex[0].num_infosets(),
                traverser.treeplex[1].num_infosets(),
            ],
            ..CfrStats::new()
        };
        info!("solver ready: {:?}", conf);

        Ok(Self {
            conf,
            traverser,
            averagers,
            regrets,
            bh,
            n_iters: 2,
            stats,
        })
    }

    /// Run one step.
    ///
    /// Computes the gradients of the current strategy pair and updates the
    /// player whose turn it is. Without alternation the other player is
    /// updated right after from the same gradients.
    pub fn step(&mut self) -> SolverResult<()> {
        let [bh0, bh1] = &self.bh;
        self.traverser.compute_gradients([bh0, bh1])?;

        let player = (self.n_iters % 2) as Player;
        self.inner_step(player)?;
        if !self.conf.alternation {
            self.inner_step(1 - player)?;
        }
        Ok(())
    }

    fn inner_step(&mut self, player: Player) -> SolverResult<()> {
        let t = self.n_iters / 2;
        debug!("updating player {} (t = {})", player, t);

        let tpx = &self.traverser.treeplex[player];
        let bh = &mut self.bh[player];
        let regrets = &mut self.regrets[player];

        update_regrets(
            tpx,
            &mut self.traverser.gradients[player],
            regrets,
            bh,
            self.conf.predictive,
        )?;
        tpx.validate_strategy(bh)?;

        let weight = iter_weight(self.conf.avg, t + 1)?;
        self.averagers[player].push(bh, weight)?;

        discount_regrets(regrets, self.conf.pos_discount(t), self.conf.neg_discount(t));
        self.n_iters += 1;
        Ok(())
    }

    /// Run `steps` steps.
    pub fn train(&mut self, steps: u64) -> SolverResult<&CfrStats> {
        let start = Instant::now();
        let base = self.stats.elapsed_seconds;

        for _ in 0..steps {
            self.step()?;
            self.stats.iterations += 1;
        }

        self.stats.elapsed_seconds = base + start.elapsed().as_secs_f64();
        self.stats.update_rate();
        Ok(&self.stats)
    }

    /// Train with a callback for progress tracking.
    ///
    /// Every `interval` steps the exploitability of the average strategies
    /// is measured and recorded before `callback` is called.
    ///
    /// # Arguments
    /// * `steps` - Number of steps to run
    /// * `interval` - How often to measure and call the callback
    /// * `callback` - Function called with the updated statistics
    pub fn train_with_callback<F>(
        &mut self,
        steps: u64,
        interval: u64,
        mut callback: F,
    ) -> SolverResult<&CfrStats>
    where
        F: FnMut(&CfrStats),
    {
        if interval == 0 {
            return Err(SolverError::Usage(
                "callback interval must be positive".to_string(),
            ));
        }
        let start = Instant::now();
        let base = self.stats.elapsed_seconds;

        for i in 0..steps {
            self.step()?;
            self.stats.iterations += 1;

            if (i + 1) % interval == 0 {
                let gap = self.exploitability()?.nash_gap();
                self.stats.elapsed_seconds = base + start.elapsed().as_secs_f64();
                self.stats.update_rate();
                self.stats.record_exploitability(self.stats.iterations, gap);
                callback(&self.stats);
            }
        }

        self.stats.elapsed_seconds = base + start.elapsed().as_secs_f64();
        self.stats.update_rate();
        Ok(&self.stats)
    }

    /// Expected value and exploitability of the average strategies.
    pub fn exploitability(&mut self) -> SolverResult<EvExpl> {
        let avg = [self.avg_bh(0)?, self.avg_bh(1)?];
        self.traverser.ev_and_exploitability([&avg[0], &avg[1]])
    }

    /// Running average strategy of `player`, behavioral form.
    pub fn avg_bh(&self, player: Player) -> SolverResult<Vec<f64>> {
        check_player(player)?;
        self.averagers[player].running_avg()
    }

    /// Current behavioral strategy of `player`.
    pub fn bh(&self, player: Player) -> SolverResult<&[f64]> {
        check_player(player)?;
        Ok(&self.bh[player])
    }

    /// Accumulated regrets of `player`.
    pub fn regrets(&self, player: Player) -> SolverResult<&[f64]> {
        check_player(player)?;
        Ok(&self.regrets[player])
    }

    /// Get the half-step counter.
    pub fn n_iters(&self) -> u64 {
        self.n_iters
    }

    /// Get reference to the configuration.
    pub fn conf(&self) -> &CfrConf {
        &self.conf
    }

    /// Get reference to the traverser.
    pub fn traverser(&self) -> &Traverser<G> {
        &self.traverser
    }

    /// Get current statistics.
    pub fn stats(&self) -> &CfrStats {
        &self.stats
    }
}

/// One backward pass of regret matching over `tpx`.
///
/// Rows are visited children first. Each row's counterfactual value under
/// the current strategy is added to the parent slot of `gradient`, so by
/// the time a row is visited its gradient already holds the values of
/// everything below it.
fn update_regrets(
    tpx: &Treeplex,
    gradient: &mut [f64],
    regrets: &mut [f64],
    bh: &mut [f64],
    predictive: bool,
) -> SolverResult<()> {
    for i in (0..tpx.num_infosets()).rev() {
        let mask = tpx.legal_actions()[i];
        let range = i * MAX_ACTIONS..(i + 1) * MAX_ACTIONS;

        let row_gradient = &gradient[range.clone()];
        let mut ev = dot(row_gradient, &bh[range.clone()]);
        for j in legal_actions(mask) {
            regrets[i * MAX_ACTIONS + j] += row_gradient[j] - ev;
        }

        let row = &mut bh[range.clone()];
        row.copy_from_slice(&regrets[range.clone()]);
        relu_normalize(row, mask)?;

        if predictive {
            ev = dot(&gradient[range], row);
        }
        if let Some((parent, action)) = tpx.parent(i) {
            gradient[parent * MAX_ACTIONS + action] += ev;
        }
    }
    Ok(())
}

/// Scale positive regrets by `pos` and the rest by `neg`.
fn discount_regrets(regrets: &mut [f64], pos: f64, neg: f64) {
    if pos == 1.0 && neg == 1.0 {
        return;
    }
    for r in regrets.iter_mut() {
        *r *= if *r > 0.0 { pos } else { neg };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::averager::AveragingScheme;
    use crate::cfr::config::ConfigError;
    use crate::cfr::infoset::InfosetKey;
    use crate::games::{AbruptDarkHex2, DarkHex2};
    use approx::assert_abs_diff_eq;
    use rustc_hash::FxHashMap;

    fn two_level() -> Treeplex {
        let mut masks = FxHashMap::default();
        masks.insert(InfosetKey::ROOT, 0b11);
        masks.insert(InfosetKey::ROOT.child(0, true), 0b11);
        Treeplex::from_masks(masks).unwrap()
    }

    fn solver<G: GameState>(conf: CfrConf) -> CfrSolver<G> {
        CfrSolver::new(Traverser::<G>::new().unwrap(), conf).unwrap()
    }

    #[test]
    fn test_update_regrets_propagates_ev() {
        let tpx = two_level();
        let mut regrets = vec![0.0; 18];
        let mut bh = tpx.uniform_strategy();
        let mut gradient = vec![0.0; 18];
        gradient[9] = 1.0;
        gradient[10] = 3.0;

        update_regrets(&tpx, &mut gradient, &mut regrets, &mut bh, false).unwrap();

        assert_eq!(&regrets[9..11], &[-1.0, 1.0]);
        assert_eq!(&bh[9..11], &[0.0, 1.0]);
        assert_eq!(gradient[0], 2.0);
        assert_eq!(&regrets[..2], &[1.0, -1.0]);
        assert_eq!(&bh[..2], &[1.0, 0.0]);
    }

    #[test]
    fn test_update_regrets_predictive() {
        let tpx = two_level();
        let mut regrets = vec![0.0; 18];
        let mut bh = tpx.uniform_strategy();
        let mut gradient = vec![0.0; 18];
        gradient[9] = 1.0;
        gradient[10] = 3.0;

        update_regrets(&tpx, &mut gradient, &mut regrets, &mut bh, true).unwrap();

        assert_eq!(gradient[0], 3.0);
        assert_eq!(&regrets[..2], &[1.5, -1.5]);
    }

    #[test]
    fn test_update_regrets_zero_gradient_stays_uniform() {
        let tpx = two_level();
        let mut regrets = vec![0.0; 18];
        let mut bh = tpx.uniform_strategy();
        let mut gradient = vec![0.0; 18];

        update_regrets(&tpx, &mut gradient, &mut regrets, &mut bh, false).unwrap();

        assert_eq!(bh, tpx.uniform_strategy());
        assert!(regrets.iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_discount_regrets() {
        let mut regrets = vec![2.0, -1.0, 0.0, 4.0];
        discount_regrets(&mut regrets, 0.5, 0.0);
        assert_eq!(regrets, vec![1.0, 0.0, 0.0, 2.0]);

        let mut regrets = vec![2.0, -1.0];
        discount_regrets(&mut regrets, 1.0, 0.5);
        assert_eq!(regrets, vec![2.0, -0.5]);
    }

    #[test]
    fn test_new_starts_uniform() {
        let solver = solver::<DarkHex2>(CfrConf::default());
        assert_eq!(solver.n_iters(), 2);

        for p in 0..2 {
            let uniform = solver.traverser().treeplex(p).unwrap().uniform_strategy();
            assert_eq!(solver.bh(p).unwrap(), &uniform[..]);
            for (x, y) in solver.avg_bh(p).unwrap().iter().zip(&uniform) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-6);
            }
        }
        assert_eq!(solver.stats().info_sets[0], solver.traverser().num_infosets(0).unwrap());
    }

    #[test]
    fn test_new_rejects_bad_conf() {
        let traverser = Traverser::<DarkHex2>::new().unwrap();
        let conf = CfrConf::dcfr().with_dcfr_exponents(f64::INFINITY, 1.0);
        assert!(matches!(
            CfrSolver::new(traverser, conf),
            Err(SolverError::Config(ConfigError::InvalidExponent("alpha", _)))
        ));
    }

    #[test]
    fn test_alternation_updates_one_player() {
        let mut solver = solver::<AbruptDarkHex2>(CfrConf::default());
        let uniform1 = solver.bh(1).unwrap().to_vec();

        solver.step().unwrap();
        assert_eq!(solver.n_iters(), 3);
        assert_eq!(solver.bh(1).unwrap(), &uniform1[..]);
        assert!(solver.regrets(1).unwrap().iter().all(|&r| r == 0.0));
        assert!(solver.regrets(0).unwrap().iter().any(|&r| r != 0.0));

        solver.step().unwrap();
        assert_eq!(solver.n_iters(), 4);
        assert!(solver.regrets(1).unwrap().iter().any(|&r| r != 0.0));
    }

    #[test]
    fn test_simultaneous_updates_both_players() {
        let mut solver = solver::<AbruptDarkHex2>(CfrConf::vanilla());
        solver.step().unwrap();

        assert_eq!(solver.n_iters(), 4);
        for p in 0..2 {
            assert!(solver.regrets(p).unwrap().iter().any(|&r| r != 0.0));
            solver
                .traverser()
                .treeplex(p)
                .unwrap()
                .validate_strategy(solver.bh(p).unwrap())
                .unwrap();
        }
    }

    #[test]
    fn test_rmplus_keeps_regrets_nonnegative() {
        let mut solver = solver::<AbruptDarkHex2>(CfrConf::cfr_plus());
        solver.train(10).unwrap();
        for p in 0..2 {
            assert!(solver.regrets(p).unwrap().iter().all(|&r| r >= 0.0));
        }
    }

    #[test]
    fn test_cfr_plus_converges_on_dark_hex() {
        let mut solver = solver::<DarkHex2>(CfrConf::cfr_plus());
        let initial = solver.exploitability().unwrap().nash_gap();

        solver.train(200).unwrap();
        let out = solver.exploitability().unwrap();

        assert!(out.expl[0] >= -1e-9 && out.expl[1] >= -1e-9);
        assert!(out.nash_gap() < initial / 2.0);
        assert!(out.nash_gap() < 0.1);
    }

    #[test]
    fn test_all_variants_improve_on_uniform() {
        let confs = [
            CfrConf::vanilla(),
            CfrConf::cfr_plus(),
            CfrConf::dcfr(),
            CfrConf::pcfr_plus(),
            CfrConf::dcfr().with_rmplus(true).with_avg(AveragingScheme::Quadratic),
        ];
        for conf in confs {
            let mut solver = solver::<AbruptDarkHex2>(conf);
            let initial = solver.exploitability().unwrap().nash_gap();
            solver.train(100).unwrap();
            let gap = solver.exploitability().unwrap().nash_gap();
            assert!(gap < initial, "{:?}: {} >= {}", conf, gap, initial);
        }
    }

    #[test]
    fn test_train_with_callback() {
        let mut solver = solver::<DarkHex2>(CfrConf::cfr_plus());
        let mut calls = 0;

        let stats = solver
            .train_with_callback(10, 5, |stats| {
                calls += 1;
                assert!(stats.exploitability.is_some());
            })
            .unwrap();

        assert_eq!(stats.iterations, 10);
        assert_eq!(stats.exploitability_history.len(), 2);
        assert_eq!(stats.exploitability_history[1].iteration, 10);
        assert_eq!(calls, 2);

        assert!(matches!(
            solver.train_with_callback(10, 0, |_| {}),
            Err(SolverError::Usage(_))
        ));
    }

    #[test]
    fn test_usage_errors() {
        let solver = solver::<DarkHex2>(CfrConf::default());
        assert!(matches!(solver.regrets(2), Err(SolverError::Usage(_))));
        assert!(matches!(solver.bh(2), Err(SolverError::Usage(_))));
        assert!(matches!(solver.avg_bh(2), Err(SolverError::Usage(_))));
    }
}
