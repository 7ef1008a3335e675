//! CFR (Counterfactual Regret Minimization) engine.
//!
//! This module computes Nash equilibrium strategies for two-player zero-sum
//! perfect-recall games with at most nine actions per decision point.
//!
//! # Overview
//!
//! The engine works on the sequence form of the game:
//! 1. The [`Traverser`] enumerates the game tree once and builds one
//!    [`Treeplex`] per player: every infoset gets a row of nine action slots
//! 2. Every solver step computes exact gradients (counterfactual values) for
//!    the current strategy pair with a parallel full-width traversal
//! 3. Regrets are updated in one backward pass over the treeplex and the new
//!    strategy is pushed into an [`Averager`]
//!
//! # Supported Variants
//!
//! - **Vanilla CFR**: plain regret matching
//! - **CFR+**: discards negative regret after every update
//! - **Discounted CFR**: discounts older regrets
//! - **Predictive CFR**: propagates the value of the updated strategy
//! - Uniform, linear or quadratic averaging, alternating or simultaneous
//!   updates
//!
//! # Usage
//!
//! 1. Implement the `GameState` trait for your game (or use one from
//!    [`crate::games`])
//! 2. Build a `Traverser` and wrap it in a `CfrSolver`
//! 3. Call `train()` or `step()`
//! 4. Read the average strategies with `avg_bh()` and measure them with
//!    `exploitability()`
//!
//! # Example
//!
//! ```no_run
//! use treeplex_solver::cfr::{CfrConf, CfrSolver, SolverResult, Traverser};
//! use treeplex_solver::games::DarkHex3;
//!
//! fn main() -> SolverResult<()> {
//!     let traverser = Traverser::<DarkHex3>::new()?;
//!     let mut solver = CfrSolver::new(traverser, CfrConf::pcfr_plus())?;
//!     solver.train(1_000)?;
//!
//!     let out = solver.exploitability()?;
//!     println!("ev0 = {:.4}, nash gap = {:.6}", out.ev0, out.nash_gap());
//!     Ok(())
//! }
//! ```
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete Information" (2007)
//! - Tammelin, O. "Solving Large Imperfect Information Games Using CFR+" (2014)
//! - Brown, N., Sandholm, T. "Solving Imperfect-Information Games via Discounted Regret
//!   Minimization" (2019)
//! - Farina, G., Kroer, C., Sandholm, T. "Faster Game Solving via Predictive Blackwell
//!   Approachability" (2021)

pub mod averager;
pub mod config;
pub mod error;
pub mod game;
pub mod infoset;
pub mod solver;
pub mod traverser;
pub mod treeplex;

// Re-export main types for convenient access
pub use averager::{iter_weight, Averager, AveragingScheme};
pub use config::{CfrConf, CfrStats, ConfigError, ExploitabilityPoint};
pub use error::{SolverError, SolverResult};
pub use game::{GameState, Outcome};
pub use infoset::{ActionMask, InfosetKey, InfosetMetadata, Player, MAX_ACTIONS, MAX_DEPTH};
pub use solver::CfrSolver;
pub use traverser::{EvExpl, Traverser};
pub use treeplex::Treeplex;
