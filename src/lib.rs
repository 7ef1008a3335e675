//! # Treeplex Solver
//!
//! A parallel Counterfactual Regret Minimization (CFR) engine for computing
//! Nash equilibrium strategies in small two-player zero-sum games with
//! imperfect information.
//!
//! ## Features
//!
//! - **Generic CFR Engine**: Works with any game implementing the `GameState` trait
//! - **Multiple Variants**: CFR+, Discounted CFR and Predictive CFR, with
//!   uniform, linear or quadratic averaging
//! - **Sequence Form**: Strategies, gradients and regrets are flat buffers
//!   over a treeplex
//! - **Parallel Traversal**: Tree discovery and gradient computation run on rayon
//! - **Exact Exploitability**: Best responses by backward induction
//!
//! ## Quick Start
//!
//! ```no_run
//! use treeplex_solver::cfr::{CfrConf, CfrSolver, Traverser};
//! use treeplex_solver::games::PhantomTtt;
//!
//! # fn main() -> treeplex_solver::cfr::SolverResult<()> {
//! let traverser = Traverser::<PhantomTtt>::new()?;
//! let mut solver = CfrSolver::new(traverser, CfrConf::cfr_plus())?;
//! solver.train(100)?;
//! let strategy = solver.avg_bh(0)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: Core CFR engine
//! - [`games`]: Dark Hex and Phantom Tic-Tac-Toe
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     CfrSolver (Generic)                         │
//! │  - Regret matching        - Averaging                           │
//! │  - Discounting            - Exploitability                      │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │         Traverser: discovery, gradients, best response          │
//! │                  Treeplex (one per player)                      │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ implements GameState trait
//!                               ▼
//!         ┌─────────────────────┼─────────────────────┐
//!         │                     │                     │
//!         ▼                     ▼                     ▼
//!    ┌─────────┐         ┌───────────┐         ┌───────────┐
//!    │Dark Hex │         │ Abrupt    │         │  Phantom  │
//!    │ 2x2 3x3 │         │ Dark Hex  │         │    TTT    │
//!    └─────────┘         └───────────┘         └───────────┘
//! ```

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) engine.
///
/// This is the core module containing the treeplex, the traverser and the
/// solver.
pub mod cfr;

/// Game implementations module.
///
/// Contains Dark Hex and Phantom Tic-Tac-Toe in classical and abrupt form.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{CfrConf, CfrSolver, GameState, SolverError, SolverResult, Traverser, Treeplex};
