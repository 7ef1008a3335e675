//! Game implementations for the CFR solver.
//!
//! This module contains phantom board games: each player sees only their
//! own board and learns whether their own moves succeeded. These serve as:
//!
//! 1. **Validation**: 2x2 Dark Hex is small enough to solve in unit tests,
//!    and player 1 always wins it, so convergence is easy to check.
//!
//! 2. **Examples**: Demonstrate how to implement the `GameState` trait for
//!    new games.
//!
//! 3. **Benchmarks**: Provide standardized games for performance testing.
//!
//! ## Available Games
//!
//! - [`dark_hex`]: Dark Hex on 2x2 and 3x3 boards
//! - [`phantom_ttt`]: Phantom Tic-Tac-Toe
//!
//! Each comes in a classical variant, where a player moves again after a
//! failed move, and an abrupt variant, where the turn always passes.
//!
//! ## Adding New Games
//!
//! To add a new board game of at most nine cells:
//!
//! 1. Create a new module under `src/games/`
//! 2. Implement [`BoardRules`] for a unit struct
//! 3. Alias `Board<YourRules, false>` and `Board<YourRules, true>`
//! 4. Add tests that verify expected behavior
//!
//! Games that do not fit the board model implement
//! [`GameState`](crate::cfr::GameState) directly.

pub mod board;
pub mod dark_hex;
pub mod phantom_ttt;

pub use board::{Board, BoardRules, CellMask};
pub use dark_hex::{AbruptDarkHex2, AbruptDarkHex3, DarkHex2, DarkHex3, HexRules};
pub use phantom_ttt::{AbruptPhantomTtt, PhantomTtt, TicTacToeRules};
