//! Dark Hex on 2x2 and 3x3 boards.
//!
//! ## Game Rules
//!
//! - Hex played on a rhombus of `N x N` hexagonal cells, `N` is 2 or 3
//! - Player 1 (index 0) connects the left and right edges (column 0 to
//!   column `N - 1`)
//! - Player 2 (index 1) connects the top and bottom edges (row 0 to
//!   row `N - 1`)
//! - Neither player sees the opponent's stones; a move on an occupied cell
//!   fails and reveals only that the cell is taken
//!
//! ## Board Layout (3x3)
//!
//! ```text
//! 0 1 2
//!  3 4 5
//!   6 7 8
//! ```
//!
//! Cell `(r, c)` touches `(r-1, c)`, `(r-1, c+1)`, `(r, c-1)`, `(r, c+1)`,
//! `(r+1, c-1)` and `(r+1, c)`.

use crate::cfr::infoset::Player;
use crate::games::board::{Board, BoardRules, CellMask};

const DIRECTIONS: [(isize, isize); 6] = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0)];

/// Hex connection rules on an `N x N` board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HexRules<const N: usize>;

impl<const N: usize> HexRules<N> {
    fn neighbours(cell: usize) -> impl Iterator<Item = usize> {
        let (r, c) = ((cell / N) as isize, (cell % N) as isize);
        DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
            let (nr, nc) = (r + dr, c + dc);
            let inside = (0..N as isize).contains(&nr) && (0..N as isize).contains(&nc);
            inside.then(|| nr as usize * N + nc as usize)
        })
    }

    /// Cells on the starting edge of `player`.
    fn start_edge(player: Player) -> impl Iterator<Item = usize> {
        (0..N).map(move |k| if player == 0 { k * N } else { k })
    }

    fn on_goal_edge(cell: usize, player: Player) -> bool {
        if player == 0 {
            cell % N == N - 1
        } else {
            cell / N == N - 1
        }
    }
}

impl<const N: usize> BoardRules for HexRules<N> {
    const SIDE: usize = N;
    const NAME: &'static str = "dark hex";

    /// Flood fill from the starting edge through `owned`.
    fn is_winning(owned: CellMask, player: Player) -> bool {
        let mut reached: CellMask = 0;
        let mut stack: Vec<usize> = Self::start_edge(player)
            .filter(|&cell| owned >> cell & 1 == 1)
            .collect();
        for &cell in &stack {
            reached |= 1 << cell;
        }

        while let Some(cell) = stack.pop() {
            if Self::on_goal_edge(cell, player) {
                return true;
            }
            for next in Self::neighbours(cell) {
                let bit = 1 << next;
                if owned & bit != 0 && reached & bit == 0 {
                    reached |= bit;
                    stack.push(next);
                }
            }
        }
        false
    }

    fn row_offset(row: usize) -> usize {
        row
    }
}

/// Classical Dark Hex on a 3x3 board.
pub type DarkHex3 = Board<HexRules<3>, false>;

/// Abrupt Dark Hex on a 3x3 board.
pub type AbruptDarkHex3 = Board<HexRules<3>, true>;

/// Classical Dark Hex on a 2x2 board.
pub type DarkHex2 = Board<HexRules<2>, false>;

/// Abrupt Dark Hex on a 2x2 board.
pub type AbruptDarkHex2 = Board<HexRules<2>, true>;
