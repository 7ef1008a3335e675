//! Shared board state for phantom ("dark") games.
//!
//! Both players play on their own private copy of a board of at most nine
//! cells. A move is an attempt to claim a cell: it succeeds if the opponent
//! has not claimed the cell before. Every attempt is stamped on the mover's
//! board with the mover's ply number and whether it succeeded, which is all
//! a player ever learns about the game.
//!
//! ## Rule Variants
//!
//! - **Classical**: after a failed attempt the mover plays again
//! - **Abrupt**: the turn passes after every attempt

use std::fmt;
use std::marker::PhantomData;

use crate::cfr::game::{GameState, Outcome};
use crate::cfr::infoset::{ActionMask, InfosetKey, Player, MAX_ACTIONS};

/// Bitmask over cells, bit `i` for cell `i`.
pub type CellMask = u16;

/// Rules of a concrete game played on a [`Board`].
pub trait BoardRules: Clone + Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Side length of the square board.
    const SIDE: usize;

    /// Number of cells, at most 9. Cell `r * SIDE + c` is row `r`, column `c`.
    const CELLS: usize = Self::SIDE * Self::SIDE;

    /// Name of the game.
    const NAME: &'static str;

    /// Whether `owned` contains a winning configuration for `player`.
    fn is_winning(owned: CellMask, player: Player) -> bool;

    /// Horizontal shift of row `row` when printing the board.
    fn row_offset(_row: usize) -> usize {
        0
    }
}

/// State of a phantom game with rules `R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board<R: BoardRules, const ABRUPT: bool> {
    /// Per player and cell: `ply << 1 | success`, 0 if never attempted.
    cells: [[u8; MAX_ACTIONS]; 2],
    player: u8,
    /// Moves made by each player so far.
    plies: [u8; 2],
    _rules: PhantomData<R>,
}

impl<R: BoardRules, const ABRUPT: bool> Board<R, ABRUPT> {
    const ALL_CELLS: CellMask = ((1u32 << R::CELLS) - 1) as CellMask;

    /// Start position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this is the abrupt variant.
    pub fn is_abrupt(&self) -> bool {
        ABRUPT
    }

    /// Stamp of `cell` on `player`'s board.
    pub fn stamp(&self, player: Player, cell: usize) -> u8 {
        self.cells[player][cell]
    }

    /// Number of moves `player` has made.
    pub fn plies(&self, player: Player) -> u8 {
        self.plies[player]
    }

    /// Cells `player` has claimed.
    pub fn owned(&self, player: Player) -> CellMask {
        self.cells_where(player, |stamp| stamp & 1 == 1)
    }

    /// Cells `player` has attempted, claimed or not.
    pub fn attempted(&self, player: Player) -> CellMask {
        self.cells_where(player, |stamp| stamp != 0)
    }

    fn cells_where(&self, player: Player, f: impl Fn(u8) -> bool) -> CellMask {
        self.cells[player][..R::CELLS]
            .iter()
            .enumerate()
            .filter(|&(_, &stamp)| f(stamp))
            .fold(0, |mask, (i, _)| mask | (1 << i))
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, player: Player, mark: char) -> fmt::Result {
        for r in 0..R::SIDE {
            write!(f, "{:width$}", "", width = R::row_offset(r))?;
            for c in 0..R::SIDE {
                let stamp = self.cells[player][r * R::SIDE + c];
                let glyph = match stamp {
                    0 => '.',
                    s if s & 1 == 1 => mark,
                    _ => '#',
                };
                write!(f, "{} ", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<R: BoardRules, const ABRUPT: bool> GameState for Board<R, ABRUPT> {
    fn player(&self) -> Player {
        self.player as Player
    }

    fn winner(&self) -> Option<Outcome> {
        let owned = [self.owned(0), self.owned(1)];
        if R::is_winning(owned[0], 0) {
            Some(Outcome::Win(0))
        } else if R::is_winning(owned[1], 1) {
            Some(Outcome::Win(1))
        } else if owned[0] | owned[1] == Self::ALL_CELLS {
            Some(Outcome::Tie)
        } else {
            None
        }
    }

    fn available_actions(&self) -> ActionMask {
        (!self.attempted(self.player()) & Self::ALL_CELLS) as ActionMask
    }

    fn next(&mut self, action: usize) {
        let p = self.player();
        debug_assert!(action < R::CELLS && self.cells[p][action] == 0);

        self.plies[p] += 1;
        let success = self.cells[1 - p][action] == 0;
        self.cells[p][action] = (self.plies[p] << 1) | success as u8;

        if ABRUPT || success {
            self.player ^= 1;
        }
    }

    fn infoset(&self) -> InfosetKey {
        let p = self.player();
        let mut history = [None; MAX_ACTIONS];
        for (cell, &stamp) in self.cells[p].iter().enumerate() {
            if stamp != 0 {
                history[(stamp >> 1) as usize - 1] = Some((cell, stamp & 1 == 1));
            }
        }
        history
            .iter()
            .flatten()
            .fold(InfosetKey::ROOT, |key, &(cell, success)| key.child(cell, success))
    }
}

impl<R: BoardRules, const ABRUPT: bool> fmt::Display for Board<R, ABRUPT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = if ABRUPT { "abrupt " } else { "" };
        writeln!(f, "** {}{}", variant, R::NAME)?;
        match self.winner() {
            None => writeln!(f, "** It is Player {}'s turn", self.player() + 1)?,
            Some(Outcome::Win(p)) => writeln!(f, "** GAME OVER -- Player {} wins", p + 1)?,
            Some(Outcome::Tie) => writeln!(f, "** GAME OVER -- TIE")?,
        }
        writeln!(f, "** Player 1's board:")?;
        self.render(f, 0, 'X')?;
        writeln!(f, "** Player 2's board:")?;
        self.render(f, 1, 'O')
    }
}
