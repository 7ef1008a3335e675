//! Phantom Tic-Tac-Toe.
//!
//! Tic-Tac-Toe where neither player sees the opponent's marks. Placing a
//! mark on a cell the opponent already holds fails and tells the mover only
//! that the cell is taken. Three in a row wins; the game is tied once every
//! cell is held and nobody has a line.

use crate::cfr::infoset::Player;
use crate::games::board::{Board, BoardRules, CellMask};

/// The eight lines of a 3x3 board.
const LINES: [CellMask; 8] = [
    0b000_000_111,
    0b000_111_000,
    0b111_000_000,
    0b001_001_001,
    0b010_010_010,
    0b100_100_100,
    0b100_010_001,
    0b001_010_100,
];

/// Tic-Tac-Toe rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TicTacToeRules;

impl BoardRules for TicTacToeRules {
    const SIDE: usize = 3;
    const NAME: &'static str = "phantom tic-tac-toe";

    fn is_winning(owned: CellMask, _player: Player) -> bool {
        LINES.iter().any(|&line| owned & line == line)
    }
}

/// Classical Phantom Tic-Tac-Toe.
pub type PhantomTtt = Board<TicTacToeRules, false>;

/// Abrupt Phantom Tic-Tac-Toe.
pub type AbruptPhantomTtt = Board<TicTacToeRules, true>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::game::{GameState, Outcome};

    fn play<G: GameState>(moves: &[usize]) -> G {
        let mut state = G::default();
        for &m in moves {
            state.try_next(m).unwrap();
        }
        state
    }

    #[test]
    fn test_lines() {
        for line in LINES {
            assert_eq!(line.count_ones(), 3);
            assert!(TicTacToeRules::is_winning(line, 0));
            assert!(TicTacToeRules::is_winning(line | 0b1000, 1));
        }
        assert!(!TicTacToeRules::is_winning(0b011_000_011, 0));
    }

    #[test]
    fn test_first_player_line() {
        let state: PhantomTtt = play(&[0, 3, 1, 4, 2]);
        assert_eq!(state.winner(), Some(Outcome::Win(0)));
    }

    #[test]
    fn test_second_player_wins() {
        let state: AbruptPhantomTtt = play(&[4, 0, 8, 3, 2, 6]);
        assert_eq!(state.winner(), Some(Outcome::Win(1)));
        assert!(state.to_string().contains("Player 2 wins"));
    }

    #[test]
    fn test_tie_on_full_board() {
        // X O X / X O O / O X X
        let state: PhantomTtt = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(state.winner(), Some(Outcome::Tie));
        assert!(state.to_string().contains("TIE"));
    }

    #[test]
    fn test_infoset_after_failures() {
        let state: PhantomTtt = play(&[4, 4]);
        assert_eq!(state.player(), 1);
        assert_eq!(state.infoset().to_string(), "4.");
        assert_eq!(state.available_actions(), 0b1_1110_1111);

        let state: PhantomTtt = play(&[4, 4, 0, 1]);
        assert_eq!(state.player(), 1);
        assert_eq!(state.infoset().to_string(), "4.0*");
        assert_eq!(state.available_actions(), 0b1_1110_1110);
    }
}
