//! Win condition checking
//!
//! Six or more stones of one color in a row, along any of the four axes.

use crate::board::{Board, Pos, Stone, BOARD_SIZE, ROAD_LEN};

/// Direction vectors for line checking (4 directions)
const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// Check if there's 6+ in a row for the given color
pub fn has_six_in_row(board: &Board, stone: Stone) -> bool {
    find_six_positions(board, stone).is_some()
}

/// Six-in-a-row check through a specific position.
///
/// Only walks the 4 lines through `pos`. No allocation.
#[inline]
pub fn has_six_at(board: &Board, pos: Pos, color: Stone) -> bool {
    if color == Stone::Empty || board.get(pos) != color {
        return false;
    }
    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| run_length(board, pos, dr, dc, color) >= ROAD_LEN)
}

/// Stones of `color` contiguous with `pos` along one axis, `pos` included.
fn run_length(board: &Board, pos: Pos, dr: i32, dc: i32, color: Stone) -> usize {
    let mut count = 1;
    for sign in [1, -1] {
        let mut r = pos.row as i32 + dr * sign;
        let mut c = pos.col as i32 + dc * sign;
        while Pos::is_valid(r, c) && board.get(Pos::new(r as u8, c as u8)) == color {
            count += 1;
            r += dr * sign;
            c += dc * sign;
        }
    }
    count
}

/// Find the cells of a winning line if one exists
///
/// Returns the whole run (six or longer) in board order, or `None`.
pub fn find_six_positions(board: &Board, stone: Stone) -> Option<Vec<Pos>> {
    if stone == Stone::Empty {
        return None;
    }
    for (pos, color) in board.stones() {
        if color != stone {
            continue;
        }
        for &(dr, dc) in &DIRECTIONS {
            // Only start from the first stone of a run
            let (pr, pc) = (pos.row as i32 - dr, pos.col as i32 - dc);
            if Pos::is_valid(pr, pc) && board.get(Pos::new(pr as u8, pc as u8)) == stone {
                continue;
            }

            let mut line = vec![pos];
            for i in 1..BOARD_SIZE as i32 {
                let (r, c) = (pos.row as i32 + dr * i, pos.col as i32 + dc * i);
                if !Pos::is_valid(r, c) {
                    break;
                }
                let next = Pos::new(r as u8, c as u8);
                if board.get(next) != stone {
                    break;
                }
                line.push(next);
            }

            if line.len() >= ROAD_LEN {
                return Some(line);
            }
        }
    }
    None
}

/// Check for a winner
///
/// Returns `Some(Stone)` if either color has six or more in a row. In a
/// legal game at most one side can, since play stops at the first six.
pub fn check_winner(board: &Board) -> Option<Stone> {
    [Stone::Black, Stone::White]
        .into_iter()
        .find(|&stone| has_six_in_row(board, stone))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_in_row_horizontal() {
        let mut board = Board::empty();
        for i in 0..6 {
            board.set(Pos::new(9, i), Stone::Black);
        }
        assert!(has_six_in_row(&board, Stone::Black));
        assert!(!has_six_in_row(&board, Stone::White));
        assert!(has_six_at(&board, Pos::new(9, 3), Stone::Black));
    }

    #[test]
    fn test_six_in_row_vertical() {
        let mut board = Board::empty();
        for i in 0..6 {
            board.set(Pos::new(i, 9), Stone::White);
        }
        assert_eq!(check_winner(&board), Some(Stone::White));
    }

    #[test]
    fn test_six_in_row_diagonals() {
        let mut board = Board::empty();
        for i in 0..6 {
            board.set(Pos::new(i, i), Stone::White);
        }
        assert!(has_six_at(&board, Pos::new(5, 5), Stone::White));

        let mut board = Board::empty();
        for i in 0..6 {
            board.set(Pos::new(4 + i, 12 - i), Stone::Black);
        }
        assert!(has_six_at(&board, Pos::new(4, 12), Stone::Black));
        assert_eq!(find_six_positions(&board, Stone::Black).map(|l| l.len()), Some(6));
    }

    #[test]
    fn test_five_not_win() {
        let mut board = Board::new();
        for i in 0..5 {
            board.set(Pos::new(3, i), Stone::Black);
        }
        assert!(!has_six_in_row(&board, Stone::Black));
        assert!(!has_six_at(&board, Pos::new(3, 0), Stone::Black));
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_overline_wins() {
        let mut board = Board::empty();
        for i in 2..10 {
            board.set(Pos::new(18, i), Stone::Black);
        }
        let line = find_six_positions(&board, Stone::Black).unwrap();
        assert_eq!(line.len(), 8);
        assert_eq!(line[0], Pos::new(18, 2));
    }

    #[test]
    fn test_gap_breaks_line() {
        let mut board = Board::empty();
        for i in [0u8, 1, 2, 4, 5, 6] {
            board.set(Pos::new(7, i), Stone::White);
        }
        assert!(!has_six_in_row(&board, Stone::White));
        board.set(Pos::new(7, 3), Stone::White);
        assert!(has_six_at(&board, Pos::new(7, 0), Stone::White));
    }

    #[test]
    fn test_empty_has_no_line() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
        assert!(find_six_positions(&board, Stone::Empty).is_none());
        assert!(!has_six_at(&board, Pos::new(0, 0), Stone::Empty));
    }
}
