use super::*;

#[test]
fn test_stone_opponent() {
    assert_eq!(Stone::Black.opponent(), Stone::White);
    assert_eq!(Stone::White.opponent(), Stone::Black);
    assert_eq!(Stone::Empty.opponent(), Stone::Empty);
}

#[test]
fn test_pos_conversion() {
    assert_eq!(CENTER.to_index(), 180);
    let pos = Pos::from_index(180);
    assert_eq!(pos, Pos::new(9, 9));
    assert_eq!(Pos::new(18, 18).to_index(), TOTAL_CELLS - 1);
}

#[test]
fn test_pos_validity() {
    assert!(Pos::is_valid(0, 0));
    assert!(Pos::is_valid(18, 18));
    assert!(!Pos::is_valid(-1, 0));
    assert!(!Pos::is_valid(0, 19));
    assert!(!Pos { row: 19, col: 0 }.on_board());
}

#[test]
fn test_pos_display() {
    assert_eq!(CENTER.to_string(), "J10");
    assert_eq!(Pos::new(0, 0).to_string(), "A1");
}

#[test]
fn test_center_bonus() {
    assert_eq!(CENTER.center_bonus(), 18);
    assert_eq!(Pos::new(0, 0).center_bonus(), 0);
    assert!(Pos::new(9, 10).center_bonus() > Pos::new(9, 12).center_bonus());
}

#[test]
fn test_move_is_unordered() {
    let a = Pos::new(3, 4);
    let b = Pos::new(1, 7);
    assert_eq!(Move::new(a, b), Move::new(b, a));
    assert_eq!(Move::new(a, b).first(), b);
    assert!(Move::new(a, b).contains(a));
}

#[test]
fn test_initial_board() {
    let board = Board::new();
    assert_eq!(board.get(CENTER), Stone::Black);
    assert_eq!(board.stone_count(), 1);
    assert_eq!(board.empty_cells().count(), TOTAL_CELLS - 1);
    assert_eq!(Board::empty().stone_count(), 0);
}

#[test]
fn test_board_off_board_access() {
    let mut board = Board::new();
    let outside = Pos { row: 0, col: 25 };
    board.set(outside, Stone::White);
    assert_eq!(board.get(outside), Stone::Empty);
    assert!(!board.is_empty(outside));
    assert_eq!(board.stone_count(), 1);
}

#[test]
fn test_position_initial_state() {
    let pos = Position::new();
    assert_eq!(pos.side_to_move(), Stone::White);
    assert_eq!(pos.get(CENTER), Stone::Black);
    assert!(pos.history().is_empty());
    assert!(!pos.is_game_over());
    assert_eq!(pos.proximity(Pos::new(11, 11)), 1);
    assert_eq!(pos.proximity(Pos::new(12, 12)), 0);
}

#[test]
fn test_make_and_undo_move() {
    let mut pos = Position::new();
    let mv = Move::new(Pos::new(9, 10), Pos::new(10, 10));

    assert!(pos.is_legal(mv));
    pos.make_move(mv);
    assert_eq!(pos.side_to_move(), Stone::Black);
    assert_eq!(pos.get(Pos::new(9, 10)), Stone::White);
    assert_eq!(pos.last_move(), Some(mv));
    assert!(!pos.is_legal(mv));
    assert_eq!(pos.proximity(Pos::new(11, 11)), 3);

    assert_eq!(pos.undo_move(), Some(mv));
    assert_eq!(pos.side_to_move(), Stone::White);
    assert!(pos.is_empty(Pos::new(9, 10)));
    assert_eq!(pos.proximity(Pos::new(11, 11)), 1);
    assert_eq!(pos.undo_move(), None);
}

#[test]
fn test_illegal_moves() {
    let pos = Position::new();
    let same = Move::new(Pos::new(1, 1), Pos::new(1, 1));
    let occupied = Move::new(CENTER, Pos::new(1, 1));
    let outside = Move::new(Pos { row: 30, col: 0 }, Pos::new(1, 1));
    assert!(!pos.is_legal(same));
    assert!(!pos.is_legal(occupied));
    assert!(!pos.is_legal(outside));
}

#[test]
fn test_six_in_a_row_wins() {
    let mut pos = Position::new();
    // White builds (2,0)..(2,5) over three turns, black plays far away
    pos.make_move(Move::new(Pos::new(2, 0), Pos::new(2, 1)));
    pos.make_move(Move::new(Pos::new(15, 0), Pos::new(15, 2)));
    pos.make_move(Move::new(Pos::new(2, 2), Pos::new(2, 3)));
    pos.make_move(Move::new(Pos::new(15, 4), Pos::new(15, 6)));
    assert!(!pos.is_game_over());
    pos.make_move(Move::new(Pos::new(2, 4), Pos::new(2, 5)));
    assert_eq!(pos.winner(), Some(Stone::White));

    pos.undo_move();
    assert_eq!(pos.winner(), None);
}

#[test]
fn test_overline_wins() {
    let mut pos = Position::new();
    for c in [0u8, 1, 2, 4, 5, 6] {
        pos.put_stone(Pos::new(4, c), Stone::White);
    }
    pos.make_move(Move::new(Pos::new(4, 3), Pos::new(17, 17)));
    assert_eq!(pos.winner(), Some(Stone::White));
    assert!(crate::rules::has_six_at(pos.board(), Pos::new(4, 3), Stone::White));
}

#[test]
fn test_five_is_not_a_win() {
    let mut pos = Position::new();
    for c in 0..4u8 {
        pos.put_stone(Pos::new(0, c), Stone::White);
    }
    pos.make_move(Move::new(Pos::new(0, 4), Pos::new(18, 18)));
    assert!(!pos.is_game_over());
}

#[test]
fn test_from_board_rebuilds_index() {
    let mut pos = Position::new();
    pos.make_move(Move::new(Pos::new(3, 3), Pos::new(3, 4)));
    pos.make_move(Move::new(Pos::new(4, 3), Pos::new(4, 4)));

    let copy = Position::from_board(pos.board().clone(), pos.side_to_move());
    assert_eq!(copy.side_to_move(), Stone::White);
    for id in 0..pos.roads().len() as RoadId {
        assert_eq!(pos.roads().road(id), copy.roads().road(id));
    }
    assert_eq!(copy.proximity(Pos::new(5, 5)), pos.proximity(Pos::new(5, 5)));
}

#[test]
fn test_reset_restores_initial_position() {
    let mut pos = Position::new();
    pos.make_move(Move::new(Pos::new(3, 3), Pos::new(3, 4)));
    pos.put_stone(Pos::new(0, 0), Stone::Black);
    pos.reset();

    let fresh = Position::new();
    assert_eq!(pos.board(), fresh.board());
    assert_eq!(pos.side_to_move(), Stone::White);
    assert!(pos.history().is_empty());
    assert_eq!(pos.roads().live(Stone::Black, 1).len(), fresh.roads().live(Stone::Black, 1).len());
    assert_eq!(pos.proximity(Pos::new(0, 0)), 0);
}

#[test]
fn test_trial_stones_leave_no_trace() {
    let mut pos = Position::new();
    let cells = [Pos::new(0, 0), Pos::new(0, 1)];
    let fours = pos.with_trial_stones(&cells, Stone::White, |roads| roads.live(Stone::White, 2).len());
    assert_eq!(fours, 1);
    assert!(pos.roads().live(Stone::White, 2).is_empty());
    assert!(pos.is_empty(Pos::new(0, 0)));
}

#[test]
fn test_is_full() {
    let mut board = Board::empty();
    for pos in Board::empty().empty_cells().skip(1) {
        board.set(pos, Stone::Black);
    }
    let pos = Position::from_board(board, Stone::White);
    assert!(pos.is_full());
    assert!(!Position::new().is_full());
}

#[test]
fn test_board_display() {
    let text = Board::new().to_string();
    assert!(text.starts_with("   ABCDEFGHIJKLMNOPQRS"));
    assert!(text.contains("10 ---------x---------"));
}

#[test]
fn test_candidate_cells() {
    let pos = Position::new();
    let cells = pos.candidate_cells();
    // 5x5 box around the center minus the center itself
    assert_eq!(cells.len(), 24);
    assert!(cells.iter().all(|&c| pos.is_empty(c)));

    let empty = Position::from_board(Board::empty(), Stone::White);
    assert_eq!(empty.candidate_cells(), vec![CENTER]);
}
