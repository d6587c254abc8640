//! Piece state machine tests through the public API

use tetraversus::core::{Board, LockCause, Piece, PieceState, RotationSystem, Timing};
use tetraversus::types::{Cell, Command, PieceKind, RotationDirection, SPAWN_POSITION};

fn spawn(kind: PieceKind, timing: Timing) -> (Piece, Board, RotationSystem) {
    let rotation = RotationSystem::srs();
    let piece = Piece::spawn(kind, &rotation, SPAWN_POSITION, timing, 0);
    (piece, Board::new(), rotation)
}

#[test]
fn test_spawn_state() {
    let (piece, board, _) = spawn(PieceKind::S, Timing::default());
    assert_eq!(piece.state(), PieceState::Falling);
    assert_eq!(piece.lock_cause(), None);
    assert_eq!(piece.position(), SPAWN_POSITION);
    assert!(piece.fits(&board));
}

#[test]
fn test_hard_drop_locks_same_tick_regardless_of_lock_delay() {
    for lock_delay_ms in [0, 500, u32::MAX] {
        let timing = Timing {
            lock_delay_ms,
            ..Timing::default()
        };
        let (mut piece, board, rotation) = spawn(PieceKind::T, timing);
        piece.begin_tick(16, 16);
        assert!(piece.apply(&board, &rotation, Command::HardDrop));
        assert!(piece.is_locked());
        assert_eq!(piece.lock_cause(), Some(LockCause::HardDrop));
        assert_eq!(piece.absolute_cells().iter().map(|c| c.y).min(), Some(-10));
    }
}

#[test]
fn test_hard_drop_reports_distance() {
    let (mut piece, board, _) = spawn(PieceKind::O, Timing::default());
    // O bottom row sits at the anchor row
    assert_eq!(piece.hard_drop(&board), 18);
}

#[test]
fn test_locked_piece_ignores_commands() {
    let (mut piece, board, rotation) = spawn(PieceKind::J, Timing::default());
    piece.hard_drop(&board);
    let before = piece.clone();

    piece.begin_tick(5000, 5000);
    for command in [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::RotateCw,
        Command::RotateCcw,
        Command::HardDrop,
    ] {
        piece.apply(&board, &rotation, command);
    }
    assert_eq!(piece.position(), before.position());
    assert_eq!(piece.cells(), before.cells());
}

#[test]
fn test_lateral_moves_stop_at_walls() {
    let (mut piece, board, rotation) = spawn(PieceKind::O, Timing::default());
    let mut now = 0;
    for _ in 0..20 {
        now += 101;
        piece.begin_tick(now, 101);
        piece.apply(&board, &rotation, Command::MoveLeft);
    }
    assert_eq!(piece.absolute_cells().iter().map(|c| c.x).min(), Some(-5));

    for _ in 0..20 {
        now += 101;
        piece.begin_tick(now, 101);
        piece.apply(&board, &rotation, Command::MoveRight);
    }
    assert_eq!(piece.absolute_cells().iter().map(|c| c.x).max(), Some(4));
}

#[test]
fn test_rotation_is_cyclic_on_open_board() {
    let rotation = RotationSystem::srs();
    let board = Board::new();
    for kind in PieceKind::ALL {
        let mut piece = Piece::spawn(kind, &rotation, Cell::new(0, 0), Timing::default(), 0);
        for _ in 0..3 {
            assert!(piece.try_rotate(&board, &rotation, RotationDirection::Clockwise));
        }
        let cells = *piece.cells();
        let orientation = piece.orientation();
        for _ in 0..4 {
            assert!(piece.try_rotate(&board, &rotation, RotationDirection::CounterClockwise));
        }
        assert_eq!(piece.cells(), &cells);
        assert_eq!(piece.orientation(), orientation);
    }
}

#[test]
fn test_rotation_kicks_off_floor() {
    let rotation = RotationSystem::srs();
    let board = Board::new();
    // Flat T resting on the floor: cells at y = -10 and -9
    let mut piece = Piece::spawn(PieceKind::T, &rotation, Cell::new(0, -10), Timing::default(), 0);
    assert!(piece.fits(&board));
    assert!(!piece.try_move(&board, Cell::DOWN));

    // 0 -> 1 unkicked would need y = -11
    assert!(piece.try_rotate(&board, &rotation, RotationDirection::Clockwise));
    assert_eq!(piece.orientation(), 1);
    assert!(piece.fits(&board));
    assert!(piece.absolute_cells().iter().all(|c| c.y >= -10));
}

#[test]
fn test_forced_step_locks_only_after_idle_time() {
    let rotation = RotationSystem::srs();
    let board = Board::new();
    // Flat I already on the floor
    let mut piece = Piece::spawn(PieceKind::I, &rotation, Cell::new(0, -11), Timing::default(), 0);
    assert!(piece.fits(&board));

    // No step due yet, idle time just accumulates
    assert!(!piece.tick(&board, 400, 400));
    assert!(!piece.is_locked());
    assert!(piece.tick(&board, 1001, 601));
    assert_eq!(piece.lock_cause(), Some(LockCause::Step));
}
