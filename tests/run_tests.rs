//! Run controller scenarios - clears, levels, scoring and game over

use std::cell::RefCell;
use std::rc::Rc;

use tetraversus::core::{
    CommandBuffer, KernelConfig, LockCause, RunController, RunReport, MAX_COMMANDS_PER_TICK,
};
use tetraversus::types::{Cell, Command, PieceKind};

struct Harness {
    run: RunController,
    reports: Rc<RefCell<Vec<RunReport>>>,
    level_ups: Rc<RefCell<Vec<u32>>>,
    now: u64,
}

impl Harness {
    fn new(kind: PieceKind) -> Self {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let level_ups = Rc::new(RefCell::new(Vec::new()));
        let (r, l) = (reports.clone(), level_ups.clone());

        let mut run = RunController::builder(KernelConfig::default())
            .piece_source(move || Some(kind))
            .stats_sink(move |report: &RunReport| r.borrow_mut().push(*report))
            .level_up_notifier(move |level: u32| l.borrow_mut().push(level))
            .build()
            .unwrap();
        run.start_run(0);

        Self {
            run,
            reports,
            level_ups,
            now: 0,
        }
    }

    fn tick(&mut self, commands: &[Command]) {
        self.now += 16;
        self.run.tick(self.now, 16, commands);
    }

    fn fill_row_except(&mut self, y: i8, gaps: &[i8]) {
        let b = self.run.board().bounds();
        for x in b.x_min..b.x_max() {
            if !gaps.contains(&x) {
                self.run.board_mut().set(Cell::new(x, y), Some(PieceKind::Z));
            }
        }
    }
}

#[test]
fn test_i_piece_completes_single_row() {
    let mut h = Harness::new(PieceKind::I);
    // Flat I at spawn covers x = -2..=1
    h.fill_row_except(-10, &[-2, -1, 0, 1]);
    h.run.board_mut().set(Cell::new(3, -9), Some(PieceKind::T));

    h.tick(&[Command::HardDrop]);

    let event = h.run.take_last_event().unwrap();
    assert_eq!(event.kind, PieceKind::I);
    assert_eq!(event.lines_cleared, 1);
    assert_eq!(event.level_ups, 0);
    assert_eq!(h.run.board().get(Cell::new(3, -10)), Some(Some(PieceKind::T)));
    assert_eq!(h.run.board().occupied_count(), 1);
    assert_eq!(h.run.stats().lines_cleared(), 1);
    assert_eq!(h.run.stats().score(), 2);
}

#[test]
fn test_vertical_i_clears_four_rows_and_levels_twice() {
    let mut h = Harness::new(PieceKind::I);
    h.tick(&[Command::RotateCw]);
    let column = h.run.active().unwrap().absolute_cells()[0].x;
    assert!(h
        .run
        .active()
        .unwrap()
        .absolute_cells()
        .iter()
        .all(|c| c.x == column));

    for y in -10..-6 {
        h.fill_row_except(y, &[column]);
    }
    h.tick(&[Command::HardDrop]);

    let event = h.run.take_last_event().unwrap();
    assert_eq!(event.lines_cleared, 4);
    assert_eq!(event.level_ups, 2);
    assert_eq!(h.run.board().occupied_count(), 0);
    assert_eq!(h.run.stats().level(), 3);
    assert_eq!(*h.level_ups.borrow(), vec![2, 3]);
}

#[test]
fn test_level_up_every_second_line() {
    let mut h = Harness::new(PieceKind::I);
    let mut levels = Vec::new();

    for _ in 0..4 {
        h.fill_row_except(-10, &[-2, -1, 0, 1]);
        h.tick(&[Command::HardDrop]);
        assert_eq!(h.run.take_last_event().map(|e| e.lines_cleared), Some(1));
        levels.push(h.run.stats().level());
    }

    assert_eq!(levels, vec![1, 2, 2, 3]);
    assert_eq!(*h.level_ups.borrow(), vec![2, 3]);
    assert_eq!(h.run.stats().lines_cleared(), 4);
}

#[test]
fn test_blocked_spawn_ends_run() {
    let mut h = Harness::new(PieceKind::O);
    h.tick(&[Command::HardDrop]);
    assert_eq!(h.run.stats().score(), 2);

    // Every spawn shape covers the anchor or the cell above it
    h.run.board_mut().set(Cell::new(-1, 8), Some(PieceKind::Z));
    h.run.board_mut().set(Cell::new(-1, 9), Some(PieceKind::Z));
    assert!(!h.run.spawn(h.now));

    assert!(h.run.is_game_over());
    assert!(h.run.active().is_none());
    assert_eq!(h.run.board().occupied_count(), 0);

    let reports = h.reports.borrow();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].run_id, 1);
    assert_eq!(reports[0].score, 2);
    assert_eq!(reports[0].level, 1);
    // Failed spawn is still counted
    assert_eq!(reports[0].piece_count(PieceKind::O), 3);

    assert_eq!(h.run.stats().score(), 0);
    assert_eq!(h.run.stats().level(), 1);
}

#[test]
fn test_topping_out_with_hard_drops() {
    let mut h = Harness::new(PieceKind::O);
    let mut drops = 0;
    while !h.run.is_game_over() {
        h.tick(&[Command::HardDrop]);
        drops += 1;
        assert!(drops <= 10, "stack never topped out");
    }

    // Ten O pieces fill the 20 rows of two columns; the eleventh is blocked
    assert_eq!(drops, 10);
    let reports = h.reports.borrow();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].score, 20);
    assert_eq!(reports[0].piece_count(PieceKind::O), 11);
}

#[test]
fn test_game_over_then_new_run() {
    let mut h = Harness::new(PieceKind::T);
    h.tick(&[Command::HardDrop]);
    h.run.game_over();
    assert!(h.run.is_game_over());

    // Ticks after game over do nothing
    let snapshot = h.run.tick(h.now + 16, 16, &[Command::HardDrop]);
    assert!(snapshot.game_over);
    assert!(snapshot.active.is_none());
    assert_eq!(snapshot.score, 0);

    h.run.start_run(h.now);
    assert_eq!(h.run.run_id(), 2);
    assert!(!h.run.is_game_over());
    assert_eq!(h.run.stats().piece_counts().iter().sum::<u32>(), 1);
    assert_eq!(h.run.stats().lines_cleared(), 0);
    assert_eq!(h.reports.borrow().len(), 1);
}

#[test]
fn test_restart_mid_run_reports_previous_run() {
    let mut h = Harness::new(PieceKind::S);
    h.tick(&[Command::HardDrop]);
    h.run.start_run(h.now);

    let reports = h.reports.borrow();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].run_id, 1);
    assert_eq!(reports[0].score, 2);
}

#[test]
fn test_gravity_lock_awards_one_point() {
    let mut h = Harness::new(PieceKind::O);
    let mut ticks = 0;
    let event = loop {
        h.tick(&[]);
        ticks += 1;
        if let Some(event) = h.run.take_last_event() {
            break event;
        }
        assert!(ticks < 5_000, "piece never locked");
    };

    assert_eq!(event.cause, LockCause::Step);
    assert_eq!(h.run.stats().score(), 1);
    // 18 forced steps to reach the floor, one more to lock
    assert!(h.now > 18 * 1000);
    assert!(h.now < 20 * 1000 + 100);
}

#[test]
fn test_soft_drop_postpones_forced_step() {
    let mut h = Harness::new(PieceKind::T);
    // Let the move delay expire
    for _ in 0..7 {
        h.tick(&[]);
    }
    let y0 = h.run.active().unwrap().position().y;
    h.tick(&[Command::SoftDrop]);
    assert_eq!(h.run.active().unwrap().position().y, y0 - 1);

    // The step due at 1000ms is pushed back by the soft drop
    while h.now < 1100 {
        h.tick(&[]);
    }
    assert_eq!(h.run.active().unwrap().position().y, y0 - 1);
}

#[test]
fn test_move_delay_gates_repeated_moves() {
    let mut h = Harness::new(PieceKind::T);
    let x0 = h.run.active().unwrap().position().x;

    // Within the first 100ms every lateral command is ignored
    for _ in 0..6 {
        h.tick(&[Command::MoveLeft]);
    }
    assert_eq!(h.run.active().unwrap().position().x, x0);

    h.tick(&[Command::MoveLeft]);
    assert_eq!(h.run.active().unwrap().position().x, x0 - 1);

    // Next tick is still inside the move delay
    h.tick(&[Command::MoveLeft]);
    assert_eq!(h.run.active().unwrap().position().x, x0 - 1);
}

#[test]
fn test_soft_drop_and_side_move_in_one_tick() {
    let mut h = Harness::new(PieceKind::T);
    h.now = 200;
    h.run.tick(h.now, 200, &[Command::SoftDrop, Command::MoveLeft]);
    assert_eq!(h.run.active().unwrap().position(), Cell::new(-2, 7));

    // Gate is closed again for the following tick
    h.tick(&[Command::MoveLeft]);
    assert_eq!(h.run.active().unwrap().position(), Cell::new(-2, 7));
}

#[test]
fn test_commands_in_buffer_apply_in_order() {
    let mut h = Harness::new(PieceKind::O);
    let mut commands = CommandBuffer::new();
    commands.push(Command::HardDrop);
    commands.push(Command::RotateCw);
    commands.push(Command::HardDrop);
    assert!(commands.len() <= MAX_COMMANDS_PER_TICK);

    h.tick(&commands);
    assert_eq!(h.run.stats().score(), 4);
    assert_eq!(h.run.board().occupied_count(), 8);
}

#[test]
fn test_snapshot_matches_controller() {
    let mut h = Harness::new(PieceKind::L);
    h.tick(&[Command::HardDrop]);

    let mut reused = h.run.snapshot();
    h.run.snapshot_into(&mut reused);
    assert_eq!(reused.score, 2);
    assert_eq!(reused.piece_counts[PieceKind::L.index()], 2);
    assert_eq!(reused.tiles.iter().filter(|t| t.is_some()).count(), 4);
    assert_eq!(reused.active.map(|a| a.kind), Some(PieceKind::L));
    assert!(reused.playable());
}

#[test]
fn test_unavailable_source_falls_back() {
    let mut calls = 0;
    let mut run = RunController::builder(KernelConfig {
        seed: Some(11),
        ..KernelConfig::default()
    })
    .piece_source(move || {
        calls += 1;
        (calls % 2 == 0).then_some(PieceKind::Z)
    })
    .build()
    .unwrap();

    run.start_run(0);
    let mut now = 0;
    for _ in 0..6 {
        now += 16;
        run.tick(now, 16, &[Command::HardDrop]);
    }
    let total: u32 = run.stats().piece_counts().iter().sum();
    assert_eq!(total, 7);
    assert!(run.stats().piece_count(PieceKind::Z) >= 3);
}
