//! End-to-End Session Tests
//!
//! Drives complete machines frame by frame:
//! - Spin requests and balance accounting
//! - Settling and payline evaluation
//! - Signals and frame snapshots

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use reel_core::{
    Grid, PayTiers, PaylineEngine, SlotConfig, SlotMachine, SlotSignal, SpinRequest,
    SymbolAlphabet,
};

const FRAME: Duration = Duration::from_micros(16_667);

// ═══════════════════════════════════════════════════════════════════════════════
// EVALUATION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_worked_example_pays_both_rows() {
    let engine = PaylineEngine::new(Arc::new(SymbolAlphabet::classic()), 1.0, PayTiers::default());
    let grid = Grid::from_rows(&[
        ["c", "c", "c", "c", "c"],
        ["g", "g", "g", "x", "x"],
        ["h", "v", "d", "f", "g"],
    ])
    .unwrap();

    let result = engine.evaluate(&grid).unwrap();

    // row 0: 1 × 1.0 × 4.5, row 1: 1 × 1.5 × 1.0
    assert_eq!(result.lines.len(), 2);
    assert_relative_eq!(result.lines[0].win_amount, 4.5);
    assert_relative_eq!(result.lines[1].win_amount, 1.5);
    assert_relative_eq!(result.total, 6.0);
}

#[test]
fn test_no_run_of_three_pays_nothing() {
    let engine = PaylineEngine::new(Arc::new(SymbolAlphabet::classic()), 1.0, PayTiers::default());
    let grid = Grid::from_rows(&[
        ["c", "g", "h", "f", "d"],
        ["g", "h", "f", "d", "v"],
        ["f", "d", "v", "c", "h"],
    ])
    .unwrap();

    let result = engine.evaluate(&grid).unwrap();
    assert_eq!(result.total, 0.0);
    assert!(result.lines.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// SESSIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_same_seed_replays_identically() {
    let mut a = SlotMachine::seeded(2024).unwrap();
    let mut b = SlotMachine::seeded(2024).unwrap();

    for _ in 0..15 {
        a.request_spin().unwrap();
        b.request_spin().unwrap();
        a.run_until_settled(FRAME).unwrap();
        b.run_until_settled(FRAME).unwrap();

        assert_eq!(a.last_grid(), b.last_grid());
        assert_eq!(a.last_result(), b.last_result());
    }
    assert_eq!(a.balance(), b.balance());
    assert_eq!(a.stats(), b.stats());
}

#[test]
fn test_session_runs_out_of_funds() {
    let config = SlotConfig {
        starting_balance: 3.0,
        ..SlotConfig::seeded(11)
    };
    let mut machine = SlotMachine::new(config).unwrap();

    let mut accepted = 0;
    loop {
        let before = machine.balance();
        match machine.request_spin().unwrap() {
            SpinRequest::Accepted => {
                accepted += 1;
                assert_relative_eq!(machine.balance(), before - 1.0);
                machine.run_until_settled(FRAME).unwrap();
            }
            SpinRequest::InsufficientFunds => {
                assert_eq!(machine.balance(), before);
                assert!(!machine.is_spinning());
                break;
            }
            SpinRequest::SpinInProgress => unreachable!("spins are always settled"),
        }
        assert!(accepted < 10_000, "session never ran dry");
    }

    assert!(machine.balance() < 1.0);
    assert!(machine.balance() >= 0.0);
    assert_eq!(machine.stats().total_spins, accepted);
}

#[test]
fn test_winning_spin_exposes_line_geometry() {
    let mut machine = SlotMachine::seeded(31).unwrap();
    let layout = machine.layout_at(0.0, 0.0);

    let mut found = false;
    for _ in 0..500 {
        machine.request_spin().unwrap();
        machine.run_until_settled(FRAME).unwrap();
        let signals = machine.drain_signals();

        let result = machine.last_result().unwrap();
        if !result.is_win() {
            continue;
        }

        let frame = machine.frame(&layout);
        assert_eq!(frame.winning_lines, result.lines);
        assert_relative_eq!(frame.last_win, result.total);
        for line in &frame.winning_lines {
            let points = layout.line_points(line);
            assert_eq!(points.len(), line.match_count as usize);
            assert_eq!(line.positions[0].reel, 0);
        }

        let expected = if result.total >= 10.0 {
            SlotSignal::BigWin { amount: result.total }
        } else {
            SlotSignal::SmallWin { amount: result.total }
        };
        assert!(signals.contains(&expected));
        found = true;
        break;
    }
    assert!(found, "no winning spin in 500 attempts");
}

#[test]
fn test_reels_at_rest_after_settle() {
    let mut machine = SlotMachine::seeded(5).unwrap();
    machine.request_spin().unwrap();
    let frames = machine.run_until_settled(FRAME).unwrap();

    // last reel lasts 0.1 + 4 × 0.6 s
    assert!(frames >= 140);
    for reel in machine.coordinator().reels() {
        assert!(!reel.is_spinning());
        assert_eq!(reel.offset(), 0.0);
        assert_eq!(reel.scrolled_symbols(), reel.target_symbols());
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_load_shipped_config() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/classic.yaml");
    let config = SlotConfig::load(&path).unwrap();
    assert_eq!(config.symbols.len(), 6);

    let machine = SlotMachine::new(config).unwrap();
    assert_eq!(machine.engine().paylines().len(), 7);
    assert_eq!(machine.balance(), 1000.0);
}
