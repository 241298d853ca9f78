#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use hexecho_core::{CellCoord, GridDims, Rgb};
use hexecho_runtime::{DecayPhase, HexSession, Instant};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Start { row: u8, col: u8 },
    Extend { row: u8, col: u8 },
    End,
    Tick { advance_ms: u16 },
    Debug(bool),
    Resize { half_rows: u8, cols: u8 },
}

fuzz_target!(|ops: Vec<Op>| {
    let mut session = HexSession::default();
    let mut now = Instant::now();
    let mut last_cycle = None;

    for op in ops.into_iter().take(512) {
        match op {
            Op::Start { row, col } => {
                session.on_gesture_start(CellCoord::new(u16::from(row), u16::from(col)), now)
            }
            Op::Extend { row, col } => {
                session.on_gesture_extend(CellCoord::new(u16::from(row), u16::from(col)))
            }
            Op::End => {
                session.on_gesture_end(now);
                let cycle = session.last_cycle();
                assert!(cycle >= last_cycle, "cycle ids went backwards");
                last_cycle = cycle;
            }
            Op::Tick { advance_ms } => {
                now += Duration::from_millis(u64::from(advance_ms));
                session.tick(now);
            }
            Op::Debug(enabled) => session.set_debug(enabled),
            Op::Resize { half_rows, cols } => {
                let rows = u16::from(half_rows % 16) * 2 + 4;
                let cols = u16::from(cols % 61) + 3;
                if let Ok(dims) = GridDims::new(rows, cols) {
                    session.resize(dims);
                }
            }
        }

        assert_eq!(session.cells().len(), session.dims().len());
        for state in session.cells() {
            if state.phase() == DecayPhase::Resting {
                assert_eq!(state.color(), Rgb::BLACK);
                assert_eq!(state.intensity(), 0);
            }
        }
    }
});
