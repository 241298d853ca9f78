#![forbid(unsafe_code)]

//! End-to-end: drag a ring, watch it fade, echo and vanish.
//!
//! Run:
//!   cargo test -p hexecho-runtime --test e2e_ring_cycle

use std::time::Duration;

use hexecho_core::color::DEFAULT_PALETTE;
use hexecho_core::{CellCoord, Rgb};
use hexecho_runtime::{CycleId, DecayPhase, GestureOutcome, HexSession, Instant};

const FRAME: Duration = Duration::from_millis(16);

fn drag(session: &mut HexSession, cells: &[CellCoord], now: Instant) -> GestureOutcome {
    session.on_gesture_start(cells[0], now);
    for &cell in &cells[1..] {
        session.on_gesture_extend(cell);
    }
    session.on_gesture_end(now)
}

/// Tick every frame from `from` up to and including `until`.
fn run(session: &mut HexSession, from: Instant, until: Instant) {
    let mut now = from;
    while now <= until {
        session.tick(now);
        now += FRAME;
    }
}

#[test]
fn ring_lights_fades_and_rests_before_first_echo() {
    let mut session = HexSession::default();
    let t0 = Instant::now();
    let ring = session.graph().ring_around(CellCoord::new(4, 16));

    let outcome = drag(&mut session, &ring, t0);
    assert!(outcome.is_valid());
    let GestureOutcome::Accepted { cycle, cells } = outcome else {
        unreachable!()
    };
    assert_eq!(cycle, CycleId(1));
    assert_eq!(cells, ring.to_vec());

    for &cell in &ring {
        let state = session.cell(cell).unwrap();
        assert_eq!(state.phase(), DecayPhase::Decaying);
        assert_eq!(state.driving_cycle(), Some(cycle));
        assert_eq!(state.color(), DEFAULT_PALETTE[0]);
        assert_eq!(state.intensity(), 255);
        assert_eq!(state.history().len(), 1);
    }

    // 224 / 2 = 112 decay ticks after the 300ms grace: done well before 4s.
    run(&mut session, t0 + FRAME, t0 + Duration::from_millis(3000));
    assert!(session.scheduler().next_due().unwrap() > t0 + Duration::from_millis(3000));
    for &cell in &ring {
        let state = session.cell(cell).unwrap();
        assert_eq!(state.color(), Rgb::BLACK, "{cell} still lit");
        assert_eq!(state.intensity(), 0);
        assert_eq!(state.phase(), DecayPhase::Resting);
    }
}

#[test]
fn first_echo_relights_at_half_intensity() {
    let mut session = HexSession::default();
    let t0 = Instant::now();
    let ring = session.graph().ring_around(CellCoord::new(4, 16));
    drag(&mut session, &ring, t0);

    let report = session.tick(t0 + Duration::from_millis(4000));
    assert_eq!(report.echoes_applied, 6);
    for &cell in &ring {
        let state = session.cell(cell).unwrap();
        assert_eq!(state.intensity(), 128);
        assert_eq!(state.color(), DEFAULT_PALETTE[0].scaled(128));
        assert_eq!(state.last_echo_at(), Some(t0 + Duration::from_millis(4000)));
    }
}

#[test]
fn repeated_cycle_advances_palette_and_id() {
    let mut session = HexSession::default();
    let t0 = Instant::now();
    let ring = session.graph().ring_around(CellCoord::new(4, 16));

    let mut last = CycleId(0);
    for (round, expected) in DEFAULT_PALETTE.iter().chain(&DEFAULT_PALETTE[..1]).enumerate() {
        let now = t0 + Duration::from_millis(round as u64 * 500);
        let GestureOutcome::Accepted { cycle, .. } = drag(&mut session, &ring, now) else {
            panic!("round {round} rejected");
        };
        assert!(cycle > last);
        last = cycle;
        for &cell in &ring {
            assert_eq!(session.cell(cell).unwrap().color(), *expected, "round {round}");
        }
    }
    let history = session.cell(ring[0]).unwrap().history();
    assert_eq!(history.len(), 5);
    assert!(history.windows(2).all(|w| w[0].cycle < w[1].cycle));
}

#[test]
fn older_echo_yields_to_brighter_newer_cycle() {
    let mut session = HexSession::default();
    let t0 = Instant::now();
    let first = session.graph().ring_around(CellCoord::new(4, 16));
    let second = session.graph().ring_around(CellCoord::new(4, 17));
    let shared: Vec<_> = first.iter().filter(|c| second.contains(c)).copied().collect();
    assert_eq!(shared.len(), 2);

    drag(&mut session, &first, t0);
    drag(&mut session, &second, t0 + Duration::from_millis(3900));

    let report = session.tick(t0 + Duration::from_millis(4000));
    assert_eq!(report.echoes_suppressed, shared.len());
    assert_eq!(report.echoes_applied, first.len() - shared.len());
    for cell in &shared {
        let state = session.cell(*cell).unwrap();
        assert_eq!(state.driving_cycle(), Some(CycleId(2)));
        assert_eq!(state.intensity(), 255);
    }
    // Suppressed chains keep running.
    assert_eq!(session.scheduler().len(), 12);
}

#[test]
fn echo_chains_end_after_eight_firings() {
    let mut session = HexSession::default();
    let t0 = Instant::now();
    let ring = session.graph().ring_around(CellCoord::new(2, 8));
    drag(&mut session, &ring, t0);

    let mut applied = 0;
    let mut expired = 0;
    for k in 1..=10u32 {
        let report = session.tick(t0 + Duration::from_millis(4000) * k);
        applied += report.echoes_applied;
        expired += report.echoes_expired;
    }
    assert_eq!(applied, 6 * 7);
    assert_eq!(expired, 6);
    assert!(session.scheduler().is_empty());
}

#[test]
fn cycle_ids_strictly_increase_for_overlapping_cycles() {
    let mut session = HexSession::default();
    let t0 = Instant::now();
    let centers = [(4, 16), (4, 17), (5, 16), (4, 16), (3, 16)];
    let mut ids = Vec::new();
    for (i, (r, c)) in centers.into_iter().enumerate() {
        let ring = session.graph().ring_around(CellCoord::new(r, c));
        let now = t0 + FRAME * i as u32;
        match drag(&mut session, &ring, now) {
            GestureOutcome::Accepted { cycle, .. } => ids.push(cycle),
            other => panic!("{other:?}"),
        }
        session.tick(now);
    }
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(session.last_cycle(), ids.last().copied());
}
