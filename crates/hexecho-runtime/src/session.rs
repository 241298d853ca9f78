#![forbid(unsafe_code)]

//! The session object: one grid, its cells, the live drag and the clock.
//!
//! [`HexSession`] is what an input/render loop talks to. Pointer events go in
//! through the `on_gesture_*` calls, the loop calls [`HexSession::tick`] once
//! per frame, and the renderer reads [`CellState`]s back out.
//!
//! # Tick order
//!
//! 1. Flash toggles that came due.
//! 2. Echo records that came due, earliest first (re-armed ones included).
//! 3. One decay step for every cell.
//!
//! # Invariants
//!
//! 1. Cycle ids are handed out in strictly increasing order and never reused,
//!    not even across [`HexSession::resize`].
//! 2. Only one gesture is active; starting a gesture drops any unterminated
//!    selection and finishes a pending flash.
//! 3. All cells of one accepted cycle are updated in the same call.
//!
//! # Failure Modes
//!
//! [`HexSession::new`] refuses a [`SessionConfig`] whose echo chains could
//! run forever or whose timers could never advance. Past construction,
//! gesture calls with coordinates outside the grid are ignored and nothing
//! in the gesture or tick path returns an error; the only negative outcome
//! is a rejected selection.

use hexecho_core::{
    CellCoord, GridDims, HexGraph, HexLayout, Palette, Point, Rejection, SelectionTracker,
    Sensitivity, check_cycle, degree_classes,
};
use tracing::{debug, debug_span, info, trace};
use web_time::Instant;

use crate::decay::{CellState, CycleId, DebugTuning, DecayConfig, DecayStep};
use crate::policy_config::ConfigError;
use crate::echo_scheduler::{EchoConfig, EchoFiring, EchoScheduler};
use crate::flash::{Flash, FlashConfig, FlashStep};

/// Everything a session needs at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub dims: GridDims,
    pub sensitivity: Sensitivity,
    pub palette: Palette,
    pub decay: DecayConfig,
    pub echo: EchoConfig,
    pub flash: FlashConfig,
    pub debug: DebugTuning,
    /// Start with debug speed-ups applied.
    pub debug_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dims: GridDims::default(),
            sensitivity: Sensitivity::default(),
            palette: Palette::default(),
            decay: DecayConfig::default(),
            echo: EchoConfig::default(),
            flash: FlashConfig::default(),
            debug: DebugTuning::default(),
            debug_enabled: false,
        }
    }
}

impl SessionConfig {
    /// Check every timing and attenuation range. An empty list means the
    /// config is valid. Grid size and sensitivity are checked by their own
    /// constructors.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        validate_tuning(&self.decay, &self.echo, &self.flash, &self.debug)
    }
}

pub(crate) fn validate_tuning(
    decay: &DecayConfig,
    echo: &EchoConfig,
    flash: &FlashConfig,
    debug: &DebugTuning,
) -> Vec<String> {
    let mut errors = Vec::new();
    if decay.rate_per_tick == 0 {
        errors.push("decay.rate_per_tick must be > 0".into());
    }
    errors.extend(echo.validate());
    if flash.interval.is_zero() {
        errors.push("flash.interval must be > 0".into());
    }
    if debug.decay_multiplier == 0 {
        errors.push("debug.decay_multiplier must be > 0".into());
    }
    if debug.echo_period_divisor == 0 {
        errors.push("debug.echo_period_divisor must be > 0".into());
    }
    errors
}

/// Verdict on a finished gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// No gesture was active, or it selected nothing.
    Idle,
    /// The selection closed a cycle; its cells now carry `cycle`.
    Accepted {
        cycle: CycleId,
        cells: Vec<CellCoord>,
    },
    /// The selection is flashing and will clear itself.
    Rejected(Rejection),
}

impl GestureOutcome {
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// What one [`HexSession::tick`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Echoes that re-lit a cell.
    pub echoes_applied: usize,
    /// Echoes skipped because a newer cycle holds the cell brighter.
    pub echoes_suppressed: usize,
    /// Echo chains that reached the visibility floor.
    pub echoes_expired: usize,
    /// Cells that faded one step.
    pub cells_faded: usize,
    /// Cells that reached rest on this tick.
    pub cells_rested: usize,
    /// Flash highlight toggles that came due.
    pub flash_toggles: u32,
    /// The pending flash ended and its cells were cleared.
    pub flash_finished: bool,
}

impl TickReport {
    /// Whether any visible state changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.echoes_applied > 0
            || self.cells_faded > 0
            || self.cells_rested > 0
            || self.flash_toggles > 0
            || self.flash_finished
    }
}

/// Grid, cells, selection, echoes and flash for one interactive surface.
#[derive(Debug)]
pub struct HexSession {
    config: SessionConfig,
    graph: HexGraph,
    cells: Vec<CellState>,
    selection: SelectionTracker,
    scheduler: EchoScheduler,
    flash: Option<Flash>,
    last_cycle: u64,
    debug: bool,
}

impl Default for HexSession {
    fn default() -> Self {
        Self::build(SessionConfig::default())
    }
}

impl HexSession {
    /// Create a session, rejecting configs that [`SessionConfig::validate`]
    /// flags.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        Ok(Self::build(config))
    }

    fn build(config: SessionConfig) -> Self {
        let graph = HexGraph::new(config.dims);
        let cells = vec![CellState::default(); config.dims.len()];
        let debug = config.debug_enabled;
        Self {
            config,
            graph,
            cells,
            selection: SelectionTracker::new(),
            scheduler: EchoScheduler::new(),
            flash: None,
            last_cycle: 0,
            debug,
        }
    }

    // --- Accessors ---------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn dims(&self) -> GridDims {
        self.config.dims
    }

    #[inline]
    #[must_use]
    pub fn graph(&self) -> &HexGraph {
        &self.graph
    }

    /// State of `cell`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&CellState> {
        if !self.config.dims.contains(cell) {
            return None;
        }
        self.cells.get(self.config.dims.index_of(cell))
    }

    /// Every cell in row-major order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Cells of the gesture in progress.
    #[inline]
    #[must_use]
    pub fn selection(&self) -> &[CellCoord] {
        self.selection.current()
    }

    #[inline]
    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.selection.is_active()
    }

    #[inline]
    #[must_use]
    pub fn scheduler(&self) -> &EchoScheduler {
        &self.scheduler
    }

    #[inline]
    #[must_use]
    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    /// Id of the most recent accepted cycle.
    #[must_use]
    pub fn last_cycle(&self) -> Option<CycleId> {
        (self.last_cycle > 0).then_some(CycleId(self.last_cycle))
    }

    #[inline]
    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, enabled: bool) {
        if self.debug != enabled {
            debug!(target: "hexecho.session", enabled, "debug mode toggled");
        }
        self.debug = enabled;
    }

    /// Decay parameters currently in effect.
    #[must_use]
    pub fn decay_config(&self) -> DecayConfig {
        self.config.decay.effective(self.debug_tuning())
    }

    /// Echo parameters currently in effect.
    #[must_use]
    pub fn echo_config(&self) -> EchoConfig {
        self.config.echo.effective(self.debug_tuning())
    }

    fn debug_tuning(&self) -> Option<&DebugTuning> {
        self.debug.then_some(&self.config.debug)
    }

    /// Resolve a canvas point to a cell with the configured sensitivity.
    #[must_use]
    pub fn resolve(&self, layout: &HexLayout, point: Point) -> Option<CellCoord> {
        if layout.dims() != self.config.dims {
            return None;
        }
        layout.cell_at(point, self.config.sensitivity)
    }

    // --- Gestures ----------------------------------------------------------

    /// Begin a drag at `cell`.
    pub fn on_gesture_start(&mut self, cell: CellCoord, now: Instant) {
        if let Some(flash) = self.flash.take() {
            self.clear_highlights(flash.cells());
        }
        let stale = self.selection.end();
        self.clear_highlights(&stale);

        self.selection.begin();
        debug!(target: "hexecho.session", %cell, dropped = stale.len(), "gesture begin");
        self.on_gesture_extend(cell);
    }

    /// Add `cell` to the drag. Ignored while idle, outside the grid, or when
    /// `cell` repeats the previous entry.
    pub fn on_gesture_extend(&mut self, cell: CellCoord) {
        if !self.config.dims.contains(cell) {
            trace!(target: "hexecho.session", %cell, "extend outside grid ignored");
            return;
        }
        if self.selection.extend(cell) {
            self.refresh_highlights();
        }
    }

    /// Finish the drag and apply the verdict.
    pub fn on_gesture_end(&mut self, now: Instant) -> GestureOutcome {
        if !self.selection.is_active() {
            return GestureOutcome::Idle;
        }
        let sequence = self.selection.end();
        debug!(target: "hexecho.session", len = sequence.len(), "gesture end");
        if sequence.is_empty() {
            return GestureOutcome::Idle;
        }

        match check_cycle(&sequence, &self.graph) {
            Ok(()) => {
                let cycle = self.apply_cycle(&sequence, now);
                info!(
                    target: "hexecho.session",
                    cycle = cycle.0,
                    len = sequence.len(),
                    "cycle accepted"
                );
                GestureOutcome::Accepted {
                    cycle,
                    cells: sequence,
                }
            }
            Err(reason) => {
                debug!(target: "hexecho.session", %reason, "cycle rejected");
                let mut flash = Flash::start(sequence, now, &self.config.flash);
                let step = flash.advance(now);
                self.apply_flash_step(&flash, step);
                if !step.finished {
                    self.flash = Some(flash);
                }
                GestureOutcome::Rejected(reason)
            }
        }
    }

    fn apply_cycle(&mut self, sequence: &[CellCoord], now: Instant) -> CycleId {
        self.last_cycle += 1;
        let cycle = CycleId(self.last_cycle);
        let period = self.echo_config().period;
        let dims = self.config.dims;
        for &coord in sequence {
            let state = &mut self.cells[dims.index_of(coord)];
            state.clear_highlight();
            let slot = self.config.palette.next_slot(state.slot());
            let color = self.config.palette.color(slot);
            let event = state.apply_cycle(cycle, slot, color, now);
            self.scheduler.arm(coord, event, period);
        }
        cycle
    }

    // --- Clock -------------------------------------------------------------

    /// Advance flash, echoes and decay to `now`.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let _span = debug_span!("hexecho.tick", pending_echoes = self.scheduler.len()).entered();
        let mut report = TickReport::default();

        if let Some(mut flash) = self.flash.take() {
            let step = flash.advance(now);
            self.apply_flash_step(&flash, step);
            report.flash_toggles = step.toggles;
            report.flash_finished = step.finished;
            if !step.finished {
                self.flash = Some(flash);
            }
        }

        self.fire_echoes(now, &mut report);

        let decay = self.decay_config();
        for state in &mut self.cells {
            match state.decay_step(&decay, now) {
                DecayStep::Faded => report.cells_faded += 1,
                DecayStep::Rested => report.cells_rested += 1,
                DecayStep::Idle | DecayStep::Held => {}
            }
        }

        report
    }

    fn fire_echoes(&mut self, now: Instant, report: &mut TickReport) {
        let echo = self.echo_config();
        let dims = self.config.dims;
        while let Some(record) = self.scheduler.pop_due(now) {
            match echo.fire(record.ordinal) {
                EchoFiring::Visible { ordinal, intensity } => {
                    let color = self.config.palette.color(record.event.slot);
                    let state = &mut self.cells[dims.index_of(record.cell)];
                    let applied = state.apply_echo(&record.event, color, intensity, now);
                    trace!(
                        target: "hexecho.echo",
                        cell = %record.cell,
                        cycle = record.event.cycle.0,
                        ordinal,
                        intensity,
                        applied,
                        "echo fired"
                    );
                    if applied {
                        report.echoes_applied += 1;
                    } else {
                        report.echoes_suppressed += 1;
                    }
                    self.scheduler.rearm(&record, echo.period);
                }
                EchoFiring::Expired { ordinal } => {
                    trace!(
                        target: "hexecho.echo",
                        cell = %record.cell,
                        cycle = record.event.cycle.0,
                        ordinal,
                        "echo chain expired"
                    );
                    report.echoes_expired += 1;
                }
            }
        }
    }

    /// Rebuild graph and cells for new dimensions. Pending echoes, the live
    /// selection and any flash are dropped; cycle ids keep counting.
    pub fn resize(&mut self, dims: GridDims) {
        info!(target: "hexecho.session", from = %self.config.dims, to = %dims, "grid resized");
        self.config.dims = dims;
        self.graph = HexGraph::new(dims);
        self.cells = vec![CellState::default(); dims.len()];
        self.selection.end();
        self.scheduler.clear();
        self.flash = None;
    }

    // --- Highlights --------------------------------------------------------

    fn refresh_highlights(&mut self) {
        let dims = self.config.dims;
        let sequence = self.selection.current();
        let classes = degree_classes(sequence, &self.graph);
        for (&coord, class) in sequence.iter().zip(classes) {
            self.cells[dims.index_of(coord)].set_highlight(true, class.highlight());
        }
    }

    fn clear_highlights(&mut self, coords: &[CellCoord]) {
        let dims = self.config.dims;
        for &coord in coords {
            if dims.contains(coord) {
                self.cells[dims.index_of(coord)].clear_highlight();
            }
        }
    }

    fn apply_flash_step(&mut self, flash: &Flash, step: FlashStep) {
        if step.finished {
            self.clear_highlights(flash.cells());
            return;
        }
        if step.toggles % 2 == 1 {
            let dims = self.config.dims;
            for &coord in flash.cells() {
                self.cells[dims.index_of(coord)].toggle_highlight();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::decay::DecayPhase;
    use hexecho_core::color::{HIGHLIGHT_EXACT, HIGHLIGHT_OVER, HIGHLIGHT_UNDER};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drag(session: &mut HexSession, cells: &[CellCoord], now: Instant) -> GestureOutcome {
        session.on_gesture_start(cells[0], now);
        for &cell in &cells[1..] {
            session.on_gesture_extend(cell);
        }
        session.on_gesture_end(now)
    }

    #[test]
    fn new_rejects_unbounded_echo_config() {
        let config = SessionConfig {
            echo: EchoConfig {
                period: Duration::ZERO,
                decay_factor: 1.0,
                visibility_floor: 1.0,
            },
            ..SessionConfig::default()
        };
        match HexSession::new(config) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 2, "{errors:?}");
                assert!(errors.iter().any(|e| e.contains("echo.period")));
                assert!(errors.iter().any(|e| e.contains("echo.decay_factor")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn new_rejects_non_attenuating_factor() {
        let config = SessionConfig {
            echo: EchoConfig {
                period: ms(100),
                decay_factor: 1.0,
                visibility_floor: 1.0,
            },
            ..SessionConfig::default()
        };
        assert!(matches!(HexSession::new(config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn new_rejects_zero_timers() {
        let config = SessionConfig {
            decay: DecayConfig {
                rate_per_tick: 0,
                ..DecayConfig::default()
            },
            flash: FlashConfig {
                interval: Duration::ZERO,
                count: 2,
            },
            ..SessionConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(HexSession::new(config).is_err());
        assert!(HexSession::new(SessionConfig::default()).is_ok());
    }

    #[test]
    fn every_chain_ends_on_a_valid_session() {
        let config = SessionConfig {
            echo: EchoConfig {
                period: ms(100),
                decay_factor: 0.99,
                visibility_floor: 1.0,
            },
            ..SessionConfig::default()
        };
        let mut s = HexSession::new(config).unwrap();
        let t0 = Instant::now();
        let ring = s.graph().ring_around(CellCoord::new(4, 16));
        assert!(drag(&mut s, &ring, t0).is_valid());
        let mut expired = 0;
        for k in 1..=2000u32 {
            expired += s.tick(t0 + ms(100) * k).echoes_expired;
        }
        assert!(s.scheduler().is_empty());
        assert_eq!(expired, ring.len());
    }

    #[test]
    fn end_without_start_is_idle() {
        let mut s = HexSession::default();
        assert_eq!(s.on_gesture_end(Instant::now()), GestureOutcome::Idle);
        s.on_gesture_extend(CellCoord::new(1, 1));
        assert!(s.selection().is_empty());
    }

    #[test]
    fn start_outside_grid_selects_nothing() {
        let mut s = HexSession::default();
        let t0 = Instant::now();
        s.on_gesture_start(CellCoord::new(100, 100), t0);
        assert!(s.is_selecting());
        assert!(s.selection().is_empty());
        assert_eq!(s.on_gesture_end(t0), GestureOutcome::Idle);
    }

    #[test]
    fn drag_highlights_by_degree() {
        let mut s = HexSession::default();
        let t0 = Instant::now();
        let a = CellCoord::new(4, 16);
        let b = CellCoord::new(4, 17);
        let c = CellCoord::new(4, 18);
        s.on_gesture_start(a, t0);
        s.on_gesture_extend(b);
        s.on_gesture_extend(c);
        assert_eq!(s.cell(a).unwrap().highlight_color(), HIGHLIGHT_UNDER);
        assert_eq!(s.cell(b).unwrap().highlight_color(), HIGHLIGHT_EXACT);
        s.on_gesture_extend(CellCoord::new(5, 17));
        assert_eq!(s.cell(b).unwrap().highlight_color(), HIGHLIGHT_OVER);
        assert!(s.cell(c).unwrap().is_highlighted());
    }

    #[test]
    fn accepted_cycle_clears_highlight_and_lights_cells() {
        let mut s = HexSession::default();
        let t0 = Instant::now();
        let ring = s.graph().ring_around(CellCoord::new(4, 16));
        let outcome = drag(&mut s, &ring, t0);
        assert!(outcome.is_valid());
        for &cell in &ring {
            let state = s.cell(cell).unwrap();
            assert!(!state.is_highlighted());
            assert_eq!(state.phase(), DecayPhase::Decaying);
            assert_eq!(state.driving_cycle(), Some(CycleId(1)));
        }
        assert_eq!(s.scheduler().len(), 6);
        assert_eq!(s.last_cycle(), Some(CycleId(1)));
    }

    #[test]
    fn rejected_selection_flashes_then_clears() {
        let mut s = HexSession::default();
        let t0 = Instant::now();
        let path = [CellCoord::new(2, 2), CellCoord::new(2, 3), CellCoord::new(2, 4)];
        let outcome = drag(&mut s, &path, t0);
        assert_eq!(outcome, GestureOutcome::Rejected(Rejection::TooShort { len: 3 }));
        // First toggle is immediate: highlighted during drag, now off.
        assert!(!s.cell(path[0]).unwrap().is_highlighted());

        let r = s.tick(t0 + ms(200));
        assert_eq!(r.flash_toggles, 1);
        assert!(s.cell(path[0]).unwrap().is_highlighted());

        let r = s.tick(t0 + ms(600));
        assert!(r.flash_finished);
        assert!(s.flash().is_none());
        for &cell in &path {
            let state = s.cell(cell).unwrap();
            assert!(!state.is_highlighted());
            assert_eq!(state.highlight_color(), HIGHLIGHT_EXACT);
            assert_eq!(state.phase(), DecayPhase::Resting);
        }
    }

    #[test]
    fn new_gesture_finishes_pending_flash() {
        let mut s = HexSession::default();
        let t0 = Instant::now();
        let path = [CellCoord::new(2, 2), CellCoord::new(2, 3)];
        drag(&mut s, &path, t0);
        assert!(s.flash().is_some());
        s.on_gesture_start(CellCoord::new(6, 6), t0 + ms(50));
        assert!(s.flash().is_none());
        assert!(!s.cell(path[1]).unwrap().is_highlighted());
        assert!(s.cell(CellCoord::new(6, 6)).unwrap().is_highlighted());
    }

    #[test]
    fn restart_drops_unterminated_selection() {
        let mut s = HexSession::default();
        let t0 = Instant::now();
        s.on_gesture_start(CellCoord::new(1, 1), t0);
        s.on_gesture_extend(CellCoord::new(1, 2));
        s.on_gesture_start(CellCoord::new(5, 5), t0);
        assert_eq!(s.selection(), &[CellCoord::new(5, 5)]);
        assert!(!s.cell(CellCoord::new(1, 2)).unwrap().is_highlighted());
    }

    #[test]
    fn debug_mode_speeds_decay_and_echo() {
        let mut s = HexSession::default();
        assert_eq!(s.decay_config().rate_per_tick, 2);
        s.set_debug(true);
        assert!(s.is_debug());
        assert_eq!(s.decay_config().rate_per_tick, 10);
        assert_eq!(s.echo_config().period, ms(1000));
    }

    #[test]
    fn resize_resets_cells_but_not_ids() {
        let mut s = HexSession::default();
        let t0 = Instant::now();
        let ring = s.graph().ring_around(CellCoord::new(4, 16));
        drag(&mut s, &ring, t0);
        s.resize(GridDims::new(10, 12).unwrap());
        assert_eq!(s.cells().len(), 120);
        assert!(s.scheduler().is_empty());
        assert!(s.cell(CellCoord::new(4, 16)).is_none());

        let ring = s.graph().ring_around(CellCoord::new(4, 6));
        match drag(&mut s, &ring, t0 + ms(10)) {
            GestureOutcome::Accepted { cycle, .. } => assert_eq!(cycle, CycleId(2)),
            other => panic!("expected accepted, got {other:?}"),
        }
    }

    #[test]
    fn resolve_uses_configured_sensitivity() {
        let s = HexSession::default();
        let layout = HexLayout::fit(s.dims(), 1200.0, 600.0, 40.0);
        let cell = CellCoord::new(3, 7);
        assert_eq!(s.resolve(&layout, layout.center_of(cell)), Some(cell));
        let other = HexLayout::fit(GridDims::new(4, 4).unwrap(), 1200.0, 600.0, 40.0);
        assert_eq!(s.resolve(&other, other.center_of(cell)), None);
    }
}
