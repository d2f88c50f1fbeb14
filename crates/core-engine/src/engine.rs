//! The per-policy sequencing engine and its tick loop.

use crate::Scorer;
use core_model::{Body, BodyId, BufferBank, Color, LineId, Oven};
use core_policy::{O1Placement, O2Placement, SequencerPolicy, StagedRelease};
use tracing::{debug, info, trace};

/// Timing constants feeding the scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Simulated seconds of base processing per body.
    pub base_seconds_per_body: f64,
    /// Seconds added once per O1 body placed into the O2-preferred group.
    pub o1_cross_penalty: f64,
    /// Seconds added once per color change on the main conveyor.
    pub color_change_penalty: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            base_seconds_per_body: 1.0,
            o1_cross_penalty: 1.0,
            color_change_penalty: 1.0,
        }
    }
}

/// Mutable engine bookkeeping outside the bank and scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineState {
    /// Bodies minted so far; the next body takes `body_counter + 1`.
    pub body_counter: u64,
    /// Color of the body most recently released onto the conveyor.
    pub last_conveyor_color: Option<Color>,
}

/// One entry of the main-conveyor history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConveyorEntry {
    pub body_id: BodyId,
    pub color: Color,
    pub source_line: LineId,
    pub caused_color_change: bool,
}

/// Everything that happened during a single tick, for callers that log or
/// display per-cycle activity.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub o1: O1Placement,
    pub o2: O2Placement,
    pub released: Option<StagedRelease>,
    pub extracted: Option<ConveyorEntry>,
}

/// A buffer bank, a policy, and the scoring around them.
///
/// The engine is a plain value: the owner (CLI, dashboard, test) drives
/// `tick` and reads state between ticks. Operator gate toggles go through
/// [`Engine::set_input_open`]/[`Engine::set_output_open`] between ticks,
/// which serializes them with the tick loop by construction.
#[derive(Debug)]
pub struct Engine<P> {
    label: &'static str,
    bank: BufferBank,
    policy: P,
    state: EngineState,
    scorer: Scorer,
    timing: Timing,
    conveyor_log: Vec<ConveyorEntry>,
    overflow_drops: u64,
}

impl<P: SequencerPolicy> Engine<P> {
    /// Engine with reference capacities and timing.
    pub fn new(label: &'static str, policy: P) -> Self {
        Self::with_config(label, policy, Timing::default(), BufferBank::new())
    }

    pub fn with_config(label: &'static str, policy: P, timing: Timing, bank: BufferBank) -> Self {
        Self {
            label,
            bank,
            policy,
            state: EngineState::default(),
            scorer: Scorer::new(),
            timing,
            conveyor_log: Vec::new(),
            overflow_drops: 0,
        }
    }

    /// Run one cycle with the given oven colors.
    pub fn tick(&mut self, o1_color: Color, o2_color: Color) -> TickOutcome {
        let body_o1 = self.mint(o1_color, Oven::O1);
        let body_o2 = self.mint(o2_color, Oven::O2);
        trace!(
            target: "engine.tick",
            engine = self.label,
            o1 = %body_o1,
            o2 = %body_o2,
            "tick start"
        );

        // Staged bodies get first claim on O2 slots, ahead of this tick's
        // arrival. The policy refuses internally while O2 is blocked.
        let released = self.policy.drain_staged_once(&mut self.bank);

        let o1 = self.policy.place_o1(&mut self.bank, body_o1);
        if o1.penalized {
            self.scorer.record_o1_cross(self.timing.o1_cross_penalty);
        }
        if o1.line.is_none() {
            self.overflow_drops += 1;
            debug!(target: "engine.tick", engine = self.label, "o1 overflow drop");
        }

        let o2 = self.policy.place_o2(&mut self.bank, body_o2);
        if o2 == O2Placement::Refused {
            self.overflow_drops += 1;
            debug!(target: "engine.tick", engine = self.label, "o2 overflow drop");
        }

        let extracted = self.extract_once();
        self.scorer.update_jph(self.timing.base_seconds_per_body);

        TickOutcome {
            o1,
            o2,
            released,
            extracted,
        }
    }

    fn mint(&mut self, color: Color, origin: Oven) -> Body {
        self.state.body_counter += 1;
        Body::new(BodyId(self.state.body_counter), color, origin)
    }

    fn extract_once(&mut self) -> Option<ConveyorEntry> {
        let line_id = self
            .policy
            .select_output(&self.bank, self.state.last_conveyor_color)?;
        // The round-robin selector ignores output gates, so the
        // gate-honoring dequeue may still leave the conveyor idle.
        let body = self.bank.line_mut(line_id).remove()?;

        let caused_color_change = self
            .state
            .last_conveyor_color
            .is_some_and(|last| last != body.color);
        if caused_color_change {
            self.scorer
                .record_changeover(self.timing.color_change_penalty);
        }
        self.state.last_conveyor_color = Some(body.color);
        self.scorer.record_processed();

        let entry = ConveyorEntry {
            body_id: body.id,
            color: body.color,
            source_line: line_id,
            caused_color_change,
        };
        self.conveyor_log.push(entry);
        debug!(
            target: "engine.tick",
            engine = self.label,
            body = %entry.body_id,
            color = %entry.color,
            line = %entry.source_line,
            color_change = entry.caused_color_change,
            "extracted"
        );
        Some(entry)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn bank(&self) -> &BufferBank {
        &self.bank
    }

    /// Direct line access for operator tooling and test setup (pre-filled
    /// scenarios, manual emptying). Mutations between ticks only.
    pub fn bank_mut(&mut self) -> &mut BufferBank {
        &mut self.bank
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn conveyor_log(&self) -> &[ConveyorEntry] {
        &self.conveyor_log
    }

    /// Last `n` conveyor entries, oldest first.
    pub fn conveyor_tail(&self, n: usize) -> &[ConveyorEntry] {
        let start = self.conveyor_log.len().saturating_sub(n);
        &self.conveyor_log[start..]
    }

    pub fn overflow_drops(&self) -> u64 {
        self.overflow_drops
    }

    pub fn o2_blocked(&self) -> bool {
        self.policy.o2_blocked()
    }

    pub fn staged(&self) -> Vec<Body> {
        self.policy.staged()
    }

    pub fn staged_len(&self) -> usize {
        self.policy.staged_len()
    }

    pub fn set_input_open(&mut self, line: LineId, open: bool) {
        debug!(target: "engine.gate", engine = self.label, line = %line, open, "input gate");
        self.bank.line_mut(line).set_input_open(open);
    }

    pub fn set_output_open(&mut self, line: LineId, open: bool) {
        debug!(target: "engine.gate", engine = self.label, line = %line, open, "output gate");
        self.bank.line_mut(line).set_output_open(open);
    }

    /// Back to the freshly constructed state: empty lines, open gates,
    /// zeroed counters, empty history.
    pub fn reset(&mut self) {
        info!(target: "engine", engine = self.label, "reset");
        self.bank.reset();
        self.policy.reset();
        self.state = EngineState::default();
        self.scorer.reset();
        self.conveyor_log.clear();
        self.overflow_drops = 0;
    }
}
