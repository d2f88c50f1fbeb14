//! Strictly cyclic baseline policy, color-blind by design.

use crate::{O1Placement, O2Placement, SequencerPolicy, StagedRelease, enqueue_vetted};
use core_model::{Body, BufferBank, Color, LineId};
use tracing::{debug, trace};

/// The comparison baseline: placement cycles over the preferred group,
/// extraction cycles over all nine lines.
///
/// Intentional naivety, kept so the A/B numbers mean something: no staging
/// queue, no break-run fallback, and extraction ignores output gates during
/// selection (a closed gate then simply yields an idle tick at dequeue).
#[derive(Debug, Default)]
pub struct RoundRobinPolicy {
    o1_cursor: usize,
    o2_cursor: usize,
    all_cursor: usize,
    o2_stopped: bool,
}

impl RoundRobinPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// First line from the cursor that can accept a body; the cursor
    /// advances to the slot after the chosen line. An exhausted scan leaves
    /// the cursor untouched.
    fn rr_place(bank: &BufferBank, group: &[LineId], cursor: &mut usize) -> Option<LineId> {
        for step in 0..group.len() {
            let slot = (*cursor + step) % group.len();
            let id = group[slot];
            if bank.line(id).can_accept() {
                *cursor = (slot + 1) % group.len();
                return Some(id);
            }
        }
        None
    }
}

impl SequencerPolicy for RoundRobinPolicy {
    fn place_o1(&mut self, bank: &mut BufferBank, body: Body) -> O1Placement {
        self.o2_stopped = false;
        let (id, color) = (body.id, body.color);

        if let Some(line) = Self::rr_place(bank, &BufferBank::O1_GROUP, &mut self.o1_cursor) {
            enqueue_vetted(bank, line, body);
            trace!(target: "policy.place", body = %id, color = %color, line = %line, "o1 round-robin");
            return O1Placement::in_group(line);
        }
        if let Some(line) = Self::rr_place(bank, &BufferBank::O2_GROUP, &mut self.o2_cursor) {
            enqueue_vetted(bank, line, body);
            self.o2_stopped = true;
            debug!(target: "policy.place", body = %id, color = %color, line = %line, "o1 round-robin crossed");
            return O1Placement::crossed(line);
        }

        debug!(target: "policy.place", body = %id, color = %color, "o1 dropped, no line can accept");
        O1Placement::dropped()
    }

    fn place_o2(&mut self, bank: &mut BufferBank, body: Body) -> O2Placement {
        if self.o2_stopped {
            trace!(target: "policy.place", body = %body.id, "o2 refused, blocked");
            return O2Placement::Refused;
        }
        let (id, color) = (body.id, body.color);
        match Self::rr_place(bank, &BufferBank::O2_GROUP, &mut self.o2_cursor) {
            Some(line) => {
                enqueue_vetted(bank, line, body);
                trace!(target: "policy.place", body = %id, color = %color, line = %line, "o2 round-robin");
                O2Placement::Line(line)
            }
            None => O2Placement::Refused,
        }
    }

    fn drain_staged_once(&mut self, _bank: &mut BufferBank) -> Option<StagedRelease> {
        None
    }

    fn select_output(&mut self, bank: &BufferBank, _last_color: Option<Color>) -> Option<LineId> {
        for step in 0..LineId::ALL.len() {
            let slot = (self.all_cursor + step) % LineId::ALL.len();
            let id = LineId::ALL[slot];
            if !bank.line(id).is_empty() {
                self.all_cursor = (slot + 1) % LineId::ALL.len();
                trace!(target: "policy.extract", line = %id, "round-robin extraction");
                return Some(id);
            }
        }
        None
    }

    fn o2_blocked(&self) -> bool {
        self.o2_stopped
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
