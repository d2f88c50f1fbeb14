//! Sequencing policies: where each oven body goes, and which line feeds the
//! main conveyor.
//!
//! Two implementations sit behind [`SequencerPolicy`]:
//!
//! * [`OptimizedPolicy`]: color-grouping placement (fit, then force), an
//!   unbounded staging queue for O2 arrivals while O2 is blocked, and a
//!   continuity-first extractor that falls back to the longest connected
//!   same-color head run.
//! * [`RoundRobinPolicy`]: the deliberately naive baseline, strictly cyclic
//!   placement and extraction, no staging queue, no color awareness. It
//!   exists so the optimized policy has something honest to be measured
//!   against.
//!
//! Policies decide *and apply* placement (they own the enqueue into the
//! bank) but never touch scoring; penalty bookkeeping is reported back
//! through [`O1Placement`] and applied by the engine.

mod optimized;
mod round_robin;

pub use optimized::OptimizedPolicy;
pub use round_robin::RoundRobinPolicy;

use core_model::{Body, BodyId, BufferBank, Color, LineId};

/// Outcome of routing one O1 body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct O1Placement {
    /// Line the body landed in, or `None` when every line refused it (the
    /// body is dropped and the caller records a buffer overflow).
    pub line: Option<LineId>,
    /// The body crossed into the O2-preferred group.
    pub crossed: bool,
    /// The caller owes one O1-cross penalty for this placement.
    pub penalized: bool,
}

impl O1Placement {
    pub fn in_group(line: LineId) -> Self {
        Self {
            line: Some(line),
            crossed: false,
            penalized: false,
        }
    }

    pub fn crossed(line: LineId) -> Self {
        Self {
            line: Some(line),
            crossed: true,
            penalized: true,
        }
    }

    pub fn dropped() -> Self {
        Self {
            line: None,
            crossed: false,
            penalized: false,
        }
    }
}

/// Outcome of routing one O2 body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum O2Placement {
    /// Body entered the named buffer line.
    Line(LineId),
    /// Body was appended to the staging queue (O2 blocked, or earlier
    /// arrivals are still waiting there).
    Staged,
    /// No line could take the body; it is dropped as an overflow.
    Refused,
}

/// One body released from the staging queue into a buffer line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedRelease {
    pub body_id: BodyId,
    pub color: Color,
    pub line: LineId,
}

/// Capability set a sequencing engine needs from its policy.
///
/// All methods are synchronous and total: every decision is a pure function
/// of the bank plus the policy's own cursor/blocking state, and refusals are
/// ordinary return values, never errors.
pub trait SequencerPolicy {
    /// Route a freshly painted O1 body, preferring the O1 group and escaping
    /// to the O2 group (with penalty) when the preferred group cannot take
    /// it. Clears the O2-blocked flag on entry; sets it again only if this
    /// very placement ends up inside the O2 group.
    fn place_o1(&mut self, bank: &mut BufferBank, body: Body) -> O1Placement;

    /// Route a freshly painted O2 body.
    fn place_o2(&mut self, bank: &mut BufferBank, body: Body) -> O2Placement;

    /// Release at most one staged body into the O2 group. No-op for
    /// policies without a staging queue, and while O2 is blocked.
    fn drain_staged_once(&mut self, bank: &mut BufferBank) -> Option<StagedRelease>;

    /// Choose the line whose head feeds the main conveyor this tick, or
    /// `None` to let the conveyor idle.
    fn select_output(&mut self, bank: &BufferBank, last_color: Option<Color>) -> Option<LineId>;

    /// O2 arrivals are currently blocked from direct placement.
    fn o2_blocked(&self) -> bool;

    /// Snapshot of the staging queue in arrival order.
    fn staged(&self) -> Vec<Body> {
        Vec::new()
    }

    fn staged_len(&self) -> usize {
        0
    }

    /// Forget all cursor/blocking/staging state.
    fn reset(&mut self);
}

/// Enqueue a body into a line the policy has already vetted.
///
/// Selection and enqueue happen within one single-threaded tick, so a vetted
/// line refusing the body indicates a logic bug, not an operational state.
fn enqueue_vetted(bank: &mut BufferBank, line: LineId, body: Body) {
    let result = bank.line_mut(line).add(body);
    debug_assert!(result.is_ok(), "vetted line {line} refused a body");
}
