//! Tick orchestration for the conveyor sequencer.
//!
//! One [`Engine`] owns a [`core_model::BufferBank`], a
//! [`core_policy::SequencerPolicy`], and the scoring counters. Each call to
//! [`Engine::tick`] runs exactly one cycle:
//!
//! 1. mint one body per oven from the supplied colors,
//! 2. release at most one staged O2 body (optimized policy only),
//! 3. route the O1 body, then the O2 body,
//! 4. extract at most one body onto the main conveyor,
//! 5. refresh the jobs-per-hour figure.
//!
//! Nothing here suspends, retries, or throws: refusals are values, the
//! conveyor idles when no line is eligible, and the only nondeterminism
//! (the color stream) is injected through [`ColorSource`]. The
//! [`Comparison`] harness advances an optimized and a round-robin engine in
//! lock-step on a single stream for A/B measurement.

mod engine;
mod harness;
mod scorer;
mod source;

pub use engine::{ConveyorEntry, Engine, EngineState, TickOutcome, Timing};
pub use harness::Comparison;
pub use scorer::{Scorer, TimeBreakdown};
pub use source::{ColorSource, ScriptedColorSource, WeightedColorSource};
