//! Lock-step A/B harness: two engines, one color stream.

use crate::{ColorSource, Engine, TickOutcome, Timing};
use core_model::BufferBank;
use core_policy::{OptimizedPolicy, RoundRobinPolicy};
use tracing::info;

/// Advances an optimized engine and a round-robin baseline on the same
/// color stream. The engines share nothing but the per-tick color pair, so
/// every difference in their scores is attributable to policy.
pub struct Comparison<S> {
    source: S,
    optimized: Engine<OptimizedPolicy>,
    baseline: Engine<RoundRobinPolicy>,
    ticks: u64,
}

impl<S: ColorSource> Comparison<S> {
    pub fn new(source: S) -> Self {
        Self::with_timing(source, Timing::default())
    }

    pub fn with_timing(source: S, timing: Timing) -> Self {
        Self::with_config(source, timing, BufferBank::new())
    }

    /// Both engines get their own copy of the (possibly re-capacitied) bank.
    pub fn with_config(source: S, timing: Timing, bank: BufferBank) -> Self {
        Self {
            source,
            optimized: Engine::with_config("optimized", OptimizedPolicy::new(), timing, bank.clone()),
            baseline: Engine::with_config("round-robin", RoundRobinPolicy::new(), timing, bank),
            ticks: 0,
        }
    }

    /// One lock-step cycle; both engines see the identical color pair.
    pub fn tick(&mut self) -> (TickOutcome, TickOutcome) {
        let (c1, c2) = self.source.next_colors();
        self.ticks += 1;
        (self.optimized.tick(c1, c2), self.baseline.tick(c1, c2))
    }

    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
        info!(
            target: "harness",
            ticks = self.ticks,
            optimized_jph = self.optimized.scorer().jph(),
            baseline_jph = self.baseline.scorer().jph(),
            "run complete"
        );
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn optimized(&self) -> &Engine<OptimizedPolicy> {
        &self.optimized
    }

    pub fn baseline(&self) -> &Engine<RoundRobinPolicy> {
        &self.baseline
    }

    pub fn optimized_mut(&mut self) -> &mut Engine<OptimizedPolicy> {
        &mut self.optimized
    }

    pub fn baseline_mut(&mut self) -> &mut Engine<RoundRobinPolicy> {
        &mut self.baseline
    }

    pub fn reset(&mut self) {
        self.optimized.reset();
        self.baseline.reset();
        self.ticks = 0;
    }
}
