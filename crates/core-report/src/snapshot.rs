//! Serializable freeze-frames of engine state.

use core_engine::{ColorSource, Comparison, ConveyorEntry, Engine};
use core_model::{BodyId, Color, LineId};
use core_policy::SequencerPolicy;
use serde::Serialize;

/// One buffer line as the dashboard sees it.
#[derive(Debug, Clone, Serialize)]
pub struct LineSnapshot {
    pub id: LineId,
    pub capacity: usize,
    pub filled: usize,
    /// Queue colors head to tail.
    pub colors: Vec<Color>,
    pub input_open: bool,
    pub output_open: bool,
}

impl LineSnapshot {
    pub fn utilization_percent(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.filled as f64 / self.capacity as f64 * 100.0
    }
}

/// One released body on the main conveyor.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConveyorRecord {
    pub body_id: BodyId,
    pub color: Color,
    pub source_line: LineId,
    pub caused_color_change: bool,
}

impl From<&ConveyorEntry> for ConveyorRecord {
    fn from(entry: &ConveyorEntry) -> Self {
        Self {
            body_id: entry.body_id,
            color: entry.color,
            source_line: entry.source_line,
            caused_color_change: entry.caused_color_change,
        }
    }
}

/// Simulated time split.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimeSnapshot {
    pub base_processing_seconds: f64,
    pub penalty_seconds: f64,
    pub total_effective_seconds: f64,
}

/// Full observable state of one engine at a tick boundary.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub label: String,
    pub total_processed: u64,
    pub color_changeovers: u64,
    pub penalty_count: u64,
    pub total_penalty_time: f64,
    pub jph: f64,
    pub last_conveyor_color: Option<Color>,
    pub o2_blocked: bool,
    pub overflow_drops: u64,
    /// Staged O2 bodies in arrival order (empty for the baseline).
    pub staged_colors: Vec<Color>,
    pub lines: Vec<LineSnapshot>,
    /// Last N conveyor entries, oldest first.
    pub conveyor_tail: Vec<ConveyorRecord>,
    /// Bodies processed per color over the whole run, in color order.
    pub processed_by_color: Vec<(Color, u64)>,
    pub time: TimeSnapshot,
}

impl EngineSnapshot {
    pub fn capture<P: SequencerPolicy>(engine: &Engine<P>, tail: usize) -> Self {
        let breakdown = engine
            .scorer()
            .time_breakdown(engine.timing().base_seconds_per_body);
        Self {
            label: engine.label().to_string(),
            total_processed: engine.scorer().total_processed(),
            color_changeovers: engine.scorer().color_changeovers(),
            penalty_count: engine.scorer().penalty_count(),
            total_penalty_time: engine.scorer().total_penalty_time(),
            jph: engine.scorer().jph(),
            last_conveyor_color: engine.state().last_conveyor_color,
            o2_blocked: engine.o2_blocked(),
            overflow_drops: engine.overflow_drops(),
            staged_colors: engine.staged().iter().map(|b| b.color).collect(),
            lines: engine
                .bank()
                .lines()
                .map(|line| LineSnapshot {
                    id: line.id(),
                    capacity: line.capacity(),
                    filled: line.len(),
                    colors: line.colors().collect(),
                    input_open: line.input_open(),
                    output_open: line.output_open(),
                })
                .collect(),
            conveyor_tail: engine.conveyor_tail(tail).iter().map(Into::into).collect(),
            processed_by_color: {
                let mut counts = [0u64; 12];
                for entry in engine.conveyor_log() {
                    counts[entry.color.index()] += 1;
                }
                Color::ALL
                    .iter()
                    .zip(counts)
                    .filter(|&(_, n)| n > 0)
                    .map(|(&c, n)| (c, n))
                    .collect()
            },
            time: TimeSnapshot {
                base_processing_seconds: breakdown.base_processing_seconds,
                penalty_seconds: breakdown.penalty_seconds,
                total_effective_seconds: breakdown.total_effective_seconds,
            },
        }
    }

    pub fn overall_utilization_percent(&self) -> f64 {
        let capacity: usize = self.lines.iter().map(|l| l.capacity).sum();
        let filled: usize = self.lines.iter().map(|l| l.filled).sum();
        if capacity == 0 {
            return 0.0;
        }
        filled as f64 / capacity as f64 * 100.0
    }

    pub fn changeover_rate_percent(&self) -> f64 {
        if self.total_processed == 0 {
            return 0.0;
        }
        self.color_changeovers as f64 / self.total_processed as f64 * 100.0
    }
}

/// The A/B pair plus run length.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSnapshot {
    pub ticks: u64,
    pub optimized: EngineSnapshot,
    pub baseline: EngineSnapshot,
}

impl ComparisonSnapshot {
    pub fn capture<S: ColorSource>(comparison: &Comparison<S>, tail: usize) -> Self {
        Self {
            ticks: comparison.ticks(),
            optimized: EngineSnapshot::capture(comparison.optimized(), tail),
            baseline: EngineSnapshot::capture(comparison.baseline(), tail),
        }
    }

    /// JPH gain of the optimized engine over the baseline, when both have a
    /// rate.
    pub fn jph_improvement_percent(&self) -> Option<f64> {
        if self.optimized.jph > 0.0 && self.baseline.jph > 0.0 {
            Some((self.optimized.jph - self.baseline.jph) / self.baseline.jph * 100.0)
        } else {
            None
        }
    }

    /// Share of baseline penalties the optimized engine avoided. A
    /// penalty-free baseline counts as a full reduction.
    pub fn penalty_reduction_percent(&self) -> Option<f64> {
        if self.baseline.penalty_count == 0 {
            return Some(100.0);
        }
        let saved = self.baseline.penalty_count as f64 - self.optimized.penalty_count as f64;
        Some(saved / self.baseline.penalty_count as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_engine::ScriptedColorSource;
    use core_model::Color;

    #[test]
    fn snapshot_mirrors_engine_counters() {
        let mut comparison = Comparison::new(ScriptedColorSource::constant(Color::C1));
        comparison.run(10);
        let snapshot = ComparisonSnapshot::capture(&comparison, 5);

        assert_eq!(snapshot.ticks, 10);
        assert_eq!(snapshot.optimized.total_processed, 10);
        assert_eq!(snapshot.optimized.conveyor_tail.len(), 5);
        assert_eq!(snapshot.optimized.lines.len(), 9);
        let resident: usize = snapshot.optimized.lines.iter().map(|l| l.filled).sum();
        // 20 minted, 10 extracted.
        assert_eq!(resident, 10);
        assert!((snapshot.optimized.jph - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn improvement_needs_both_rates() {
        let comparison = Comparison::new(ScriptedColorSource::constant(Color::C1));
        let snapshot = ComparisonSnapshot::capture(&comparison, 5);
        assert_eq!(snapshot.jph_improvement_percent(), None);
        // A penalty-free baseline reads as a full reduction.
        assert_eq!(snapshot.penalty_reduction_percent(), Some(100.0));
    }
}
