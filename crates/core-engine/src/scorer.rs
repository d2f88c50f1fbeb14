//! Throughput and penalty accounting.

/// Simulated time split backing the JPH figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBreakdown {
    pub base_processing_seconds: f64,
    pub penalty_seconds: f64,
    pub total_effective_seconds: f64,
}

/// Monotonic counters observed at tick boundaries, plus the derived
/// jobs-per-hour rate.
///
/// JPH treats the simulation as if every processed body took the configured
/// base time plus accumulated penalties; it is a scoring rate, not a
/// wall-clock measurement.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    total_processed: u64,
    color_changeovers: u64,
    penalty_count: u64,
    total_penalty_time: f64,
    jph: f64,
}

impl Scorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// One body released onto the main conveyor.
    pub fn record_processed(&mut self) {
        self.total_processed += 1;
    }

    /// Consecutive conveyor bodies differed in color.
    pub fn record_changeover(&mut self, penalty_seconds: f64) {
        self.color_changeovers += 1;
        self.total_penalty_time += penalty_seconds;
    }

    /// An O1 body was routed into the O2-preferred group.
    pub fn record_o1_cross(&mut self, penalty_seconds: f64) {
        self.penalty_count += 1;
        self.total_penalty_time += penalty_seconds;
    }

    /// Recompute `jph = processed / (processed * base + penalties) * 3600`,
    /// defined as 0 while the denominator is 0.
    pub fn update_jph(&mut self, base_seconds_per_body: f64) {
        let effective =
            self.total_processed as f64 * base_seconds_per_body + self.total_penalty_time;
        self.jph = if effective > 0.0 {
            (self.total_processed as f64 / effective) * 3600.0
        } else {
            0.0
        };
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    pub fn color_changeovers(&self) -> u64 {
        self.color_changeovers
    }

    pub fn penalty_count(&self) -> u64 {
        self.penalty_count
    }

    pub fn total_penalty_time(&self) -> f64 {
        self.total_penalty_time
    }

    pub fn jph(&self) -> f64 {
        self.jph
    }

    pub fn time_breakdown(&self, base_seconds_per_body: f64) -> TimeBreakdown {
        let base = self.total_processed as f64 * base_seconds_per_body;
        TimeBreakdown {
            base_processing_seconds: base,
            penalty_seconds: self.total_penalty_time,
            total_effective_seconds: base + self.total_penalty_time,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jph_is_zero_before_any_processing() {
        let mut scorer = Scorer::new();
        scorer.update_jph(1.0);
        assert_eq!(scorer.jph(), 0.0);
    }

    #[test]
    fn penalty_free_run_scores_full_rate() {
        let mut scorer = Scorer::new();
        for _ in 0..30 {
            scorer.record_processed();
        }
        scorer.update_jph(1.0);
        assert!((scorer.jph() - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn penalties_depress_the_rate() {
        let mut scorer = Scorer::new();
        for _ in 0..10 {
            scorer.record_processed();
        }
        scorer.record_changeover(1.0);
        scorer.record_o1_cross(1.0);
        scorer.update_jph(1.0);
        // 10 bodies over 12 effective seconds.
        assert!((scorer.jph() - 10.0 / 12.0 * 3600.0).abs() < 1e-9);
        assert_eq!(scorer.color_changeovers(), 1);
        assert_eq!(scorer.penalty_count(), 1);

        let breakdown = scorer.time_breakdown(1.0);
        assert!((breakdown.base_processing_seconds - 10.0).abs() < 1e-9);
        assert!((breakdown.penalty_seconds - 2.0).abs() < 1e-9);
        assert!((breakdown.total_effective_seconds - 12.0).abs() < 1e-9);
    }

    #[test]
    fn jph_monotone_in_processed_at_fixed_penalty_time() {
        let mut previous = 0.0;
        for processed in 1..200u64 {
            let mut scorer = Scorer::new();
            for _ in 0..processed {
                scorer.record_processed();
            }
            // Fixed 5 s of penalties regardless of volume.
            scorer.record_changeover(5.0);
            scorer.update_jph(1.0);
            assert!(scorer.jph() >= previous);
            previous = scorer.jph();
        }
    }
}
