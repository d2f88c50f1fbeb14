//! Plain-text shift report.

use crate::{ComparisonSnapshot, EngineSnapshot};
use std::fmt::Write;

/// Render the end-of-run A/B report: one section per engine plus the
/// head-to-head summary.
pub fn render_report(snapshot: &ComparisonSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "CONVEYOR SEQUENCING REPORT");
    let _ = writeln!(out, "==========================");
    let _ = writeln!(out, "Ticks run: {}", snapshot.ticks);
    let _ = writeln!(out);

    render_engine_section(&mut out, &snapshot.optimized, snapshot.ticks);
    let _ = writeln!(out);
    render_engine_section(&mut out, &snapshot.baseline, snapshot.ticks);
    let _ = writeln!(out);

    let _ = writeln!(out, "HEAD TO HEAD");
    let _ = writeln!(out, "------------");
    let _ = writeln!(
        out,
        "  JPH: {:.1} vs {:.1}",
        snapshot.optimized.jph, snapshot.baseline.jph
    );
    if let Some(improvement) = snapshot.jph_improvement_percent() {
        let _ = writeln!(out, "  Throughput improvement: {improvement:.1}%");
    }
    let _ = writeln!(
        out,
        "  Color changeovers: {} vs {}",
        snapshot.optimized.color_changeovers, snapshot.baseline.color_changeovers
    );
    let _ = writeln!(
        out,
        "  O1 cross penalties: {} vs {}",
        snapshot.optimized.penalty_count, snapshot.baseline.penalty_count
    );
    if let Some(reduction) = snapshot.penalty_reduction_percent() {
        let _ = writeln!(out, "  Penalty reduction: {reduction:.1}%");
    }
    out
}

fn render_engine_section(out: &mut String, engine: &EngineSnapshot, ticks: u64) {
    let _ = writeln!(out, "{}", engine.label.to_uppercase());
    let _ = writeln!(out, "{}", "-".repeat(engine.label.len()));
    let _ = writeln!(out, "  JPH: {:.1}", engine.jph);
    let _ = writeln!(
        out,
        "  Processed: {} bodies, {} changeovers ({:.1}%)",
        engine.total_processed,
        engine.color_changeovers,
        engine.changeover_rate_percent()
    );
    let _ = writeln!(
        out,
        "  O1 cross penalties: {}, overflow drops: {}",
        engine.penalty_count, engine.overflow_drops
    );
    let _ = writeln!(
        out,
        "  Time: {:.1}s base + {:.1}s penalty = {:.1}s effective",
        engine.time.base_processing_seconds,
        engine.time.penalty_seconds,
        engine.time.total_effective_seconds
    );
    if engine.o2_blocked || !engine.staged_colors.is_empty() {
        let _ = writeln!(
            out,
            "  O2: {} ({} staged)",
            if engine.o2_blocked { "BLOCKED" } else { "free" },
            engine.staged_colors.len()
        );
    }
    if let Some(last) = engine.last_conveyor_color {
        let _ = writeln!(out, "  Last conveyor color: {last}");
    }

    let _ = writeln!(
        out,
        "  Buffers ({:.1}% utilized):",
        engine.overall_utilization_percent()
    );
    for line in &engine.lines {
        let gates = match (line.input_open, line.output_open) {
            (true, true) => "",
            (false, true) => " [in closed]",
            (true, false) => " [out closed]",
            (false, false) => " [closed]",
        };
        let _ = writeln!(
            out,
            "    {}: {:>2}/{:<2} ({:>5.1}%) {}{}",
            line.id,
            line.filled,
            line.capacity,
            line.utilization_percent(),
            bar(line.utilization_percent(), 5.0),
            gates
        );
    }

    if !engine.processed_by_color.is_empty() {
        let _ = writeln!(out, "  Conveyor color mix:");
        for &(color, count) in &engine.processed_by_color {
            let share = count as f64 / engine.total_processed as f64 * 100.0;
            let _ = writeln!(
                out,
                "    {:>4}: {:>4} bodies ({:>5.1}%) {}",
                color.as_str(),
                count,
                share,
                bar(share, 2.0)
            );
        }
    }

    let _ = writeln!(out, "  Recommendations:");
    for (i, recommendation) in recommendations(engine, ticks).iter().enumerate() {
        let _ = writeln!(out, "    [{}] {recommendation}", i + 1);
    }
}

/// One bar glyph per `percent_per_glyph` percent.
fn bar(percent: f64, percent_per_glyph: f64) -> String {
    "█".repeat((percent / percent_per_glyph) as usize)
}

/// Threshold-based operator guidance.
fn recommendations(engine: &EngineSnapshot, ticks: u64) -> Vec<String> {
    let mut out = Vec::new();
    if engine.changeover_rate_percent() > 50.0 {
        out.push(
            "CRITICAL: changeover rate above 50%; review color batching upstream".to_string(),
        );
    }
    if ticks > 0 && engine.penalty_count as f64 > ticks as f64 * 0.15 {
        out.push(
            "HIGH: frequent O1 crossings; increase O1 buffer capacity or rebalance routing"
                .to_string(),
        );
    }
    let utilization = engine.overall_utilization_percent();
    if utilization > 80.0 {
        out.push("HIGH: buffers near capacity; bottleneck risk".to_string());
    } else if utilization < 30.0 {
        out.push("MEDIUM: low buffer utilization; capacity could be reduced".to_string());
    }
    if engine.overflow_drops > 0 {
        out.push("CRITICAL: buffer overflows detected; capacity increase required".to_string());
    }
    if out.is_empty() {
        out.push("System operating within normal parameters".to_string());
    }
    out
}
