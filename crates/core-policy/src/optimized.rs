//! Color-grouping policy: fit into a same-color run when possible, break the
//! least valuable run when not, stage O2 arrivals while O2 is blocked.

use crate::{O1Placement, O2Placement, SequencerPolicy, StagedRelease, enqueue_vetted};
use core_model::{Body, BufferBank, Color, LineId};
use std::cmp::Reverse;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace};

/// The production sequencing policy.
///
/// Placement walks its group in fixed line order through three fit rules
/// (extend a color-pure line, extend a matching tail, seed an empty line) and
/// falls back to forcing the body onto the line whose rear run is cheapest to
/// break. O1 escapes into the O2 group when its own group refuses the body;
/// every such cross blocks O2 for the remainder of the tick cycle and routes
/// new O2 arrivals into an unbounded staging queue that drains one body per
/// tick once O2 is free again.
#[derive(Debug, Default)]
pub struct OptimizedPolicy {
    o2_stopped: bool,
    staging: VecDeque<Body>,
}

impl OptimizedPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// First line in `group` that extends the color without breaking a run:
    /// a color-pure non-full line, then any line whose tail matches, then an
    /// empty line to seed. Every rule skips lines whose input gate is
    /// closed.
    fn fit_into_group(bank: &BufferBank, group: &[LineId], color: Color) -> Option<LineId> {
        for &id in group {
            let line = bank.line(id);
            if line.input_open() && !line.is_full() && line.fully_one_color(color) {
                return Some(id);
            }
        }
        for &id in group {
            let line = bank.line(id);
            if line.input_open() && !line.is_full() && line.ends_with(color) {
                return Some(id);
            }
        }
        for &id in group {
            let line = bank.line(id);
            if line.input_open() && line.is_empty() {
                return Some(id);
            }
        }
        None
    }

    /// No color match exists: pick the open, non-full line whose rear run is
    /// shortest (cheapest to break), preferring more remaining space on ties
    /// and fixed group order after that.
    fn force_into_group(bank: &BufferBank, group: &[LineId]) -> Option<LineId> {
        group
            .iter()
            .copied()
            .filter(|&id| bank.line(id).can_accept())
            .min_by_key(|&id| {
                let line = bank.line(id);
                (line.rear_run_length(), Reverse(line.remaining_capacity()))
            })
    }

    fn place_into_group(bank: &BufferBank, group: &[LineId], color: Color) -> Option<LineId> {
        Self::fit_into_group(bank, group, color).or_else(|| Self::force_into_group(bank, group))
    }

    /// Upstream O2 is about to stall when none of its lines can take input.
    fn o2_group_saturated(bank: &BufferBank) -> bool {
        BufferBank::O2_GROUP
            .iter()
            .all(|&id| !bank.line(id).can_accept())
    }

    /// The color with the longest connected head run among eligible lines.
    ///
    /// Per color, the representative line is the first one (in id order)
    /// carrying that color's longest head run. Ties between colors break on
    /// the representative's remaining capacity (ascending), run length
    /// (descending), then line id.
    fn max_connected_color(bank: &BufferBank) -> Option<Color> {
        // Per color: the first line (in id order) carrying that color's
        // longest head run, with its run length and remaining space.
        let mut meta: HashMap<Color, (usize, LineId, usize)> = HashMap::new();
        for line in bank.lines() {
            if line.is_empty() || !line.output_open() {
                continue;
            }
            let Some(color) = line.head_color() else {
                continue;
            };
            let run = line.head_run_length();
            match meta.get(&color) {
                Some(&(best_run, _, _)) if best_run >= run => {}
                _ => {
                    meta.insert(color, (run, line.id(), line.remaining_capacity()));
                }
            }
        }

        let max_run = meta.values().map(|&(run, _, _)| run).max()?;
        meta.into_iter()
            .filter(|&(_, (run, _, _))| run == max_run)
            .min_by_key(|&(_, (run, line, space))| (space, Reverse(run), line))
            .map(|(color, _)| color)
    }

    /// Most-full eligible line whose head carries `color`.
    fn line_for_color(bank: &BufferBank, color: Color) -> Option<LineId> {
        bank.lines()
            .filter(|l| !l.is_empty() && l.output_open() && l.head_color() == Some(color))
            .min_by_key(|l| l.remaining_capacity())
            .map(|l| l.id())
    }
}

impl SequencerPolicy for OptimizedPolicy {
    fn place_o1(&mut self, bank: &mut BufferBank, body: Body) -> O1Placement {
        // A placement that stays inside the O1 group implicitly unblocks O2.
        self.o2_stopped = false;
        let (id, color) = (body.id, body.color);

        if let Some(line) = Self::fit_into_group(bank, &BufferBank::O1_GROUP, color) {
            enqueue_vetted(bank, line, body);
            trace!(target: "policy.place", body = %id, color = %color, line = %line, "o1 fit");
            return O1Placement::in_group(line);
        }
        if let Some(line) = Self::fit_into_group(bank, &BufferBank::O2_GROUP, color) {
            enqueue_vetted(bank, line, body);
            self.o2_stopped = true;
            debug!(target: "policy.place", body = %id, color = %color, line = %line, "o1 crossed into o2 group");
            return O1Placement::crossed(line);
        }
        if let Some(line) = Self::force_into_group(bank, &BufferBank::O1_GROUP) {
            enqueue_vetted(bank, line, body);
            trace!(target: "policy.place", body = %id, color = %color, line = %line, "o1 forced");
            return O1Placement::in_group(line);
        }
        if let Some(line) = Self::force_into_group(bank, &BufferBank::O2_GROUP) {
            enqueue_vetted(bank, line, body);
            self.o2_stopped = true;
            debug!(target: "policy.place", body = %id, color = %color, line = %line, "o1 forced into o2 group");
            return O1Placement::crossed(line);
        }

        debug!(target: "policy.place", body = %id, color = %color, "o1 dropped, no line can accept");
        O1Placement::dropped()
    }

    fn place_o2(&mut self, bank: &mut BufferBank, body: Body) -> O2Placement {
        // Arrival order must survive blocking: once anything is staged, every
        // new arrival queues behind it.
        if self.o2_stopped || !self.staging.is_empty() {
            trace!(target: "policy.place", body = %body.id, color = %body.color, blocked = self.o2_stopped, "o2 staged");
            self.staging.push_back(body);
            return O2Placement::Staged;
        }

        let (id, color) = (body.id, body.color);
        match Self::place_into_group(bank, &BufferBank::O2_GROUP, color) {
            Some(line) => {
                enqueue_vetted(bank, line, body);
                trace!(target: "policy.place", body = %id, color = %color, line = %line, "o2 placed");
                O2Placement::Line(line)
            }
            None => {
                debug!(target: "policy.place", body = %id, color = %color, "o2 dropped, group full");
                O2Placement::Refused
            }
        }
    }

    fn drain_staged_once(&mut self, bank: &mut BufferBank) -> Option<StagedRelease> {
        if self.o2_stopped {
            return None;
        }
        let body = self.staging.pop_front()?;
        match Self::place_into_group(bank, &BufferBank::O2_GROUP, body.color) {
            Some(line) => {
                let release = StagedRelease {
                    body_id: body.id,
                    color: body.color,
                    line,
                };
                enqueue_vetted(bank, line, body);
                debug!(target: "policy.place", body = %release.body_id, color = %release.color, line = %line, "staged body released");
                Some(release)
            }
            None => {
                // Still no room: the body keeps its place at the head.
                self.staging.push_front(body);
                None
            }
        }
    }

    fn select_output(&mut self, bank: &BufferBank, last_color: Option<Color>) -> Option<LineId> {
        if Self::o2_group_saturated(bank) {
            // Upstream pressure: clear the longest connected run regardless
            // of conveyor continuity.
            let color = Self::max_connected_color(bank)?;
            let line = Self::line_for_color(bank, color);
            trace!(target: "policy.extract", ?line, %color, "pressure extraction");
            return line;
        }

        if let Some(last) = last_color {
            let matching = bank
                .lines()
                .filter(|l| !l.is_empty() && l.output_open() && l.head_color() == Some(last))
                .min_by_key(|l| l.remaining_capacity());
            if let Some(line) = matching {
                trace!(target: "policy.extract", line = %line.id(), color = %last, "continuity extraction");
                return Some(line.id());
            }
        }

        let color = Self::max_connected_color(bank)?;
        let line = Self::line_for_color(bank, color);
        trace!(target: "policy.extract", ?line, %color, "max connected run extraction");
        line
    }

    fn o2_blocked(&self) -> bool {
        self.o2_stopped
    }

    fn staged(&self) -> Vec<Body> {
        self.staging.iter().cloned().collect()
    }

    fn staged_len(&self) -> usize {
        self.staging.len()
    }

    fn reset(&mut self) {
        self.o2_stopped = false;
        self.staging.clear();
    }
}
