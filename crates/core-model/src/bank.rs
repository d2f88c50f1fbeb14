//! The fixed nine-line buffer bank and its oven partitions.

use crate::{BufferLine, LineId, Oven};

/// Default capacity of the O1-preferred lines (L1–L4).
pub const O1_LINE_CAPACITY: usize = 14;
/// Default capacity of the O2-preferred lines (L5–L9).
pub const O2_LINE_CAPACITY: usize = 16;

/// Container over the nine buffer lines, partitioned into the O1-preferred
/// group (L1–L4) and the O2-preferred group (L5–L9).
///
/// Pure delegation: no placement or extraction behavior lives here. Line
/// storage order equals [`LineId`] order, which is the iteration order the
/// deterministic policies depend on.
#[derive(Debug, Clone)]
pub struct BufferBank {
    lines: [BufferLine; 9],
}

impl BufferBank {
    /// Lines preferentially fed by oven O1, in fixed scan order.
    pub const O1_GROUP: [LineId; 4] = [LineId::L1, LineId::L2, LineId::L3, LineId::L4];
    /// Lines preferentially fed by oven O2, in fixed scan order.
    pub const O2_GROUP: [LineId; 5] = [
        LineId::L5,
        LineId::L6,
        LineId::L7,
        LineId::L8,
        LineId::L9,
    ];

    /// Bank with the reference capacities (14 for L1–L4, 16 for L5–L9).
    pub fn new() -> Self {
        Self::with_capacities(O1_LINE_CAPACITY, O2_LINE_CAPACITY)
    }

    pub fn with_capacities(o1_capacity: usize, o2_capacity: usize) -> Self {
        let lines = std::array::from_fn(|i| {
            let id = LineId::ALL[i];
            let capacity = match id.preferred_oven() {
                Oven::O1 => o1_capacity,
                Oven::O2 => o2_capacity,
            };
            BufferLine::new(id, capacity)
        });
        Self { lines }
    }

    pub fn line(&self, id: LineId) -> &BufferLine {
        &self.lines[id.index()]
    }

    pub fn line_mut(&mut self, id: LineId) -> &mut BufferLine {
        &mut self.lines[id.index()]
    }

    /// All lines in fixed id order.
    pub fn lines(&self) -> impl Iterator<Item = &BufferLine> + '_ {
        self.lines.iter()
    }

    /// Total bodies currently resident across all lines.
    pub fn total_occupancy(&self) -> usize {
        self.lines.iter().map(|l| l.len()).sum()
    }

    /// Total capacity across all lines.
    pub fn total_capacity(&self) -> usize {
        self.lines.iter().map(|l| l.capacity()).sum()
    }

    /// Drop every queued body and reopen all gates.
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
            line.set_input_open(true);
            line.set_output_open(true);
        }
    }
}

impl Default for BufferBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_capacities() {
        let bank = BufferBank::new();
        for id in BufferBank::O1_GROUP {
            assert_eq!(bank.line(id).capacity(), 14);
        }
        for id in BufferBank::O2_GROUP {
            assert_eq!(bank.line(id).capacity(), 16);
        }
        assert_eq!(bank.total_capacity(), 4 * 14 + 5 * 16);
    }

    #[test]
    fn groups_partition_all_lines_in_order() {
        let mut combined: Vec<LineId> = BufferBank::O1_GROUP.to_vec();
        combined.extend(BufferBank::O2_GROUP);
        assert_eq!(combined, LineId::ALL.to_vec());
    }

    #[test]
    fn reset_clears_queues_and_reopens_gates() {
        use crate::{Body, BodyId, Color};
        let mut bank = BufferBank::new();
        bank.line_mut(LineId::L3)
            .add(Body::new(BodyId(1), Color::C2, Oven::O1))
            .unwrap();
        bank.line_mut(LineId::L7).set_input_open(false);
        bank.line_mut(LineId::L2).set_output_open(false);

        bank.reset();
        assert_eq!(bank.total_occupancy(), 0);
        for line in bank.lines() {
            assert!(line.input_open());
            assert!(line.output_open());
        }
    }
}
