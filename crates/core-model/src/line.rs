//! Bounded FIFO buffer lines with operator-controlled gates.

use crate::{Body, Color, Oven};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Identifier of one of the nine buffer lines.
///
/// Declaration order is the fixed iteration order used by every
/// deterministic policy, and `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LineId {
    L1,
    L2,
    L3,
    L4,
    L5,
    L6,
    L7,
    L8,
    L9,
}

impl LineId {
    /// All nine lines in fixed order.
    pub const ALL: [LineId; 9] = [
        LineId::L1,
        LineId::L2,
        LineId::L3,
        LineId::L4,
        LineId::L5,
        LineId::L6,
        LineId::L7,
        LineId::L8,
        LineId::L9,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            LineId::L1 => "L1",
            LineId::L2 => "L2",
            LineId::L3 => "L3",
            LineId::L4 => "L4",
            LineId::L5 => "L5",
            LineId::L6 => "L6",
            LineId::L7 => "L7",
            LineId::L8 => "L8",
            LineId::L9 => "L9",
        }
    }

    /// Dense index into bank storage (`L1 == 0` .. `L9 == 8`).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The oven whose bodies this line preferentially receives.
    pub const fn preferred_oven(self) -> Oven {
        match self {
            LineId::L1 | LineId::L2 | LineId::L3 | LineId::L4 => Oven::O1,
            _ => Oven::O2,
        }
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown line id '{0}'")]
pub struct ParseLineIdError(pub String);

impl FromStr for LineId {
    type Err = ParseLineIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LineId::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ParseLineIdError(s.to_string()))
    }
}

/// One bounded FIFO buffer line between the ovens and the main conveyor.
///
/// Bodies enter at the tail via [`BufferLine::add`] and leave at the head via
/// [`BufferLine::remove`]. The operator can close either end independently:
/// a closed input gate refuses new bodies, a closed output gate refuses
/// dequeues. Gates never disturb queue contents.
#[derive(Debug, Clone)]
pub struct BufferLine {
    id: LineId,
    capacity: usize,
    queue: VecDeque<Body>,
    input_open: bool,
    output_open: bool,
}

impl BufferLine {
    pub fn new(id: LineId, capacity: usize) -> Self {
        debug_assert!(capacity > 0, "line capacity must be positive");
        Self {
            id,
            capacity,
            queue: VecDeque::with_capacity(capacity),
            input_open: true,
            output_open: true,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.queue.len()
    }

    pub fn input_open(&self) -> bool {
        self.input_open
    }

    pub fn output_open(&self) -> bool {
        self.output_open
    }

    pub fn set_input_open(&mut self, open: bool) {
        self.input_open = open;
    }

    pub fn set_output_open(&mut self, open: bool) {
        self.output_open = open;
    }

    /// True when a new body could be enqueued right now (gate open, not full).
    pub fn can_accept(&self) -> bool {
        self.input_open && !self.is_full()
    }

    /// Append a body at the tail. On refusal (closed input gate or full
    /// line) the body is handed back untouched; the queue is never left in a
    /// partial state.
    pub fn add(&mut self, body: Body) -> Result<(), Body> {
        if !self.can_accept() {
            return Err(body);
        }
        self.queue.push_back(body);
        debug_assert!(self.queue.len() <= self.capacity);
        Ok(())
    }

    /// Pop the head body. Yields `None` when the output gate is closed or
    /// the line is empty.
    pub fn remove(&mut self) -> Option<Body> {
        if !self.output_open {
            return None;
        }
        self.queue.pop_front()
    }

    pub fn head(&self) -> Option<&Body> {
        self.queue.front()
    }

    pub fn tail(&self) -> Option<&Body> {
        self.queue.back()
    }

    pub fn head_color(&self) -> Option<Color> {
        self.head().map(|b| b.color)
    }

    pub fn tail_color(&self) -> Option<Color> {
        self.tail().map(|b| b.color)
    }

    /// Length of the maximal same-color run at the head (the prefix the
    /// extractor could release without a changeover). 0 if empty.
    pub fn head_run_length(&self) -> usize {
        match self.head_color() {
            Some(color) => self.queue.iter().take_while(|b| b.color == color).count(),
            None => 0,
        }
    }

    /// Count of trailing bodies sharing the tail color. 0 if empty.
    pub fn rear_run_length(&self) -> usize {
        match self.tail_color() {
            Some(color) => self
                .queue
                .iter()
                .rev()
                .take_while(|b| b.color == color)
                .count(),
            None => 0,
        }
    }

    /// Non-empty and every body has the given color.
    pub fn fully_one_color(&self, color: Color) -> bool {
        !self.queue.is_empty() && self.queue.iter().all(|b| b.color == color)
    }

    /// Non-empty and the tail body has the given color.
    pub fn ends_with(&self, color: Color) -> bool {
        self.tail_color() == Some(color)
    }

    /// Queue colors head-to-tail, for snapshots and tests.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.queue.iter().map(|b| b.color)
    }

    /// Queue bodies head-to-tail.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.queue.iter()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BodyId;

    fn body(id: u64, color: Color) -> Body {
        Body::new(BodyId(id), color, Oven::O1)
    }

    fn line_with(colors: &[Color]) -> BufferLine {
        let mut line = BufferLine::new(LineId::L1, 14);
        for (i, &c) in colors.iter().enumerate() {
            line.add(body(i as u64, c)).unwrap();
        }
        line
    }

    #[test]
    fn add_respects_capacity_and_gate() {
        let mut line = BufferLine::new(LineId::L1, 2);
        assert!(line.add(body(1, Color::C1)).is_ok());
        assert!(line.add(body(2, Color::C1)).is_ok());
        let rejected = line.add(body(3, Color::C1)).unwrap_err();
        assert_eq!(rejected.id, BodyId(3));
        assert_eq!(line.len(), 2);

        let mut gated = BufferLine::new(LineId::L2, 2);
        gated.set_input_open(false);
        assert!(gated.add(body(4, Color::C2)).is_err());
        assert!(gated.is_empty());
    }

    #[test]
    fn remove_respects_output_gate_and_fifo_order() {
        let mut line = line_with(&[Color::C1, Color::C2, Color::C3]);
        line.set_output_open(false);
        assert!(line.remove().is_none());
        line.set_output_open(true);
        assert_eq!(line.remove().unwrap().color, Color::C1);
        assert_eq!(line.remove().unwrap().color, Color::C2);
        assert_eq!(line.remove().unwrap().color, Color::C3);
        assert!(line.remove().is_none());
    }

    #[test]
    fn run_length_predicates() {
        let line = line_with(&[Color::C1, Color::C1, Color::C2, Color::C2, Color::C2]);
        assert_eq!(line.head_run_length(), 2);
        assert_eq!(line.rear_run_length(), 3);
        assert!(line.ends_with(Color::C2));
        assert!(!line.ends_with(Color::C1));
        assert!(!line.fully_one_color(Color::C1));

        let pure = line_with(&[Color::C4, Color::C4]);
        assert!(pure.fully_one_color(Color::C4));
        assert!(!pure.fully_one_color(Color::C5));

        let empty = BufferLine::new(LineId::L9, 16);
        assert_eq!(empty.head_run_length(), 0);
        assert_eq!(empty.rear_run_length(), 0);
        assert!(!empty.fully_one_color(Color::C1));
        assert!(!empty.ends_with(Color::C1));
    }

    #[test]
    fn line_id_order_matches_declaration() {
        let mut sorted = LineId::ALL;
        sorted.sort();
        assert_eq!(sorted, LineId::ALL);
        assert_eq!(LineId::L1.index(), 0);
        assert_eq!(LineId::L9.index(), 8);
    }
}
