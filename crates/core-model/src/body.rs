//! Vehicle bodies and their origin ovens.

use crate::Color;
use serde::Serialize;
use std::fmt;

/// Which upstream paint oven emitted a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Oven {
    O1,
    O2,
}

impl Oven {
    pub const fn as_str(self) -> &'static str {
        match self {
            Oven::O1 => "O1",
            Oven::O2 => "O2",
        }
    }
}

impl fmt::Display for Oven {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monotonic body identifier, assigned by the engine at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One painted vehicle body. Immutable after creation; ownership moves
/// between exactly one holder at a time (oven slot, a buffer line queue, the
/// O2 staging queue, or the conveyor history log).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Body {
    pub id: BodyId,
    pub color: Color,
    pub origin: Oven,
}

impl Body {
    pub fn new(id: BodyId, color: Color, origin: Oven) -> Self {
        Self { id, color, origin }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.id, self.color, self.origin)
    }
}
