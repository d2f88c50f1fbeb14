//! The twelve paint tags and their reference production shares.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the twelve paint colors the ovens emit.
///
/// The tags are opaque identifiers; the only ordering that matters anywhere
/// is the declaration order, which doubles as the sampling order for the
/// reference distribution (see [`Color::weight`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Color {
    C1,
    C2,
    C3,
    C4,
    C5,
    C6,
    C7,
    C8,
    C9,
    C10,
    C11,
    C12,
}

impl Color {
    /// All colors in sampling order.
    pub const ALL: [Color; 12] = [
        Color::C1,
        Color::C2,
        Color::C3,
        Color::C4,
        Color::C5,
        Color::C6,
        Color::C7,
        Color::C8,
        Color::C9,
        Color::C10,
        Color::C11,
        Color::C12,
    ];

    /// Dense index into per-color tables (`C1 == 0` .. `C12 == 11`).
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Color::C1 => "C1",
            Color::C2 => "C2",
            Color::C3 => "C3",
            Color::C4 => "C4",
            Color::C5 => "C5",
            Color::C6 => "C6",
            Color::C7 => "C7",
            Color::C8 => "C8",
            Color::C9 => "C9",
            Color::C10 => "C10",
            Color::C11 => "C11",
            Color::C12 => "C12",
        }
    }

    /// Reference share of production for this color. The weighted color
    /// source samples by cumulative threshold in `ALL` order; the published
    /// shares overshoot the unit interval by 0.01, so the final color
    /// absorbs the rounding residue.
    pub const fn weight(self) -> f64 {
        match self {
            Color::C1 => 0.20,
            Color::C2 => 0.25,
            Color::C3 => 0.12,
            Color::C4 => 0.20,
            Color::C5 => 0.03,
            Color::C6 => 0.02,
            Color::C7 => 0.02,
            Color::C8 => 0.02,
            Color::C9 => 0.10,
            Color::C10 => 0.02,
            Color::C11 => 0.02,
            Color::C12 => 0.01,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color tag '{0}'")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseColorError(s.to_string()))
    }
}
