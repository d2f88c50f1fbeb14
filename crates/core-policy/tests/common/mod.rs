#![allow(dead_code)] // Shared across test binaries; each uses a subset of helpers.

use core_model::{Body, BodyId, BufferBank, Color, LineId, Oven};

static NEXT_ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

pub fn o1_body(color: Color) -> Body {
    body(color, Oven::O1)
}

pub fn o2_body(color: Color) -> Body {
    body(color, Oven::O2)
}

pub fn body(color: Color, origin: Oven) -> Body {
    let id = NEXT_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    Body::new(BodyId(id), color, origin)
}

/// Append bodies of the given colors to a line, bypassing nothing: the line
/// must be open and have room.
pub fn fill(bank: &mut BufferBank, line: LineId, colors: &[Color]) {
    for &color in colors {
        let origin = line.preferred_oven();
        bank.line_mut(line)
            .add(body(color, origin))
            .expect("test fill must fit");
    }
}

/// Fill a line to capacity with one color.
pub fn saturate(bank: &mut BufferBank, line: LineId, color: Color) {
    while !bank.line(line).is_full() {
        fill(bank, line, &[color]);
    }
}

/// Close the input gate on every line of the given group.
pub fn close_inputs(bank: &mut BufferBank, group: &[LineId]) {
    for &id in group {
        bank.line_mut(id).set_input_open(false);
    }
}
