//! Read-only reporting surface.
//!
//! Snapshots freeze an engine's observable state into plain serializable
//! shapes for the dashboard, and the text module renders the shift report
//! the plant prints at the end of a run. Presentation stays out of the
//! engines entirely; this crate only reads.

mod snapshot;
mod text;

pub use snapshot::{
    ComparisonSnapshot, ConveyorRecord, EngineSnapshot, LineSnapshot, TimeSnapshot,
};
pub use text::render_report;
