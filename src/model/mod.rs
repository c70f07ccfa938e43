//! Canonical data structures for the triage pipeline.
//!
//! Loosely-shaped CycloneDX input is normalized into these structures once,
//! at the boundary; everything downstream (aggregation, analytics, snapshot
//! assembly) operates only on them.

mod finding;
mod severity;
mod snapshot;

pub use finding::*;
pub use severity::*;
pub use snapshot::*;
