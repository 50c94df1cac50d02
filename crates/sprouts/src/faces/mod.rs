//! Face/trace bookkeeping for the planar embedding.
//!
//! Purpose
//! - Keep, per face, the ordered boundary walks ("traces") of every component
//!   adjoining it, and a dot → faces index for visibility queries.
//! - Rewrite those walks when a curve is drawn: splice two traces when the curve
//!   joins two components, cut one trace in two (creating a face) when it closes
//!   a cycle.
//!
//! Model
//! - A connected component adjoining a face contributes exactly one trace to it,
//!   so traces of one face never share dots.
//! - Enclosure is never inferred geometrically. Which traces end up inside a
//!   newly closed region is supplied by the caller as a `Partition`.
//!
//! Layout: `types.rs` (ids, `Trace`, `Face`), `index.rs` (the index and its
//! rewrites), `partition.rs` (caller answers and their validation).

mod index;
mod partition;
mod types;

pub use index::{corner_count, FaceTraceIndex, WithinOutcome};
pub use partition::{
    resolve_partition, Corners, DisambiguationError, EmbedError, Partition, SplitPolicy,
};
pub use types::{DotId, Face, FaceId, Trace, TraceId};
