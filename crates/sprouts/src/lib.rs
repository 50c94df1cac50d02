//! Sprouts move validation and planar-structure maintenance.
//!
//! Players alternately draw a curve between two spots (or from a spot back to
//! itself) without crossing earlier curves, and place a new spot on it; no
//! spot may carry more than three curve ends. This crate decides whether a
//! proposed move is legal and keeps the planar subdivision (graph, faces,
//! boundary walks) consistent for the moves that follow.
//!
//! Layout
//! - `components`: union-find over dots.
//! - `faces`: per-face boundary traces and the dot → faces index.
//! - `euler`: `v − e + f = 2` per component.
//! - `engine`: staged move application and commit.
//! - `playout`: seeded random playouts.
//!
//! Rendering, move input and the turn loop live with callers; they read
//! `Snapshot`s and answer `Disambiguator` queries.

pub mod api;
pub mod components;
pub mod engine;
pub mod error;
pub mod euler;
pub mod faces;
pub mod playout;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use engine::{Choice, MoveOutcome, RejectReason, RuleCfg, Snapshot, SproutsEngine};
pub use error::{EngineError, IndexError};
pub use faces::{DotId, FaceId, TraceId};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::engine::{
        Choice, Disambiguator, MoveOutcome, RejectReason, RuleCfg, Snapshot, SproutsEngine,
    };
    pub use crate::faces::{Corners, DotId, FaceId, Partition, SplitPolicy, TraceId};
}
