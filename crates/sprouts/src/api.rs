//! Curated surface for tools built on the engine (renderers, game loops, CLI).
//!
//! Prefer these re-exports over reaching into submodules; internals move.

// Engine
pub use crate::engine::{
    Board, Choice, CornerQuery, Disambiguator, FaceQuery, FaceView, MoveOutcome, MoveRecord,
    RejectReason, RuleCfg, Snapshot, SplitQuery, SproutsEngine, TraceView,
};
// Planar bookkeeping
pub use crate::components::ComponentTracker;
pub use crate::euler::{check_component, component_counts, EulerCounts};
pub use crate::faces::{
    Corners, DisambiguationError, DotId, FaceId, FaceTraceIndex, Partition, SplitPolicy, TraceId,
};
// Random playouts
pub use crate::playout::{random_game, random_move, GameRecord, RandomOracle, ReplayToken};
// Faults
pub use crate::error::{EngineError, IndexError};
