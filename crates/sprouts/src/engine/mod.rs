//! Sprouts engine: move validation and commit.
//!
//! A move runs `degree check → visibility check → embedding update (cross or
//! within component) → Euler check` on a clone of the committed board and is
//! swapped in only when every stage passes. Ambiguities in the embedding (which
//! face, which corner, which side each enclosed trace lands on) are answered by
//! an injected `Disambiguator`.

mod choice;
mod connect;
mod types;

pub use choice::{Choice, CornerQuery, Disambiguator, FaceQuery, SplitQuery};
pub use connect::SproutsEngine;
pub use types::{
    Board, FaceView, MoveOutcome, MoveRecord, RejectReason, RuleCfg, Snapshot, TraceView,
};

#[cfg(test)]
mod tests;
