//! Internal fault types.
//!
//! None of these describe an illegal move. Illegal moves come back as
//! `MoveOutcome::Rejected`; the errors here mean the planar index disagrees
//! with itself and the engine must not continue as if nothing happened.

use crate::faces::{DotId, FaceId, TraceId};

/// Face/trace bookkeeping went out of sync.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("face {face:?} is recorded as touching {dot:?} but none of its traces contain it")]
    MissingTrace { face: FaceId, dot: DotId },

    #[error("unknown face {0:?}")]
    UnknownFace(FaceId),

    #[error("unknown trace {0:?}")]
    UnknownTrace(TraceId),

    #[error("{a:?} and {b:?} lie in different components but share trace {trace:?}")]
    SharedTrace { trace: TraceId, a: DotId, b: DotId },

    #[error("integrity check failed: {reason}")]
    Integrity { reason: String },
}

impl IndexError {
    pub(crate) fn integrity(reason: impl Into<String>) -> Self {
        Self::Integrity {
            reason: reason.into(),
        }
    }
}

/// Fatal engine fault surfaced by `connect` and friends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("face index corrupted: {0}")]
    Index(#[from] IndexError),

    #[error("all {candidates} legal pair(s) were rejected")]
    Stalled { candidates: usize },

    #[error("max_degree {max_degree} is below {min}, the degree every sprout is born with")]
    InvalidRules { max_degree: u8, min: u8 },
}
