//! Caller-side answers for ambiguous embeddings and their validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::types::{DotId, FaceId, TraceId};
use crate::error::IndexError;

/// How traces enclosed by a face split are redistributed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Every enclosed trace must be assigned explicitly.
    #[default]
    RequireChoice,
    /// Unassigned traces stay on the original face.
    KeepOnOriginal,
}

/// Side assignment for the traces enclosed by a split.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    #[serde(default)]
    pub new_face: Vec<TraceId>,
    #[serde(default)]
    pub old_face: Vec<TraceId>,
}

impl Partition {
    pub fn to_new(traces: impl IntoIterator<Item = TraceId>) -> Self {
        Self {
            new_face: traces.into_iter().collect(),
            old_face: Vec::new(),
        }
    }

    pub fn to_old(traces: impl IntoIterator<Item = TraceId>) -> Self {
        Self {
            new_face: Vec::new(),
            old_face: traces.into_iter().collect(),
        }
    }

    /// Check the answer against the enclosed set and return the traces that
    /// move to the new face, in `enclosed` order.
    pub fn resolve(
        &self,
        enclosed: &[TraceId],
        policy: SplitPolicy,
    ) -> Result<Vec<TraceId>, DisambiguationError> {
        let candidates: BTreeSet<TraceId> = enclosed.iter().copied().collect();
        let mut seen = BTreeSet::new();
        for &t in self.new_face.iter().chain(&self.old_face) {
            if !candidates.contains(&t) {
                return Err(DisambiguationError::NotEnclosed(t));
            }
            if !seen.insert(t) {
                return Err(DisambiguationError::Duplicate(t));
            }
        }
        if policy == SplitPolicy::RequireChoice {
            if let Some(&t) = enclosed.iter().find(|t| !seen.contains(t)) {
                return Err(DisambiguationError::Unassigned(t));
            }
        }
        let moving: BTreeSet<TraceId> = self.new_face.iter().copied().collect();
        Ok(enclosed
            .iter()
            .copied()
            .filter(|t| moving.contains(t))
            .collect())
    }
}

/// Resolve a possibly absent partition under `policy`.
pub fn resolve_partition(
    partition: Option<&Partition>,
    enclosed: &[TraceId],
    policy: SplitPolicy,
) -> Result<Vec<TraceId>, DisambiguationError> {
    match partition {
        Some(p) => p.resolve(enclosed, policy),
        None if enclosed.is_empty() || policy == SplitPolicy::KeepOnOriginal => Ok(Vec::new()),
        None => Err(DisambiguationError::MissingPartition {
            enclosed: enclosed.len(),
        }),
    }
}

/// Which occurrence of each endpoint the new curve attaches to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corners {
    pub a: usize,
    pub b: usize,
}

/// Why a caller-supplied disambiguation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum DisambiguationError {
    #[error("split encloses {enclosed} trace(s) but no partition was supplied")]
    MissingPartition { enclosed: usize },

    #[error("trace {0:?} is not enclosed by this split")]
    NotEnclosed(TraceId),

    #[error("trace {0:?} assigned more than once")]
    Duplicate(TraceId),

    #[error("trace {0:?} left unassigned")]
    Unassigned(TraceId),

    #[error("{dot:?} has {available} corner(s) on this trace, got index {index}")]
    CornerOutOfRange {
        dot: DotId,
        index: usize,
        available: usize,
    },

    #[error("face {0:?} is not shared by both dots")]
    FaceNotShared(FaceId),
}

/// Failure while rewriting the embedding: a refused answer or a broken index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbedError {
    #[error(transparent)]
    Rejected(#[from] DisambiguationError),
    #[error(transparent)]
    Index(#[from] IndexError),
}
