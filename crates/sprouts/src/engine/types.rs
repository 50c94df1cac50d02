//! Board state, configuration, outcomes and the read-only snapshot.

use serde::{Deserialize, Serialize};

use crate::components::ComponentTracker;
use crate::error::{EngineError, IndexError};
use crate::euler::EulerCounts;
use crate::faces::{DisambiguationError, DotId, FaceId, FaceTraceIndex, SplitPolicy, TraceId};

/// Rule configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCfg {
    /// Connections a dot may carry; a self-loop uses two.
    pub max_degree: u8,
    pub split_policy: SplitPolicy,
    /// Run the full index integrity check on every staged state.
    pub verify_integrity: bool,
}

impl RuleCfg {
    /// Degree of a freshly placed sprout: one curve end on each side.
    pub const SPROUT_DEGREE: u8 = 2;

    /// A sprout must fit under the cap the moment it is placed.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_degree < Self::SPROUT_DEGREE {
            return Err(EngineError::InvalidRules {
                max_degree: self.max_degree,
                min: Self::SPROUT_DEGREE,
            });
        }
        Ok(())
    }

    /// `true` when a dot at `degree` can take `needed` more curve ends.
    #[inline]
    pub fn has_room(&self, degree: u8, needed: u8) -> bool {
        u16::from(degree) + u16::from(needed) <= u16::from(self.max_degree)
    }
}

impl Default for RuleCfg {
    fn default() -> Self {
        Self {
            max_degree: 3,
            split_policy: SplitPolicy::RequireChoice,
            verify_integrity: cfg!(debug_assertions),
        }
    }
}

/// Everything a move reads or writes. Cloned wholesale to stage a move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Board {
    pub(crate) degrees: Vec<u8>,
    pub(crate) edges: Vec<(DotId, DotId)>,
    pub(crate) components: ComponentTracker,
    pub(crate) index: FaceTraceIndex,
}

impl Board {
    pub fn new(n: usize) -> Self {
        Self {
            degrees: vec![0; n],
            edges: Vec::new(),
            components: ComponentTracker::new(n),
            index: FaceTraceIndex::new(n),
        }
    }

    #[inline]
    pub fn dot_count(&self) -> usize {
        self.degrees.len()
    }

    #[inline]
    pub fn degree(&self, dot: DotId) -> Option<u8> {
        self.degrees.get(dot.0).copied()
    }

    #[inline]
    pub fn degrees(&self) -> &[u8] {
        &self.degrees
    }

    #[inline]
    pub fn edges(&self) -> &[(DotId, DotId)] {
        &self.edges
    }

    #[inline]
    pub fn components(&self) -> &ComponentTracker {
        &self.components
    }

    #[inline]
    pub fn index(&self) -> &FaceTraceIndex {
        &self.index
    }

    /// Graph half of a move: the sprout, its two edges, degrees, components.
    pub(crate) fn add_sprout(&mut self, a: DotId, b: DotId) -> DotId {
        let sprout = self.components.add_singleton();
        debug_assert_eq!(sprout.0, self.degrees.len());
        self.degrees.push(RuleCfg::SPROUT_DEGREE);
        self.edges.push((a, sprout));
        self.edges.push((sprout, b));
        self.degrees[a.0] += 1;
        self.degrees[b.0] += 1;
        self.components.union(a, sprout);
        self.components.union(b, sprout);
        sprout
    }
}

/// Why a proposed move was refused. Committed state is untouched in every case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    UnknownDot(DotId),
    DegreeOverflow { dot: DotId, degree: u8 },
    NoCommonFace,
    InvalidDisambiguation(DisambiguationError),
    /// The staged embedding broke `v − e + f = 2`: an engine defect, not a
    /// user error.
    EulerViolation(EulerCounts),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    Committed(DotId),
    Rejected(RejectReason),
}

impl MoveOutcome {
    #[inline]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    #[inline]
    pub fn sprout(&self) -> Option<DotId> {
        match self {
            Self::Committed(d) => Some(*d),
            Self::Rejected(_) => None,
        }
    }
}

/// One committed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub a: DotId,
    pub b: DotId,
    pub face: FaceId,
    pub sprout: DotId,
    /// Set when the move closed a region.
    pub new_face: Option<FaceId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceView {
    pub id: TraceId,
    pub walk: Vec<DotId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FaceView {
    pub id: FaceId,
    pub traces: Vec<TraceView>,
}

/// Owned copy of the committed state for renderers and game loops.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub dot_count: usize,
    pub degrees: Vec<u8>,
    pub dot_faces: Vec<Vec<FaceId>>,
    /// Component root per dot.
    pub components: Vec<DotId>,
    pub faces: Vec<FaceView>,
}

impl Snapshot {
    pub(crate) fn of(board: &Board) -> Result<Self, IndexError> {
        let n = board.dot_count();
        let index = &board.index;
        let mut faces = Vec::with_capacity(index.face_count());
        for id in index.face_ids() {
            let mut traces = Vec::new();
            for &t in index.face(id)?.traces() {
                traces.push(TraceView {
                    id: t,
                    walk: index.trace(t)?.walk().to_vec(),
                });
            }
            faces.push(FaceView { id, traces });
        }
        Ok(Self {
            dot_count: n,
            degrees: board.degrees.clone(),
            dot_faces: (0..n)
                .map(|i| index.faces_of(DotId(i)).iter().copied().collect())
                .collect(),
            components: (0..n)
                .map(|i| board.components.root_of(DotId(i)))
                .collect(),
            faces,
        })
    }

    pub fn total_degree(&self) -> usize {
        self.degrees.iter().map(|&d| usize::from(d)).sum()
    }
}
