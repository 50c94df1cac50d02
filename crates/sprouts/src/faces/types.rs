//! Identifier newtypes and the trace/face records.
//!
//! A trace is a closed boundary walk. A single element is an isolated dot; for
//! two or more elements every consecutive pair is a drawn edge and the last
//! element connects back to the first.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identifier types for clarity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DotId(pub usize);
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FaceId(pub usize);
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TraceId(pub usize);

/// One contiguous boundary walk plus a membership set over the same dots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Trace {
    walk: Vec<DotId>,
    #[serde(skip)]
    members: BTreeSet<DotId>,
}

impl Trace {
    pub fn new(walk: Vec<DotId>) -> Self {
        let members = walk.iter().copied().collect();
        Self { walk, members }
    }

    /// Trivial trace of an isolated dot.
    pub fn singleton(dot: DotId) -> Self {
        Self::new(vec![dot])
    }

    #[inline]
    pub fn walk(&self) -> &[DotId] {
        &self.walk
    }

    #[inline]
    pub fn members(&self) -> &BTreeSet<DotId> {
        &self.members
    }

    #[inline]
    pub fn contains(&self, dot: DotId) -> bool {
        self.members.contains(&dot)
    }

    /// Positions of `dot` in the walk. A degree-d dot shows up at most d times
    /// across all walks (once if isolated).
    pub fn occurrences(&self, dot: DotId) -> Vec<usize> {
        self.walk
            .iter()
            .enumerate()
            .filter_map(|(i, &d)| (d == dot).then_some(i))
            .collect()
    }

    /// The walk read starting at position `start`.
    pub(crate) fn rotated(&self, start: usize) -> Vec<DotId> {
        let mut out = Vec::with_capacity(self.walk.len());
        out.extend_from_slice(&self.walk[start..]);
        out.extend_from_slice(&self.walk[..start]);
        out
    }

    /// Inclusive forward arc from `from` to `to`. Equal positions give the
    /// single-dot arc.
    pub(crate) fn arc(&self, from: usize, to: usize) -> Vec<DotId> {
        let n = self.walk.len();
        let mut out = Vec::new();
        let mut i = from;
        loop {
            out.push(self.walk[i]);
            if i == to {
                break;
            }
            i = (i + 1) % n;
        }
        out
    }

    /// Closed walk that starts and ends at position `start` (the full loop).
    /// For a singleton this is just the dot itself.
    pub(crate) fn closed_from(&self, start: usize) -> Vec<DotId> {
        let mut out = self.rotated(start);
        if self.walk.len() > 1 {
            out.push(self.walk[start]);
        }
        out
    }

    /// Each undirected edge along the walk, in walk order.
    pub fn edges(&self) -> Vec<(DotId, DotId)> {
        let n = self.walk.len();
        if n < 2 {
            return Vec::new();
        }
        (0..n)
            .map(|i| (self.walk[i], self.walk[(i + 1) % n]))
            .collect()
    }
}

/// A planar region; its boundary is the ordered list of traces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Face {
    pub(crate) traces: Vec<TraceId>,
}

impl Face {
    #[inline]
    pub fn traces(&self) -> &[TraceId] {
        &self.traces
    }
}
