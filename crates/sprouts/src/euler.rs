//! Per-component Euler characteristic check (`v − e + f = 2`).

use std::collections::BTreeSet;

use serde::Serialize;

use crate::components::ComponentTracker;
use crate::faces::{DotId, FaceTraceIndex};

/// Vertex/edge/face tallies for one connected component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EulerCounts {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

impl EulerCounts {
    #[inline]
    pub fn characteristic(&self) -> i64 {
        self.vertices as i64 - self.edges as i64 + self.faces as i64
    }

    #[inline]
    pub fn holds(&self) -> bool {
        self.characteristic() == 2
    }
}

/// Count `v`, `e`, `f` for the component containing `dot`.
///
/// Edges come from halving the degree sum (each edge counted at both ends,
/// a self-loop twice at its dot). Faces are the distinct faces touching any
/// dot of the component.
pub fn component_counts(
    dot: DotId,
    tracker: &mut ComponentTracker,
    degrees: &[u8],
    index: &FaceTraceIndex,
) -> EulerCounts {
    let dots = tracker.members(dot);
    let mut faces = BTreeSet::new();
    let mut degree_sum = 0usize;
    for &d in &dots {
        faces.extend(index.faces_of(d).iter().copied());
        degree_sum += usize::from(degrees.get(d.0).copied().unwrap_or(0));
    }
    EulerCounts {
        vertices: dots.len(),
        edges: degree_sum / 2,
        faces: faces.len(),
    }
}

/// `true` when the component containing `dot` satisfies Euler's formula.
pub fn check_component(
    dot: DotId,
    tracker: &mut ComponentTracker,
    degrees: &[u8],
    index: &FaceTraceIndex,
) -> bool {
    component_counts(dot, tracker, degrees, index).holds()
}
