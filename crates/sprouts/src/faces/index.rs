//! Face/trace index: boundary walks per face plus a dot → faces lookup.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::partition::{Corners, DisambiguationError, EmbedError};
use super::types::{DotId, Face, FaceId, Trace, TraceId};
use crate::error::IndexError;

static NO_FACES: BTreeSet<FaceId> = BTreeSet::new();

/// Result of a move between two dots that are already connected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WithinOutcome {
    /// One trace was cut in two; `new_face` is bounded by `created`.
    Split {
        new_face: FaceId,
        retained: TraceId,
        created: TraceId,
    },
    /// The dots sat on different traces of the face; those were spliced.
    Merged { trace: TraceId },
}

/// Per-face decomposition into traces with a membership index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FaceTraceIndex {
    faces: Vec<Face>,
    traces: BTreeMap<TraceId, Trace>,
    owner: BTreeMap<TraceId, FaceId>,
    #[serde(skip)]
    dot_faces: Vec<BTreeSet<FaceId>>,
    next_trace: usize,
}

impl FaceTraceIndex {
    /// `n` isolated dots inside one all-encompassing face.
    pub fn new(n: usize) -> Self {
        let mut traces = BTreeMap::new();
        let mut owner = BTreeMap::new();
        let mut outer = Face::default();
        for i in 0..n {
            let id = TraceId(i);
            traces.insert(id, Trace::singleton(DotId(i)));
            owner.insert(id, FaceId(0));
            outer.traces.push(id);
        }
        Self {
            faces: vec![outer],
            traces,
            owner,
            dot_faces: vec![BTreeSet::from([FaceId(0)]); n],
            next_trace: n,
        }
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    pub fn face(&self, id: FaceId) -> Result<&Face, IndexError> {
        self.faces.get(id.0).ok_or(IndexError::UnknownFace(id))
    }

    pub fn trace(&self, id: TraceId) -> Result<&Trace, IndexError> {
        self.traces.get(&id).ok_or(IndexError::UnknownTrace(id))
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId)
    }

    pub fn traces(&self) -> impl Iterator<Item = (TraceId, &Trace)> + '_ {
        self.traces.iter().map(|(&id, t)| (id, t))
    }

    pub fn owner_of(&self, trace: TraceId) -> Option<FaceId> {
        self.owner.get(&trace).copied()
    }

    /// Faces whose traces contain `dot`.
    pub fn faces_of(&self, dot: DotId) -> &BTreeSet<FaceId> {
        self.dot_faces.get(dot.0).unwrap_or(&NO_FACES)
    }

    /// Faces touching both dots, lowest id first. Empty means not visible.
    pub fn common_faces(&self, a: DotId, b: DotId) -> Vec<FaceId> {
        self.faces_of(a)
            .intersection(self.faces_of(b))
            .copied()
            .collect()
    }

    /// The trace of `face` containing `dot`.
    pub fn trace_containing(&self, face: FaceId, dot: DotId) -> Result<TraceId, IndexError> {
        self.face(face)?
            .traces
            .iter()
            .copied()
            .find(|t| self.traces.get(t).is_some_and(|tr| tr.contains(dot)))
            .ok_or(IndexError::MissingTrace { face, dot })
    }

    /// Every dot on the boundary of `face`.
    pub fn dots_in_face(&self, face: FaceId) -> Result<BTreeSet<DotId>, IndexError> {
        let mut out = BTreeSet::new();
        for &t in &self.face(face)?.traces {
            out.extend(self.trace(t)?.members().iter().copied());
        }
        Ok(out)
    }

    /// Traces of `face` other than `trace`: what a split of `trace` encloses.
    pub fn enclosed_by_split(&self, face: FaceId, trace: TraceId) -> Result<Vec<TraceId>, IndexError> {
        Ok(self
            .face(face)?
            .traces
            .iter()
            .copied()
            .filter(|&t| t != trace)
            .collect())
    }

    /// Join the traces holding `a` and `b` (different components) into one
    /// walk through `a → sprout → b`. The face count does not change.
    pub fn merge_across_components(
        &mut self,
        face: FaceId,
        a: DotId,
        b: DotId,
        sprout: DotId,
        corners: Corners,
    ) -> Result<TraceId, EmbedError> {
        let ta = self.trace_containing(face, a)?;
        let tb = self.trace_containing(face, b)?;
        if ta == tb {
            return Err(IndexError::SharedTrace { trace: ta, a, b }.into());
        }
        self.splice(face, (ta, a), (tb, b), sprout, corners)
    }

    /// Draw `a → sprout → b` between two connected dots on `face`.
    ///
    /// On one trace the walk is cut at the chosen corners: the arc from `a`
    /// forward to `b` bounds a new face together with the sprout, the other arc
    /// stays on `face`. Traces listed in `to_new` move with the new face. On two
    /// traces they are spliced as in the cross-component case and `to_new` must
    /// be empty.
    pub fn split_within_component(
        &mut self,
        face: FaceId,
        a: DotId,
        b: DotId,
        sprout: DotId,
        corners: Corners,
        to_new: &[TraceId],
    ) -> Result<WithinOutcome, EmbedError> {
        let ta = self.trace_containing(face, a)?;
        let tb = self.trace_containing(face, b)?;
        if ta != tb {
            if let Some(&t) = to_new.first() {
                return Err(DisambiguationError::NotEnclosed(t).into());
            }
            let trace = self.splice(face, (ta, a), (tb, b), sprout, corners)?;
            return Ok(WithinOutcome::Merged { trace });
        }

        let enclosed = self.enclosed_by_split(face, ta)?;
        if let Some(&t) = to_new.iter().find(|t| !enclosed.contains(t)) {
            return Err(DisambiguationError::NotEnclosed(t).into());
        }

        let trace = self.trace(ta)?;
        let pa = corner_position(trace, a, corners.a)?;
        let pb = if a == b {
            pa
        } else {
            corner_position(trace, b, corners.b)?
        };
        let (mut inner, mut outer) = if pa == pb {
            (vec![a], trace.closed_from(pa))
        } else {
            (trace.arc(pa, pb), trace.arc(pb, pa))
        };
        inner.push(sprout);
        outer.push(sprout);

        let stale = self.dots_in_face(face)?;
        let new_face = FaceId(self.faces.len());
        let created = self.fresh_trace_id();
        tracing::trace!(?face, ?new_face, ?inner, ?outer, "split trace");

        self.traces.insert(ta, Trace::new(outer));
        self.traces.insert(created, Trace::new(inner));
        let mut split_off = Face {
            traces: vec![created],
        };
        split_off.traces.extend_from_slice(to_new);
        self.faces[face.0].traces.retain(|t| !to_new.contains(t));
        for &t in &split_off.traces {
            self.owner.insert(t, new_face);
        }
        self.faces.push(split_off);
        self.reindex(&[face, new_face], &stale)?;

        Ok(WithinOutcome::Split {
            new_face,
            retained: ta,
            created,
        })
    }

    /// Every trace listed once, every dot on at most one trace per face, and
    /// the dot → faces lookup in sync with the traces.
    pub fn check_integrity(&self) -> Result<(), IndexError> {
        let mut listed = BTreeSet::new();
        for (fi, face) in self.faces.iter().enumerate() {
            let fid = FaceId(fi);
            if face.traces.is_empty() {
                return Err(IndexError::integrity(format!("{fid:?} has no traces")));
            }
            let mut covered = BTreeSet::new();
            for &t in &face.traces {
                if !listed.insert(t) {
                    return Err(IndexError::integrity(format!("{t:?} listed on two faces")));
                }
                if self.owner.get(&t) != Some(&fid) {
                    return Err(IndexError::integrity(format!("owner of {t:?} is not {fid:?}")));
                }
                let trace = self.trace(t)?;
                if trace.walk().is_empty() {
                    return Err(IndexError::integrity(format!("{t:?} is empty")));
                }
                for &d in trace.members() {
                    if !covered.insert(d) {
                        return Err(IndexError::integrity(format!(
                            "{d:?} appears on two traces of {fid:?}"
                        )));
                    }
                    if !self.faces_of(d).contains(&fid) {
                        return Err(IndexError::MissingTrace { face: fid, dot: d });
                    }
                }
            }
        }
        if listed.len() != self.traces.len() || self.owner.len() != self.traces.len() {
            return Err(IndexError::integrity("orphaned trace"));
        }
        for (di, faces) in self.dot_faces.iter().enumerate() {
            let dot = DotId(di);
            for &f in faces {
                self.trace_containing(f, dot)?;
            }
        }
        Ok(())
    }

    /// Drop a trace record while leaving its face listing behind.
    #[cfg(test)]
    pub(crate) fn forget_trace(&mut self, id: TraceId) {
        self.traces.remove(&id);
    }

    fn fresh_trace_id(&mut self) -> TraceId {
        let id = TraceId(self.next_trace);
        self.next_trace += 1;
        id
    }

    /// Replace `ta` with the walk `a…a → sprout → b…b → sprout` and drop `tb`.
    fn splice(
        &mut self,
        face: FaceId,
        (ta, a): (TraceId, DotId),
        (tb, b): (TraceId, DotId),
        sprout: DotId,
        corners: Corners,
    ) -> Result<TraceId, EmbedError> {
        let first = self.trace(ta)?;
        let second = self.trace(tb)?;
        let pa = corner_position(first, a, corners.a)?;
        let pb = corner_position(second, b, corners.b)?;

        let mut walk = first.closed_from(pa);
        walk.push(sprout);
        walk.extend(second.closed_from(pb));
        walk.push(sprout);
        tracing::trace!(?face, ?ta, ?tb, ?walk, "splice traces");

        let stale = self.dots_in_face(face)?;
        self.traces.insert(ta, Trace::new(walk));
        self.traces.remove(&tb);
        self.owner.remove(&tb);
        self.faces[face.0].traces.retain(|&t| t != tb);
        self.reindex(&[face], &stale)?;
        Ok(ta)
    }

    /// Recompute face membership for `stale` dots and everything now on `faces`.
    fn reindex(&mut self, faces: &[FaceId], stale: &BTreeSet<DotId>) -> Result<(), IndexError> {
        for d in stale {
            if let Some(set) = self.dot_faces.get_mut(d.0) {
                for f in faces {
                    set.remove(f);
                }
            }
        }
        for &f in faces {
            let dots = self.dots_in_face(f)?;
            for d in dots {
                if d.0 >= self.dot_faces.len() {
                    self.dot_faces.resize_with(d.0 + 1, BTreeSet::new);
                }
                self.dot_faces[d.0].insert(f);
            }
        }
        Ok(())
    }
}

fn corner_position(trace: &Trace, dot: DotId, index: usize) -> Result<usize, DisambiguationError> {
    let occ = trace.occurrences(dot);
    occ.get(index)
        .copied()
        .ok_or(DisambiguationError::CornerOutOfRange {
            dot,
            index,
            available: occ.len(),
        })
}

/// Number of corners `dot` has on the trace of `face` that contains it.
pub fn corner_count(index: &FaceTraceIndex, face: FaceId, dot: DotId) -> Result<usize, IndexError> {
    let t = index.trace_containing(face, dot)?;
    Ok(index.trace(t)?.occurrences(dot).len())
}
