//! Move application: stage on a copy of the board, validate, then swap in.

use std::collections::{BTreeMap, BTreeSet};

use super::choice::{Choice, CornerQuery, Disambiguator, FaceQuery, SplitQuery};
use super::types::{Board, MoveOutcome, MoveRecord, RejectReason, RuleCfg, Snapshot, TraceView};
use crate::error::EngineError;
use crate::euler;
use crate::faces::{
    corner_count, resolve_partition, DisambiguationError, DotId, EmbedError, FaceId,
    WithinOutcome,
};

/// Result of running every stage of a move against a scratch board.
enum Staged {
    Ready { board: Board, record: MoveRecord },
    Rejected(RejectReason),
}

/// Sprouts move validator and planar-structure maintainer.
///
/// Single writer: moves are serialized by `&mut self`. A rejected move leaves
/// the committed board exactly as it was.
#[derive(Clone, Debug)]
pub struct SproutsEngine {
    board: Board,
    cfg: RuleCfg,
    history: Vec<MoveRecord>,
}

impl SproutsEngine {
    /// `n` seed dots of degree 0 in one face.
    pub fn new(n: usize) -> Self {
        Self {
            board: Board::new(n),
            cfg: RuleCfg::default(),
            history: Vec::new(),
        }
    }

    /// Like `new` with custom rules. Fails when `cfg.max_degree` cannot hold
    /// a fresh sprout.
    pub fn with_cfg(n: usize, cfg: RuleCfg) -> Result<Self, EngineError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            ..Self::new(n)
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[inline]
    pub fn cfg(&self) -> &RuleCfg {
        &self.cfg
    }

    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    #[inline]
    pub fn dot_count(&self) -> usize {
        self.board.dot_count()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.board.index.face_count()
    }

    pub fn degree(&self, dot: DotId) -> Option<u8> {
        self.board.degree(dot)
    }

    pub fn faces_of(&self, dot: DotId) -> &BTreeSet<FaceId> {
        self.board.index.faces_of(dot)
    }

    pub fn common_faces(&self, a: DotId, b: DotId) -> Vec<FaceId> {
        self.board.index.common_faces(a, b)
    }

    pub fn dots_in_face(&self, face: FaceId) -> Result<BTreeSet<DotId>, EngineError> {
        Ok(self.board.index.dots_in_face(face)?)
    }

    /// Dots connected to `dot`, in increasing id order.
    pub fn dots_in_component(&self, dot: DotId) -> Vec<DotId> {
        let uf = &self.board.components;
        let root = uf.root_of(dot);
        (0..self.dot_count())
            .map(DotId)
            .filter(|&d| uf.root_of(d) == root)
            .collect()
    }

    /// Connections still available across the board. Every committed move
    /// lowers this by exactly one.
    pub fn remaining_lives(&self) -> usize {
        let max = usize::from(self.cfg.max_degree);
        self.board
            .degrees
            .iter()
            .map(|&d| max.saturating_sub(usize::from(d)))
            .sum()
    }

    /// Owned copy of the committed state. Fails only on a corrupted index.
    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        Ok(Snapshot::of(&self.board)?)
    }

    /// Apply a move with optional scripted answers.
    pub fn connect(
        &mut self,
        a: DotId,
        b: DotId,
        choice: Option<&Choice>,
    ) -> Result<MoveOutcome, EngineError> {
        let mut scripted = choice.cloned().unwrap_or_default();
        self.connect_with(a, b, &mut scripted)
    }

    /// Apply a move, asking `oracle` whenever the embedding is ambiguous.
    pub fn connect_with(
        &mut self,
        a: DotId,
        b: DotId,
        oracle: &mut dyn Disambiguator,
    ) -> Result<MoveOutcome, EngineError> {
        match self.stage(a, b, oracle)? {
            Staged::Ready { board, record } => {
                tracing::debug!(
                    a = a.0,
                    b = b.0,
                    face = record.face.0,
                    sprout = record.sprout.0,
                    new_face = ?record.new_face,
                    "commit"
                );
                self.board = board;
                self.history.push(record);
                Ok(MoveOutcome::Committed(record.sprout))
            }
            Staged::Rejected(reason) => {
                tracing::debug!(a = a.0, b = b.0, ?reason, "reject");
                Ok(MoveOutcome::Rejected(reason))
            }
        }
    }

    /// Run every stage of a move without committing it.
    pub fn check_move(
        &self,
        a: DotId,
        b: DotId,
        oracle: &mut dyn Disambiguator,
    ) -> Result<MoveOutcome, EngineError> {
        Ok(match self.stage(a, b, oracle)? {
            Staged::Ready { record, .. } => MoveOutcome::Committed(record.sprout),
            Staged::Rejected(reason) => MoveOutcome::Rejected(reason),
        })
    }

    /// `true` while some move is still possible: a dot with room for a
    /// self-loop, or two dots with a free connection each on a common face.
    pub fn can_connect(&self) -> bool {
        let degrees = &self.board.degrees;
        if degrees.iter().any(|&d| self.cfg.has_room(d, 2)) {
            return true;
        }
        let mut seen: BTreeMap<FaceId, DotId> = BTreeMap::new();
        for (i, &deg) in degrees.iter().enumerate() {
            if !self.cfg.has_room(deg, 1) {
                continue;
            }
            for &f in self.board.index.faces_of(DotId(i)) {
                if seen.insert(f, DotId(i)).is_some() {
                    return true;
                }
            }
        }
        false
    }

    /// Every unordered pair (self-loops included) that passes the degree and
    /// visibility checks, lowest ids first.
    pub fn legal_pairs(&self) -> Vec<(DotId, DotId)> {
        let degrees = &self.board.degrees;
        let mut by_face: BTreeMap<FaceId, Vec<DotId>> = BTreeMap::new();
        let mut pairs = BTreeSet::new();
        for (i, &deg) in degrees.iter().enumerate() {
            let dot = DotId(i);
            if self.cfg.has_room(deg, 2) {
                pairs.insert((dot, dot));
            }
            if self.cfg.has_room(deg, 1) {
                for &f in self.board.index.faces_of(dot) {
                    by_face.entry(f).or_default().push(dot);
                }
            }
        }
        for dots in by_face.values() {
            for (k, &x) in dots.iter().enumerate() {
                for &y in &dots[k + 1..] {
                    pairs.insert((x, y));
                }
            }
        }
        pairs.into_iter().collect()
    }

    fn degree_check(&self, a: DotId, b: DotId) -> Option<RejectReason> {
        let overflow = |dot: DotId, needed: u8| {
            let degree = self.board.degrees[dot.0];
            (!self.cfg.has_room(degree, needed))
                .then_some(RejectReason::DegreeOverflow { dot, degree })
        };
        if a == b {
            overflow(a, 2)
        } else {
            overflow(a, 1).or_else(|| overflow(b, 1))
        }
    }

    fn stage(
        &self,
        a: DotId,
        b: DotId,
        oracle: &mut dyn Disambiguator,
    ) -> Result<Staged, EngineError> {
        let n = self.board.dot_count();
        if let Some(&dot) = [a, b].iter().find(|d| d.0 >= n) {
            return Ok(Staged::Rejected(RejectReason::UnknownDot(dot)));
        }
        if let Some(reason) = self.degree_check(a, b) {
            return Ok(Staged::Rejected(reason));
        }

        let common = self.board.index.common_faces(a, b);
        let Some(&lowest) = common.first() else {
            return Ok(Staged::Rejected(RejectReason::NoCommonFace));
        };
        let face = match oracle.choose_face(&FaceQuery {
            a,
            b,
            candidates: &common,
        }) {
            None => lowest,
            Some(f) if common.contains(&f) => f,
            Some(f) => return Ok(invalid(DisambiguationError::FaceNotShared(f))),
        };

        let mut next = self.board.clone();
        let sprout = DotId(n);
        let cross = next.components.find(a) != next.components.find(b);
        let ta = next.index.trace_containing(face, a)?;
        let tb = next.index.trace_containing(face, b)?;
        let corners = oracle
            .choose_corners(&CornerQuery {
                face,
                a,
                b,
                corners_a: corner_count(&next.index, face, a)?,
                corners_b: corner_count(&next.index, face, b)?,
                same_trace: ta == tb,
            })
            .unwrap_or_default();
        tracing::debug!(a = a.0, b = b.0, face = face.0, cross, "stage");

        let embedded = if cross {
            next.index
                .merge_across_components(face, a, b, sprout, corners)
                .map(|_| None)
        } else {
            let to_new = if ta == tb {
                let enclosed = next.index.enclosed_by_split(face, ta)?;
                let partition = if enclosed.is_empty() {
                    None
                } else {
                    let mut views = Vec::with_capacity(enclosed.len());
                    for &id in &enclosed {
                        views.push(TraceView {
                            id,
                            walk: next.index.trace(id)?.walk().to_vec(),
                        });
                    }
                    oracle.assign_enclosed(&SplitQuery {
                        face,
                        new_face: FaceId(next.index.face_count()),
                        a,
                        b,
                        sprout,
                        enclosed: views,
                    })
                };
                match resolve_partition(partition.as_ref(), &enclosed, self.cfg.split_policy) {
                    Ok(to_new) => to_new,
                    Err(e) => return Ok(invalid(e)),
                }
            } else {
                Vec::new()
            };
            next.index
                .split_within_component(face, a, b, sprout, corners, &to_new)
                .map(|out| match out {
                    WithinOutcome::Split { new_face, .. } => Some(new_face),
                    WithinOutcome::Merged { .. } => None,
                })
        };
        let new_face = match embedded {
            Ok(f) => f,
            Err(EmbedError::Rejected(e)) => return Ok(invalid(e)),
            Err(EmbedError::Index(e)) => return Err(e.into()),
        };

        let born = next.add_sprout(a, b);
        debug_assert_eq!(born, sprout);

        let counts = euler::component_counts(a, &mut next.components, &next.degrees, &next.index);
        if !counts.holds() {
            tracing::warn!(
                a = a.0,
                b = b.0,
                v = counts.vertices,
                e = counts.edges,
                f = counts.faces,
                "euler check failed on staged board"
            );
            return Ok(Staged::Rejected(RejectReason::EulerViolation(counts)));
        }
        if self.cfg.verify_integrity {
            next.index.check_integrity()?;
        }

        Ok(Staged::Ready {
            board: next,
            record: MoveRecord {
                a,
                b,
                face,
                sprout,
                new_face,
            },
        })
    }
}

fn invalid(e: DisambiguationError) -> Staged {
    Staged::Rejected(RejectReason::InvalidDisambiguation(e))
}
