//! Engine scenarios: legal moves, each rejection path, and commit atomicity.

use super::*;
use crate::error::{EngineError, IndexError};
use crate::euler::{component_counts, EulerCounts};
use crate::faces::{Corners, DisambiguationError, DotId, FaceId, Partition, SplitPolicy, TraceId};

fn d(i: usize) -> DotId {
    DotId(i)
}

fn counts(engine: &SproutsEngine, dot: DotId) -> EulerCounts {
    let mut board = engine.board().clone();
    component_counts(dot, &mut board.components, &board.degrees, &board.index)
}

fn commit(engine: &mut SproutsEngine, a: usize, b: usize, choice: Option<&Choice>) -> DotId {
    match engine.connect(d(a), d(b), choice).unwrap() {
        MoveOutcome::Committed(s) => s,
        other => panic!("expected commit for {a}-{b}, got {other:?}"),
    }
}

fn rejected(engine: &mut SproutsEngine, a: usize, b: usize, choice: Option<&Choice>) -> RejectReason {
    let before = engine.board().clone();
    let out = engine.connect(d(a), d(b), choice).unwrap();
    assert_eq!(engine.board(), &before, "rejected move mutated the board");
    match out {
        MoveOutcome::Rejected(r) => r,
        other => panic!("expected rejection for {a}-{b}, got {other:?}"),
    }
}

#[test]
fn cross_component_move_creates_sprout() {
    let mut eng = SproutsEngine::new(2);
    let s = commit(&mut eng, 0, 1, None);
    assert_eq!(s, d(2));
    assert_eq!(eng.degree(s), Some(2));
    assert_eq!(eng.degree(d(0)), Some(1));
    assert_eq!(
        counts(&eng, d(0)),
        EulerCounts {
            vertices: 3,
            edges: 2,
            faces: 1
        }
    );
    assert_eq!(eng.face_count(), 1);
    assert_eq!(eng.dots_in_component(d(1)), vec![d(0), d(1), d(2)]);
}

#[test]
fn closing_a_cycle_splits_the_face() {
    let mut eng = SproutsEngine::new(2);
    commit(&mut eng, 0, 1, None);
    let s = commit(&mut eng, 0, 1, None);
    assert_eq!(s, d(3));
    assert_eq!(eng.face_count(), 2);
    let c = counts(&eng, d(0));
    assert_eq!(
        c,
        EulerCounts {
            vertices: 4,
            edges: 4,
            faces: 2
        }
    );
    assert!(c.holds());
    assert_eq!(eng.history()[1].new_face, Some(FaceId(1)));
    assert_eq!(eng.history()[0].new_face, None);
}

#[test]
fn saturated_dot_is_rejected() {
    let mut eng = SproutsEngine::new(2);
    commit(&mut eng, 0, 1, None);
    commit(&mut eng, 0, 1, None);
    commit(&mut eng, 0, 2, None);
    assert_eq!(eng.degree(d(0)), Some(3));
    assert_eq!(
        rejected(&mut eng, 0, 1, None),
        RejectReason::DegreeOverflow {
            dot: d(0),
            degree: 3
        }
    );
    assert_eq!(
        rejected(&mut eng, 1, 0, None),
        RejectReason::DegreeOverflow {
            dot: d(0),
            degree: 3
        }
    );
}

#[test]
fn self_loop_needs_two_free_connections() {
    let mut eng = SproutsEngine::new(2);
    commit(&mut eng, 0, 1, None);
    commit(&mut eng, 0, 0, None);
    assert_eq!(eng.degree(d(0)), Some(3));
    // dot 1 has degree 1: a loop still fits, and then it does not
    commit(&mut eng, 1, 1, None);
    assert!(matches!(
        rejected(&mut eng, 2, 2, None),
        RejectReason::DegreeOverflow { dot, degree: 2 } if dot == d(2)
    ));
}

fn enclosed_pair() -> SproutsEngine {
    // cycle 0-4-1-5 with dot 2 inside and dot 3 outside
    let mut eng = SproutsEngine::new(4);
    commit(&mut eng, 0, 1, None);
    let split = Choice::partition(Partition {
        new_face: vec![TraceId(2)],
        old_face: vec![TraceId(3)],
    });
    commit(&mut eng, 0, 1, Some(&split));
    eng
}

#[test]
fn dots_on_different_faces_are_not_visible() {
    let mut eng = enclosed_pair();
    assert!(eng.common_faces(d(2), d(3)).is_empty());
    assert_eq!(rejected(&mut eng, 2, 3, None), RejectReason::NoCommonFace);
    // both still reach the cycle from their own side
    commit(&mut eng, 2, 0, None);
    commit(&mut eng, 3, 1, None);
    assert_eq!(eng.history()[2].face, FaceId(1));
    assert_eq!(eng.history()[3].face, FaceId(0));
}

#[test]
fn incomplete_partition_is_rejected() {
    let mut eng = SproutsEngine::new(3);
    commit(&mut eng, 0, 1, None);
    let empty = Choice::partition(Partition::default());
    assert_eq!(
        rejected(&mut eng, 0, 1, Some(&empty)),
        RejectReason::InvalidDisambiguation(DisambiguationError::Unassigned(TraceId(2)))
    );
    assert_eq!(
        rejected(&mut eng, 0, 1, None),
        RejectReason::InvalidDisambiguation(DisambiguationError::MissingPartition {
            enclosed: 1
        })
    );
    let overlapping = Choice::partition(Partition {
        new_face: vec![TraceId(2)],
        old_face: vec![TraceId(2)],
    });
    assert_eq!(
        rejected(&mut eng, 0, 1, Some(&overlapping)),
        RejectReason::InvalidDisambiguation(DisambiguationError::Duplicate(TraceId(2)))
    );
}

#[test]
fn keep_on_original_policy_accepts_missing_partition() {
    let cfg = RuleCfg {
        split_policy: SplitPolicy::KeepOnOriginal,
        ..RuleCfg::default()
    };
    let mut eng = SproutsEngine::with_cfg(3, cfg).unwrap();
    commit(&mut eng, 0, 1, None);
    commit(&mut eng, 0, 1, None);
    assert_eq!(eng.faces_of(d(2)).iter().copied().collect::<Vec<_>>(), vec![FaceId(0)]);
}

#[test]
fn face_and_corner_answers_are_validated() {
    let mut eng = SproutsEngine::new(2);
    assert_eq!(
        rejected(&mut eng, 0, 1, Some(&Choice::face(FaceId(3)))),
        RejectReason::InvalidDisambiguation(DisambiguationError::FaceNotShared(FaceId(3)))
    );
    assert_eq!(
        rejected(&mut eng, 0, 1, Some(&Choice::default().with_corners(0, 2))),
        RejectReason::InvalidDisambiguation(DisambiguationError::CornerOutOfRange {
            dot: d(1),
            index: 2,
            available: 1,
        })
    );
}

#[test]
fn explicit_face_choice_is_honoured() {
    let mut eng = SproutsEngine::new(2);
    commit(&mut eng, 0, 1, None);
    commit(&mut eng, 0, 1, None);
    assert_eq!(eng.common_faces(d(2), d(3)), vec![FaceId(0), FaceId(1)]);
    commit(&mut eng, 2, 3, Some(&Choice::face(FaceId(1))));
    assert_eq!(eng.history()[2].face, FaceId(1));
    assert!(counts(&eng, d(2)).holds());
    assert_eq!(eng.face_count(), 3);
}

#[test]
fn unknown_dot_is_rejected_first() {
    let mut eng = SproutsEngine::new(2);
    assert_eq!(rejected(&mut eng, 0, 9, None), RejectReason::UnknownDot(d(9)));
}

#[test]
fn check_move_reports_without_committing() {
    let eng = SproutsEngine::new(2);
    let out = eng
        .check_move(d(0), d(1), &mut Choice::default())
        .unwrap();
    assert_eq!(out, MoveOutcome::Committed(d(2)));
    assert_eq!(eng.dot_count(), 2);
    assert!(eng.history().is_empty());
}

#[test]
fn single_dot_game_lasts_two_moves() {
    let mut eng = SproutsEngine::new(1);
    assert!(eng.can_connect());
    assert_eq!(eng.legal_pairs(), vec![(d(0), d(0))]);
    commit(&mut eng, 0, 0, None);
    assert!(eng.can_connect());
    assert_eq!(eng.legal_pairs(), vec![(d(0), d(1))]);
    commit(&mut eng, 0, 1, None);
    assert!(!eng.can_connect());
    assert!(eng.legal_pairs().is_empty());
    assert_eq!(eng.remaining_lives(), 1);
    assert!(counts(&eng, d(0)).holds());
}

#[test]
fn committed_moves_are_monotone() {
    let mut eng = SproutsEngine::new(3);
    let script = [(0, 1), (1, 2), (0, 0)];
    for (a, b) in script {
        let before = eng.snapshot().unwrap();
        let lives = eng.remaining_lives();
        commit(&mut eng, a, b, None);
        let after = eng.snapshot().unwrap();
        assert_eq!(after.dot_count, before.dot_count + 1);
        assert_eq!(after.total_degree(), before.total_degree() + 4);
        assert_eq!(eng.remaining_lives(), lives - 1);
    }
}

#[test]
fn snapshot_exposes_faces_and_traces() {
    let eng = enclosed_pair();
    let snap = eng.snapshot().unwrap();
    assert_eq!(snap.dot_count, 6);
    assert_eq!(snap.faces.len(), 2);
    assert_eq!(snap.dot_faces[2], vec![FaceId(1)]);
    assert_eq!(snap.dot_faces[3], vec![FaceId(0)]);
    let inner: Vec<TraceId> = snap.faces[1].traces.iter().map(|t| t.id).collect();
    assert_eq!(inner, vec![TraceId(4), TraceId(2)]);
    assert_eq!(snap.components[0], snap.components[5]);
    assert_ne!(snap.components[2], snap.components[3]);
}

#[test]
fn euler_violation_is_rejected_without_commit() {
    let mut eng = SproutsEngine::new(3);
    // corrupt the degree table: dot 2 claims an edge it does not have
    eng.board_mut().degrees[2] = 2;
    let reason = rejected(&mut eng, 0, 2, None);
    assert!(matches!(reason, RejectReason::EulerViolation(c) if c.characteristic() == 1));
}

#[test]
fn index_corruption_is_an_error() {
    let mut eng = SproutsEngine::new(2);
    // splice 0 and 1 in the index without recording the union
    eng.board_mut()
        .index
        .merge_across_components(FaceId(0), d(0), d(1), d(2), Corners::default())
        .unwrap();
    let before = eng.board().clone();
    let err = eng.connect(d(0), d(1), None).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Index(IndexError::SharedTrace { .. })
    ));
    assert_eq!(eng.board(), &before);
}

struct Recording {
    splits: Vec<SplitQuery>,
}

impl Disambiguator for Recording {
    fn assign_enclosed(&mut self, query: &SplitQuery) -> Option<Partition> {
        self.splits.push(query.clone());
        Some(Partition::to_new(query.enclosed.iter().map(|t| t.id)))
    }
}

#[test]
fn oracle_is_only_asked_when_something_is_enclosed() {
    let mut eng = SproutsEngine::new(3);
    let mut oracle = Recording { splits: Vec::new() };
    eng.connect_with(d(0), d(1), &mut oracle).unwrap();
    assert!(oracle.splits.is_empty());
    let out = eng.connect_with(d(0), d(1), &mut oracle).unwrap();
    assert_eq!(out, MoveOutcome::Committed(d(4)));
    assert_eq!(oracle.splits.len(), 1);
    let q = &oracle.splits[0];
    assert_eq!(q.new_face, FaceId(1));
    assert_eq!(q.sprout, d(4));
    assert_eq!(q.enclosed.len(), 1);
    assert_eq!(q.enclosed[0].walk, vec![d(2)]);
    assert!(eng.faces_of(d(2)).contains(&FaceId(1)));
}

#[test]
fn degree_cap_below_sprout_degree_is_refused() {
    let low = RuleCfg {
        max_degree: 1,
        ..RuleCfg::default()
    };
    assert_eq!(
        SproutsEngine::with_cfg(2, low).unwrap_err(),
        EngineError::InvalidRules {
            max_degree: 1,
            min: 2
        }
    );
    let two = RuleCfg {
        max_degree: 2,
        ..RuleCfg::default()
    };
    let mut eng = SproutsEngine::with_cfg(2, two).unwrap();
    commit(&mut eng, 0, 1, None);
    assert!(eng.board().degrees().iter().all(|&deg| deg <= 2));
}

#[test]
fn degree_cap_at_u8_max_rejects_instead_of_overflowing() {
    let cfg = RuleCfg {
        max_degree: u8::MAX,
        ..RuleCfg::default()
    };
    let mut eng = SproutsEngine::with_cfg(1, cfg).unwrap();
    let mut last = d(0);
    while eng.degree(d(0)) < Some(u8::MAX - 1) {
        last = commit(&mut eng, 0, 0, None);
    }
    assert_eq!(eng.degree(d(0)), Some(254));
    assert!(!eng.legal_pairs().contains(&(d(0), d(0))));
    assert_eq!(
        rejected(&mut eng, 0, 0, None),
        RejectReason::DegreeOverflow {
            dot: d(0),
            degree: 254
        }
    );
    commit(&mut eng, 0, last.0, None);
    assert_eq!(eng.degree(d(0)), Some(u8::MAX));
    assert_eq!(
        rejected(&mut eng, last.0, 0, None),
        RejectReason::DegreeOverflow {
            dot: d(0),
            degree: u8::MAX
        }
    );
}

#[test]
fn snapshot_reports_a_dangling_trace() {
    let mut eng = SproutsEngine::new(2);
    eng.board_mut().index.forget_trace(TraceId(1));
    assert_eq!(
        eng.snapshot().unwrap_err(),
        EngineError::Index(IndexError::UnknownTrace(TraceId(1)))
    );
}
