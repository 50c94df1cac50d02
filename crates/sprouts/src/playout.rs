//! Random legal playouts with replay tokens.
//!
//! Purpose
//! - Drive the engine through whole games for property tests, benchmarks and
//!   the CLI's simulation tables.
//!
//! Model
//! - Each step picks uniformly among `legal_pairs`, then answers every
//!   disambiguation query at random (face, corners, side of each enclosed
//!   trace). Any such answer is topologically valid, so every candidate commits.
//! - Determinism uses a replay token `(seed, index)` that keys a single RNG.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::engine::{
    CornerQuery, Disambiguator, FaceQuery, MoveOutcome, MoveRecord, RuleCfg, SplitQuery,
    SproutsEngine,
};
use crate::error::EngineError;
use crate::faces::{Corners, FaceId, Partition};

/// Replay token to make games reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    /// ChaCha-backed RNG keyed by the whole token: seed in the first eight
    /// key bytes, index in the next eight.
    #[inline]
    pub fn to_std_rng(self) -> StdRng {
        let mut key = <StdRng as SeedableRng>::Seed::default();
        key[..8].copy_from_slice(&self.seed.to_le_bytes());
        key[8..16].copy_from_slice(&self.index.to_le_bytes());
        StdRng::from_seed(key)
    }
}

/// Answers every query with a uniformly random valid choice.
#[derive(Debug)]
pub struct RandomOracle<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomOracle<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: Rng> Disambiguator for RandomOracle<R> {
    fn choose_face(&mut self, query: &FaceQuery<'_>) -> Option<FaceId> {
        query.candidates.choose(&mut self.rng).copied()
    }

    fn choose_corners(&mut self, query: &CornerQuery) -> Option<Corners> {
        Some(Corners {
            a: self.rng.gen_range(0..query.corners_a.max(1)),
            b: self.rng.gen_range(0..query.corners_b.max(1)),
        })
    }

    fn assign_enclosed(&mut self, query: &SplitQuery) -> Option<Partition> {
        let mut p = Partition::default();
        for t in &query.enclosed {
            if self.rng.gen_bool(0.5) {
                p.new_face.push(t.id);
            } else {
                p.old_face.push(t.id);
            }
        }
        Some(p)
    }
}

/// Summary of one finished random game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub token: ReplayToken,
    pub dots: usize,
    pub moves: Vec<MoveRecord>,
    pub faces: usize,
    pub components: usize,
    pub remaining_lives: usize,
}

/// Make one random legal move. Returns `None` once no move is possible.
pub fn random_move<R: Rng>(
    engine: &mut SproutsEngine,
    oracle: &mut RandomOracle<R>,
) -> Result<Option<MoveRecord>, EngineError> {
    let mut pairs = engine.legal_pairs();
    if pairs.is_empty() {
        return Ok(None);
    }
    pairs.shuffle(oracle.rng_mut());
    for &(a, b) in &pairs {
        match engine.connect_with(a, b, oracle)? {
            MoveOutcome::Committed(_) => return Ok(engine.history().last().copied()),
            MoveOutcome::Rejected(reason) => {
                tracing::warn!(a = a.0, b = b.0, ?reason, "legal pair rejected");
            }
        }
    }
    Err(EngineError::Stalled {
        candidates: pairs.len(),
    })
}

/// Play random legal moves from `n` dots until none is left.
pub fn random_game(n: usize, cfg: RuleCfg, tok: ReplayToken) -> Result<GameRecord, EngineError> {
    let mut engine = SproutsEngine::with_cfg(n, cfg)?;
    let mut oracle = RandomOracle::new(tok.to_std_rng());
    while random_move(&mut engine, &mut oracle)?.is_some() {}
    tracing::debug!(
        dots = n,
        seed = tok.seed,
        index = tok.index,
        moves = engine.history().len(),
        "random game finished"
    );
    Ok(GameRecord {
        token: tok,
        dots: n,
        moves: engine.history().to_vec(),
        faces: engine.face_count(),
        components: engine.board().components().component_count(),
        remaining_lives: engine.remaining_lives(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_token_is_deterministic() {
        let tok = ReplayToken { seed: 3, index: 11 };
        let a = random_game(4, RuleCfg::default(), tok).unwrap();
        let b = random_game(4, RuleCfg::default(), tok).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tokens_differing_only_in_index_diverge() {
        let a: u64 = ReplayToken { seed: 9, index: 0 }.to_std_rng().gen();
        let b: u64 = ReplayToken { seed: 9, index: 1 }.to_std_rng().gen();
        let c: u64 = ReplayToken { seed: 1, index: 9 }.to_std_rng().gen();
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn invalid_rules_fail_before_playing() {
        let cfg = RuleCfg {
            max_degree: 0,
            ..RuleCfg::default()
        };
        let err = random_game(2, cfg, ReplayToken { seed: 0, index: 0 }).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRules { max_degree: 0, .. }));
    }

    #[test]
    fn game_length_is_bounded_by_lives() {
        for index in 0..20 {
            let n = 1 + (index as usize % 5);
            let g = random_game(n, RuleCfg::default(), ReplayToken { seed: 42, index }).unwrap();
            // every move burns one life; the last dots always keep at least one
            assert!(g.moves.len() <= 3 * n - 1);
            assert!(g.moves.len() >= 2 * n);
            assert_eq!(g.remaining_lives, 3 * n - g.moves.len());
        }
    }

    #[test]
    fn single_dot_games_always_end_after_two_moves() {
        for index in 0..8 {
            let g = random_game(1, RuleCfg::default(), ReplayToken { seed: 1, index }).unwrap();
            assert_eq!(g.moves.len(), 2);
            assert_eq!(g.faces, 3);
        }
    }
}
