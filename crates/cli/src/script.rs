//! Move scripts: a JSON list of proposed moves replayed against a fresh board.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use sprouts::api::{Choice, DotId, MoveOutcome, RuleCfg, Snapshot, SplitPolicy, SproutsEngine};

#[derive(Clone, Debug, Deserialize)]
pub struct MoveScript {
    pub dots: usize,
    #[serde(default)]
    pub policy: SplitPolicy,
    pub moves: Vec<ScriptedMove>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptedMove {
    pub a: DotId,
    pub b: DotId,
    #[serde(default)]
    pub choice: Option<Choice>,
}

#[derive(Debug, Serialize)]
pub struct PlayedMove {
    pub a: DotId,
    pub b: DotId,
    pub outcome: MoveOutcome,
}

/// Outcome of a replay. Replays stop at the first rejection.
#[derive(Debug, Serialize)]
pub struct PlayReport {
    pub played: Vec<PlayedMove>,
    pub stopped_at: Option<usize>,
    pub can_connect: bool,
    pub remaining_lives: usize,
    pub snapshot: Snapshot,
}

pub fn load(path: &Path) -> Result<MoveScript> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

pub fn play(script: &MoveScript) -> Result<PlayReport> {
    let cfg = RuleCfg {
        split_policy: script.policy,
        ..RuleCfg::default()
    };
    let mut engine = SproutsEngine::with_cfg(script.dots, cfg).context("rule configuration")?;
    let mut played = Vec::with_capacity(script.moves.len());
    let mut stopped_at = None;
    for (i, mv) in script.moves.iter().enumerate() {
        let outcome = engine
            .connect(mv.a, mv.b, mv.choice.as_ref())
            .with_context(|| format!("move {i} ({}-{})", mv.a.0, mv.b.0))?;
        let committed = outcome.is_committed();
        tracing::info!(move_index = i, a = mv.a.0, b = mv.b.0, ?outcome, "move");
        played.push(PlayedMove {
            a: mv.a,
            b: mv.b,
            outcome,
        });
        if !committed {
            stopped_at = Some(i);
            break;
        }
    }
    Ok(PlayReport {
        played,
        stopped_at,
        can_connect: engine.can_connect(),
        remaining_lives: engine.remaining_lives(),
        snapshot: engine.snapshot()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprouts::api::{DisambiguationError, RejectReason, TraceId};

    fn parse(text: &str) -> MoveScript {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn replays_until_end_of_script() {
        let script = parse(
            r#"{
                "dots": 3,
                "moves": [
                    { "a": 0, "b": 1 },
                    { "a": 0, "b": 1, "choice": { "partition": { "new_face": [2] } } },
                    { "a": 2, "b": 0 }
                ]
            }"#,
        );
        let report = play(&script).unwrap();
        assert_eq!(report.stopped_at, None);
        assert_eq!(report.played.len(), 3);
        assert_eq!(report.snapshot.dot_count, 6);
        assert_eq!(report.snapshot.faces.len(), 2);
        assert_eq!(report.remaining_lives, 9 - 3);
    }

    #[test]
    fn stops_at_first_rejection() {
        let script = parse(
            r#"{
                "dots": 3,
                "moves": [
                    { "a": 0, "b": 1 },
                    { "a": 0, "b": 1 },
                    { "a": 1, "b": 2 }
                ]
            }"#,
        );
        let report = play(&script).unwrap();
        assert_eq!(report.stopped_at, Some(1));
        assert_eq!(
            report.played[1].outcome,
            MoveOutcome::Rejected(RejectReason::InvalidDisambiguation(
                DisambiguationError::MissingPartition { enclosed: 1 }
            ))
        );
        assert_eq!(report.snapshot.dot_count, 4);
    }

    #[test]
    fn keep_policy_is_read_from_script() {
        let script = parse(
            r#"{ "dots": 3, "policy": "keep_on_original",
                 "moves": [ { "a": 0, "b": 1 }, { "a": 0, "b": 1 } ] }"#,
        );
        let report = play(&script).unwrap();
        assert_eq!(report.stopped_at, None);
        let outer: Vec<TraceId> = report.snapshot.faces[0].traces.iter().map(|t| t.id).collect();
        assert!(outer.contains(&TraceId(2)));
    }
}
