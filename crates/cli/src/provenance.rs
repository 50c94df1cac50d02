//! `<stem>.provenance.json` sidecars: which build, rules and inputs produced
//! an artifact.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

use sprouts::api::RuleCfg;

#[derive(Debug, Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

/// Sidecar document. `params` carries command-specific settings.
#[derive(Debug, Serialize)]
pub struct Provenance {
    code_rev: String,
    engine_version: &'static str,
    callsite: Callsite,
    rules: RuleCfg,
    params: Value,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl Provenance {
    #[track_caller]
    pub fn new(rules: RuleCfg, params: Value) -> Self {
        let caller = Location::caller();
        Self {
            code_rev: current_git_rev(),
            engine_version: sprouts::VERSION,
            callsite: Callsite {
                file: caller.file(),
                line: caller.line(),
            },
            rules,
            params,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.inputs.push(input.into());
        self
    }

    /// Record `artifact` as the output and write the sidecar next to it.
    pub fn write_for(mut self, artifact: &Path) -> Result<PathBuf> {
        self.outputs.push(artifact.to_string_lossy().into_owned());
        let path = sidecar_path(artifact);
        fs::write(&path, serde_json::to_vec_pretty(&self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "provenance");
        Ok(path)
    }
}

/// `games.csv` → `games.provenance.json`, in the same directory.
fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map_or_else(|| "artifact".into(), |s| s.to_string_lossy().into_owned());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// Build-time `GIT_COMMIT`, then the runtime variable, then `git rev-parse`.
fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_owned)
        .filter(|rev| !rev.is_empty())
        .or_else(|| std::env::var("GIT_COMMIT").ok().filter(|rev| !rev.is_empty()));
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
