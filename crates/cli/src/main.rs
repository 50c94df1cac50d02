use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use sprouts::api::{random_game, ReplayToken, RuleCfg};

mod provenance;
mod script;

use provenance::Provenance;

#[derive(Parser)]
#[command(name = "sprouts")]
#[command(about = "Play scripted Sprouts games and run random playouts")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Replay a JSON move script and print the resulting board
    Play {
        #[arg(long)]
        script: PathBuf,
        /// Optional JSON report path; a provenance sidecar is written next to it
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Play random games and write one row per game (.csv or .parquet)
    Simulate {
        #[arg(long, default_value_t = 3)]
        dots: usize,
        #[arg(long, default_value_t = 100)]
        games: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Aggregate a table written by `simulate`
    Summarize {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Play { script, out } => play(&script, out.as_deref()),
        Action::Simulate {
            dots,
            games,
            seed,
            out,
        } => simulate(dots, games, seed, &out),
        Action::Summarize { input } => summarize(&input),
        Action::Report => report(),
    }
}

/// Player (1 or 2) who made the last move; with normal play they win.
fn winner(moves: usize) -> u32 {
    if moves % 2 == 1 {
        1
    } else {
        2
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn play(path: &Path, out: Option<&Path>) -> Result<()> {
    let loaded = script::load(path)?;
    tracing::info!(script = %path.display(), dots = loaded.dots, moves = loaded.moves.len(), "play");
    let report = script::play(&loaded)?;
    let text = serde_json::to_string_pretty(&report)?;
    match out {
        Some(out) => {
            ensure_parent(out)?;
            fs::write(out, &text).with_context(|| format!("writing {}", out.display()))?;
            let rules = RuleCfg {
                split_policy: loaded.policy,
                ..RuleCfg::default()
            };
            Provenance::new(
                rules,
                serde_json::json!({
                    "dots": loaded.dots,
                    "moves": loaded.moves.len(),
                    "stopped_at": report.stopped_at,
                }),
            )
            .with_input(path.to_string_lossy())
            .write_for(out)?;
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn simulate(dots: usize, games: u64, seed: u64, out: &Path) -> Result<()> {
    tracing::info!(dots, games, seed, out = %out.display(), "simulate");
    let cap = usize::try_from(games).unwrap_or(0);
    let mut game_col = Vec::with_capacity(cap);
    let mut moves_col = Vec::with_capacity(cap);
    let mut winner_col = Vec::with_capacity(cap);
    let mut faces_col = Vec::with_capacity(cap);
    let mut comps_col = Vec::with_capacity(cap);
    let mut sprouts_col = Vec::with_capacity(cap);
    for index in 0..games {
        let tok = ReplayToken { seed, index };
        let rec = random_game(dots, RuleCfg::default(), tok)
            .with_context(|| format!("game {index} (seed {seed})"))?;
        let moves = rec.moves.len();
        game_col.push(index);
        moves_col.push(moves as u32);
        winner_col.push(winner(moves));
        faces_col.push(rec.faces as u32);
        comps_col.push(rec.components as u32);
        sprouts_col.push((rec.dots + moves) as u32);
    }
    let mut df = df!(
        "game" => game_col,
        "moves" => moves_col,
        "winner" => winner_col,
        "faces" => faces_col,
        "components" => comps_col,
        "sprouts" => sprouts_col,
    )?;
    tracing::info!(rows = df.height(), cols = df.width(), "games");

    ensure_parent(out)?;
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    if out.extension().is_some_and(|e| e == "parquet") {
        ParquetWriter::new(&mut file).finish(&mut df)?;
    } else {
        CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    }
    Provenance::new(
        RuleCfg::default(),
        serde_json::json!({
            "dots": dots,
            "games": games,
            "seed": seed,
        }),
    )
    .write_for(out)?;
    Ok(())
}

fn scan(input: &Path) -> Result<LazyFrame> {
    let lf = if input.extension().is_some_and(|e| e == "parquet") {
        LazyFrame::scan_parquet(input, ScanArgsParquet::default())?
    } else {
        LazyCsvReader::new(input)
            .with_infer_schema_length(Some(100))
            .finish()?
    };
    Ok(lf)
}

fn summarize(input: &Path) -> Result<()> {
    tracing::info!(input = %input.display(), "summarize");
    let summary = scan(input)?
        .select([
            col("game").count().alias("games"),
            col("moves").mean().alias("mean_moves"),
            col("moves").min().alias("min_moves"),
            col("moves").max().alias("max_moves"),
            // fraction of games won by player 2
            (col("winner").cast(DataType::Float64) - lit(1.0))
                .mean()
                .alias("second_player_share"),
        ])
        .collect()?;
    println!("{summary}");
    Ok(())
}

fn report() -> Result<()> {
    let block = Provenance::new(RuleCfg::default(), serde_json::json!({}));
    println!("{}", serde_json::to_string_pretty(&block)?);
    Ok(())
}
