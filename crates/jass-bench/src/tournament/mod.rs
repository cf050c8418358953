mod agents;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use jass_bot::{GameError, JassGame, Player};
use jass_core::game::serialization::HexPacked;
use jass_core::model::player::{PlayerId, TeamId};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, ResolvedOutputs};
use crate::logging::telemetry_path;

pub use agents::AgentError;
use agents::{AgentBlueprint, DecisionMetrics, TimedPlayer};

/// Primary entry point for running a series of matches.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub matches_played: usize,
    pub rows_written: usize,
    pub wins: [usize; 2],
    pub jsonl_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;

        if agents.len() != PlayerId::COUNT {
            return Err(RunnerError::SeatCount {
                found: agents.len(),
            });
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
        })
    }

    /// Play every configured match, streaming one JSONL row per match to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut wins = [0usize; 2];

        for match_index in 0..self.config.matches.count {
            let match_seed = rng.next_u64();
            let outcome = self.play_match(match_index, match_seed)?;
            wins[outcome.winner.index()] += 1;
            write_match_row(&mut writer, &self.config, match_index, match_seed, &outcome)?;
            rows_written += 1;
        }

        writer.flush()?;

        Ok(RunSummary {
            matches_played: self.config.matches.count,
            rows_written,
            wins,
            jsonl_path: self.outputs.jsonl.clone(),
            telemetry_path: self
                .logging_enabled
                .then(|| telemetry_path(&self.outputs)),
        })
    }

    fn play_match(&self, match_index: usize, match_seed: u64) -> Result<MatchOutcome, RunnerError> {
        let mut metrics = Vec::with_capacity(PlayerId::COUNT);
        let mut players = Vec::with_capacity(PlayerId::COUNT);
        for (seat, agent) in PlayerId::ALL.into_iter().zip(&self.agents) {
            let player = agent.spawn(seat, seat_seed(match_seed, seat))?;
            let (timed, seat_metrics) = TimedPlayer::new(player);
            players.push(Box::new(timed) as Box<dyn Player>);
            metrics.push(seat_metrics);
        }
        let players: [Box<dyn Player>; PlayerId::COUNT] = players
            .try_into()
            .map_err(|_| RunnerError::SeatCount {
                found: self.agents.len(),
            })?;
        let names: [String; PlayerId::COUNT] =
            std::array::from_fn(|seat| self.agents[seat].name.clone());

        let start = Instant::now();
        let mut game = JassGame::new(match_seed, players, names);
        let mut tricks = 0u32;
        let winner = loop {
            let outcome = game.advance_to_end_of_next_trick()?;
            tricks += 1;

            if self.logging_enabled
                && tracing::enabled!(target: "jass_bench::trick", Level::INFO)
                && let Some(summary) = outcome.trick
            {
                event!(
                    target: "jass_bench::trick",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    match_index = match_index as u32,
                    turn = game.state().turn_number(),
                    trick = %summary.trick,
                    winner = seat_label(summary.winner),
                    points = summary.points,
                );
            }

            if let Some(team) = outcome.winner {
                break team;
            }
        };
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let state = game.state();
        let score = state.score();
        let outcome = MatchOutcome {
            winner,
            points: TeamId::ALL.map(|team| score.total_points(team)),
            turns: state.turn_number() + 1,
            tricks,
            final_score: score.to_hex(),
            seats: seat_results(&self.agents, &metrics),
            elapsed_ms,
        };

        if self.logging_enabled {
            event!(
                target: "jass_bench::match",
                Level::INFO,
                run_id = %self.config.run_id,
                match_index = match_index as u32,
                match_seed,
                winner = %winner,
                team1 = outcome.points[0],
                team2 = outcome.points[1],
                turns = outcome.turns,
                elapsed_ms,
            );
        }

        Ok(outcome)
    }
}

/// Each seat draws its own stream so that swapping one agent leaves the others untouched.
fn seat_seed(match_seed: u64, seat: PlayerId) -> u64 {
    match_seed ^ (seat.index() as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn seat_results(
    agents: &[AgentBlueprint],
    metrics: &[Arc<Mutex<DecisionMetrics>>],
) -> Vec<SeatResult> {
    PlayerId::ALL
        .into_iter()
        .zip(agents.iter().zip(metrics))
        .map(|(seat, (agent, metrics))| {
            let metrics = metrics.lock().map(|m| *m).unwrap_or_default();
            SeatResult {
                seat,
                agent_name: agent.name.clone(),
                decisions: metrics.decisions(),
                avg_ms_per_decision: metrics.avg_ms_per_decision(),
            }
        })
        .collect()
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_match_row(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    match_index: usize,
    match_seed: u64,
    outcome: &MatchOutcome,
) -> Result<(), RunnerError> {
    let row = MatchLogRow {
        run_id: config.run_id.clone(),
        match_id: format!("M{match_index:05}"),
        match_index,
        match_seed,
        seating: outcome
            .seats
            .iter()
            .map(|seat| SeatSnapshot {
                seat: seat_label(seat.seat).to_string(),
                bot: seat.agent_name.clone(),
                team: team_label(seat.seat.team()).to_string(),
                decisions: seat.decisions,
            })
            .collect(),
        winner: team_label(outcome.winner).to_string(),
        team1_points: outcome.points[0],
        team2_points: outcome.points[1],
        turns: outcome.turns,
        tricks: outcome.tricks,
        final_score: outcome.final_score.clone(),
        timing: TimingRow {
            elapsed_ms: outcome.elapsed_ms,
            avg_ms_per_decision: outcome
                .seats
                .iter()
                .map(|seat| seat.avg_ms_per_decision)
                .collect(),
        },
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn seat_label(player: PlayerId) -> &'static str {
    match player {
        PlayerId::Player1 => "p1",
        PlayerId::Player2 => "p2",
        PlayerId::Player3 => "p3",
        PlayerId::Player4 => "p4",
    }
}

fn team_label(team: TeamId) -> &'static str {
    match team {
        TeamId::Team1 => "team1",
        TeamId::Team2 => "team2",
    }
}

pub struct MatchOutcome {
    pub winner: TeamId,
    pub points: [u32; 2],
    pub turns: u32,
    pub tricks: u32,
    pub final_score: String,
    pub seats: Vec<SeatResult>,
    pub elapsed_ms: f64,
}

pub struct SeatResult {
    pub seat: PlayerId,
    pub agent_name: String,
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
}

#[derive(Clone, Serialize)]
pub struct SeatSnapshot {
    pub seat: String,
    pub bot: String,
    pub team: String,
    pub decisions: u32,
}

/// Wall-clock measurements; everything outside this block is reproducible from the seed.
#[derive(Serialize)]
struct TimingRow {
    elapsed_ms: f64,
    avg_ms_per_decision: Vec<f64>,
}

#[derive(Serialize)]
struct MatchLogRow {
    run_id: String,
    match_id: String,
    match_index: usize,
    match_seed: u64,
    seating: Vec<SeatSnapshot>,
    winner: String,
    team1_points: u32,
    team2_points: u32,
    turns: u32,
    tricks: u32,
    final_score: String,
    timing: TimingRow,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("match execution failed: {0}")]
    Game(#[from] GameError),
    #[error("configuration requires exactly 4 agents but found {found}")]
    SeatCount { found: usize },
}
