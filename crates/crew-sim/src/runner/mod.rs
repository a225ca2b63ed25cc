mod seating;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crew_bot::PolicyContext;
use crew_core::GameError;
use crew_core::game::{
    GameState, Lobby, MissionOutcome, attach_data, current_turn, deal_hands, deal_tasks,
    finalize, give_hint, mission_outcome, play_card, start_game, toggle_claim,
};
use crew_core::tasks::{TaskId, descriptor};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, SimConfig};
use seating::{AgentBlueprint, Seat, seat_agents};

/// Plays configured self-play games and streams one JSONL row per game.
pub struct SimRunner {
    config: SimConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
}

/// Summary details returned after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub games_played: usize,
    pub successes: usize,
    pub failures: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
}

impl SimRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: SimConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;
        if agents.is_empty() {
            return Err(RunnerError::NoAgents);
        }
        Ok(Self {
            config,
            outputs,
            agents,
        })
    }

    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut successes = 0usize;
        let mut failures = 0usize;
        let mut rows_written = 0usize;

        for game_index in 0..self.config.games.count {
            let seed = rng.next_u64();
            let row = self.play_game(game_index, seed)?;
            match row.outcome {
                MissionOutcome::Success => successes += 1,
                _ => failures += 1,
            }
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }

        writer.flush()?;

        Ok(RunSummary {
            games_played: self.config.games.count,
            successes,
            failures,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
        })
    }

    fn play_game(&self, game_index: usize, seed: u64) -> Result<GameRow, RunnerError> {
        let players = self.config.games.players;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut seats = seat_agents(&self.agents, players, game_index);

        let mut lobby = Lobby::new(format!("{}-host", self.config.run_id));
        for (index, seat) in seats.iter().enumerate() {
            lobby.join(format!("seat-{index}"), format!("{}#{index}", seat.agent_name));
        }
        let state = start_game(&lobby)?;
        let state = deal_tasks(&state, self.config.games.difficulty, &mut rng)?;
        let state = claim_tasks(state, &mut seats)?;
        let state = finalize(&state, self.config.ruleset)?;
        let mut state = deal_hands(&state, game_index % players, &mut rng)?;

        while !state.is_finished() && mission_outcome(&state) == MissionOutcome::InProgress {
            if state.trick_in_progress().is_none() {
                state = offer_hints(state, &mut seats)?;
            }
            let turn = current_turn(&state)?;
            let seat = seats
                .get_mut(turn)
                .ok_or_else(|| RunnerError::game(format!("no bot seated at {turn}")))?;
            let index = seat.policy.choose_play(&PolicyContext {
                seat: turn,
                state: &state,
            });
            state = play_card(&state, turn, index).map_err(|err| {
                RunnerError::game(format!(
                    "invalid card play by seat {turn} (index {index}) in game {game_index}: {err}"
                ))
            })?;
        }

        let outcome = mission_outcome(&state);
        let tricks_played = state.completed_trick_count();
        event!(
            target: "crew_sim::game",
            Level::INFO,
            run_id = %self.config.run_id,
            game_index = game_index as u64,
            seed,
            outcome = ?outcome,
            tricks_played = tricks_played as u64,
        );

        Ok(GameRow {
            run_id: self.config.run_id.clone(),
            game_index,
            seed,
            players,
            difficulty: self.config.games.difficulty,
            seating: seats.iter().map(|s| s.agent_name.clone()).collect(),
            tasks: task_rows(&state),
            outcome,
            tricks_played,
            hints_used: state.hints_used(),
        })
    }
}

/// Seats take turns claiming until every dealt task has an owner.
fn claim_tasks(mut state: GameState, seats: &mut [Seat]) -> Result<GameState, RunnerError> {
    let count = seats.len();
    let mut turn = 0usize;
    loop {
        let open: Vec<TaskId> = state
            .unassigned_tasks
            .iter()
            .flatten()
            .filter(|t| t.claimant.is_none())
            .map(|t| t.id)
            .collect();
        let Some(&fallback) = open.first() else {
            return Ok(state);
        };
        let seat = turn % count.max(1);
        let ctx = PolicyContext {
            seat,
            state: &state,
        };
        let policy = &mut seats[seat].policy;
        let task = policy
            .choose_claim(&ctx, &open)
            .filter(|id| open.contains(id))
            .unwrap_or(fallback);
        let needs_number = descriptor(task).is_some_and(|d| d.requires_input);
        state = if needs_number {
            let number = policy.choose_declaration(&ctx, task);
            attach_data(&state, seat, task, number)?
        } else {
            toggle_claim(&state, seat, task)?
        };
        turn += 1;
    }
}

fn offer_hints(mut state: GameState, seats: &mut [Seat]) -> Result<GameState, RunnerError> {
    for (seat, bot) in seats.iter_mut().enumerate() {
        let choice = bot.policy.choose_hint(&PolicyContext {
            seat,
            state: &state,
        });
        if let Some(index) = choice {
            state = give_hint(&state, seat, index)?;
        }
    }
    Ok(state)
}

fn task_rows(state: &GameState) -> Vec<TaskRow> {
    state
        .players
        .iter()
        .flat_map(|player| {
            player.tasks.iter().map(move |(id, task)| TaskRow {
                id: *id,
                owner: player.id,
                data: task.data,
                done: task.done,
                failed: task.failed,
            })
        })
        .collect()
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskRow {
    pub id: TaskId,
    pub owner: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<u8>,
    pub done: bool,
    pub failed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameRow {
    pub run_id: String,
    pub game_index: usize,
    pub seed: u64,
    pub players: usize,
    pub difficulty: u32,
    pub seating: Vec<String>,
    pub tasks: Vec<TaskRow>,
    pub outcome: MissionOutcome,
    pub tricks_played: usize,
    pub hints_used: usize,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid agent '{name}': {message}")]
    Agent { name: String, message: String },
    #[error("configuration lists no agents")]
    NoAgents,
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
    #[error("engine rejected a step: {0}")]
    Engine(#[from] GameError),
    #[error("game execution failed: {message}")]
    Game { message: String },
}

impl RunnerError {
    fn game(message: String) -> Self {
        RunnerError::Game { message }
    }
}
