//! Dealing tasks out and letting players claim them before the first trick.

use crate::error::{GameError, Result};
use crate::game::state::{GameState, Ruleset, UnassignedTask};
use crate::model::player::{PlayerId, PlayerTask};
use crate::tasks::TaskId;
use crate::tasks::allocator::allocate;
use crate::tasks::catalog::descriptor;
use rand::Rng;
use tracing::debug;

fn unassigned(state: &GameState) -> Result<&[UnassignedTask]> {
    state
        .unassigned_tasks
        .as_deref()
        .ok_or_else(|| GameError::precondition("tasks are not being assigned"))
}

fn unassigned_mut(state: &mut GameState, task: TaskId) -> Result<&mut UnassignedTask> {
    state
        .unassigned_tasks
        .as_mut()
        .ok_or_else(|| GameError::precondition("tasks are not being assigned"))?
        .iter_mut()
        .find(|t| t.id == task)
        .ok_or_else(|| GameError::lookup(format!("{task} is not up for assignment")))
}

/// Draws a fresh set of tasks worth `difficulty` from the leftover pool.
pub fn deal_tasks<R: Rng + ?Sized>(
    state: &GameState,
    difficulty: u32,
    rng: &mut R,
) -> Result<GameState> {
    if state.hands_dealt() && !state.is_finished() {
        return Err(GameError::precondition(
            "cannot deal tasks while a game is being played",
        ));
    }
    let index = state.difficulty_index()?;
    let allocation = allocate(&state.leftover_tasks, difficulty, index, &[], rng)?;

    let mut next = state.clone();
    for player in &mut next.players {
        player.tasks.clear();
        player.reset_for_deal();
    }
    next.tricks = None;
    next.unassigned_tasks = Some(
        allocation
            .selected
            .iter()
            .copied()
            .map(UnassignedTask::new)
            .collect(),
    );
    next.leftover_tasks = allocation.leftover;
    debug!(difficulty, tasks = allocation.selected.len(), "tasks dealt");
    Ok(next)
}

/// Claims `task` for `player`, or releases it if they already hold it.
pub fn toggle_claim(state: &GameState, player: PlayerId, task: TaskId) -> Result<GameState> {
    state.player(player)?;
    let mut next = state.clone();
    let entry = unassigned_mut(&mut next, task)?;
    entry.claimant = if entry.claimant == Some(player) {
        None
    } else {
        Some(player)
    };
    entry.data = None;
    Ok(next)
}

/// Claims a task that needs a number and records the number with it.
pub fn attach_data(
    state: &GameState,
    player: PlayerId,
    task: TaskId,
    data: u8,
) -> Result<GameState> {
    state.player(player)?;
    let desc = descriptor(task).ok_or_else(|| GameError::lookup(format!("unknown {task}")))?;
    if !desc.requires_input {
        return Err(GameError::precondition(format!(
            "{task} does not take a number"
        )));
    }
    let max = state.max_tricks();
    if usize::from(data) > max {
        return Err(GameError::precondition(format!(
            "{data} is more than the {max} tricks in this game"
        )));
    }

    let mut next = state.clone();
    let entry = unassigned_mut(&mut next, task)?;
    entry.claimant = Some(player);
    entry.data = Some(data);
    Ok(next)
}

/// Swaps `task` for replacements of the same difficulty from the leftover pool.
pub fn replace_task<R: Rng + ?Sized>(
    state: &GameState,
    task: TaskId,
    rng: &mut R,
) -> Result<GameState> {
    let current = unassigned(state)?;
    let position = current
        .iter()
        .position(|t| t.id == task)
        .ok_or_else(|| GameError::lookup(format!("{task} is not up for assignment")))?;
    let index = state.difficulty_index()?;
    let weight = descriptor(task)
        .and_then(|d| d.difficulty_at(index))
        .ok_or_else(|| {
            GameError::allocation(format!("{task} has no difficulty at this table size"))
        })?;
    if state.leftover_tasks.is_empty() {
        return Err(GameError::allocation("no tasks left to draw replacements from"));
    }

    let reserved: Vec<TaskId> = current.iter().map(|t| t.id).collect();
    let allocation = allocate(
        &state.leftover_tasks,
        u32::from(weight),
        index,
        &reserved,
        rng,
    )?;

    let mut next = state.clone();
    let mut tasks = current.to_vec();
    tasks.remove(position);
    tasks.extend(allocation.selected.iter().copied().map(UnassignedTask::new));
    next.unassigned_tasks = Some(tasks);
    next.leftover_tasks = allocation.leftover;
    next.leftover_tasks.push(task);
    debug!(
        replaced = task.0,
        with = ?allocation.selected,
        "task replaced"
    );
    Ok(next)
}

/// Hands every claimed task to its claimant and fixes the ruleset.
pub fn finalize(state: &GameState, ruleset: Ruleset) -> Result<GameState> {
    let tasks = unassigned(state)?;
    for task in tasks {
        let Some(claimant) = task.claimant else {
            return Err(GameError::precondition(format!("{} has not been claimed", task.id)));
        };
        if claimant >= state.player_count() {
            return Err(GameError::precondition(format!(
                "{} is claimed by unknown player {claimant}",
                task.id
            )));
        }
        let needs_input = descriptor(task.id).is_some_and(|d| d.requires_input);
        if needs_input && task.data.is_none() {
            return Err(GameError::precondition(format!(
                "{} needs a number before the game can start",
                task.id
            )));
        }
    }

    let mut next = state.clone();
    for task in tasks {
        if let Some(claimant) = task.claimant {
            next.players[claimant]
                .tasks
                .insert(task.id, PlayerTask::open(task.data));
        }
    }
    next.unassigned_tasks = None;
    next.ruleset = Some(ruleset);
    Ok(next)
}
