use crate::game::state::GameState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionOutcome {
    InProgress,
    Success,
    Failure,
}

/// The table wins together or loses together.
pub fn mission_outcome(state: &GameState) -> MissionOutcome {
    let tasks: Vec<_> = state.players.iter().flat_map(|p| p.tasks.values()).collect();
    if tasks.iter().any(|t| t.failed) || state.timeout {
        return MissionOutcome::Failure;
    }
    if !tasks.is_empty() && tasks.iter().all(|t| t.done) {
        return MissionOutcome::Success;
    }
    if state.is_finished() {
        MissionOutcome::Failure
    } else {
        MissionOutcome::InProgress
    }
}
