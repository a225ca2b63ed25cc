use crew_bot::{HeuristicPolicy, Policy};

use super::RunnerError;
use crate::config::AgentConfig;

/// A configured bot, ready to be seated any number of times.
#[derive(Debug, Clone)]
pub(super) struct AgentBlueprint {
    pub(super) name: String,
    difficulty: crew_bot::BotDifficulty,
}

impl AgentBlueprint {
    pub(super) fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, RunnerError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, RunnerError> {
        let difficulty = config
            .bot_difficulty()
            .ok_or_else(|| RunnerError::Agent {
                name: config.name.clone(),
                message: format!("unknown difficulty '{}'", config.difficulty),
            })?;
        Ok(Self {
            name: config.name.clone(),
            difficulty,
        })
    }

    pub(super) fn spawn_policy(&self) -> Box<dyn Policy> {
        Box::new(HeuristicPolicy::new(self.difficulty))
    }
}

pub(super) struct Seat {
    pub(super) agent_name: String,
    pub(super) policy: Box<dyn Policy>,
}

/// Seats cycle through the configured agents, starting one further along
/// each game so every agent sits everywhere over a run.
pub(super) fn seat_agents(
    agents: &[AgentBlueprint],
    players: usize,
    game_index: usize,
) -> Vec<Seat> {
    (0..players)
        .filter_map(|seat| agents.get((seat + game_index) % agents.len().max(1)))
        .map(|agent| Seat {
            agent_name: agent.name.clone(),
            policy: agent.spawn_policy(),
        })
        .collect()
}
