use crate::error::{GameError, Result};
use crate::game::state::{GameState, MAX_PLAYERS, MIN_PLAYERS};
use crate::model::player::{Player, PlayerTask};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyClient {
    pub key: String,
    pub name: String,
}

/// Room contents before the roster is fixed. Clients are kept in join order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lobby {
    pub host: String,
    #[serde(default)]
    pub clients: Vec<LobbyClient>,
}

impl Lobby {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            clients: Vec::new(),
        }
    }

    /// Adds a client, or renames one that joined before under the same key.
    pub fn join(&mut self, key: impl Into<String>, name: impl Into<String>) {
        let key = key.into();
        let name = name.into();
        match self.clients.iter_mut().find(|c| c.key == key) {
            Some(client) => client.name = name,
            None => self.clients.push(LobbyClient { key, name }),
        }
    }

    pub fn client_by_key(&self, key: &str) -> Result<&LobbyClient> {
        self.clients
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| GameError::lookup(format!("no client joined with key '{key}'")))
    }
}

/// Fixes the roster: ids follow join order.
pub fn start_game(lobby: &Lobby) -> Result<GameState> {
    let count = lobby.clients.len();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
        return Err(GameError::precondition(format!(
            "{count} players joined, the game needs {MIN_PLAYERS} to {MAX_PLAYERS}"
        )));
    }
    let players = lobby
        .clients
        .iter()
        .enumerate()
        .map(|(id, client)| Player::new(id, client.name.clone()))
        .collect();
    Ok(GameState::with_players(players))
}

/// A fresh attempt at the same tasks: same owners, every task open again.
pub fn retry(state: &GameState) -> Result<GameState> {
    if state.unassigned_tasks.is_some() {
        return Err(GameError::precondition(
            "tasks must be finalized before a game can be retried",
        ));
    }
    let mut next = state.clone();
    for player in &mut next.players {
        player.reset_for_deal();
        for task in player.tasks.values_mut() {
            *task = PlayerTask::open(task.data);
        }
    }
    next.tricks = None;
    next.timeout = false;
    Ok(next)
}
