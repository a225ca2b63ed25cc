use crate::error::{GameError, Result};
use crate::model::card::Card;
use crate::model::deck::max_tricks;
use crate::model::player::{Player, PlayerId};
use crate::model::trick::Trick;
use crate::tasks::TaskId;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintMode {
    #[default]
    Default,
    Fewer,
    NoTokens,
    None,
}

impl HintMode {
    /// Total hints the whole table may give in one game.
    pub fn budget(self, player_count: usize) -> usize {
        match self {
            HintMode::Fewer => player_count.saturating_sub(2),
            HintMode::Default | HintMode::NoTokens | HintMode::None => player_count,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    #[serde(default)]
    pub hint_mode: HintMode,
    /// Seconds per game; enforced outside the engine through the timeout flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedTask {
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimant: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<u8>,
}

impl UnassignedTask {
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            claimant: None,
            data: None,
        }
    }
}

/// The aggregate root shared with every client of one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tricks: Option<Vec<Trick>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unassigned_tasks: Option<Vec<UnassignedTask>>,
    #[serde(default)]
    pub leftover_tasks: Vec<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruleset: Option<Ruleset>,
    #[serde(default)]
    pub timeout: bool,
}

impl GameState {
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Index into the three catalog difficulty weights.
    pub fn difficulty_index(&self) -> Result<usize> {
        let count = self.player_count();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(GameError::precondition(format!(
                "{count} players at the table, the game needs {MIN_PLAYERS} to {MAX_PLAYERS}"
            )));
        }
        Ok(count - MIN_PLAYERS)
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .get(id)
            .ok_or_else(|| GameError::lookup(format!("no player with id {id}")))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .get_mut(id)
            .ok_or_else(|| GameError::lookup(format!("no player with id {id}")))
    }

    pub fn player_by_name(&self, name: &str) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| GameError::lookup(format!("no player named '{name}'")))
    }

    pub fn leader(&self) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.is_leader)
            .ok_or_else(|| GameError::lookup("no player holds the leader role"))
    }

    pub fn dealer(&self) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.is_dealer)
            .ok_or_else(|| GameError::lookup("no player holds the dealer role"))
    }

    /// Every trick so far, including one still in progress.
    pub fn tricks(&self) -> &[Trick] {
        self.tricks.as_deref().unwrap_or(&[])
    }

    pub fn hands_dealt(&self) -> bool {
        self.tricks.is_some()
    }

    pub fn completed_tricks(&self) -> impl Iterator<Item = &Trick> {
        let count = self.player_count();
        self.tricks().iter().filter(move |t| t.is_complete(count))
    }

    pub fn completed_trick_count(&self) -> usize {
        self.completed_tricks().count()
    }

    pub fn last_completed_trick(&self) -> Option<&Trick> {
        self.completed_tricks().last()
    }

    /// The trick still waiting for cards, if any.
    pub fn trick_in_progress(&self) -> Option<&Trick> {
        let count = self.player_count();
        self.tricks().last().filter(|t| !t.is_complete(count))
    }

    pub fn max_tricks(&self) -> usize {
        max_tricks(self.player_count().max(1))
    }

    pub fn remaining_tricks(&self) -> usize {
        self.max_tricks()
            .saturating_sub(self.completed_trick_count())
    }

    pub fn is_finished(&self) -> bool {
        self.hands_dealt() && self.completed_trick_count() >= self.max_tricks()
    }

    pub fn tricks_won(&self, player: PlayerId) -> usize {
        self.completed_tricks().filter(|t| t.won_by(player)).count()
    }

    pub fn won_cards(&self, player: PlayerId) -> impl Iterator<Item = &Card> {
        self.completed_tricks()
            .filter(move |t| t.won_by(player))
            .flat_map(|t| t.cards.iter())
    }

    /// Task ids currently dealt out, claimed or owned.
    pub fn tasks_in_use(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self
            .unassigned_tasks
            .iter()
            .flatten()
            .map(|t| t.id)
            .collect();
        for player in &self.players {
            ids.extend(player.tasks.keys().copied());
        }
        ids
    }

    pub fn hints_used(&self) -> usize {
        self.players.iter().filter(|p| p.hint.used).count()
    }
}
