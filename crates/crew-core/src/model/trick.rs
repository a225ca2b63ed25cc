use crate::error::{GameError, Result};
use crate::model::card::Card;
use crate::model::player::PlayerId;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    pub leader: PlayerId,
    pub cards: Vec<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,
}

impl Trick {
    pub fn new(leader: PlayerId) -> Self {
        Self {
            leader,
            cards: Vec::with_capacity(5),
            winner: None,
        }
    }

    pub fn is_complete(&self, player_count: usize) -> bool {
        self.cards.len() == player_count
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.cards.first().map(|card| card.suit)
    }

    pub fn lead_card(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    /// Player who played the card at `position` (0 is the leader).
    pub fn player_at(&self, position: usize, player_count: usize) -> PlayerId {
        (self.leader + position) % player_count
    }

    /// Player who plays next in this trick.
    pub fn next_player(&self, player_count: usize) -> PlayerId {
        self.player_at(self.cards.len(), player_count)
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn won_by(&self, player: PlayerId) -> bool {
        self.winner == Some(player)
    }

    /// Card played by the winner, once known.
    pub fn winning_card(&self, player_count: usize) -> Option<Card> {
        let winner = self.winner?;
        let position = (winner + player_count - self.leader) % player_count;
        self.cards.get(position).copied()
    }

    pub fn rank_sum(&self) -> u32 {
        self.cards.iter().map(|c| u32::from(c.rank)).sum()
    }

    /// Highest trump wins; otherwise the highest card of the suit led.
    pub fn compute_winner(&self, player_count: usize) -> Result<PlayerId> {
        if !self.is_complete(player_count) {
            return Err(GameError::precondition(format!(
                "trick has {} of {player_count} cards, winner is undecided",
                self.cards.len()
            )));
        }
        let lead_suit = self
            .lead_suit()
            .ok_or_else(|| GameError::precondition("trick has no cards"))?;

        let best_of = |suit: Suit| {
            self.cards
                .iter()
                .enumerate()
                .filter(|(_, card)| card.suit == suit)
                .max_by_key(|(_, card)| card.rank)
                .map(|(position, _)| position)
        };

        let position = best_of(Suit::Trump)
            .or_else(|| best_of(lead_suit))
            .ok_or_else(|| GameError::precondition("trick has no card of the led suit"))?;
        Ok(self.player_at(position, player_count))
    }
}
