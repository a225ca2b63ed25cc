use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::tasks::TaskId;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable seat index, assigned in join order.
pub type PlayerId = usize;

/// Where a hinted card sits among the player's cards of its suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Highest card of the suit.
    Top,
    /// Only card of the suit.
    Middle,
    /// Lowest card of the suit.
    Bottom,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Placement::Top => "top",
            Placement::Middle => "middle",
            Placement::Bottom => "bottom",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

impl Hint {
    pub fn given(card: Card, placement: Placement) -> Self {
        Self {
            used: true,
            card: Some(card),
            placement: Some(placement),
        }
    }

    pub fn refers_to(&self, card: Card) -> bool {
        self.card == Some(card)
    }

    /// The token stays spent once the hinted card leaves the hand.
    pub fn retire(&mut self) {
        self.card = None;
        self.placement = None;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTask {
    pub done: bool,
    pub failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<u8>,
}

impl PlayerTask {
    pub fn open(data: Option<u8>) -> Self {
        Self {
            done: false,
            failed: false,
            data,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.done || self.failed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub hand: Hand,
    #[serde(default)]
    pub hint: Hint,
    #[serde(default)]
    pub tasks: BTreeMap<TaskId, PlayerTask>,
    #[serde(default)]
    pub is_leader: bool,
    #[serde(default)]
    pub is_dealer: bool,
    #[serde(default)]
    pub extra_cards: u8,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Hand::new(),
            hint: Hint::default(),
            tasks: BTreeMap::new(),
            is_leader: false,
            is_dealer: false,
            extra_cards: 0,
        }
    }

    /// Clears everything a fresh deal replaces.
    pub fn reset_for_deal(&mut self) {
        self.hand.clear();
        self.hint = Hint::default();
        self.is_leader = false;
        self.is_dealer = false;
        self.extra_cards = 0;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Hint, Placement, Player, PlayerTask};
    use crate::model::card::Card;
    use crate::model::suit::Suit;

    #[test]
    fn retired_hint_stays_used() {
        let card = Card::new(5, Suit::Pink);
        let mut hint = Hint::given(card, Placement::Top);
        assert!(hint.refers_to(card));
        hint.retire();
        assert!(hint.used);
        assert_eq!(hint.card, None);
        assert_eq!(hint.placement, None);
    }

    #[test]
    fn reset_for_deal_keeps_identity_and_tasks() {
        let mut player = Player::new(2, "Ada");
        player.is_leader = true;
        player.extra_cards = 1;
        player.hand.add(Card::trump(4));
        player.tasks.insert(crate::tasks::TaskId(7), PlayerTask::open(None));
        player.reset_for_deal();
        assert_eq!(player.id, 2);
        assert!(player.hand.is_empty());
        assert!(!player.is_leader);
        assert_eq!(player.extra_cards, 0);
        assert_eq!(player.tasks.len(), 1);
    }

    #[test]
    fn unused_hint_serializes_without_card() {
        let json = serde_json::to_value(Hint::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "used": false }));
    }
}
