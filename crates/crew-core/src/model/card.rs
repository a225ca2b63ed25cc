use crate::model::suit::Suit;
use core::cmp::Ordering;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: u8,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: u8, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn trump(rank: u8) -> Self {
        Self::new(rank, Suit::Trump)
    }

    pub const fn is_trump(self) -> bool {
        self.suit.is_trump()
    }

    /// The trump 4 decides who leads the first trick.
    pub const fn is_leader_card(self) -> bool {
        self.is_trump() && self.rank == 4
    }

    pub const fn is_valid(self) -> bool {
        self.rank >= 1 && self.rank <= self.suit.max_rank()
    }

    /// Hand ordering: fixed suit order, then descending rank.
    pub fn display_cmp(&self, other: &Card) -> Ordering {
        self.suit
            .cmp(&other.suit)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}
