mod play;
mod tasks;

pub use play::{PlayPlanner, PlayReason};
pub use tasks::TaskView;

use crew_core::game::GameState;
use crew_core::model::card::Card;
use crew_core::model::hand::Hand;
use crew_core::model::player::PlayerId;
use crew_core::model::trick::Trick;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BotDifficulty {
    /// Always the first legal card, never a hint.
    Easy,
    #[default]
    Normal,
}

impl BotDifficulty {
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" | "legacy" => Some(BotDifficulty::Easy),
            "normal" | "default" => Some(BotDifficulty::Normal),
            _ => None,
        }
    }

    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        read("CREW_BOT_DIFFICULTY")
            .and_then(|raw| Self::from_name(&raw))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BotContext<'a> {
    pub seat: PlayerId,
    pub state: &'a GameState,
    pub difficulty: BotDifficulty,
}

impl<'a> BotContext<'a> {
    pub fn new(seat: PlayerId, state: &'a GameState, difficulty: BotDifficulty) -> Self {
        Self {
            seat,
            state,
            difficulty,
        }
    }

    pub fn hand(&self) -> &'a Hand {
        &self.state.players[self.seat].hand
    }

    pub fn open_trick(&self) -> Option<&'a Trick> {
        self.state.trick_in_progress()
    }

    pub fn tasks(&self) -> TaskView {
        TaskView::for_seat(self.state, self.seat)
    }
}

/// Ordinary cards by rank, every trump above them.
pub(crate) fn strength(card: Card) -> u8 {
    if card.is_trump() { 10 + card.rank } else { card.rank }
}

/// The card currently taking an unfinished trick, and who played it.
pub(crate) fn leading_play(trick: &Trick, player_count: usize) -> Option<(Card, PlayerId)> {
    let lead = trick.lead_suit()?;
    trick
        .cards
        .iter()
        .enumerate()
        .filter(|(_, card)| card.is_trump() || card.suit == lead)
        .max_by_key(|(_, card)| strength(**card))
        .map(|(position, card)| (*card, trick.player_at(position, player_count)))
}

/// Whether `card` would take an unfinished trick led in `lead` away from `best`.
pub(crate) fn beats(card: Card, best: Card, lead: crew_core::model::suit::Suit) -> bool {
    match (card.is_trump(), best.is_trump()) {
        (true, false) => true,
        (true, true) => card.rank > best.rank,
        (false, true) => false,
        (false, false) => card.suit == lead && best.suit == lead && card.rank > best.rank,
    }
}
