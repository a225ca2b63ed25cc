use crate::error::{GameError, Result};
use crate::game::state::GameState;
use crate::model::player::{Hint, Placement, PlayerId};
use tracing::debug;

/// Where the card at `card_index` sits among the player's cards of its suit.
pub fn hint_placement(state: &GameState, player: PlayerId, card_index: usize) -> Result<Placement> {
    let hand = &state.player(player)?.hand;
    let card = hand.get(card_index).ok_or_else(|| {
        GameError::lookup(format!(
            "player {player} has no card at position {card_index}"
        ))
    })?;
    if card.is_trump() {
        return Err(GameError::illegal("trump cards cannot be hinted"));
    }

    let ranks: Vec<u8> = hand.of_suit(card.suit).map(|c| c.rank).collect();
    let highest = ranks.iter().all(|r| *r <= card.rank);
    let lowest = ranks.iter().all(|r| *r >= card.rank);
    match (highest, lowest) {
        (true, true) => Ok(Placement::Middle),
        (true, false) => Ok(Placement::Top),
        (false, true) => Ok(Placement::Bottom),
        (false, false) => Err(GameError::illegal(format!(
            "{card} is neither the highest, the lowest nor the only {} card",
            card.suit.name()
        ))),
    }
}

pub fn give_hint(state: &GameState, player: PlayerId, card_index: usize) -> Result<GameState> {
    if state.trick_in_progress().is_some() {
        return Err(GameError::illegal("hints can only be given between tricks"));
    }
    if state.player(player)?.hint.used {
        return Err(GameError::illegal(format!(
            "player {player} has already used their hint"
        )));
    }
    let mode = state.ruleset.map(|r| r.hint_mode).unwrap_or_default();
    let budget = mode.budget(state.player_count());
    if state.hints_used() >= budget {
        return Err(GameError::illegal(format!(
            "all {budget} hints for this game have been used"
        )));
    }

    let placement = hint_placement(state, player, card_index)?;
    let mut next = state.clone();
    let seat = next.player_mut(player)?;
    let card = seat
        .hand
        .get(card_index)
        .ok_or_else(|| GameError::lookup(format!("no card at position {card_index}")))?;
    seat.hint = Hint::given(card, placement);
    debug!(player, %card, %placement, "hint given");
    Ok(next)
}
