use crate::error::{GameError, Result};
use crate::game::state::GameState;
use crate::model::card::Card;
use crate::model::player::PlayerId;
use crate::model::trick::Trick;
use crate::tasks::eval::{Scope, settle};
use tracing::debug;

/// Whose card is expected next: the leader opens the game, the last winner
/// opens each later trick, and play moves to the next seat within a trick.
pub fn current_turn(state: &GameState) -> Result<PlayerId> {
    let count = state.player_count();
    match state.tricks().last() {
        None => state.leader().map(|p| p.id),
        Some(trick) if trick.is_complete(count) => trick
            .winner
            .ok_or_else(|| GameError::precondition("completed trick has no winner")),
        Some(trick) => Ok(trick.next_player(count)),
    }
}

fn card_at(state: &GameState, player: PlayerId, card_index: usize) -> Result<Card> {
    state.player(player)?.hand.get(card_index).ok_or_else(|| {
        GameError::lookup(format!(
            "player {player} has no card at position {card_index}"
        ))
    })
}

/// Follow-suit check only; turn order is enforced by [`play_card`].
pub fn is_legal_play(state: &GameState, player: PlayerId, card_index: usize) -> Result<bool> {
    let card = card_at(state, player, card_index)?;
    let Some(lead) = state.trick_in_progress().and_then(Trick::lead_suit) else {
        return Ok(true);
    };
    let hand = &state.player(player)?.hand;
    Ok(card.suit == lead || !hand.has_suit(lead))
}

/// Indices of every card `player` may play right now.
pub fn legal_plays(state: &GameState, player: PlayerId) -> Result<Vec<usize>> {
    let size = state.player(player)?.hand.len();
    let mut legal = Vec::with_capacity(size);
    for index in 0..size {
        if is_legal_play(state, player, index)? {
            legal.push(index);
        }
    }
    Ok(legal)
}

pub fn play_card(state: &GameState, player: PlayerId, card_index: usize) -> Result<GameState> {
    if !state.hands_dealt() {
        return Err(GameError::precondition("hands have not been dealt"));
    }
    if state.is_finished() {
        return Err(GameError::precondition("every trick has been played"));
    }
    if state.timeout {
        return Err(GameError::precondition("the game ran out of time"));
    }
    let expected = current_turn(state)?;
    if expected != player {
        return Err(GameError::illegal(format!(
            "it is player {expected}'s turn, not player {player}'s"
        )));
    }
    if !is_legal_play(state, player, card_index)? {
        return Err(GameError::illegal("must follow the suit that was led"));
    }

    let mut next = state.clone();
    let count = next.player_count();
    let seat = next.player_mut(player)?;
    let card = seat
        .hand
        .remove_at(card_index)
        .ok_or_else(|| GameError::lookup(format!("no card at position {card_index}")))?;
    if seat.hint.refers_to(card) {
        seat.hint.retire();
    }

    let tricks = next.tricks.get_or_insert_with(Vec::new);
    match tricks.last_mut() {
        Some(trick) if !trick.is_complete(count) => trick.cards.push(card),
        _ => {
            let mut trick = Trick::new(player);
            trick.cards.push(card);
            tricks.push(trick);
        }
    }

    let completed = match tricks.last_mut() {
        Some(trick) if trick.is_complete(count) => {
            let winner = trick.compute_winner(count)?;
            trick.winner = Some(winner);
            Some(winner)
        }
        _ => None,
    };

    match completed {
        Some(winner) => {
            debug!(
                trick = next.completed_trick_count(),
                winner, "trick complete"
            );
            settle(&mut next, Scope::AllTasks);
        }
        None => settle(&mut next, Scope::PerPlay),
    }
    Ok(next)
}
