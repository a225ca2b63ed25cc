use crate::error::{GameError, Result};
use crate::game::state::GameState;
use crate::model::deck::{DECK_SIZE, Deck};
use crate::model::player::PlayerId;
use rand::Rng;
use tracing::debug;

/// Shuffles a fresh deck and deals it out, starting left of `dealer`.
///
/// The holder of the trump 4 becomes leader. Players who receive one of the
/// `40 % n` surplus cards are marked with `extra_cards = 1`.
pub fn deal_hands<R: Rng + ?Sized>(
    state: &GameState,
    dealer: PlayerId,
    rng: &mut R,
) -> Result<GameState> {
    if state.hands_dealt() && !state.is_finished() {
        return Err(GameError::precondition(
            "cannot deal while a game is being played",
        ));
    }
    state.difficulty_index()?;
    state.player(dealer)?;

    let mut next = state.clone();
    let count = next.player_count();
    for player in &mut next.players {
        player.reset_for_deal();
    }

    let deck = Deck::shuffled(rng);
    for (offset, card) in deck.into_cards().into_iter().enumerate() {
        let seat = (dealer + 1 + offset) % count;
        next.players[seat].hand.add(card);
    }

    let surplus = DECK_SIZE % count;
    for step in 0..surplus {
        next.players[(dealer + 1 + step) % count].extra_cards = 1;
    }

    for player in &mut next.players {
        player.hand.sort();
        player.is_leader = player.hand.iter().any(|c| c.is_leader_card());
    }
    next.players[dealer].is_dealer = true;
    next.tricks = Some(Vec::new());
    next.timeout = false;

    debug!(
        dealer,
        leader = next.leader().map(|p| p.id).ok(),
        "hands dealt"
    );
    Ok(next)
}
