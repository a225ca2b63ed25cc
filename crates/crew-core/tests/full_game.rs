use crew_core::GameError;
use crew_core::game::{
    GameState, HintMode, Lobby, MissionOutcome, Ruleset, attach_data, current_turn, deal_hands,
    deal_tasks, finalize, give_hint, legal_plays, mission_outcome, play_card, retry, start_game,
    toggle_claim,
};
use crew_core::model::card::Card;
use crew_core::model::player::PlayerTask;
use crew_core::model::suit::Suit;
use crew_core::tasks::{TaskId, TaskStatus, catalog, descriptor};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn lobby(names: &[&str]) -> Lobby {
    let mut lobby = Lobby::new(names[0]);
    for (i, name) in names.iter().enumerate() {
        lobby.join(format!("key-{i}"), *name);
    }
    lobby
}

fn task_named(text: &str) -> TaskId {
    catalog()
        .iter()
        .find(|t| t.text == text)
        .map(|t| t.id)
        .unwrap_or_else(|| panic!("no task reads '{text}'"))
}

/// Hands every dealt task out round-robin, attaching a number where one is needed.
fn claim_all(state: &GameState) -> GameState {
    let ids: Vec<_> = state
        .unassigned_tasks
        .as_ref()
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    let mut state = state.clone();
    for (i, id) in ids.into_iter().enumerate() {
        let owner = i % state.player_count();
        state = if descriptor(id).unwrap().requires_input {
            attach_data(&state, owner, id, 1).unwrap()
        } else {
            toggle_claim(&state, owner, id).unwrap()
        };
    }
    state
}

fn play_out(mut state: GameState) -> GameState {
    while !state.is_finished() && mission_outcome(&state) == MissionOutcome::InProgress {
        let turn = current_turn(&state).unwrap();
        let first = legal_plays(&state, turn).unwrap()[0];
        state = play_card(&state, turn, first).unwrap();
    }
    state
}

#[test]
fn lobby_to_mission_result() {
    let mut rng = StdRng::seed_from_u64(7);
    let state = start_game(&lobby(&["Ada", "Grace", "Linus", "Barbara"])).unwrap();
    let state = deal_tasks(&state, 6, &mut rng).unwrap();
    let state = claim_all(&state);
    let state = finalize(
        &state,
        Ruleset {
            hint_mode: HintMode::Default,
            timer: None,
        },
    )
    .unwrap();
    assert!(state.unassigned_tasks.is_none());
    assert!(state.players.iter().any(|p| !p.tasks.is_empty()));

    let state = deal_hands(&state, 0, &mut rng).unwrap();
    let leader = state.leader().unwrap().id;
    assert!(state.players[leader].hand.contains(Card::trump(4)));
    assert_eq!(current_turn(&state).unwrap(), leader);

    let finished = play_out(state);
    assert_ne!(mission_outcome(&finished), MissionOutcome::InProgress);

    let again = retry(&finished).unwrap();
    assert!(!again.hands_dealt());
    for player in &again.players {
        assert!(player.hand.is_empty());
        assert!(player.tasks.values().all(|t| !t.is_settled()));
    }
}

#[test]
fn claiming_twice_releases_the_task() {
    let mut rng = StdRng::seed_from_u64(3);
    let state = start_game(&lobby(&["a", "b", "c"])).unwrap();
    let state = deal_tasks(&state, 3, &mut rng).unwrap();
    let id = state.unassigned_tasks.as_ref().unwrap()[0].id;

    let claimed = toggle_claim(&state, 2, id).unwrap();
    assert_eq!(claimed.unassigned_tasks.as_ref().unwrap()[0].claimant, Some(2));
    let released = toggle_claim(&claimed, 2, id).unwrap();
    assert_eq!(released.unassigned_tasks.as_ref().unwrap()[0].claimant, None);

    let err = finalize(&released, Ruleset::default()).unwrap_err();
    assert!(matches!(err, GameError::Precondition(_)));
}

#[test]
fn winning_a_trick_fails_no_tricks_at_once() {
    let mut rng = StdRng::seed_from_u64(11);
    let no_tricks = task_named("I will win no tricks");
    let mut state = start_game(&lobby(&["a", "b", "c"])).unwrap();
    state = deal_hands(&state, 2, &mut rng).unwrap();
    let leader = state.leader().unwrap().id;
    state.players[leader]
        .tasks
        .insert(no_tricks, PlayerTask::open(None));

    // The trump 4 holder leads it and nothing can beat it.
    let trump_four = state.players[leader]
        .hand
        .iter()
        .position(|c| *c == Card::trump(4))
        .unwrap();
    state = play_card(&state, leader, trump_four).unwrap();
    for _ in 1..state.player_count() {
        let turn = current_turn(&state).unwrap();
        let first = legal_plays(&state, turn).unwrap()[0];
        state = play_card(&state, turn, first).unwrap();
    }

    assert_eq!(state.completed_trick_count(), 1);
    let task = state.players[leader].tasks[&no_tricks];
    assert!(task.failed && !task.done);
    assert_eq!(mission_outcome(&state), MissionOutcome::Failure);
    assert_eq!(state.remaining_tricks(), 12);
}

#[test]
fn played_card_retires_its_hint() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut state = start_game(&lobby(&["a", "b", "c"])).unwrap();
    state = deal_hands(&state, 0, &mut rng).unwrap();
    let leader = state.leader().unwrap().id;

    let (index, card) = state.players[leader]
        .hand
        .iter()
        .copied()
        .enumerate()
        .find(|(_, c)| !c.is_trump() && state.players[leader].hand.of_suit(c.suit).count() == 1)
        .or_else(|| {
            state.players[leader]
                .hand
                .iter()
                .copied()
                .enumerate()
                .find(|(_, c)| {
                    !c.is_trump()
                        && state.players[leader]
                            .hand
                            .of_suit(c.suit)
                            .map(|o| o.rank)
                            .max()
                            == Some(c.rank)
                })
        })
        .unwrap();

    state = give_hint(&state, leader, index).unwrap();
    assert!(state.players[leader].hint.refers_to(card));
    state = play_card(&state, leader, index).unwrap();
    let hint = &state.players[leader].hint;
    assert!(hint.used);
    assert!(!hint.refers_to(card));
    assert_eq!(hint.card, None);
}

#[test]
fn leading_suit_must_be_followed() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut state = start_game(&lobby(&["a", "b", "c", "d", "e"])).unwrap();
    state = deal_hands(&state, 4, &mut rng).unwrap();
    let leader = current_turn(&state).unwrap();
    state = play_card(&state, leader, 0).unwrap();
    let led = state.trick_in_progress().unwrap().lead_suit().unwrap();

    let next = current_turn(&state).unwrap();
    let hand = &state.players[next].hand;
    let legal = legal_plays(&state, next).unwrap();
    if hand.has_suit(led) {
        assert!(legal.iter().all(|i| hand.get(*i).unwrap().suit == led));
    } else {
        assert_eq!(legal.len(), hand.len());
    }
    let err = play_card(&state, (next + 1) % 5, 0).unwrap_err();
    assert!(matches!(err, GameError::IllegalMove(_)));
}

#[test]
fn evaluation_reports_pending_before_any_trick() {
    let state = start_game(&lobby(&["a", "b", "c"])).unwrap();
    let id = task_named("I will win the pink 3");
    let expr = &descriptor(id).unwrap().expr;
    assert_eq!(
        crew_core::tasks::evaluate(expr, &state, 0, None),
        TaskStatus::Pending
    );
    assert_eq!(Card::new(3, Suit::Pink).to_string(), "P3");
}
