use crate::error::{GameError, Result};
use crate::game::state::GameState;
use crate::model::player::PlayerId;
use crate::tasks::TaskId;
use crate::tasks::catalog::descriptor;
use crate::tasks::expr::{CardFilter, Comparison, Rival, TaskExpr, TrickNo, TrickTest};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Success,
    Failure,
}

/// Which open tasks a settling pass looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// After a trick completes: every open task.
    AllTasks,
    /// After a single card: only tasks that can change between tricks.
    PerPlay,
}

/// Verdict of `expr` for `owner` against the current state.
pub fn evaluate(expr: &TaskExpr, state: &GameState, owner: PlayerId, data: Option<u8>) -> TaskStatus {
    let game_over = state.is_finished();
    match expr {
        TaskExpr::WinCard(card) => match state.completed_tricks().find(|t| t.contains(*card)) {
            Some(trick) if trick.won_by(owner) => TaskStatus::Success,
            Some(_) => TaskStatus::Failure,
            // never played: lost by omission
            None if game_over => TaskStatus::Failure,
            None => TaskStatus::Pending,
        },
        TaskExpr::ExactTricks(count) => {
            let Some(target) = count.resolve(data).map(usize::from) else {
                return TaskStatus::Pending;
            };
            let won = state.tricks_won(owner);
            if won > target || won + state.remaining_tricks() < target {
                TaskStatus::Failure
            } else if game_over {
                TaskStatus::Success
            } else {
                TaskStatus::Pending
            }
        }
        TaskExpr::CompareTricks { rival, cmp } => {
            if !game_over {
                return TaskStatus::Pending;
            }
            compare_with_rival(state, owner, *rival, *cmp, |p| state.tricks_won(p))
        }
        TaskExpr::CompareCards { filter, rival, cmp } => {
            if !game_over {
                return TaskStatus::Pending;
            }
            compare_with_rival(state, owner, *rival, *cmp, |p| {
                count_won(state, p, filter)
            })
        }
        TaskExpr::CompareOwnCards { left, right, cmp } => {
            if !game_over {
                return TaskStatus::Pending;
            }
            verdict(cmp.holds(count_won(state, owner, left), count_won(state, owner, right)))
        }
        TaskExpr::Streak(length) => {
            let (best, current) = streaks(state, owner);
            if best >= *length {
                TaskStatus::Success
            } else if current + state.remaining_tricks() < *length {
                TaskStatus::Failure
            } else {
                TaskStatus::Pending
            }
        }
        TaskExpr::CardCount {
            count,
            filter,
            exact,
        } => {
            let won = count_won(state, owner, filter);
            if *exact {
                if won > *count {
                    TaskStatus::Failure
                } else if game_over {
                    verdict(won == *count)
                } else {
                    TaskStatus::Pending
                }
            } else if won >= *count {
                TaskStatus::Success
            } else if game_over {
                TaskStatus::Failure
            } else {
                TaskStatus::Pending
            }
        }
        TaskExpr::WonTrickWith(test) => match state.last_completed_trick() {
            Some(trick) if trick.won_by(owner) && test.check(trick, state.player_count()) => {
                TaskStatus::Success
            }
            _ => TaskStatus::Pending,
        },
        TaskExpr::NthTrick { trick, won, test } => nth_trick(state, owner, *trick, *won, test.as_ref()),
        TaskExpr::NoLeadWith(filter) => no_lead_with(state, owner, filter),
        TaskExpr::All(children) => {
            let verdicts: Vec<_> = children
                .iter()
                .map(|child| evaluate(child, state, owner, data))
                .collect();
            if verdicts.iter().any(|v| *v == TaskStatus::Failure) {
                TaskStatus::Failure
            } else if verdicts.iter().all(|v| *v == TaskStatus::Success) {
                TaskStatus::Success
            } else {
                TaskStatus::Pending
            }
        }
        TaskExpr::Any(children) => {
            let verdicts: Vec<_> = children
                .iter()
                .map(|child| evaluate(child, state, owner, data))
                .collect();
            if verdicts.iter().any(|v| *v == TaskStatus::Success) {
                TaskStatus::Success
            } else if verdicts.iter().all(|v| *v == TaskStatus::Failure) {
                TaskStatus::Failure
            } else {
                TaskStatus::Pending
            }
        }
    }
}

fn verdict(ok: bool) -> TaskStatus {
    if ok {
        TaskStatus::Success
    } else {
        TaskStatus::Failure
    }
}

fn count_won(state: &GameState, player: PlayerId, filter: &CardFilter) -> usize {
    state.won_cards(player).filter(|c| filter.matches(c)).count()
}

fn compare_with_rival(
    state: &GameState,
    owner: PlayerId,
    rival: Rival,
    cmp: Comparison,
    tally: impl Fn(PlayerId) -> usize,
) -> TaskStatus {
    let mine = tally(owner);
    match rival {
        Rival::Leader => match state.leader() {
            Ok(leader) => verdict(cmp.holds(mine, tally(leader.id))),
            Err(_) => TaskStatus::Pending,
        },
        Rival::EachOther => verdict(
            state
                .players
                .iter()
                .filter(|p| p.id != owner)
                .all(|p| cmp.holds(mine, tally(p.id))),
        ),
    }
}

/// Longest run of consecutive wins so far, and the run still open at the end.
fn streaks(state: &GameState, owner: PlayerId) -> (usize, usize) {
    let mut best = 0;
    let mut current = 0;
    for trick in state.completed_tricks() {
        if trick.won_by(owner) {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    (best, current)
}

fn nth_trick(
    state: &GameState,
    owner: PlayerId,
    which: TrickNo,
    won: bool,
    test: Option<&TrickTest>,
) -> TaskStatus {
    let number = which.resolve(state.max_tricks());
    if number == 0 {
        return TaskStatus::Pending;
    }
    let Some(trick) = state.completed_tricks().nth(number - 1) else {
        return TaskStatus::Pending;
    };
    let achieved =
        trick.won_by(owner) && test.is_none_or(|t| t.check(trick, state.player_count()));
    verdict(achieved == won)
}

fn no_lead_with(state: &GameState, owner: PlayerId, filter: &CardFilter) -> TaskStatus {
    let tricks = state.tricks();
    let led_forbidden = tricks
        .iter()
        .filter(|t| t.leader == owner)
        .filter_map(|t| t.lead_card())
        .any(|card| filter.matches(&card));
    if led_forbidden {
        return TaskStatus::Failure;
    }

    let must_lead = state.hands_dealt()
        && !state.is_finished()
        && state.trick_in_progress().is_none()
        && crate::game::play::current_turn(state).ok() == Some(owner);
    if must_lead {
        if let Ok(player) = state.player(owner) {
            if !player.hand.is_empty() && player.hand.iter().all(|c| filter.matches(c)) {
                return TaskStatus::Failure;
            }
        }
    }

    let last = state.max_tricks();
    if tricks.len() == last && tricks.last().is_some_and(|t| t.cards.len() > 1) {
        return TaskStatus::Success;
    }
    TaskStatus::Pending
}

/// Settles open tasks in place. Settled tasks are never revisited.
pub(crate) fn settle(state: &mut GameState, scope: Scope) {
    let mut verdicts: Vec<(PlayerId, TaskId, TaskStatus)> = Vec::new();
    for player in &state.players {
        for (id, task) in &player.tasks {
            if task.is_settled() {
                continue;
            }
            let Some(desc) = descriptor(*id) else {
                continue;
            };
            if scope == Scope::PerPlay && !desc.expr.needs_per_play() {
                continue;
            }
            let status = evaluate(&desc.expr, state, player.id, task.data);
            if status != TaskStatus::Pending {
                verdicts.push((player.id, *id, status));
            }
        }
    }

    for (player_id, task_id, status) in verdicts {
        if let Some(task) = state.players[player_id].tasks.get_mut(&task_id) {
            match status {
                TaskStatus::Success => task.done = true,
                TaskStatus::Failure => task.failed = true,
                TaskStatus::Pending => {}
            }
            debug!(player = player_id, task = task_id.0, ?status, "task settled");
        }
    }
}

/// Returns a copy of `state` with every open task evaluated and settled.
pub fn compute_and_set_task_state(state: &GameState) -> GameState {
    let mut next = state.clone();
    settle(&mut next, Scope::AllTasks);
    next
}

/// Player self-report: flips `done` and always clears `failed`.
pub fn toggle_task_done(state: &GameState, player: PlayerId, task: TaskId) -> Result<GameState> {
    let mut next = state.clone();
    let entry = next
        .player_mut(player)?
        .tasks
        .get_mut(&task)
        .ok_or_else(|| GameError::precondition(format!("player {player} does not hold {task}")))?;
    entry.done = !entry.done;
    entry.failed = false;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::Card;
    use crate::model::player::{Player, PlayerTask};
    use crate::model::suit::Suit;
    use crate::model::trick::Trick;
    use crate::tasks::expr::{Count, exact_cards, exact_tricks, last, nth, not_nth, trick_with, win, won_cards};

    fn table(n: usize) -> GameState {
        let mut state =
            GameState::with_players((0..n).map(|i| Player::new(i, format!("p{i}"))).collect());
        state.tricks = Some(Vec::new());
        state.players[0].is_leader = true;
        state
    }

    fn push_trick(state: &mut GameState, leader: usize, cards: &[Card]) {
        let mut trick = Trick {
            leader,
            cards: cards.to_vec(),
            winner: None,
        };
        trick.winner = Some(trick.compute_winner(state.player_count()).unwrap());
        state.tricks.get_or_insert_with(Vec::new).push(trick);
    }

    /// Trick led by `winner` with a blue card nobody else can beat.
    fn won_by(state: &mut GameState, winner: usize, rank: u8) {
        let n = state.player_count();
        let mut cards = vec![Card::new(rank, Suit::Blue)];
        cards.extend((1..n).map(|i| Card::new(i as u8, Suit::Yellow)));
        push_trick(state, winner, &cards);
    }

    fn finish(state: &mut GameState, winner: usize) {
        while state.completed_trick_count() < state.max_tricks() {
            won_by(state, winner, 9);
        }
    }

    #[test]
    fn winning_zero_tricks_fails_on_first_win() {
        let mut state = table(3);
        let expr = exact_tricks(0);
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Pending);
        won_by(&mut state, 1, 5);
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Failure);
    }

    #[test]
    fn exact_tricks_fails_when_unreachable_and_succeeds_at_end() {
        let mut state = table(5);
        let expr = exact_tricks(2);
        for _ in 0..7 {
            won_by(&mut state, 0, 9);
        }
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Failure);

        let mut state = table(5);
        won_by(&mut state, 1, 9);
        won_by(&mut state, 1, 8);
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Pending);
        finish(&mut state, 0);
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Success);
    }

    #[test]
    fn declared_count_uses_claim_data() {
        let mut state = table(5);
        let expr = TaskExpr::ExactTricks(Count::Declared);
        assert_eq!(evaluate(&expr, &state, 2, None), TaskStatus::Pending);
        won_by(&mut state, 2, 9);
        assert_eq!(evaluate(&expr, &state, 2, Some(0)), TaskStatus::Failure);
        finish(&mut state, 3);
        assert_eq!(evaluate(&expr, &state, 2, Some(1)), TaskStatus::Success);
    }

    #[test]
    fn win_card_settles_with_its_trick() {
        let mut state = table(3);
        let target = Card::new(6, Suit::Yellow);
        let expr = win(target);
        push_trick(
            &mut state,
            0,
            &[Card::new(2, Suit::Green), Card::new(6, Suit::Yellow), Card::new(3, Suit::Green)],
        );
        assert_eq!(evaluate(&expr, &state, 2, None), TaskStatus::Success);
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Failure);
    }

    #[test]
    fn unplayed_card_is_lost_by_omission() {
        let mut state = table(3);
        let expr = win(Card::new(1, Suit::Pink));
        finish(&mut state, 0);
        assert_eq!(evaluate(&expr, &state, 0, None), TaskStatus::Failure);
    }

    #[test]
    fn streak_succeeds_and_fails_when_out_of_tricks() {
        let mut state = table(5);
        let expr = TaskExpr::Streak(3);
        won_by(&mut state, 1, 9);
        won_by(&mut state, 1, 8);
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Pending);
        won_by(&mut state, 1, 7);
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Success);

        let mut state = table(5);
        for _ in 0..6 {
            won_by(&mut state, 0, 9);
        }
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Failure);
    }

    #[test]
    fn card_count_exact_and_threshold() {
        let mut state = table(3);
        won_by(&mut state, 1, 4);
        let none_blue = exact_cards(0, CardFilter::Suit(Suit::Blue));
        assert_eq!(evaluate(&none_blue, &state, 1, None), TaskStatus::Failure);
        let two_yellow = won_cards(2, CardFilter::Suit(Suit::Yellow));
        assert_eq!(evaluate(&two_yellow, &state, 1, None), TaskStatus::Success);
        let three_ones = won_cards(3, CardFilter::Rank(1));
        assert_eq!(evaluate(&three_ones, &state, 1, None), TaskStatus::Pending);
    }

    #[test]
    fn rank_counts_ignore_trump() {
        let mut state = table(3);
        push_trick(
            &mut state,
            0,
            &[Card::trump(2), Card::new(2, Suit::Blue), Card::new(5, Suit::Blue)],
        );
        let twos = won_cards(2, CardFilter::Rank(2));
        assert_eq!(evaluate(&twos, &state, 0, None), TaskStatus::Pending);
    }

    #[test]
    fn comparisons_wait_for_game_end() {
        let mut state = table(3);
        let more_than_leader = TaskExpr::CompareTricks {
            rival: Rival::Leader,
            cmp: Comparison::Greater,
        };
        won_by(&mut state, 1, 9);
        assert_eq!(evaluate(&more_than_leader, &state, 1, None), TaskStatus::Pending);
        finish(&mut state, 2);
        assert_eq!(evaluate(&more_than_leader, &state, 1, None), TaskStatus::Success);
        let fewest = TaskExpr::CompareTricks {
            rival: Rival::EachOther,
            cmp: Comparison::Less,
        };
        assert_eq!(evaluate(&fewest, &state, 0, None), TaskStatus::Success);
        assert_eq!(evaluate(&fewest, &state, 2, None), TaskStatus::Failure);
    }

    #[test]
    fn own_card_comparison() {
        let mut state = table(3);
        won_by(&mut state, 1, 9);
        finish(&mut state, 2);
        let more_blue_than_pink = TaskExpr::CompareOwnCards {
            left: CardFilter::Suit(Suit::Blue),
            right: CardFilter::Suit(Suit::Pink),
            cmp: Comparison::Greater,
        };
        assert_eq!(evaluate(&more_blue_than_pink, &state, 1, None), TaskStatus::Success);
        assert_eq!(evaluate(&more_blue_than_pink, &state, 0, None), TaskStatus::Failure);
    }

    #[test]
    fn won_trick_test_never_fails() {
        let mut state = table(3);
        let expr = trick_with(TrickTest::AllOdd);
        won_by(&mut state, 1, 4);
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Pending);
        push_trick(
            &mut state,
            1,
            &[Card::new(9, Suit::Green), Card::new(1, Suit::Green), Card::new(3, Suit::Pink)],
        );
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Success);
        assert_eq!(evaluate(&expr, &state, 2, None), TaskStatus::Pending);
    }

    #[test]
    fn nth_trick_and_negation() {
        let mut state = table(4);
        assert_eq!(evaluate(&nth(1), &state, 2, None), TaskStatus::Pending);
        won_by(&mut state, 2, 9);
        assert_eq!(evaluate(&nth(1), &state, 2, None), TaskStatus::Success);
        assert_eq!(evaluate(&not_nth(1), &state, 2, None), TaskStatus::Failure);
        assert_eq!(evaluate(&not_nth(1), &state, 3, None), TaskStatus::Success);
        assert_eq!(evaluate(&last(), &state, 2, None), TaskStatus::Pending);
        finish(&mut state, 3);
        assert_eq!(evaluate(&last(), &state, 3, None), TaskStatus::Success);
    }

    #[test]
    fn no_lead_fails_on_forbidden_lead() {
        let mut state = table(3);
        let expr = TaskExpr::NoLeadWith(CardFilter::Suit(Suit::Pink));
        state.tricks = Some(vec![Trick {
            leader: 1,
            cards: vec![Card::new(4, Suit::Pink)],
            winner: None,
        }]);
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Failure);
        assert_eq!(evaluate(&expr, &state, 0, None), TaskStatus::Pending);
    }

    #[test]
    fn no_lead_fails_when_forced_to_lead_forbidden() {
        let mut state = table(3);
        let expr = TaskExpr::NoLeadWith(CardFilter::Suit(Suit::Pink));
        state.players[0].hand = crate::model::hand::Hand::with_cards(vec![
            Card::new(2, Suit::Pink),
            Card::new(7, Suit::Pink),
        ]);
        assert_eq!(evaluate(&expr, &state, 0, None), TaskStatus::Failure);
        state.players[0].hand.add(Card::new(1, Suit::Green));
        assert_eq!(evaluate(&expr, &state, 0, None), TaskStatus::Pending);
    }

    #[test]
    fn no_lead_succeeds_once_final_trick_has_a_follower() {
        let mut state = table(3);
        let expr = TaskExpr::NoLeadWith(CardFilter::Rank(9));
        while state.completed_trick_count() + 1 < state.max_tricks() {
            won_by(&mut state, 0, 5);
        }
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Pending);

        state.tricks.get_or_insert_with(Vec::new).push(Trick {
            leader: 0,
            cards: vec![Card::new(3, Suit::Green)],
            winner: None,
        });
        assert_eq!(state.tricks().len(), state.max_tricks());
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Pending);

        if let Some(trick) = state.tricks.as_mut().and_then(|t| t.last_mut()) {
            trick.cards.push(Card::new(4, Suit::Green));
        }
        assert_eq!(evaluate(&expr, &state, 1, None), TaskStatus::Success);
    }

    #[test]
    fn combinators_follow_three_valued_logic() {
        let mut state = table(3);
        won_by(&mut state, 1, 9);
        let both = TaskExpr::All(vec![nth(1), exact_tricks(1)]);
        let either = TaskExpr::Any(vec![nth(1), exact_tricks(0)]);
        assert_eq!(evaluate(&both, &state, 1, None), TaskStatus::Pending);
        assert_eq!(evaluate(&either, &state, 1, None), TaskStatus::Success);
        let neither = TaskExpr::Any(vec![not_nth(1), exact_tricks(0)]);
        assert_eq!(evaluate(&neither, &state, 1, None), TaskStatus::Failure);
        let one_fails = TaskExpr::All(vec![nth(1), exact_tricks(0)]);
        assert_eq!(evaluate(&one_fails, &state, 1, None), TaskStatus::Failure);
    }

    #[test]
    fn settled_tasks_are_frozen_until_toggled() {
        let zero_tricks = crate::tasks::catalog()
            .iter()
            .find(|d| d.expr == exact_tricks(0))
            .expect("catalog has a zero-trick task")
            .id;
        let mut state = table(3);
        state.players[1].tasks.insert(zero_tricks, PlayerTask::open(None));
        won_by(&mut state, 1, 9);
        let state = compute_and_set_task_state(&state);
        assert!(state.players[1].tasks[&zero_tricks].failed);

        let again = compute_and_set_task_state(&state);
        assert_eq!(again, state);

        let toggled = toggle_task_done(&state, 1, zero_tricks).unwrap();
        let task = toggled.players[1].tasks[&zero_tricks];
        assert!(task.done && !task.failed);
        let twice = toggle_task_done(&toggled, 1, zero_tricks).unwrap();
        let task = twice.players[1].tasks[&zero_tricks];
        assert!(!task.done && !task.failed);
    }

    #[test]
    fn toggling_foreign_task_is_rejected() {
        let state = table(3);
        assert!(matches!(
            toggle_task_done(&state, 0, TaskId(1)),
            Err(GameError::Precondition(_))
        ));
        assert!(matches!(
            toggle_task_done(&state, 9, TaskId(1)),
            Err(GameError::Lookup(_))
        ));
    }
}
