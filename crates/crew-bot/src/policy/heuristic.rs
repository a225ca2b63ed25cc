use super::{Policy, PolicyContext};
use crate::bot::{BotContext, BotDifficulty, PlayPlanner, TaskView};
use crew_core::game::{hint_placement, legal_plays};
use crew_core::model::card::Card;
use crew_core::tasks::{TaskExpr, TaskId, descriptor};
use tracing::{Level, event};

/// Adapter that puts the play planner and claim heuristics behind the Policy trait
pub struct HeuristicPolicy {
    difficulty: BotDifficulty,
}

impl HeuristicPolicy {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self { difficulty }
    }

    pub fn easy() -> Self {
        Self::new(BotDifficulty::Easy)
    }

    pub fn normal() -> Self {
        Self::new(BotDifficulty::Normal)
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }
}

impl Policy for HeuristicPolicy {
    fn choose_play(&mut self, ctx: &PolicyContext) -> usize {
        let legal = legal_plays(ctx.state, ctx.seat).unwrap_or_default();
        let Some(&first) = legal.first() else {
            log_play_decision(ctx, self.difficulty, &legal, None, "fallback_empty_legal");
            return 0;
        };

        if matches!(self.difficulty, BotDifficulty::Easy) {
            log_play_decision(ctx, self.difficulty, &legal, Some(first), "easy_first_legal");
            return first;
        }

        let bot_ctx = BotContext::new(ctx.seat, ctx.state, self.difficulty);
        let (chosen, reason) = PlayPlanner::choose(&legal, &bot_ctx)
            .map(|(index, reason)| (index, reason.as_str()))
            .unwrap_or((first, "planner_declined"));
        log_play_decision(ctx, self.difficulty, &legal, Some(chosen), reason);
        chosen
    }

    fn choose_claim(&mut self, ctx: &PolicyContext, open: &[TaskId]) -> Option<TaskId> {
        if matches!(self.difficulty, BotDifficulty::Easy) {
            return open.first().copied();
        }
        let index = ctx.state.difficulty_index().ok()?;
        let view = TaskView::for_seat(ctx.state, ctx.seat);
        // A seat that must stay out of tricks takes nothing that needs one.
        let pick = open
            .iter()
            .copied()
            .filter_map(|id| descriptor(id).map(|d| (id, d)))
            .filter(|(_, d)| !view.avoid_tricks || matches!(d.expr, TaskExpr::ExactTricks(_)))
            .max_by_key(|(_, d)| d.difficulty_at(index).unwrap_or(0))
            .map(|(id, _)| id)
            .or_else(|| open.first().copied());
        event!(
            target: "crew_bot::claim",
            Level::DEBUG,
            seat = ctx.seat,
            open = open.len(),
            chosen = ?pick,
        );
        pick
    }

    fn choose_hint(&mut self, ctx: &PolicyContext) -> Option<usize> {
        if matches!(self.difficulty, BotDifficulty::Easy) {
            return None;
        }
        let state = ctx.state;
        let player = state.player(ctx.seat).ok()?;
        let budget = state.ruleset.unwrap_or_default().hint_mode.budget(state.player_count());
        if player.hint.used || state.hints_used() >= budget || state.trick_in_progress().is_some() {
            return None;
        }
        let view = TaskView::for_seat(state, ctx.seat);
        let relevant = |card: &Card| {
            view.wants(*card)
                || view
                    .team_wanted
                    .iter()
                    .any(|(want, _)| want.suit == card.suit)
        };
        let pick = player
            .hand
            .iter()
            .enumerate()
            .filter(|(_, card)| relevant(*card))
            .map(|(index, _)| index)
            .find(|&index| hint_placement(state, ctx.seat, index).is_ok());
        if let Some(index) = pick {
            event!(
                target: "crew_bot::hint",
                Level::DEBUG,
                seat = ctx.seat,
                card = %player.hand.cards()[index],
            );
        }
        pick
    }
}

fn log_play_decision(
    ctx: &PolicyContext,
    difficulty: BotDifficulty,
    legal: &[usize],
    chosen: Option<usize>,
    reason: &str,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let Some(player) = ctx.state.players.get(ctx.seat) else {
        return;
    };
    let hand = &player.hand;
    let choice = chosen
        .and_then(|index| hand.get(index))
        .map(|card| card.to_string())
        .unwrap_or_else(|| "-".to_string());
    let legal_preview = if legal.len() <= 6 {
        legal
            .iter()
            .filter_map(|index| hand.get(*index))
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", legal.len())
    };

    event!(
        target: "crew_bot::play",
        Level::DEBUG,
        seat = ctx.seat,
        difficulty = ?difficulty,
        legal_count = legal.len(),
        legal_moves = %legal_preview,
        chosen = %choice,
        trick = ctx.state.completed_trick_count() + 1,
        reason,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_core::game::{GameState, deal_hands};
    use crew_core::model::player::{Player, PlayerTask};
    use crew_core::tasks::catalog;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dealt(seed: u64) -> GameState {
        let state =
            GameState::with_players((0..4).map(|i| Player::new(i, format!("p{i}"))).collect());
        let mut rng = StdRng::seed_from_u64(seed);
        deal_hands(&state, 0, &mut rng).unwrap()
    }

    #[test]
    fn easy_policy_plays_first_legal_card() {
        let state = dealt(1);
        let seat = state.leader().unwrap().id;
        let ctx = PolicyContext { seat, state: &state };
        let mut policy = HeuristicPolicy::easy();
        assert_eq!(policy.choose_play(&ctx), 0);
        assert_eq!(policy.choose_hint(&ctx), None);
    }

    #[test]
    fn normal_policy_only_plays_legal_cards() {
        let state = dealt(2);
        let seat = state.leader().unwrap().id;
        let ctx = PolicyContext { seat, state: &state };
        let mut policy = HeuristicPolicy::normal();
        let chosen = policy.choose_play(&ctx);
        assert!(legal_plays(&state, seat).unwrap().contains(&chosen));
    }

    #[test]
    fn claims_come_from_the_open_list() {
        let state = dealt(3);
        let ctx = PolicyContext { seat: 1, state: &state };
        let open: Vec<TaskId> = catalog().iter().take(4).map(|t| t.id).collect();
        let mut policy = HeuristicPolicy::normal();
        let pick = policy.choose_claim(&ctx, &open).unwrap();
        assert!(open.contains(&pick));
        assert_eq!(HeuristicPolicy::easy().choose_claim(&ctx, &open), Some(open[0]));
        assert_eq!(policy.choose_claim(&ctx, &[]), None);
    }

    #[test]
    fn declaration_spreads_tricks_evenly() {
        let state = dealt(4);
        let ctx = PolicyContext { seat: 0, state: &state };
        let id = catalog()[0].id;
        assert_eq!(HeuristicPolicy::normal().choose_declaration(&ctx, id), 2);
    }

    #[test]
    fn hint_is_skipped_once_used() {
        let mut state = dealt(5);
        let id = catalog()[0].id;
        state.players[1].tasks.insert(id, PlayerTask::open(None));
        state.players[0].hint.used = true;
        let ctx = PolicyContext { seat: 0, state: &state };
        assert_eq!(HeuristicPolicy::normal().choose_hint(&ctx), None);
    }
}
