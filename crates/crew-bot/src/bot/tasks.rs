use crew_core::game::GameState;
use crew_core::model::card::Card;
use crew_core::model::player::PlayerId;
use crew_core::tasks::expr::{Comparison, TaskExpr};
use crew_core::tasks::descriptor;

/// What the open tasks at the table ask of the current trick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskView {
    /// Cards this seat has promised to win.
    pub wanted: Vec<Card>,
    /// Cards other seats have promised to win, with their owner.
    pub team_wanted: Vec<(Card, PlayerId)>,
    /// This seat should stop taking tricks.
    pub avoid_tricks: bool,
}

impl TaskView {
    pub fn for_seat(state: &GameState, seat: PlayerId) -> Self {
        let mut view = TaskView::default();
        for player in &state.players {
            for (id, task) in &player.tasks {
                if task.is_settled() {
                    continue;
                }
                let Some(desc) = descriptor(*id) else {
                    continue;
                };
                let mut cards = Vec::new();
                collect_cards(&desc.expr, &mut cards);
                if player.id == seat {
                    view.wanted.extend(cards);
                    if limits_tricks(&desc.expr, state.tricks_won(seat), task.data) {
                        view.avoid_tricks = true;
                    }
                } else {
                    view.team_wanted.extend(cards.into_iter().map(|c| (c, player.id)));
                }
            }
        }
        view
    }

    pub fn wants(&self, card: Card) -> bool {
        self.wanted.contains(&card)
    }

    pub fn owner_of(&self, card: Card) -> Option<PlayerId> {
        self.team_wanted
            .iter()
            .find(|(c, _)| *c == card)
            .map(|(_, owner)| *owner)
    }
}

fn collect_cards(expr: &TaskExpr, out: &mut Vec<Card>) {
    match expr {
        TaskExpr::WinCard(card) => out.push(*card),
        TaskExpr::All(children) | TaskExpr::Any(children) => {
            for child in children {
                collect_cards(child, out);
            }
        }
        _ => {}
    }
}

fn limits_tricks(expr: &TaskExpr, won: usize, data: Option<u8>) -> bool {
    match expr {
        TaskExpr::ExactTricks(count) => count
            .resolve(data)
            .is_some_and(|n| won >= usize::from(n)),
        TaskExpr::CompareTricks { cmp, .. } => *cmp == Comparison::Less,
        TaskExpr::All(children) => children.iter().any(|c| limits_tricks(c, won, data)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_core::model::player::{Player, PlayerTask};
    use crew_core::model::suit::Suit;
    use crew_core::tasks::{TaskId, catalog};

    fn find(text: &str) -> TaskId {
        catalog()
            .iter()
            .find(|t| t.text == text)
            .map(|t| t.id)
            .unwrap()
    }

    #[test]
    fn splits_own_and_team_cards() {
        let mut state =
            GameState::with_players((0..3).map(|i| Player::new(i, format!("p{i}"))).collect());
        state.tricks = Some(Vec::new());
        state.players[0]
            .tasks
            .insert(find("I will win the pink 3"), PlayerTask::open(None));
        state.players[1].tasks.insert(
            find("I will win the pink 1 and the green 7"),
            PlayerTask::open(None),
        );
        state.players[1]
            .tasks
            .insert(find("I will win no tricks"), PlayerTask::open(None));

        let view = TaskView::for_seat(&state, 0);
        assert!(view.wants(Card::new(3, Suit::Pink)));
        assert_eq!(view.owner_of(Card::new(7, Suit::Green)), Some(1));
        assert!(!view.avoid_tricks);
        assert!(TaskView::for_seat(&state, 1).avoid_tricks);
    }
}
