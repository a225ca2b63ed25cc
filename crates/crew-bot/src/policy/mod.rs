mod heuristic;

pub use heuristic::HeuristicPolicy;

use crew_core::game::GameState;
use crew_core::model::player::PlayerId;
use crew_core::tasks::TaskId;

/// Context provided to policies for decision-making
pub struct PolicyContext<'a> {
    pub seat: PlayerId,
    pub state: &'a GameState,
}

/// Interface for seats that play without a human behind them.
pub trait Policy: Send {
    /// Index into the seat's hand of the card to play; must be legal.
    fn choose_play(&mut self, ctx: &PolicyContext) -> usize;

    /// Which still-unclaimed task to take, or `None` to pass.
    fn choose_claim(&mut self, ctx: &PolicyContext, open: &[TaskId]) -> Option<TaskId>;

    /// The number to declare for a task that asks for one.
    fn choose_declaration(&mut self, ctx: &PolicyContext, task: TaskId) -> u8 {
        let _ = task;
        let count = ctx.state.player_count().max(1);
        u8::try_from(ctx.state.max_tricks() / count).unwrap_or(u8::MAX)
    }

    /// Optional: a hand index to hint before the next trick.
    fn choose_hint(&mut self, _ctx: &PolicyContext) -> Option<usize> {
        None
    }
}
