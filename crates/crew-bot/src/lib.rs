pub mod bot;
pub mod policy;

pub use bot::{BotContext, BotDifficulty, PlayPlanner, PlayReason, TaskView};
pub use policy::{HeuristicPolicy, Policy, PolicyContext};
