pub mod assignment;
pub mod deal;
pub mod hint;
pub mod history;
pub mod lobby;
pub mod outcome;
pub mod play;
pub mod serialization;
pub mod state;

pub use assignment::{attach_data, deal_tasks, finalize, replace_task, toggle_claim};
pub use deal::deal_hands;
pub use hint::{give_hint, hint_placement};
pub use history::History;
pub use lobby::{Lobby, LobbyClient, retry, start_game};
pub use outcome::{MissionOutcome, mission_outcome};
pub use play::{current_turn, is_legal_play, legal_plays, play_card};
pub use state::{GameState, HintMode, Ruleset, UnassignedTask};
