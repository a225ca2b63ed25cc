use super::state::GameState;

impl GameState {
    /// The blob the sync layer stores and broadcasts for one game.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use crate::game::state::{GameState, HintMode, Ruleset};
    use crate::model::card::Card;
    use crate::model::player::{Player, PlayerTask};
    use crate::model::suit::Suit;
    use crate::tasks::TaskId;

    #[test]
    fn snapshot_uses_plain_field_names() {
        let mut state = GameState::with_players(vec![Player::new(0, "Ada")]);
        state.players[0].hand.add(Card::new(3, Suit::Green));
        state.players[0].tasks.insert(TaskId(12), PlayerTask::open(Some(2)));
        state.ruleset = Some(Ruleset {
            hint_mode: HintMode::NoTokens,
            timer: None,
        });
        let value: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
        assert_eq!(value["players"][0]["hand"][0], serde_json::json!({"rank": 3, "suit": "green"}));
        assert_eq!(
            value["players"][0]["tasks"]["12"],
            serde_json::json!({"done": false, "failed": false, "data": 2})
        );
        assert_eq!(value["ruleset"]["hint_mode"], "no_tokens");
        assert!(value.get("tricks").is_none());
        assert!(value.get("unassigned_tasks").is_none());
    }

    #[test]
    fn sparse_blob_fills_defaults() {
        let blob = r#"{
            "players": [
                { "id": 0, "name": "Ada" },
                { "id": 1, "name": "Grace", "is_leader": true }
            ],
            "tricks": []
        }"#;
        let state = GameState::from_json(blob).unwrap();
        assert_eq!(state.player_count(), 2);
        assert!(state.players[1].is_leader);
        assert!(state.players[0].hand.is_empty());
        assert!(!state.players[0].hint.used);
        assert!(state.hands_dealt());
        assert!(!state.timeout);
        assert!(state.leftover_tasks.is_empty());
    }

    #[test]
    fn snapshot_restores_equal_state() {
        let mut state = GameState::with_players(vec![Player::new(0, "Ada"), Player::new(1, "Grace")]);
        state.tricks = Some(Vec::new());
        state.leftover_tasks = vec![TaskId(3), TaskId(1)];
        let json = state.to_json_pretty().unwrap();
        assert_eq!(GameState::from_json(&json).unwrap(), state);
    }
}
