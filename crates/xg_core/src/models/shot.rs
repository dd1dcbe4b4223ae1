use serde::{Deserialize, Serialize};

/// One historical shot as supplied by the stats provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub team_id: String,
    pub shooter_id: String,
    /// Match the shot belongs to; used to derive per-game averages.
    #[serde(default)]
    pub game_id: Option<String>,
    /// Pre-shot expected goals. Nominally 0.0-1.0 but noisy feeds can exceed 1.0.
    pub shot_xg: f64,
    /// Post-shot expected goals (keeper-aware). Feeds without it fall back
    /// to `shot_xg`.
    #[serde(default)]
    pub shot_psxg: Option<f64>,
    #[serde(default)]
    pub pattern_of_play: String,
}

impl ShotRecord {
    pub fn new(team_id: &str, shooter_id: &str, shot_xg: f64) -> Self {
        Self {
            team_id: team_id.to_string(),
            shooter_id: shooter_id.to_string(),
            game_id: None,
            shot_xg,
            shot_psxg: None,
            pattern_of_play: String::new(),
        }
    }

    pub fn with_game(mut self, game_id: &str) -> Self {
        self.game_id = Some(game_id.to_string());
        self
    }

    pub fn with_psxg(mut self, shot_psxg: f64) -> Self {
        self.shot_psxg = Some(shot_psxg);
        self
    }

    pub fn with_pattern(mut self, pattern_of_play: &str) -> Self {
        self.pattern_of_play = pattern_of_play.to_string();
        self
    }

    pub fn is_pattern(&self, tag: &str) -> bool {
        self.pattern_of_play.eq_ignore_ascii_case(tag)
    }

    /// Post-shot xG, or pre-shot xG when the feed has none.
    pub fn post_shot_xg(&self) -> f64 {
        self.shot_psxg.unwrap_or(self.shot_xg)
    }
}
