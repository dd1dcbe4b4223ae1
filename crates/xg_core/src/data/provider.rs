use crate::models::{GoalkeeperDefensiveProfile, ShotRecord};

/// Season statistics consumed once at simulator construction.
///
/// Every per-team query may come back empty; the simulator substitutes neutral
/// defaults instead of failing.
pub trait StatsProvider {
    fn shots_for_team(&self, team_id: &str, season: i32) -> Vec<ShotRecord>;

    fn average_shots_for_team(&self, team_id: &str, season: i32) -> Option<f64>;

    /// Provided average xG per game. `None` lets the profile derive it from shots.
    fn average_xg_for_team(&self, _team_id: &str, _season: i32) -> Option<f64> {
        None
    }

    fn goalkeeper_for_team(&self, team_id: &str, season: i32)
        -> Option<GoalkeeperDefensiveProfile>;

    fn xga_per_game(&self, team_id: &str, season: i32) -> Option<f64>;

    fn league_average_xga_per_game(&self, season: i32) -> Option<f64>;
}

/// Identifier to label mappings. Only used to decorate output.
pub trait NameLookup {
    fn player_name(&self, player_id: &str) -> Option<&str>;

    fn team_name(&self, team_id: &str) -> Option<&str>;

    fn team_abbreviation(&self, team_id: &str) -> Option<&str>;
}

/// Lookup that knows no names; every label falls back to the identifier.
impl NameLookup for () {
    fn player_name(&self, _player_id: &str) -> Option<&str> {
        None
    }

    fn team_name(&self, _team_id: &str) -> Option<&str> {
        None
    }

    fn team_abbreviation(&self, _team_id: &str) -> Option<&str> {
        None
    }
}
