//! Season dataset
//!
//! A single JSON document carrying one season of shots, team rates, keeper
//! summaries and display names. [`DatasetProvider`] indexes it once so every
//! provider query is a map lookup.
//!
//! ```json
//! {
//!   "season": 2024,
//!   "league_xga_per_game": 1.42,
//!   "teams": [{"team_id": "ARS", "name": "Arsenal", "abbreviation": "ARS",
//!              "xga_per_game": 0.95, "goalkeeper": {"xgoals_faced": 38.1, "goals_minus_xgoals": -4.2}}],
//!   "shots": [{"team_id": "ARS", "shooter_id": "p7", "game_id": "g1", "shot_xg": 0.12}],
//!   "players": [{"player_id": "p7", "name": "Bukayo Saka"}]
//! }
//! ```

use super::provider::{NameLookup, StatsProvider};
use crate::error::{Result, SimError};
use crate::models::{GoalkeeperDefensiveProfile, ShotRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeeperRecord {
    pub xgoals_faced: f64,
    pub goals_minus_xgoals: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub average_shots_per_game: Option<f64>,
    #[serde(default)]
    pub average_xg_per_game: Option<f64>,
    #[serde(default)]
    pub xga_per_game: Option<f64>,
    #[serde(default)]
    pub goalkeeper: Option<KeeperRecord>,
}

impl TeamRecord {
    pub fn new(team_id: &str) -> Self {
        Self { team_id: team_id.to_string(), ..Default::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonDataset {
    pub season: i32,
    #[serde(default)]
    pub league_xga_per_game: Option<f64>,
    #[serde(default)]
    pub teams: Vec<TeamRecord>,
    #[serde(default)]
    pub shots: Vec<ShotRecord>,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
}

/// Indexed, read-only view over a [`SeasonDataset`].
#[derive(Debug, Clone, Default)]
pub struct DatasetProvider {
    season: i32,
    league_xga_per_game: Option<f64>,
    teams: HashMap<String, TeamRecord>,
    shots: HashMap<String, Vec<ShotRecord>>,
    players: HashMap<String, String>,
}

impl DatasetProvider {
    pub fn new(dataset: SeasonDataset) -> Self {
        let SeasonDataset { season, league_xga_per_game, teams, shots, players } = dataset;

        // Without an explicit league figure, average the team rates we have.
        let league_xga_per_game = league_xga_per_game.or_else(|| {
            let rates: Vec<f64> = teams
                .iter()
                .filter_map(|t| t.xga_per_game)
                .filter(|v| v.is_finite())
                .collect();
            (!rates.is_empty()).then(|| rates.iter().sum::<f64>() / rates.len() as f64)
        });

        let mut by_team: HashMap<String, Vec<ShotRecord>> = HashMap::new();
        for shot in shots {
            by_team.entry(shot.team_id.clone()).or_default().push(shot);
        }

        Self {
            season,
            league_xga_per_game,
            teams: teams.into_iter().map(|t| (t.team_id.clone(), t)).collect(),
            shots: by_team,
            players: players.into_iter().map(|p| (p.player_id, p.name)).collect(),
        }
    }

    /// Load a dataset from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SimError::Dataset(format!("failed to read {}: {e}", path.display())))?;
        let provider = Self::from_json(&content)?;
        log::info!(
            "Loaded season {} dataset from {}: {} teams, {} shots",
            provider.season,
            path.display(),
            provider.teams.len(),
            provider.shots.values().map(Vec::len).sum::<usize>()
        );
        Ok(provider)
    }

    /// Parse a dataset from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: SeasonDataset = serde_json::from_str(json)?;
        if dataset.season <= 0 {
            return Err(SimError::Dataset(format!(
                "season must be positive, got {}",
                dataset.season
            )));
        }
        Ok(Self::new(dataset))
    }

    pub fn season(&self) -> i32 {
        self.season
    }

    pub fn has_team(&self, team_id: &str) -> bool {
        self.teams.contains_key(team_id) || self.shots.contains_key(team_id)
    }

    fn team(&self, team_id: &str, season: i32) -> Option<&TeamRecord> {
        if season != self.season {
            return None;
        }
        self.teams.get(team_id)
    }
}

impl StatsProvider for DatasetProvider {
    fn shots_for_team(&self, team_id: &str, season: i32) -> Vec<ShotRecord> {
        if season != self.season {
            return Vec::new();
        }
        self.shots.get(team_id).cloned().unwrap_or_default()
    }

    fn average_shots_for_team(&self, team_id: &str, season: i32) -> Option<f64> {
        self.team(team_id, season).and_then(|t| t.average_shots_per_game)
    }

    fn average_xg_for_team(&self, team_id: &str, season: i32) -> Option<f64> {
        self.team(team_id, season).and_then(|t| t.average_xg_per_game)
    }

    fn goalkeeper_for_team(
        &self,
        team_id: &str,
        season: i32,
    ) -> Option<GoalkeeperDefensiveProfile> {
        self.team(team_id, season).and_then(|t| t.goalkeeper.as_ref()).map(|gk| {
            GoalkeeperDefensiveProfile::new(team_id, gk.xgoals_faced, gk.goals_minus_xgoals)
        })
    }

    fn xga_per_game(&self, team_id: &str, season: i32) -> Option<f64> {
        self.team(team_id, season).and_then(|t| t.xga_per_game)
    }

    fn league_average_xga_per_game(&self, season: i32) -> Option<f64> {
        if season != self.season {
            return None;
        }
        self.league_xga_per_game
    }
}

impl NameLookup for DatasetProvider {
    fn player_name(&self, player_id: &str) -> Option<&str> {
        self.players.get(player_id).map(String::as_str)
    }

    fn team_name(&self, team_id: &str) -> Option<&str> {
        self.teams.get(team_id).and_then(|t| t.name.as_deref())
    }

    fn team_abbreviation(&self, team_id: &str) -> Option<&str> {
        self.teams.get(team_id).and_then(|t| t.abbreviation.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "season": 2024,
        "teams": [
            {"team_id": "ARS", "name": "Arsenal", "abbreviation": "ARS", "xga_per_game": 0.9,
             "goalkeeper": {"xgoals_faced": 30.0, "goals_minus_xgoals": -3.0}},
            {"team_id": "CHE", "name": "Chelsea", "xga_per_game": 1.5}
        ],
        "shots": [
            {"team_id": "ARS", "shooter_id": "p1", "game_id": "g1", "shot_xg": 0.4},
            {"team_id": "CHE", "shooter_id": "p2", "game_id": "g1", "shot_xg": 0.1, "pattern_of_play": "Penalty"}
        ],
        "players": [{"player_id": "p1", "name": "Bukayo Saka"}]
    }"#;

    #[test]
    fn test_indexes_by_team() {
        let provider = DatasetProvider::from_json(SAMPLE).unwrap();
        assert_eq!(provider.shots_for_team("ARS", 2024).len(), 1);
        assert_eq!(provider.shots_for_team("CHE", 2024)[0].pattern_of_play, "Penalty");
        assert!(provider.shots_for_team("ARS", 2023).is_empty());
        assert!(provider.has_team("CHE"));
        assert!(!provider.has_team("LIV"));
    }

    #[test]
    fn test_league_average_falls_back_to_team_mean() {
        let provider = DatasetProvider::from_json(SAMPLE).unwrap();
        let league = provider.league_average_xga_per_game(2024).unwrap();
        assert!((league - 1.2).abs() < 1e-9);
        assert_eq!(provider.league_average_xga_per_game(2023), None);
    }

    #[test]
    fn test_goalkeeper_and_names() {
        let provider = DatasetProvider::from_json(SAMPLE).unwrap();
        let gk = provider.goalkeeper_for_team("ARS", 2024).unwrap();
        assert_eq!(gk.team_id, "ARS");
        assert_eq!(gk.xgoals_faced, 30.0);
        assert!(provider.goalkeeper_for_team("CHE", 2024).is_none());

        assert_eq!(provider.player_name("p1"), Some("Bukayo Saka"));
        assert_eq!(provider.team_name("CHE"), Some("Chelsea"));
        assert_eq!(provider.team_abbreviation("CHE"), None);
    }

    #[test]
    fn test_rejects_non_positive_season() {
        let err = DatasetProvider::from_json(r#"{"season": 0}"#).unwrap_err();
        assert!(matches!(err, SimError::Dataset(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let provider = DatasetProvider::load(file.path()).unwrap();
        assert_eq!(provider.season(), 2024);
        assert_eq!(provider.xga_per_game("ARS", 2024), Some(0.9));
    }
}
