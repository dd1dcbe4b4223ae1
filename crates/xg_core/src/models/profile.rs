//! Per-team caches built once at simulator construction.

use super::config::MatchConfiguration;
use super::shot::ShotRecord;
use crate::data::StatsProvider;
use crate::params::SimParams;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Offensive snapshot of one team for one season.
///
/// `shots` is the sampling pool: penalties are removed when the configuration
/// asks for it, and excluded shooters never appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamOffensiveProfile {
    pub team_id: String,
    pub season: i32,
    pub shots: Vec<ShotRecord>,
    pub average_shots_per_game: f64,
    pub average_xg_per_game: f64,
    /// Distinct games seen in the unfiltered shot history
    pub games: usize,
}

impl TeamOffensiveProfile {
    /// Query the provider and build the cached profile.
    pub fn load(
        provider: &dyn StatsProvider,
        team_id: &str,
        config: &MatchConfiguration,
        params: &SimParams,
    ) -> Self {
        let shots = provider.shots_for_team(team_id, config.season);
        let average_shots = provider.average_shots_for_team(team_id, config.season);
        let average_xg = provider.average_xg_for_team(team_id, config.season);
        Self::from_shots(team_id, shots, average_shots, average_xg, config, params)
    }

    /// Build a profile from raw shots. Missing or unusable averages are derived
    /// from the shot history.
    pub fn from_shots(
        team_id: &str,
        shots: Vec<ShotRecord>,
        average_shots: Option<f64>,
        average_xg: Option<f64>,
        config: &MatchConfiguration,
        params: &SimParams,
    ) -> Self {
        let games = shots
            .iter()
            .filter_map(|s| s.game_id.as_deref())
            .collect::<HashSet<_>>()
            .len();

        let total = shots.len();
        let pool: Vec<ShotRecord> = shots
            .into_iter()
            .filter(|s| !(config.exclude_penalties && s.is_pattern(&params.penalty_tag)))
            .filter(|s| !config.excluded_shooter_ids.contains(&s.shooter_id))
            .collect();

        if pool.len() < total {
            log::debug!(
                "{team_id}: {} of {total} shots removed from the sampling pool",
                total - pool.len()
            );
        }

        let average_shots_per_game = usable(average_shots).unwrap_or_else(|| {
            let derived = per_game(pool.len() as f64, games);
            log::debug!("{team_id}: no shots-per-game average, derived {derived:.3}");
            derived
        });

        let average_xg_per_game = usable(average_xg).unwrap_or_else(|| {
            let total_xg: f64 = pool.iter().map(|s| s.shot_xg).sum();
            per_game(total_xg, games)
        });

        Self {
            team_id: team_id.to_string(),
            season: config.season,
            shots: pool,
            average_shots_per_game,
            average_xg_per_game,
            games,
        }
    }
}

/// Shot-stopping summary of a team's goalkeeper(s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalkeeperDefensiveProfile {
    pub team_id: String,
    pub xgoals_faced: f64,
    pub goals_minus_xgoals: f64,
}

impl GoalkeeperDefensiveProfile {
    pub fn new(team_id: &str, xgoals_faced: f64, goals_minus_xgoals: f64) -> Self {
        Self { team_id: team_id.to_string(), xgoals_faced, goals_minus_xgoals }
    }

    /// Relative adjustment applied to shots against this keeper:
    /// `-(goals_minus_xgoals / xgoals_faced)`, or zero when no xG was faced.
    pub fn shot_modifier(&self) -> f64 {
        if self.xgoals_faced > 0.0 && self.goals_minus_xgoals.is_finite() {
            -(self.goals_minus_xgoals / self.xgoals_faced)
        } else {
            0.0
        }
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

fn per_game(total: f64, games: usize) -> f64 {
    if games == 0 {
        0.0
    } else {
        total / games as f64
    }
}
