//! Simulation output records
//!
//! Everything here is plain numeric and string data, serialisable as-is for the
//! presentation layer.

use super::config::SimulationMode;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Home => f.write_str("home"),
            Side::Away => f.write_str("away"),
        }
    }
}

/// One simulated realisation of the match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialResult {
    pub home_goals: u32,
    pub away_goals: u32,
    /// One entry per goal; empty in Poisson mode
    pub home_scorer_ids: Vec<String>,
    pub away_scorer_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub n_simulations: u64,
    pub seed: u64,
    pub mode: SimulationMode,
    pub home_team_id: String,
    pub away_team_id: String,
    pub home_team_name: String,
    pub away_team_name: String,
    pub home_abbreviation: String,
    pub away_abbreviation: String,
    pub home_wins: u64,
    pub draws: u64,
    pub away_wins: u64,
    pub home_win_pct: f64,
    pub draw_pct: f64,
    pub away_win_pct: f64,
    pub avg_home_goals: f64,
    pub avg_away_goals: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorelineEntry {
    pub home_goals: u32,
    pub away_goals: u32,
    pub count: u64,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerEntry {
    pub player_id: String,
    pub name: String,
    pub goals: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Completed,
    Cancelled,
    TimedOut,
}

/// Outcome of one `run_simulations` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub requested: u64,
    pub completed: u64,
    /// Cumulative completed trials on the simulator after this run
    pub total_simulations: u64,
    pub stop: StopReason,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.stop == StopReason::Completed
    }
}

/// Resolved inputs of one attacking side, as used by every trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideOverview {
    pub team_id: String,
    pub shot_pool: usize,
    pub average_shots_per_game: f64,
    pub average_xg_per_game: f64,
    pub advantage: f64,
    pub defense_modifier: f64,
    pub keeper_modifier: f64,
    /// Centre of the shot volume draw (shot mode)
    pub volume_mean: f64,
    /// Poisson rate (Poisson mode)
    pub lambda: f64,
    /// Mean goals per trial implied by the plan
    pub expected_goals: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOverview {
    pub mode: SimulationMode,
    pub seed: u64,
    pub home: SideOverview,
    pub away: SideOverview,
}
