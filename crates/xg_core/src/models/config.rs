//! Match configuration
//!
//! A `MatchConfiguration` fixes everything a [`Simulator`](crate::engine::Simulator)
//! needs besides the provider data: the fixture, the season, the goal model and
//! the home/away multipliers. It is validated once at construction; trials never
//! re-check it.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_HOME_ADVANTAGE: f64 = 1.05;
pub const DEFAULT_AWAY_ADVANTAGE: f64 = 0.95;

/// Goal model used for each side of a trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    /// Sample shots from the team's history and roll each one
    #[default]
    Shot,
    /// Draw the goal count from Poisson(average xG per game)
    Poisson,
}

impl SimulationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationMode::Shot => "shot",
            SimulationMode::Poisson => "poisson",
        }
    }
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shot" => Ok(SimulationMode::Shot),
            "poisson" => Ok(SimulationMode::Poisson),
            other => Err(SimError::Configuration(format!(
                "unknown simulation mode '{other}' (expected 'shot' or 'poisson')"
            ))),
        }
    }
}

fn default_home_advantage() -> f64 {
    DEFAULT_HOME_ADVANTAGE
}

fn default_away_advantage() -> f64 {
    DEFAULT_AWAY_ADVANTAGE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfiguration {
    pub home_team_id: String,
    pub away_team_id: String,
    pub season: i32,
    #[serde(default)]
    pub mode: SimulationMode,
    #[serde(default)]
    pub exclude_penalties: bool,
    #[serde(default)]
    pub use_post_shot_xg: bool,
    #[serde(default = "default_home_advantage")]
    pub home_advantage: f64,
    #[serde(default = "default_away_advantage")]
    pub away_advantage: f64,
    /// Shooters whose shots are dropped from the sampling pool entirely.
    #[serde(default)]
    pub excluded_shooter_ids: BTreeSet<String>,
    /// Master seed. `None` draws one at construction.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MatchConfiguration {
    pub fn new(home_team_id: &str, away_team_id: &str, season: i32) -> Self {
        Self {
            home_team_id: home_team_id.to_string(),
            away_team_id: away_team_id.to_string(),
            season,
            mode: SimulationMode::default(),
            exclude_penalties: false,
            use_post_shot_xg: false,
            home_advantage: DEFAULT_HOME_ADVANTAGE,
            away_advantage: DEFAULT_AWAY_ADVANTAGE,
            excluded_shooter_ids: BTreeSet::new(),
            seed: None,
        }
    }

    pub fn with_mode(mut self, mode: SimulationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_advantages(mut self, home: f64, away: f64) -> Self {
        self.home_advantage = home;
        self.away_advantage = away;
        self
    }

    pub fn excluding_penalties(mut self, exclude: bool) -> Self {
        self.exclude_penalties = exclude;
        self
    }

    pub fn using_post_shot_xg(mut self, use_psxg: bool) -> Self {
        self.use_post_shot_xg = use_psxg;
        self
    }

    pub fn excluding_shooter(mut self, shooter_id: &str) -> Self {
        self.excluded_shooter_ids.insert(shooter_id.to_string());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.home_team_id.trim().is_empty() {
            return Err(SimError::Configuration("home_team_id must not be empty".to_string()));
        }
        if self.away_team_id.trim().is_empty() {
            return Err(SimError::Configuration("away_team_id must not be empty".to_string()));
        }
        if self.season <= 0 {
            return Err(SimError::Configuration(format!(
                "season must be positive, got {}",
                self.season
            )));
        }
        for (name, value) in
            [("home_advantage", self.home_advantage), ("away_advantage", self.away_advantage)]
        {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::Configuration(format!(
                    "{name} must be a positive multiplier, got {value}"
                )));
            }
        }
        Ok(())
    }
}
