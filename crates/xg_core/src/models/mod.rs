//! Data model shared by the providers, the simulator and its consumers.

pub mod config;
pub mod profile;
pub mod report;
pub mod shot;

pub use config::{MatchConfiguration, SimulationMode, DEFAULT_AWAY_ADVANTAGE, DEFAULT_HOME_ADVANTAGE};
pub use profile::{GoalkeeperDefensiveProfile, TeamOffensiveProfile};
pub use report::{
    PlanOverview, RunReport, ScorelineEntry, ScorerEntry, Side, SideOverview, SimulationSummary,
    StopReason, TrialResult,
};
pub use shot::ShotRecord;
