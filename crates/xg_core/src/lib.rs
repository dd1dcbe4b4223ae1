//! # xg_core - Monte Carlo Match Outcome Simulator
//!
//! Estimates scoreline, result and scorer probabilities for a fixture by
//! replaying each team's historical shot quality many times.
//!
//! ## Features
//! - Two goal models: shot sampling with keeper-adjusted xG, or Poisson on xG per game
//! - Opponent defence and goalkeeper adjustments resolved once per simulator
//! - Reproducible runs (same seed = same aggregates, for any thread count)
//! - Parallel trials with cooperative cancellation and wall-clock budgets
//! - JSON API for the presentation layer
//!
//! ```rust,ignore
//! let provider = DatasetProvider::load("data/2024.json")?;
//! let config = MatchConfiguration::new("ARS", "CHE", 2024).with_seed(7);
//! let mut sim = Simulator::new(config, &provider)?;
//! sim.run_simulations(10_000)?;
//! let summary = sim.get_summary(&provider)?;
//! ```

pub mod api;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;

pub use api::{simulate_json, simulate_request, SimulationRequest, SimulationResponse};
pub use data::{DatasetProvider, NameLookup, SeasonDataset, StatsProvider};
pub use engine::{Aggregator, RunOptions, Simulator, TrialBudget};
pub use error::{Result, SimError};
pub use models::{
    GoalkeeperDefensiveProfile, MatchConfiguration, PlanOverview, RunReport, ScorelineEntry,
    ScorerEntry, ShotRecord, Side, SimulationMode, SimulationSummary, StopReason,
    TeamOffensiveProfile, TrialResult,
};
pub use params::SimParams;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = api::json_api::SCHEMA_VERSION;
