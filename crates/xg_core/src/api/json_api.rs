//! JSON entry point for the presentation layer: one request in, one response
//! carrying the run report, resolved plan, summary, scoreline distribution and
//! top scorers out.

use crate::data::{NameLookup, StatsProvider};
use crate::engine::{RunOptions, Simulator, TrialBudget};
use crate::error::{Result, SimError};
use crate::models::{
    MatchConfiguration, PlanOverview, RunReport, ScorelineEntry, ScorerEntry, Side,
    SimulationSummary,
};
use crate::params::SimParams;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u8 = 1;

fn default_schema_version() -> u8 {
    SCHEMA_VERSION
}

fn default_top_scorers() -> usize {
    5
}

fn default_parallel() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    pub config: MatchConfiguration,
    pub trials: u64,
    #[serde(default = "default_top_scorers")]
    pub top_scorers: usize,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Overrides `XG_SIM_PARAMS_PATH` / defaults when present
    #[serde(default)]
    pub params: Option<SimParams>,
}

impl SimulationRequest {
    pub fn new(config: MatchConfiguration, trials: u64) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            config,
            trials,
            top_scorers: default_top_scorers(),
            parallel: default_parallel(),
            timeout_ms: None,
            params: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub schema_version: u8,
    pub run: RunReport,
    pub plan: PlanOverview,
    pub summary: SimulationSummary,
    pub scorelines: Vec<ScorelineEntry>,
    pub home_top_scorers: Vec<ScorerEntry>,
    pub away_top_scorers: Vec<ScorerEntry>,
}

pub fn simulate_request<P>(request: SimulationRequest, provider: &P) -> Result<SimulationResponse>
where
    P: StatsProvider + NameLookup,
{
    if request.schema_version != SCHEMA_VERSION {
        return Err(SimError::Configuration(format!(
            "unsupported schema version: {}",
            request.schema_version
        )));
    }

    let params = match request.params {
        Some(params) => params,
        None => SimParams::from_env()?,
    };

    let mut simulator = Simulator::with_params(request.config, params, provider)?;

    let budget = match request.timeout_ms {
        Some(ms) => TrialBudget::with_timeout(ms),
        None => TrialBudget::unlimited(),
    };
    let options = RunOptions { parallel: request.parallel, budget };
    let run = simulator.run_simulations_with(request.trials, &options)?;

    Ok(SimulationResponse {
        schema_version: SCHEMA_VERSION,
        run,
        plan: simulator.plan_overview(),
        summary: simulator.get_summary(provider)?,
        scorelines: simulator.get_scoreline_distribution()?,
        home_top_scorers: simulator.get_top_scorers(Side::Home, request.top_scorers, provider),
        away_top_scorers: simulator.get_top_scorers(Side::Away, request.top_scorers, provider),
    })
}

pub fn simulate_json<P>(request_json: &str, provider: &P) -> Result<String>
where
    P: StatsProvider + NameLookup,
{
    let request: SimulationRequest = serde_json::from_str(request_json)
        .map_err(|e| SimError::Configuration(format!("invalid JSON request: {e}")))?;
    let response = simulate_request(request, provider)?;
    Ok(serde_json::to_string(&response)?)
}
