//! # Simulation Parameters
//!
//! Tunable constants of the trial model, loadable from JSON for A/B runs.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let params = SimParams::load("params/wide_volume.json")?;
//! let sim = Simulator::with_params(config, params, &provider)?;
//! ```
//!
//! When `XG_SIM_PARAMS_PATH` is set, [`SimParams::from_env`] reads the file it
//! points at; otherwise the defaults below are used.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};

pub const PARAMS_PATH_ENV: &str = "XG_SIM_PARAMS_PATH";

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Standard deviation of the per-trial shot volume draw (default: 2.0)
    /// Higher = more variance in how many shots a team takes
    pub sample_size_spread: f64,

    /// Lower bound of the shot volume draw (default: 1)
    pub min_sample_size: u32,

    /// Per-shot probability floor when xG is adjusted by the keeper (default: 0.01)
    pub probability_floor: f64,

    /// Per-shot probability ceiling when xG is adjusted by the keeper (default: 0.95)
    pub probability_ceiling: f64,

    /// Minimum Poisson rate (default: 0.1)
    pub lambda_floor: f64,

    /// Defense modifier used when either xGA rate is missing (default: 1.0)
    pub neutral_defense_modifier: f64,

    /// `pattern_of_play` tag identifying penalties (default: "Penalty")
    pub penalty_tag: String,

    /// Trials per parallel work unit (default: 1024)
    pub parallel_chunk_size: u64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            sample_size_spread: 2.0,
            min_sample_size: 1,
            probability_floor: 0.01,
            probability_ceiling: 0.95,
            lambda_floor: 0.1,
            neutral_defense_modifier: 1.0,
            penalty_tag: "Penalty".to_string(),
            parallel_chunk_size: 1024,
        }
    }
}

impl SimParams {
    /// Load SimParams from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SimError::Params(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    /// Parse SimParams from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let params: SimParams =
            serde_json::from_str(json).map_err(|e| SimError::Params(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Read the file named by `XG_SIM_PARAMS_PATH`, or fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(PARAMS_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        log::info!("Loading simulation parameters from {PARAMS_PATH_ENV}='{path}'");
        Self::load(path)
    }

    /// Validate parameter bounds
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_size_spread.is_finite() && self.sample_size_spread > 0.0) {
            return Err(SimError::Params(format!(
                "sample_size_spread must be positive, got {}",
                self.sample_size_spread
            )));
        }
        if !(self.probability_floor > 0.0
            && self.probability_floor <= self.probability_ceiling
            && self.probability_ceiling <= 1.0)
        {
            return Err(SimError::Params(format!(
                "probability bounds must satisfy 0 < floor <= ceiling <= 1, got [{}, {}]",
                self.probability_floor, self.probability_ceiling
            )));
        }
        if !(self.lambda_floor.is_finite() && self.lambda_floor > 0.0) {
            return Err(SimError::Params(format!(
                "lambda_floor must be positive, got {}",
                self.lambda_floor
            )));
        }
        if !(self.neutral_defense_modifier.is_finite() && self.neutral_defense_modifier > 0.0) {
            return Err(SimError::Params(format!(
                "neutral_defense_modifier must be positive, got {}",
                self.neutral_defense_modifier
            )));
        }
        if self.parallel_chunk_size == 0 {
            return Err(SimError::Params("parallel_chunk_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
