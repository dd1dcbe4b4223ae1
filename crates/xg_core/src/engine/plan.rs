//! Per-side goal model
//!
//! A `SidePlan` is one team attacking one opponent with every modifier already
//! applied: per-shot success probabilities, the shot volume distribution and
//! the Poisson rate. Trials only draw from it.

use super::modifiers::{defense_modifier, goalkeeper_modifier, poisson_rate, shot_probability};
use crate::error::{Result, SimError};
use crate::models::{
    GoalkeeperDefensiveProfile, MatchConfiguration, SideOverview, SimulationMode,
    TeamOffensiveProfile,
};
use crate::params::SimParams;
use rand::seq::index;
use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};

#[derive(Debug, Clone, PartialEq)]
struct ShotChance {
    shooter_id: String,
    probability: f64,
}

/// Goals one side scored in one trial
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamGoals {
    pub goals: u32,
    pub scorer_ids: Vec<String>,
}

/// Opponent-side inputs to a [`SidePlan`]
#[derive(Debug, Clone, Copy, Default)]
pub struct OpponentContext<'a> {
    pub keeper: Option<&'a GoalkeeperDefensiveProfile>,
    pub xga_per_game: Option<f64>,
    pub league_xga_per_game: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct SidePlan {
    team_id: String,
    mode: SimulationMode,
    chances: Vec<ShotChance>,
    volume: Normal<f64>,
    volume_mean: f64,
    min_sample_size: usize,
    goals: Poisson<f64>,
    lambda: f64,
    keeper_modifier: f64,
    defense_modifier: f64,
    advantage: f64,
    average_shots_per_game: f64,
    average_xg_per_game: f64,
}

impl SidePlan {
    pub fn build(
        attack: &TeamOffensiveProfile,
        opponent: OpponentContext<'_>,
        advantage: f64,
        config: &MatchConfiguration,
        params: &SimParams,
    ) -> Result<Self> {
        let keeper_modifier = goalkeeper_modifier(opponent.keeper);
        if opponent.keeper.is_none() {
            log::warn!("{}: no opposing keeper data, keeper modifier defaults to 0", attack.team_id);
        }

        let defense_modifier = defense_modifier(
            opponent.xga_per_game,
            opponent.league_xga_per_game,
            params.neutral_defense_modifier,
        );
        if opponent.xga_per_game.is_none() || opponent.league_xga_per_game.is_none() {
            log::warn!(
                "{}: opponent or league xGA missing, defense modifier defaults to {}",
                attack.team_id,
                params.neutral_defense_modifier
            );
        }

        let volume_mean = attack.average_shots_per_game * defense_modifier * advantage;
        let volume = Normal::new(volume_mean, params.sample_size_spread).map_err(|e| {
            SimError::Params(format!(
                "shot volume distribution for {} (mean {volume_mean}, spread {}): {e}",
                attack.team_id, params.sample_size_spread
            ))
        })?;

        let lambda = poisson_rate(
            attack.average_xg_per_game,
            keeper_modifier,
            advantage,
            params.lambda_floor,
        );
        let goals = Poisson::new(lambda).map_err(|e| {
            SimError::Configuration(format!("Poisson rate {lambda} for {}: {e}", attack.team_id))
        })?;

        if config.use_post_shot_xg {
            let missing = attack.shots.iter().filter(|s| s.shot_psxg.is_none()).count();
            if missing > 0 {
                log::warn!(
                    "{}: {missing} of {} shots have no post-shot xG, using pre-shot xG",
                    attack.team_id,
                    attack.shots.len()
                );
            }
        }

        let chances = attack
            .shots
            .iter()
            .map(|shot| ShotChance {
                shooter_id: shot.shooter_id.clone(),
                probability: shot_probability(
                    shot,
                    config.use_post_shot_xg,
                    keeper_modifier,
                    params,
                ),
            })
            .collect();

        log::debug!(
            "{} plan: defense {defense_modifier:.3}, keeper {keeper_modifier:.3}, volume {volume_mean:.2}, lambda {lambda:.3}",
            attack.team_id
        );

        Ok(Self {
            team_id: attack.team_id.clone(),
            mode: config.mode,
            chances,
            volume,
            volume_mean,
            min_sample_size: params.min_sample_size as usize,
            goals,
            lambda,
            keeper_modifier,
            defense_modifier,
            advantage,
            average_shots_per_game: attack.average_shots_per_game,
            average_xg_per_game: attack.average_xg_per_game,
        })
    }

    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn keeper_modifier(&self) -> f64 {
        self.keeper_modifier
    }

    pub fn defense_modifier(&self) -> f64 {
        self.defense_modifier
    }

    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> TeamGoals {
        match self.mode {
            SimulationMode::Shot => self.simulate_shots(rng),
            SimulationMode::Poisson => self.simulate_poisson(rng),
        }
    }

    /// Number of shots to sample this trial, before capping at the pool size.
    pub fn draw_sample_size<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let drawn = self.volume.sample(rng).round();
        if drawn.is_finite() && drawn > self.min_sample_size as f64 {
            drawn as usize
        } else {
            self.min_sample_size
        }
    }

    fn simulate_shots<R: Rng + ?Sized>(&self, rng: &mut R) -> TeamGoals {
        let requested = self.draw_sample_size(rng);
        let amount = requested.min(self.chances.len());

        let mut result = TeamGoals::default();
        for i in index::sample(rng, self.chances.len(), amount).iter() {
            let chance = &self.chances[i];
            if rng.gen::<f64>() < chance.probability {
                result.goals += 1;
                result.scorer_ids.push(chance.shooter_id.clone());
            }
        }
        result
    }

    fn simulate_poisson<R: Rng + ?Sized>(&self, rng: &mut R) -> TeamGoals {
        let drawn: f64 = self.goals.sample(rng);
        TeamGoals { goals: drawn.max(0.0) as u32, scorer_ids: Vec::new() }
    }

    /// Mean goals per trial implied by the plan. In shot mode the volume is
    /// taken at its mean rather than integrated over the draw.
    pub fn expected_goals(&self) -> f64 {
        match self.mode {
            SimulationMode::Poisson => self.lambda,
            SimulationMode::Shot => {
                if self.chances.is_empty() {
                    return 0.0;
                }
                let mean_probability = self.chances.iter().map(|c| c.probability).sum::<f64>()
                    / self.chances.len() as f64;
                let shots = self
                    .volume_mean
                    .max(self.min_sample_size as f64)
                    .min(self.chances.len() as f64);
                shots * mean_probability
            }
        }
    }

    pub fn overview(&self) -> SideOverview {
        SideOverview {
            team_id: self.team_id.clone(),
            shot_pool: self.chances.len(),
            average_shots_per_game: self.average_shots_per_game,
            average_xg_per_game: self.average_xg_per_game,
            advantage: self.advantage,
            defense_modifier: self.defense_modifier,
            keeper_modifier: self.keeper_modifier,
            volume_mean: self.volume_mean,
            lambda: self.lambda,
            expected_goals: self.expected_goals(),
        }
    }
}
