//! Match simulator
//!
//! Construction loads everything from the provider once: both offensive
//! profiles, both keepers, both xGA rates and the league xGA rate. They are
//! folded into one [`SidePlan`] per attacking side, and from then on trials
//! touch nothing but the plans and their own RNG.
//!
//! Runs are cumulative. Every `run_simulations` call adds its completed trials
//! to the same counters, and trial indices continue where the previous call
//! stopped, so two runs of `n` equal one run of `2n` under the same seed.
//! [`Simulator::reset`] starts over.

use super::aggregator::Aggregator;
use super::budget::TrialBudget;
use super::plan::{OpponentContext, SidePlan, TeamGoals};
use super::seed::trial_rng;
use crate::data::{NameLookup, StatsProvider};
use crate::error::{Result, SimError};
use crate::models::{
    GoalkeeperDefensiveProfile, MatchConfiguration, PlanOverview, RunReport, ScorelineEntry,
    ScorerEntry, Side, SimulationSummary, StopReason, TeamOffensiveProfile, TrialResult,
};
use crate::params::SimParams;
use rand::Rng;
use rayon::prelude::*;

/// How a batch of trials is executed
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Spread trials over the rayon pool
    pub parallel: bool,
    pub budget: TrialBudget,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { parallel: true, budget: TrialBudget::unlimited() }
    }
}

impl RunOptions {
    pub fn sequential() -> Self {
        Self { parallel: false, ..Self::default() }
    }

    pub fn with_budget(mut self, budget: TrialBudget) -> Self {
        self.budget = budget;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Simulator {
    config: MatchConfiguration,
    params: SimParams,
    seed: u64,
    home_profile: TeamOffensiveProfile,
    away_profile: TeamOffensiveProfile,
    home_keeper: Option<GoalkeeperDefensiveProfile>,
    away_keeper: Option<GoalkeeperDefensiveProfile>,
    home_xga_per_game: Option<f64>,
    away_xga_per_game: Option<f64>,
    league_xga_per_game: Option<f64>,
    home_plan: SidePlan,
    away_plan: SidePlan,
    aggregator: Aggregator,
    next_trial: u64,
}

impl Simulator {
    pub fn new(config: MatchConfiguration, provider: &dyn StatsProvider) -> Result<Self> {
        Self::with_params(config, SimParams::default(), provider)
    }

    pub fn with_params(
        config: MatchConfiguration,
        params: SimParams,
        provider: &dyn StatsProvider,
    ) -> Result<Self> {
        params.validate()?;
        config.validate()?;

        let season = config.season;
        let home_id = config.home_team_id.as_str();
        let away_id = config.away_team_id.as_str();

        let home_profile = TeamOffensiveProfile::load(provider, home_id, &config, &params);
        let away_profile = TeamOffensiveProfile::load(provider, away_id, &config, &params);
        let home_keeper = provider.goalkeeper_for_team(home_id, season);
        let away_keeper = provider.goalkeeper_for_team(away_id, season);
        let home_xga_per_game = provider.xga_per_game(home_id, season);
        let away_xga_per_game = provider.xga_per_game(away_id, season);
        let league_xga_per_game = provider.league_average_xga_per_game(season);

        // Home attacks the away keeper and defence, and vice versa.
        let home_plan = SidePlan::build(
            &home_profile,
            OpponentContext {
                keeper: away_keeper.as_ref(),
                xga_per_game: away_xga_per_game,
                league_xga_per_game,
            },
            config.home_advantage,
            &config,
            &params,
        )?;
        let away_plan = SidePlan::build(
            &away_profile,
            OpponentContext {
                keeper: home_keeper.as_ref(),
                xga_per_game: home_xga_per_game,
                league_xga_per_game,
            },
            config.away_advantage,
            &config,
            &params,
        )?;

        let seed = config.seed.unwrap_or_else(rand::random);

        log::info!(
            "Simulator ready: {} vs {} season {} ({} mode, seed {seed}), shot pools {}/{}",
            home_id,
            away_id,
            season,
            config.mode,
            home_profile.shots.len(),
            away_profile.shots.len()
        );

        Ok(Self {
            config,
            params,
            seed,
            home_profile,
            away_profile,
            home_keeper,
            away_keeper,
            home_xga_per_game,
            away_xga_per_game,
            league_xga_per_game,
            home_plan,
            away_plan,
            aggregator: Aggregator::new(),
            next_trial: 0,
        })
    }

    pub fn config(&self) -> &MatchConfiguration {
        &self.config
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn profile(&self, side: Side) -> &TeamOffensiveProfile {
        match side {
            Side::Home => &self.home_profile,
            Side::Away => &self.away_profile,
        }
    }

    pub fn goalkeeper(&self, side: Side) -> Option<&GoalkeeperDefensiveProfile> {
        match side {
            Side::Home => self.home_keeper.as_ref(),
            Side::Away => self.away_keeper.as_ref(),
        }
    }

    pub fn xga_per_game(&self, side: Side) -> Option<f64> {
        match side {
            Side::Home => self.home_xga_per_game,
            Side::Away => self.away_xga_per_game,
        }
    }

    pub fn league_xga_per_game(&self) -> Option<f64> {
        self.league_xga_per_game
    }

    /// Plan used when `side` attacks
    pub fn plan(&self, side: Side) -> &SidePlan {
        match side {
            Side::Home => &self.home_plan,
            Side::Away => &self.away_plan,
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn n_simulations(&self) -> u64 {
        self.aggregator.n_simulations()
    }

    /// Goals `side` scores against the other side in one trial
    pub fn simulate_team_goals<R: Rng + ?Sized>(&self, side: Side, rng: &mut R) -> TeamGoals {
        self.plan(side).simulate(rng)
    }

    /// One independent trial; home goals are drawn first.
    pub fn simulate_match<R: Rng + ?Sized>(&self, rng: &mut R) -> TrialResult {
        let home = self.simulate_team_goals(Side::Home, rng);
        let away = self.simulate_team_goals(Side::Away, rng);
        TrialResult {
            home_goals: home.goals,
            away_goals: away.goals,
            home_scorer_ids: home.scorer_ids,
            away_scorer_ids: away.scorer_ids,
        }
    }

    /// Run `n` more trials in parallel with no time limit.
    pub fn run_simulations(&mut self, n: u64) -> Result<RunReport> {
        self.run_simulations_with(n, &RunOptions::default())
    }

    pub fn run_simulations_with(&mut self, n: u64, options: &RunOptions) -> Result<RunReport> {
        if n == 0 {
            return Err(SimError::Configuration("trial count must be positive, got 0".to_string()));
        }

        let mut budget = options.budget.clone();
        budget.reset();

        let start = self.next_trial;
        let end = start.saturating_add(n);

        let (batch, stop) = if options.parallel {
            self.run_parallel(start, end, &budget)
        } else {
            self.run_range(start, end, &budget)
        };

        let completed = batch.n_simulations();
        self.aggregator.merge(batch);
        self.next_trial = end;

        let report = RunReport {
            requested: n,
            completed,
            total_simulations: self.aggregator.n_simulations(),
            stop: stop.unwrap_or(StopReason::Completed),
            elapsed_ms: budget.elapsed_ms(),
        };

        log::info!(
            "Ran {}/{} trials ({:?}) in {} ms, {} total",
            report.completed,
            report.requested,
            report.stop,
            report.elapsed_ms,
            report.total_simulations
        );
        Ok(report)
    }

    fn run_parallel(
        &self,
        start: u64,
        end: u64,
        budget: &TrialBudget,
    ) -> (Aggregator, Option<StopReason>) {
        let chunk = self.params.parallel_chunk_size;
        let ranges: Vec<(u64, u64)> = (start..end)
            .step_by(chunk as usize)
            .map(|lo| (lo, lo.saturating_add(chunk).min(end)))
            .collect();

        log::debug!("Running trials {start}..{end} in {} chunks", ranges.len());

        ranges
            .par_iter()
            .map(|&(lo, hi)| self.run_range(lo, hi, budget))
            .reduce(
                || (Aggregator::new(), None),
                |(mut acc, stop_a), (part, stop_b)| {
                    acc.merge(part);
                    (acc, stop_a.or(stop_b))
                },
            )
    }

    fn run_range(
        &self,
        lo: u64,
        hi: u64,
        budget: &TrialBudget,
    ) -> (Aggregator, Option<StopReason>) {
        let mut local = Aggregator::new();
        for trial in lo..hi {
            if let Some(reason) = budget.check() {
                return (local, Some(reason));
            }
            let mut rng = trial_rng(self.seed, trial);
            local.record(&self.simulate_match(&mut rng));
        }
        (local, None)
    }

    /// Drop all accumulated trials and restart the trial sequence.
    pub fn reset(&mut self) {
        self.aggregator.reset();
        self.next_trial = 0;
    }

    pub fn get_summary(&self, names: &dyn NameLookup) -> Result<SimulationSummary> {
        if self.aggregator.is_empty() {
            return Err(SimError::NotRun);
        }

        let n = self.aggregator.n_simulations();
        let (home_wins, draws, away_wins) = self.aggregator.outcome_counts();
        let home_id = self.config.home_team_id.as_str();
        let away_id = self.config.away_team_id.as_str();

        Ok(SimulationSummary {
            n_simulations: n,
            seed: self.seed,
            mode: self.config.mode,
            home_team_id: home_id.to_string(),
            away_team_id: away_id.to_string(),
            home_team_name: names.team_name(home_id).unwrap_or(home_id).to_string(),
            away_team_name: names.team_name(away_id).unwrap_or(away_id).to_string(),
            home_abbreviation: names.team_abbreviation(home_id).unwrap_or(home_id).to_string(),
            away_abbreviation: names.team_abbreviation(away_id).unwrap_or(away_id).to_string(),
            home_wins,
            draws,
            away_wins,
            home_win_pct: home_wins as f64 / n as f64,
            draw_pct: draws as f64 / n as f64,
            away_win_pct: away_wins as f64 / n as f64,
            avg_home_goals: self.aggregator.average_goals(Side::Home),
            avg_away_goals: self.aggregator.average_goals(Side::Away),
        })
    }

    pub fn get_scoreline_distribution(&self) -> Result<Vec<ScorelineEntry>> {
        if self.aggregator.is_empty() {
            return Err(SimError::NotRun);
        }
        Ok(self.aggregator.scoreline_distribution())
    }

    pub fn most_likely_scoreline(&self) -> Result<ScorelineEntry> {
        self.get_scoreline_distribution()?.into_iter().next().ok_or(SimError::NotRun)
    }

    /// Up to `limit` scorers for `side`, most goals first. Empty before any run
    /// and in Poisson mode.
    pub fn get_top_scorers(
        &self,
        side: Side,
        limit: usize,
        names: &dyn NameLookup,
    ) -> Vec<ScorerEntry> {
        self.aggregator
            .top_scorers(side, limit)
            .into_iter()
            .map(|(player_id, goals)| ScorerEntry {
                name: names.player_name(&player_id).unwrap_or(player_id.as_str()).to_string(),
                player_id,
                goals,
            })
            .collect()
    }

    pub fn plan_overview(&self) -> PlanOverview {
        PlanOverview {
            mode: self.config.mode,
            seed: self.seed,
            home: self.home_plan.overview(),
            away: self.away_plan.overview(),
        }
    }
}
