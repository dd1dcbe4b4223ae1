//! Trial accumulation
//!
//! Counters only grow. Parallel runs give every work unit its own
//! `Aggregator` and [`merge`](Aggregator::merge) them afterwards, so no
//! increment is shared between threads.

use crate::models::{ScorelineEntry, Side, TrialResult};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregator {
    n_simulations: u64,
    scorelines: HashMap<(u32, u32), u64>,
    home_wins: u64,
    draws: u64,
    away_wins: u64,
    home_goals_total: u64,
    away_goals_total: u64,
    home_scorers: HashMap<String, u64>,
    away_scorers: HashMap<String, u64>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, trial: &TrialResult) {
        self.n_simulations += 1;
        *self.scorelines.entry((trial.home_goals, trial.away_goals)).or_insert(0) += 1;

        match trial.home_goals.cmp(&trial.away_goals) {
            Ordering::Greater => self.home_wins += 1,
            Ordering::Equal => self.draws += 1,
            Ordering::Less => self.away_wins += 1,
        }

        self.home_goals_total += u64::from(trial.home_goals);
        self.away_goals_total += u64::from(trial.away_goals);

        for id in &trial.home_scorer_ids {
            *self.home_scorers.entry(id.clone()).or_insert(0) += 1;
        }
        for id in &trial.away_scorer_ids {
            *self.away_scorers.entry(id.clone()).or_insert(0) += 1;
        }
    }

    /// Fold another accumulator into this one. Order of merges does not matter.
    pub fn merge(&mut self, other: Aggregator) {
        self.n_simulations += other.n_simulations;
        self.home_wins += other.home_wins;
        self.draws += other.draws;
        self.away_wins += other.away_wins;
        self.home_goals_total += other.home_goals_total;
        self.away_goals_total += other.away_goals_total;

        for (scoreline, count) in other.scorelines {
            *self.scorelines.entry(scoreline).or_insert(0) += count;
        }
        for (id, goals) in other.home_scorers {
            *self.home_scorers.entry(id).or_insert(0) += goals;
        }
        for (id, goals) in other.away_scorers {
            *self.away_scorers.entry(id).or_insert(0) += goals;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn n_simulations(&self) -> u64 {
        self.n_simulations
    }

    pub fn is_empty(&self) -> bool {
        self.n_simulations == 0
    }

    /// (home wins, draws, away wins)
    pub fn outcome_counts(&self) -> (u64, u64, u64) {
        (self.home_wins, self.draws, self.away_wins)
    }

    pub fn goals_total(&self, side: Side) -> u64 {
        match side {
            Side::Home => self.home_goals_total,
            Side::Away => self.away_goals_total,
        }
    }

    pub fn average_goals(&self, side: Side) -> f64 {
        if self.n_simulations == 0 {
            return 0.0;
        }
        self.goals_total(side) as f64 / self.n_simulations as f64
    }

    pub fn scoreline_count(&self, home_goals: u32, away_goals: u32) -> u64 {
        self.scorelines.get(&(home_goals, away_goals)).copied().unwrap_or(0)
    }

    /// Observed scorelines, most frequent first. Ties go to the lower scoreline.
    pub fn scoreline_distribution(&self) -> Vec<ScorelineEntry> {
        let total = self.n_simulations.max(1) as f64;
        let mut entries: Vec<ScorelineEntry> = self
            .scorelines
            .iter()
            .map(|(&(home_goals, away_goals), &count)| ScorelineEntry {
                home_goals,
                away_goals,
                count,
                probability: count as f64 / total,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.home_goals.cmp(&b.home_goals))
                .then(a.away_goals.cmp(&b.away_goals))
        });
        entries
    }

    /// Up to `limit` shooters by goals, descending; ties broken by identifier.
    pub fn top_scorers(&self, side: Side, limit: usize) -> Vec<(String, u64)> {
        let tally = match side {
            Side::Home => &self.home_scorers,
            Side::Away => &self.away_scorers,
        };

        let mut scorers: Vec<(String, u64)> =
            tally.iter().map(|(id, &goals)| (id.clone(), goals)).collect();
        scorers.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scorers.truncate(limit);
        scorers
    }
}
