//! Monte Carlo engine: opponent adjustments, per-side plans, trial execution
//! and accumulation.

pub mod aggregator;
pub mod budget;
pub mod contract_tests;
pub mod modifiers;
pub mod plan;
pub mod seed;
pub mod simulator;

pub use aggregator::Aggregator;
pub use budget::TrialBudget;
pub use modifiers::{
    clamp_probability, defense_modifier, goalkeeper_modifier, poisson_rate, shot_probability,
};
pub use plan::{OpponentContext, SidePlan, TeamGoals};
pub use seed::{trial_rng, trial_seed};
pub use simulator::{RunOptions, Simulator};
