//! # Opponent Adjustments
//!
//! Pure functions turning opponent statistics into the multipliers applied to a
//! side's shot volume, shot quality and Poisson rate.
//!
//! - **defense modifier**: opponent xGA per game ÷ league xGA per game, scales shot volume
//! - **keeper modifier**: `-(G - xG) / xG faced` of the opposing keeper, scales shot quality
//! - **Poisson rate**: average xG × (1 + keeper modifier) × advantage, floored

use crate::models::{GoalkeeperDefensiveProfile, ShotRecord};
use crate::params::SimParams;

/// Keeper adjustment for shots against `keeper`; 0.0 when there is no keeper data.
pub fn goalkeeper_modifier(keeper: Option<&GoalkeeperDefensiveProfile>) -> f64 {
    keeper.map_or(0.0, GoalkeeperDefensiveProfile::shot_modifier)
}

/// Opponent xGA relative to the league. Falls back to `neutral` when either
/// rate is missing or the league rate is not positive.
pub fn defense_modifier(opponent_xga: Option<f64>, league_xga: Option<f64>, neutral: f64) -> f64 {
    match (opponent_xga, league_xga) {
        (Some(opp), Some(league)) if opp.is_finite() && opp >= 0.0 && league > 0.0 => opp / league,
        _ => neutral,
    }
}

/// Success probability of one sampled shot.
///
/// Post-shot xG is used as-is, falling back to pre-shot xG when missing.
/// Pre-shot xG is scaled by the keeper modifier and clamped to
/// `[probability_floor, probability_ceiling]`.
pub fn shot_probability(
    shot: &ShotRecord,
    use_post_shot_xg: bool,
    keeper_modifier: f64,
    params: &SimParams,
) -> f64 {
    if use_post_shot_xg {
        return shot.post_shot_xg();
    }
    clamp_probability(shot.shot_xg * (1.0 + keeper_modifier), params)
}

#[inline]
pub fn clamp_probability(raw: f64, params: &SimParams) -> f64 {
    if raw.is_nan() {
        return params.probability_floor;
    }
    raw.clamp(params.probability_floor, params.probability_ceiling)
}

/// Poisson goal rate, never below `floor`.
pub fn poisson_rate(average_xg: f64, keeper_modifier: f64, advantage: f64, floor: f64) -> f64 {
    // f64::max ignores NaN, so bad inputs land on the floor too.
    (average_xg * (1.0 + keeper_modifier) * advantage).max(floor)
}
