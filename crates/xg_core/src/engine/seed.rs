use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed for trial `trial` of a run mastered by `master` (splitmix64 finaliser).
///
/// Neighbouring trial indices map to unrelated seeds, and the mapping does not
/// depend on which thread runs the trial.
pub fn trial_seed(master: u64, trial: u64) -> u64 {
    let mut z = master.wrapping_add(trial.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn trial_rng(master: u64, trial: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(trial_seed(master, trial))
}
