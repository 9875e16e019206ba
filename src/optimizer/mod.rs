pub mod mutation;
pub mod runner;
pub mod schedule;

pub use self::runner::{
    AlwaysContinue, AnnealOptions, AnnealResult, Annealer, SearchControl, SearchProgress,
};
pub use self::schedule::AnnealSchedule;

use fastrand::Rng;

/// Seeded generator when `seed` is given, entropy-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> Rng {
    match seed {
        Some(s) => Rng::with_seed(s),
        None => Rng::new(),
    }
}

/// Metropolis acceptance probability for a cost change `delta`.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta <= 0.0 {
        1.0
    } else if temperature <= 0.0 {
        0.0
    } else {
        (-delta / temperature).exp()
    }
}

/// Metropolis criterion. Improving moves and ties are always taken; the
/// uniform draw is consumed only for worsening moves at positive temperature.
pub fn accept_neighbor(rng: &mut Rng, delta: f64, temperature: f64) -> bool {
    if delta <= 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    rng.f64() < (-delta / temperature).exp()
}
