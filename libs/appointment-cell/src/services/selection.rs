use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use shared_models::physician::Physician;

/// Tie-break among physicians that are all eligible for a slot.
pub trait PhysicianSelector: Send + Sync {
    fn pick<'a>(&self, candidates: &'a [Physician]) -> Option<&'a Physician>;
}

/// Uniform pick using the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl PhysicianSelector for RandomSelector {
    fn pick<'a>(&self, candidates: &'a [Physician]) -> Option<&'a Physician> {
        candidates.choose(&mut rand::thread_rng())
    }
}

/// Uniform pick from a seeded generator, so a sequence of picks is reproducible.
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl PhysicianSelector for SeededSelector {
    fn pick<'a>(&self, candidates: &'a [Physician]) -> Option<&'a Physician> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        candidates.choose(&mut *rng)
    }
}

/// Lowest id wins. Candidate order from the store is unspecified, so sorting
/// keeps the outcome stable across backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestIdSelector;

impl PhysicianSelector for LowestIdSelector {
    fn pick<'a>(&self, candidates: &'a [Physician]) -> Option<&'a Physician> {
        candidates.iter().min_by_key(|p| p.id)
    }
}
