use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

pub const DEFAULT_SEED: u64 = 0xC0FFEE;

#[derive(Debug, Clone)]
pub struct RngState {
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform Fisher-Yates permutation.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

impl Default for RngState {
    fn default() -> Self {
        Self::from_seed(DEFAULT_SEED)
    }
}
