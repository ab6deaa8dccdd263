use std::hash::Hasher;

use twox_hash::XxHash64;

/// Generates random embedding vectors that are reproducible per token.
///
/// Each token seeds its own generator from an xxhash of the token and the configured seed, so a
/// token always gets the same vector no matter how a batch is chunked or which worker runs it.
#[derive(Clone, Copy, Debug)]
pub struct EmbeddingGenerator {
    dimensions: usize,
    seed: u64,
}

impl EmbeddingGenerator {
    pub fn new(dimensions: usize, seed: u64) -> Self {
        Self { dimensions, seed }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Returns `dimensions` values uniformly distributed in `[-1, 1)`.
    pub fn generate(&self, token: &str) -> Vec<f32> {
        let mut rng = fastrand::Rng::with_seed(self.token_seed(token));
        (0..self.dimensions).map(|_| rng.f32() * 2.0 - 1.0).collect()
    }

    fn token_seed(&self, token: &str) -> u64 {
        let mut hasher = XxHash64::with_seed(self.seed);
        hasher.write(token.as_bytes());
        hasher.finish()
    }
}
