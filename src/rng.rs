use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random source owned by a single consumer (the spawner, a test, ...).
pub type SimRng = ChaCha8Rng;

/// Hands out deterministic child streams derived from one master seed.
///
/// Streams depend on the master seed and on the order in which they are
/// forked, never on wall-clock state.
pub struct RngManager {
    master: ChaCha8Rng,
    forked: Vec<String>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            forked: Vec::new(),
        }
    }

    pub fn fork(&mut self, name: &str) -> SimRng {
        let mut seed_bytes = [0u8; 32];
        self.master.fill_bytes(&mut seed_bytes);
        let mut seed_u64 = [0u8; 8];
        seed_u64.copy_from_slice(&seed_bytes[..8]);
        let derived = u64::from_le_bytes(seed_u64);
        tracing::debug!(stream = name, "forked rng stream");
        self.forked.push(name.to_string());
        ChaCha8Rng::seed_from_u64(derived)
    }

    pub fn forked_streams(&self) -> &[String] {
        &self.forked
    }
}
