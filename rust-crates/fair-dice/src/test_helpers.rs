use crate::{
    Error,
    Result,
    derivation::{
        Roll,
        derive_roll,
    },
    seed::{
        EntropySource,
        SERVER_SEED_LEN,
        ServerSeed,
    },
};
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

/// Hands out the same seed every time and counts how often it was asked.
#[derive(Debug)]
pub struct FixedEntropy {
    seed: [u8; SERVER_SEED_LEN],
    draws: AtomicUsize,
}

impl FixedEntropy {
    pub fn new(seed: [u8; SERVER_SEED_LEN]) -> Self {
        Self {
            seed,
            draws: AtomicUsize::new(0),
        }
    }

    pub fn draws(&self) -> usize {
        self.draws.load(Ordering::SeqCst)
    }
}

impl EntropySource for FixedEntropy {
    fn fill_seed(&self, dest: &mut [u8; SERVER_SEED_LEN]) -> Result<()> {
        self.draws.fetch_add(1, Ordering::SeqCst);
        *dest = self.seed;
        Ok(())
    }
}

/// A random source that is always down.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEntropy;

impl EntropySource for FailingEntropy {
    fn fill_seed(&self, _dest: &mut [u8; SERVER_SEED_LEN]) -> Result<()> {
        Err(Error::EntropyUnavailable("entropy source offline".into()))
    }
}

/// First seed of the form `[b; 32]` whose roll for `client_seed` and `nonce`
/// satisfies `wanted`.
pub fn seed_rolling(
    client_seed: &str,
    nonce: u64,
    wanted: impl Fn(Roll) -> bool,
) -> [u8; SERVER_SEED_LEN] {
    (0..=u8::MAX)
        .map(|b| [b; SERVER_SEED_LEN])
        .find(|bytes| {
            let roll = derive_roll(&ServerSeed::from_bytes(*bytes), client_seed, nonce)
                .expect("derivation is total for sha-256");
            wanted(roll)
        })
        .expect("some uniform seed produces the wanted roll")
}
