use crate::{
    Error,
    Result,
    seed::ServerSeed,
};
use serde::{
    Deserialize,
    Serialize,
};
use sha2::{
    Digest,
    Sha256,
};
use std::fmt;

/// Prefix of every roll digest, keeping roll derivation apart from the
/// commitment hash.
pub const ROLL_DOMAIN_TAG: &[u8] = b"fair-dice:roll:v1";

// Largest multiple of 6 that fits in a byte. Bytes at or above it are
// rejected so every face keeps probability 42/252.
const ACCEPT_BELOW: u8 = 252;

/// A die face, always in `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Roll(u8);

impl Roll {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(face: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&face).then_some(Self(face))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Roll {
    type Error = Error;

    fn try_from(face: u8) -> Result<Self> {
        Roll::new(face).ok_or_else(|| {
            Error::invalid_request(format!("roll {face} is not a die face"))
        })
    }
}

impl From<Roll> for u8 {
    fn from(roll: Roll) -> Self {
        roll.0
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Digest for one derivation attempt:
/// `SHA-256(tag || server_seed_hex || client_seed || nonce_be8 || counter_be4)`.
fn roll_digest(
    server_seed: &ServerSeed,
    client_seed: &str,
    nonce: u64,
    counter: u32,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(ROLL_DOMAIN_TAG);
    hasher.update(server_seed.to_hex().as_bytes());
    hasher.update(client_seed.as_bytes());
    hasher.update(nonce.to_be_bytes());
    hasher.update(counter.to_be_bytes());
    hasher.finalize().into()
}

/// Maps `(server_seed, client_seed, nonce)` onto a die face.
///
/// Digest bytes are read in order and the first byte below 252 decides the
/// face as `byte % 6 + 1`. If a whole digest is rejected the internal counter
/// is bumped and a new digest is taken. Pure: the same inputs always give the
/// same roll.
pub fn derive_roll(
    server_seed: &ServerSeed,
    client_seed: &str,
    nonce: u64,
) -> Result<Roll> {
    for counter in 0..=u32::MAX {
        let digest = roll_digest(server_seed, client_seed, nonce, counter);
        if let Some(byte) = digest.iter().copied().find(|b| *b < ACCEPT_BELOW) {
            return Ok(Roll(byte % 6 + 1));
        }
        tracing::debug!(counter, "every digest byte rejected, re-deriving");
    }
    Err(Error::DerivationFailure(
        "derivation counter exhausted without an accepted byte".into(),
    ))
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seed(byte: u8) -> ServerSeed {
        ServerSeed::from_bytes([byte; 32])
    }

    #[test]
    fn derive_roll__matches_known_vectors() {
        let cases = [
            (0x00, "lucky-seed", 0, 3),
            (0x01, "lucky-seed", 0, 4),
            (0x01, "lucky-seed", 1, 3),
            (0x07, "abc", 0, 6),
            (0x2a, "abc", 1, 4),
            (0xff, "lucky-seed", 0, 6),
            (0xff, "abc", 0, 2),
        ];
        for (byte, client_seed, nonce, expected) in cases {
            let roll = derive_roll(&seed(byte), client_seed, nonce).unwrap();
            assert_eq!(
                roll.value(),
                expected,
                "seed {byte:#04x}, client seed {client_seed}, nonce {nonce}"
            );
        }
    }

    #[test]
    fn derive_roll__uses_first_accepted_digest_byte() {
        // given
        let server_seed = ServerSeed::from_bytes(core::array::from_fn(|i| i as u8));
        let digest = roll_digest(&server_seed, "player-seed", 0, 0);
        let first_accepted = digest.iter().find(|b| **b < ACCEPT_BELOW).unwrap();

        // when
        let roll = derive_roll(&server_seed, "player-seed", 0).unwrap();

        // then
        assert_eq!(roll.value(), first_accepted % 6 + 1);
        assert_eq!(roll.value(), 4);
    }

    #[test]
    fn derive_roll__is_roughly_uniform_over_many_server_seeds() {
        // given
        const SAMPLES: usize = 60_000;
        let mut counts = [0usize; 6];

        // when
        for i in 0..SAMPLES as u64 {
            let bytes: [u8; 32] = Sha256::digest(i.to_be_bytes()).into();
            let roll = derive_roll(&ServerSeed::from_bytes(bytes), "lucky-seed", 0)
                .unwrap();
            counts[(roll.value() - 1) as usize] += 1;
        }

        // then
        // chi-square with 5 degrees of freedom, p = 0.001
        let expected = SAMPLES as f64 / 6.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&observed| (observed as f64 - expected).powi(2) / expected)
            .sum();
        assert!(chi_square < 20.515, "chi-square {chi_square}, counts {counts:?}");
    }

    #[test]
    fn roll__rejects_faces_outside_die() {
        assert!(Roll::new(0).is_none());
        assert!(Roll::new(7).is_none());
        assert_eq!(Roll::new(6).map(Roll::value), Some(6));
        assert!(serde_json::from_str::<Roll>("9").is_err());
        assert_eq!(serde_json::from_str::<Roll>("2").unwrap().value(), 2);
    }

    proptest! {
        #[test]
        fn derive_roll__is_deterministic(
            bytes in any::<[u8; 32]>(),
            client_seed in "[ -~]{1,64}",
            nonce in any::<u64>(),
        ) {
            let server_seed = ServerSeed::from_bytes(bytes);
            let first = derive_roll(&server_seed, &client_seed, nonce).unwrap();
            let second = derive_roll(&server_seed, &client_seed, nonce).unwrap();
            prop_assert_eq!(first, second);
            prop_assert!((Roll::MIN..=Roll::MAX).contains(&first.value()));
        }
    }
}
