use crate::{
    Error,
    Result,
    seed::ServerSeed,
};
use sha2::{
    Digest,
    Sha256,
};
use std::fmt;

pub const COMMITMENT_LEN: usize = 32;

/// `SHA-256(server_seed_hex || client_seed)`, published alongside the
/// revealed seed so anyone can recompute it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment([u8; COMMITMENT_LEN]);

impl Commitment {
    /// Hashes the lowercase hex server seed followed by the raw client seed
    /// bytes. No separator, no salt.
    pub fn compute(server_seed: &ServerSeed, client_seed: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(server_seed.to_hex().as_bytes());
        hasher.update(client_seed.as_bytes());
        Self(hasher.finalize().into())
    }

    pub fn from_hex(raw: &str) -> Result<Self> {
        let mut bytes = [0u8; COMMITMENT_LEN];
        // verifiers hash the literal string, so only the canonical form is accepted
        if raw.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(Error::invalid_request("hash proof must be lowercase hex"));
        }
        hex::decode_to_slice(raw, &mut bytes).map_err(|e| {
            Error::invalid_request(format!(
                "hash proof must be {} hex characters: {e}",
                COMMITMENT_LEN * 2
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; COMMITMENT_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.to_hex())
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute__matches_known_vector() {
        // given
        let seed = ServerSeed::from_bytes(core::array::from_fn(|i| i as u8));

        // when
        let commitment = Commitment::compute(&seed, "player-seed");

        // then
        assert_eq!(
            commitment.to_hex(),
            "c14130f0c844fc5c52fe3d86abfdd9af1e82e425804a819a6650f7c24c12710b"
        );
    }

    #[test]
    fn compute__hashes_hex_seed_then_client_seed() {
        // given
        let seed = ServerSeed::from_bytes([0u8; 32]);
        let mut hasher = Sha256::new();
        hasher.update(format!("{}lucky-seed", "00".repeat(32)));
        let expected: [u8; 32] = hasher.finalize().into();

        // when
        let commitment = Commitment::compute(&seed, "lucky-seed");

        // then
        assert_eq!(commitment.as_bytes(), &expected);
        assert_eq!(
            commitment.to_hex(),
            "b8be2986cbe4cdd2599a3c3948ec62b93ef069e9714db643d5c66806642439d0"
        );
    }

    #[test]
    fn compute__depends_on_client_seed() {
        // given
        let seed = ServerSeed::from_bytes([1u8; 32]);

        // then
        assert_ne!(
            Commitment::compute(&seed, "lucky-seed"),
            Commitment::compute(&seed, "abc")
        );
    }

    #[test]
    fn from_hex__parses_rendered_commitment() {
        // given
        let commitment = Commitment::compute(&ServerSeed::from_bytes([9u8; 32]), "s");

        // when
        let parsed = Commitment::from_hex(&commitment.to_hex()).unwrap();

        // then
        assert_eq!(parsed, commitment);
        assert_eq!(commitment.to_hex().len(), 64);
    }

    #[test]
    fn from_hex__rejects_non_canonical_hex() {
        // given
        let hex = Commitment::compute(&ServerSeed::from_bytes([9u8; 32]), "s").to_hex();

        // then
        assert!(Commitment::from_hex(&hex.to_uppercase()).is_err());
        assert!(Commitment::from_hex(&format!("{hex}\n")).is_err());
    }
}
