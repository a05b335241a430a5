use crate::{
    Error,
    Result,
};
use rand::{
    TryRngCore,
    rngs::OsRng,
};
use std::fmt;

pub const SERVER_SEED_LEN: usize = 32;
pub const MAX_CLIENT_SEED_LEN: usize = 256;

/// The secret half of a round. Its bytes only leave the engine through the
/// revealed [`crate::ProofBundle`], so `Debug` never prints them.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSeed([u8; SERVER_SEED_LEN]);

impl ServerSeed {
    pub fn from_bytes(bytes: [u8; SERVER_SEED_LEN]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh seed. Failures are surfaced as-is; there is no fallback
    /// generator.
    pub fn generate<E: EntropySource + ?Sized>(entropy: &E) -> Result<Self> {
        let mut bytes = [0u8; SERVER_SEED_LEN];
        entropy.fill_seed(&mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn from_hex(raw: &str) -> Result<Self> {
        let mut bytes = [0u8; SERVER_SEED_LEN];
        // verifiers hash the literal string, so only the canonical form is accepted
        if raw.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(Error::invalid_request("server seed must be lowercase hex"));
        }
        hex::decode_to_slice(raw, &mut bytes).map_err(|e| {
            Error::invalid_request(format!(
                "server seed must be {} hex characters: {e}",
                SERVER_SEED_LEN * 2
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SERVER_SEED_LEN] {
        &self.0
    }

    /// Lowercase hex, the form that is revealed and hashed.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ServerSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerSeed(<redacted>)")
    }
}

/// Player-supplied entropy, between 1 and [`MAX_CLIENT_SEED_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientSeed(String);

impl ClientSeed {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(Error::invalid_request("client seed must not be empty"));
        }
        if raw.len() > MAX_CLIENT_SEED_LEN {
            return Err(Error::invalid_request(format!(
                "client seed is {} bytes; at most {MAX_CLIENT_SEED_LEN} are allowed",
                raw.len()
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClientSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cryptographically secure source of server seeds.
///
/// Shared by every concurrent round, so implementations synchronize
/// internally (or hold no state at all).
pub trait EntropySource: Send + Sync {
    fn fill_seed(&self, dest: &mut [u8; SERVER_SEED_LEN]) -> Result<()>;
}

/// Operating system randomness, read fresh on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_seed(&self, dest: &mut [u8; SERVER_SEED_LEN]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| Error::EntropyUnavailable(e.to_string()))
    }
}

impl<E: EntropySource + ?Sized> EntropySource for std::sync::Arc<E> {
    fn fill_seed(&self, dest: &mut [u8; SERVER_SEED_LEN]) -> Result<()> {
        (**self).fill_seed(dest)
    }
}
