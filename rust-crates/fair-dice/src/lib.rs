//! Provably-fair resolution of a single wager on a six-sided die.
//!
//! A round commits to a fresh server seed, derives the roll from that seed and
//! the player's client seed, settles the bet against a fixed pay table and
//! reveals everything a player needs to check the round afterwards.

pub mod bet;
pub mod commitment;
pub mod derivation;
pub mod engine;
pub mod error;
pub mod payout;
pub mod proof;
pub mod seed;
pub mod verify;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use bet::{
    BetRequest,
    MAX_AMOUNT,
    ValidatedBet,
};
pub use commitment::Commitment;
pub use derivation::{
    Roll,
    derive_roll,
};
pub use engine::Engine;
pub use error::{
    Error,
    ErrorKind,
};
pub use payout::{
    Outcome,
    WIN_MULTIPLIER,
    WIN_THRESHOLD,
};
pub use proof::{
    ProofBundle,
    RoundResult,
};
pub use seed::{
    ClientSeed,
    EntropySource,
    OsEntropy,
    ServerSeed,
};
pub use verify::{
    Verification,
    verify,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;
