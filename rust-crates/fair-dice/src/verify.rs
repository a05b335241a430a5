use crate::{
    Result,
    commitment::Commitment,
    derivation::{
        Roll,
        derive_roll,
    },
    proof::ProofBundle,
    seed::{
        ClientSeed,
        ServerSeed,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    /// `SHA-256(server_seed || client_seed)` equals the published hash proof.
    pub commitment_matches: bool,
    /// Re-deriving from the revealed seed gives the published roll.
    pub roll_matches: bool,
    pub expected_roll: Roll,
}

impl Verification {
    pub fn is_fair(&self) -> bool {
        self.commitment_matches && self.roll_matches
    }
}

/// Rechecks a round from its bundle alone. A bundle that cannot even be
/// parsed (bad hex, empty client seed) is an error rather than a failed
/// verification.
pub fn verify(bundle: &ProofBundle) -> Result<Verification> {
    let server_seed = ServerSeed::from_hex(&bundle.server_seed)?;
    let client_seed = ClientSeed::new(bundle.client_seed.clone())?;
    let published = Commitment::from_hex(&bundle.hash_proof)?;

    let recomputed = Commitment::compute(&server_seed, client_seed.as_str());
    let expected_roll = derive_roll(&server_seed, client_seed.as_str(), bundle.nonce)?;

    Ok(Verification {
        commitment_matches: recomputed == published,
        roll_matches: expected_roll == bundle.roll,
        expected_roll,
    })
}
