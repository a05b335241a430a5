use crate::{
    commitment::Commitment,
    derivation::Roll,
    seed::{
        ClientSeed,
        ServerSeed,
    },
};
use serde::{
    Deserialize,
    Serialize,
};

/// The settled round, built once per accepted bet and never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub(crate) roll: Roll,
    pub(crate) new_balance: u64,
    pub(crate) server_seed: ServerSeed,
    pub(crate) commitment: Commitment,
    pub(crate) client_seed: ClientSeed,
    pub(crate) nonce: u64,
}

impl RoundResult {
    pub fn roll(&self) -> Roll {
        self.roll
    }

    pub fn new_balance(&self) -> u64 {
        self.new_balance
    }

    /// The revealed secret. Only exists once the round has settled.
    pub fn server_seed(&self) -> &ServerSeed {
        &self.server_seed
    }

    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    pub fn client_seed(&self) -> &ClientSeed {
        &self.client_seed
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn bundle(&self) -> ProofBundle {
        ProofBundle {
            roll: self.roll,
            server_seed: self.server_seed.to_hex(),
            hash_proof: self.commitment.to_hex(),
            client_seed: self.client_seed.as_str().to_owned(),
            nonce: self.nonce,
        }
    }
}

/// Everything a player needs to recheck a round, in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofBundle {
    pub roll: Roll,
    pub server_seed: String,
    pub hash_proof: String,
    pub client_seed: String,
    #[serde(default)]
    pub nonce: u64,
}
