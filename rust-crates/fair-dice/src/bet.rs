use crate::{
    Error,
    Result,
    seed::ClientSeed,
};

/// Largest amount accepted for a bet or a balance, `2^53 - 1`. Amounts cross
/// the wire as JSON numbers and must stay exact for browser clients. It also
/// keeps `balance + bet` well inside `u64`.
pub const MAX_AMOUNT: u64 = (1 << 53) - 1;

/// A single wager as submitted by the caller. Nothing here has been checked
/// yet; see [`BetRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetRequest {
    pub bet_amount: u64,
    pub balance: u64,
    pub client_seed: String,
    pub nonce: u64,
}

impl BetRequest {
    pub fn new(bet_amount: u64, balance: u64, client_seed: impl Into<String>) -> Self {
        Self {
            bet_amount,
            balance,
            client_seed: client_seed.into(),
            nonce: 0,
        }
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Checks the bet, then the balance, then the client seed. Pure; no
    /// entropy is touched before this succeeds.
    pub fn validate(&self) -> Result<ValidatedBet> {
        if self.bet_amount == 0 || self.bet_amount > MAX_AMOUNT {
            return Err(Error::InvalidBet);
        }
        if self.balance > MAX_AMOUNT {
            return Err(Error::invalid_request(format!(
                "balance exceeds the maximum of {MAX_AMOUNT}"
            )));
        }
        if self.bet_amount > self.balance {
            return Err(Error::InsufficientBalance);
        }
        let client_seed = ClientSeed::new(self.client_seed.clone())?;
        Ok(ValidatedBet {
            bet: self.bet_amount,
            balance: self.balance,
            client_seed,
            nonce: self.nonce,
        })
    }
}

/// A bet that satisfies `0 < bet <= balance <= MAX_AMOUNT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBet {
    bet: u64,
    balance: u64,
    client_seed: ClientSeed,
    nonce: u64,
}

impl ValidatedBet {
    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn client_seed(&self) -> &ClientSeed {
        &self.client_seed
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub(crate) fn into_client_seed(self) -> ClientSeed {
        self.client_seed
    }
}
