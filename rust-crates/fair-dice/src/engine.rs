//! One round, strictly in order:
//! `Received -> Validated -> Committed -> Derived -> Settled -> Responded`.
//!
//! Each stage consumes the previous one, so a round that failed part way can
//! never be turned into a result.

use crate::{
    Result,
    bet::{
        BetRequest,
        ValidatedBet,
    },
    commitment::Commitment,
    derivation::{
        Roll,
        derive_roll,
    },
    payout,
    proof::RoundResult,
    seed::{
        EntropySource,
        OsEntropy,
        ServerSeed,
    },
};


/// Stateless bet resolver. Share it freely between threads; the only thing it
/// holds is the entropy source.
#[derive(Debug, Clone, Default)]
pub struct Engine<E = OsEntropy> {
    entropy: E,
}

impl Engine<OsEntropy> {
    pub fn new() -> Self {
        Self { entropy: OsEntropy }
    }
}

impl<E: EntropySource> Engine<E> {
    pub fn with_entropy(entropy: E) -> Self {
        Self { entropy }
    }

    pub fn entropy(&self) -> &E {
        &self.entropy
    }

    /// Resolves one wager. Validation runs first, so rejected bets never draw
    /// a server seed.
    pub fn play(&self, request: &BetRequest) -> Result<RoundResult> {
        let validated = request.validate().inspect_err(|e| {
            tracing::warn!(
                bet = request.bet_amount,
                balance = request.balance,
                kind = %e.kind(),
                "bet rejected: {e}"
            );
        })?;
        tracing::debug!(
            bet = validated.bet(),
            balance = validated.balance(),
            nonce = validated.nonce(),
            "bet validated"
        );

        let committed = CommittedRound::commit(validated, &self.entropy)
            .inspect_err(|e| tracing::error!("failed to commit round: {e}"))?;
        let derived = committed
            .derive()
            .inspect_err(|e| tracing::error!("failed to derive roll: {e}"))?;
        let settled = derived.settle();

        tracing::info!(
            roll = settled.roll.value(),
            new_balance = settled.new_balance,
            commitment = %settled.commitment,
            nonce = settled.bet.nonce(),
            "round settled"
        );
        Ok(settled.reveal())
    }
}

struct CommittedRound {
    bet: ValidatedBet,
    server_seed: ServerSeed,
    commitment: Commitment,
}

impl CommittedRound {
    fn commit<E: EntropySource + ?Sized>(bet: ValidatedBet, entropy: &E) -> Result<Self> {
        let server_seed = ServerSeed::generate(entropy)?;
        let commitment = Commitment::compute(&server_seed, bet.client_seed().as_str());
        tracing::debug!(%commitment, "round committed");
        Ok(Self {
            bet,
            server_seed,
            commitment,
        })
    }

    fn derive(self) -> Result<DerivedRound> {
        let roll = derive_roll(
            &self.server_seed,
            self.bet.client_seed().as_str(),
            self.bet.nonce(),
        )?;
        Ok(DerivedRound {
            committed: self,
            roll,
        })
    }
}

struct DerivedRound {
    committed: CommittedRound,
    roll: Roll,
}

impl DerivedRound {
    fn settle(self) -> SettledRound {
        let new_balance = payout::settle(&self.committed.bet, self.roll);
        let CommittedRound {
            bet,
            server_seed,
            commitment,
        } = self.committed;
        SettledRound {
            bet,
            server_seed,
            commitment,
            roll: self.roll,
            new_balance,
        }
    }
}

struct SettledRound {
    bet: ValidatedBet,
    server_seed: ServerSeed,
    commitment: Commitment,
    roll: Roll,
    new_balance: u64,
}

impl SettledRound {
    /// The only place the server seed leaves the round.
    fn reveal(self) -> RoundResult {
        let nonce = self.bet.nonce();
        RoundResult {
            roll: self.roll,
            new_balance: self.new_balance,
            server_seed: self.server_seed,
            commitment: self.commitment,
            client_seed: self.bet.into_client_seed(),
            nonce,
        }
    }
}
