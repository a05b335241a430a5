//! Fixed pay table: 4, 5 or 6 wins and returns twice the stake, anything
//! else loses it.

use crate::{
    bet::ValidatedBet,
    derivation::Roll,
};

/// Lowest winning face.
pub const WIN_THRESHOLD: u8 = 4;

/// A win returns `WIN_MULTIPLIER * bet`, stake included.
pub const WIN_MULTIPLIER: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub fn of(roll: Roll) -> Self {
        if roll.value() >= WIN_THRESHOLD {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

/// Amount credited back for `roll`. Callers keep `bet` within
/// [`crate::MAX_AMOUNT`].
pub fn payout(roll: Roll, bet: u64) -> u64 {
    match Outcome::of(roll) {
        Outcome::Win => bet.saturating_mul(WIN_MULTIPLIER),
        Outcome::Loss => 0,
    }
}

/// `balance - bet + payout`. Validation guarantees `bet <= balance`, so this
/// cannot underflow.
pub fn settle(bet: &ValidatedBet, roll: Roll) -> u64 {
    bet.balance() - bet.bet() + payout(roll, bet.bet())
}
