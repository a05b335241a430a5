use fair_dice::{
    BetRequest,
    Error,
    ErrorKind,
    MAX_AMOUNT,
    ProofBundle,
    RoundResult,
    Verification,
    derivation::Roll,
};
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

/// `POST /roll-dice` body. Amounts stay loosely typed here so a malformed bet
/// is reported as `InvalidBet` instead of a generic parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRequestDto {
    #[serde(default)]
    pub bet: Option<Value>,
    #[serde(default)]
    pub balance: Option<Value>,
    #[serde(default)]
    pub client_seed: Option<String>,
    #[serde(default)]
    pub nonce: Option<u64>,
}

/// Whole-number value of a JSON amount. Floats count when they have no
/// fractional part and stay inside the exact range, so `100.0` is `100`.
fn whole_amount(value: &Value) -> Option<i128> {
    if let Some(amount) = value.as_u64() {
        return Some(amount.into());
    }
    if let Some(amount) = value.as_i64() {
        return Some(amount.into());
    }
    let amount = value.as_f64()?;
    (amount.fract() == 0.0 && amount.abs() <= MAX_AMOUNT as f64).then_some(amount as i128)
}

impl TryFrom<RollRequestDto> for BetRequest {
    type Error = Error;

    /// Checks the bet first, then the balance, then the client seed.
    fn try_from(dto: RollRequestDto) -> Result<Self, Self::Error> {
        let bet_amount = dto
            .bet
            .as_ref()
            .and_then(whole_amount)
            .filter(|bet| (1..=i128::from(MAX_AMOUNT)).contains(bet))
            .and_then(|bet| u64::try_from(bet).ok())
            .ok_or(Error::InvalidBet)?;
        let balance = match dto.balance.as_ref() {
            None | Some(Value::Null) => {
                return Err(Error::invalid_request("balance is required"));
            }
            Some(value) => match whole_amount(value) {
                // a negative balance can never cover a positive bet
                Some(balance) if balance < 0 => return Err(Error::InsufficientBalance),
                Some(balance) => u64::try_from(balance).map_err(|_| {
                    Error::invalid_request("balance exceeds the maximum amount")
                })?,
                None => {
                    return Err(Error::invalid_request(
                        "balance must be a non-negative integer",
                    ));
                }
            },
        };
        let client_seed = dto
            .client_seed
            .ok_or_else(|| Error::invalid_request("clientSeed is required"))?;
        Ok(BetRequest::new(bet_amount, balance, client_seed)
            .with_nonce(dto.nonce.unwrap_or_default()))
    }
}

/// `POST /roll-dice` success body: the proof bundle plus the settled balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResponseDto {
    #[serde(flatten)]
    pub proof: ProofBundle,
    pub new_balance: u64,
}

impl From<&RoundResult> for RollResponseDto {
    fn from(result: &RoundResult) -> Self {
        Self {
            proof: result.bundle(),
            new_balance: result.new_balance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponseDto {
    pub commitment_matches: bool,
    pub roll_matches: bool,
    pub expected_roll: Roll,
    pub fair: bool,
}

impl From<Verification> for VerifyResponseDto {
    fn from(verification: Verification) -> Self {
        Self {
            commitment_matches: verification.commitment_matches,
            roll_matches: verification.roll_matches,
            expected_roll: verification.expected_roll,
            fair: verification.is_fair(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}
