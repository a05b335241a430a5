use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid bet amount")]
    InvalidBet,
    #[error("Bet exceeds current balance")]
    InsufficientBalance,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Secure randomness unavailable: {0}")]
    EntropyUnavailable(String),
    #[error("Roll derivation failed: {0}")]
    DerivationFailure(String),
}

impl Error {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidBet => ErrorKind::InvalidBet,
            Error::InsufficientBalance => ErrorKind::InsufficientBalance,
            Error::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Error::EntropyUnavailable(_) => ErrorKind::EntropyUnavailable,
            Error::DerivationFailure(_) => ErrorKind::DerivationFailure,
        }
    }
}

/// Stable, serializable discriminant of [`Error`] that transports map onto
/// their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidBet,
    InsufficientBalance,
    InvalidRequest,
    EntropyUnavailable,
    DerivationFailure,
}

impl ErrorKind {
    /// Rejections caused by the request itself. Nothing was drawn or settled.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidBet
                | ErrorKind::InsufficientBalance
                | ErrorKind::InvalidRequest
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidBet => "InvalidBet",
            ErrorKind::InsufficientBalance => "InsufficientBalance",
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::EntropyUnavailable => "EntropyUnavailable",
            ErrorKind::DerivationFailure => "DerivationFailure",
        };
        write!(f, "{name}")
    }
}
