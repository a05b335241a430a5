use actix_web::{
    HttpResponse,
    ResponseError,
    http::StatusCode,
};
use dto::ErrorResponseDto;
use fair_dice::ErrorKind;

pub mod actix_roll_api;
pub mod dto;

/// Engine failures as HTTP responses: request problems are 400, a dead
/// entropy source is 503 and a broken derivation is 500.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub fair_dice::Error);

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        self.0.kind()
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidBet
            | ErrorKind::InsufficientBalance
            | ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::EntropyUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::DerivationFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponseDto {
            error: self.0.to_string(),
            kind: self.kind(),
        })
    }
}
