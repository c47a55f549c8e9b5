use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::combination::Entry;

/// User-correctable problems with a bet selection.
///
/// Messages are shown to the bettor verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Stake must be a multiple of {unit} yen between {unit} and {max} yen, got {stake}")]
    InvalidStakeUnit { stake: u64, unit: u64, max: u64 },

    #[error("Entry {0} is not running in this race")]
    UnknownOrWithdrawnEntry(Entry),

    #[error("Entry {0} is selected more than once")]
    DuplicateEntry(Entry),

    #[error("Expected {expected} selections{}, got {actual}", in_group(.group))]
    WrongSelectionCount {
        expected: usize,
        actual: usize,
        /// 1-based formation group the count refers to
        group: Option<usize>,
    },

    #[error("Too many selections: at most {max}, got {actual}")]
    TooManySelections { max: usize, actual: usize },

    #[error("Selection does not produce any valid combination")]
    EmptyCombinationSet,
}

fn in_group(group: &Option<usize>) -> String {
    match group {
        Some(g) => format!(" in formation group {}", g),
        None => String::new(),
    }
}

impl ValidationError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidStakeUnit { .. } => "invalid_stake_unit",
            ValidationError::UnknownOrWithdrawnEntry(_) => "unknown_or_withdrawn_entry",
            ValidationError::DuplicateEntry(_) => "duplicate_entry",
            ValidationError::WrongSelectionCount { .. } => "wrong_selection_count",
            ValidationError::TooManySelections { .. } => "too_many_selections",
            ValidationError::EmptyCombinationSet => "empty_combination_set",
        }
    }
}

/// Bet lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("Bet is already settled")]
    AlreadySettled,

    #[error("Bet {0} not found")]
    UnknownBet(u64),
}

/// Roster, payout and bet file errors
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed payout on line {line}: {reason}")]
    MalformedPayout { line: usize, reason: String },
}

#[cfg(feature = "api")]
pub use api::AppError;

#[cfg(feature = "api")]
mod api {
    use actix_web::{http::StatusCode, HttpResponse, ResponseError};
    use thiserror::Error;

    use super::{SettlementError, ValidationError};
    use crate::models::ErrorResponse;

    /// HTTP-facing error
    #[derive(Debug, Error)]
    pub enum AppError {
        #[error("Validation error: {0}")]
        Validation(#[from] ValidationError),

        #[error("Settlement error: {0}")]
        Settlement(#[from] SettlementError),

        #[error("Bad request: {0}")]
        BadRequest(String),

        #[error("Internal error: {0}")]
        Internal(String),
    }

    impl ResponseError for AppError {
        fn status_code(&self) -> StatusCode {
            match self {
                AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AppError::Settlement(SettlementError::UnknownBet(_)) => StatusCode::NOT_FOUND,
                AppError::Settlement(SettlementError::AlreadySettled) => StatusCode::CONFLICT,
                AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
                AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }

        fn error_response(&self) -> HttpResponse {
            let (error_code, message) = match self {
                AppError::Validation(e) => (e.code(), e.to_string()),
                AppError::Settlement(SettlementError::UnknownBet(_)) => {
                    ("unknown_bet", self.to_string())
                }
                AppError::Settlement(SettlementError::AlreadySettled) => {
                    ("already_settled", self.to_string())
                }
                AppError::BadRequest(msg) => ("bad_request", msg.clone()),
                AppError::Internal(msg) => ("internal_error", msg.clone()),
            };

            HttpResponse::build(self.status_code()).json(ErrorResponse {
                error: error_code.to_string(),
                message,
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_error_status_codes() {
            assert_eq!(
                AppError::from(ValidationError::EmptyCombinationSet).status_code(),
                StatusCode::UNPROCESSABLE_ENTITY
            );
            assert_eq!(
                AppError::from(SettlementError::UnknownBet(7)).status_code(),
                StatusCode::NOT_FOUND
            );
            assert_eq!(
                AppError::from(SettlementError::AlreadySettled).status_code(),
                StatusCode::CONFLICT
            );
            assert_eq!(
                AppError::BadRequest("".to_string()).status_code(),
                StatusCode::BAD_REQUEST
            );
            assert_eq!(
                AppError::Internal("".to_string()).status_code(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }

        #[test]
        fn test_error_display() {
            let err = AppError::from(ValidationError::DuplicateEntry(4));
            assert!(err.to_string().contains("Validation error"));
            assert!(err.to_string().contains("Entry 4"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::InvalidStakeUnit {
            stake: 150,
            unit: 100,
            max: 10_000,
        };
        assert_eq!(
            err.to_string(),
            "Stake must be a multiple of 100 yen between 100 and 10000 yen, got 150"
        );

        let err = ValidationError::WrongSelectionCount {
            expected: 3,
            actual: 2,
            group: None,
        };
        assert_eq!(err.to_string(), "Expected 3 selections, got 2");
    }

    #[test]
    fn test_validation_codes_are_distinct() {
        let errors = [
            ValidationError::InvalidStakeUnit {
                stake: 0,
                unit: 100,
                max: 10_000,
            },
            ValidationError::UnknownOrWithdrawnEntry(1),
            ValidationError::DuplicateEntry(1),
            ValidationError::WrongSelectionCount {
                expected: 1,
                actual: 0,
                group: None,
            },
            ValidationError::TooManySelections { max: 8, actual: 9 },
            ValidationError::EmptyCombinationSet,
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }
}
