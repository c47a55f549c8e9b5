pub mod bets;
pub mod health;
pub mod settlements;

use std::sync::MutexGuard;

use crate::AppState;
use keiba::error::AppError;
use keiba::store::BetBook;

fn lock_book(state: &AppState) -> Result<MutexGuard<'_, BetBook>, AppError> {
    state
        .book
        .lock()
        .map_err(|_| AppError::Internal("bet book lock poisoned".to_string()))
}
