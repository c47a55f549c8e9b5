use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use super::lock_book;
use crate::AppState;
use keiba::error::AppError;
use keiba::models::{SettleRequest, SettleResponse};

/// Settle a stored bet once the race's payout table is available
pub async fn settle_bet(
    state: web::Data<Arc<AppState>>,
    req: web::Json<SettleRequest>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let mut book = lock_book(&state)?;
    let (outcome, bet) = book.settle(req.bet_id, &req.payout_table)?;

    let response = SettleResponse {
        bet_id: req.bet_id,
        status: bet.status,
        payout: outcome.payout(),
    };
    info!(
        "Settlement for bet {}: {:?} payout {:?}",
        req.bet_id, response.status, response.payout
    );

    Ok(HttpResponse::Ok().json(response))
}
