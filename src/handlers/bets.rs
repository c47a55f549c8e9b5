use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::{info, warn};

use super::lock_book;
use crate::AppState;
use keiba::error::{AppError, SettlementError};
use keiba::models::{PlaceBetRequest, PlaceBetResponse};

/// Validate a selection and store the resulting bet
pub async fn place_bet(
    state: web::Data<Arc<AppState>>,
    req: web::Json<PlaceBetRequest>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();

    let bet = state
        .builder
        .build(req.wager_type, &req.selection, &req.roster, req.unit_stake)
        .map_err(|e| {
            warn!("Rejected {} bet: {}", req.wager_type, e);
            e
        })?;

    let bet_id = lock_book(&state)?.place(bet.clone());
    info!(
        "Placed bet {}: {} {} x{} = {} yen",
        bet_id,
        bet.wager_type,
        bet.method,
        bet.combination_count(),
        bet.total_cost
    );

    Ok(HttpResponse::Created().json(PlaceBetResponse { bet_id, bet }))
}

/// Fetch a stored bet
pub async fn get_bet(
    state: web::Data<Arc<AppState>>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let bet_id = path.into_inner();
    let book = lock_book(&state)?;
    let bet = book.get(bet_id).ok_or(SettlementError::UnknownBet(bet_id))?;

    Ok(HttpResponse::Ok().json(bet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use keiba::store::BetBook;
    use keiba::{Bet, CombinationBuilder};
    use serde_json::json;
    use std::sync::Mutex;

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            builder: CombinationBuilder::default(),
            book: Mutex::new(BetBook::new()),
        })
    }

    fn roster() -> serde_json::Value {
        json!([
            {"number": 1, "bracket": 1},
            {"number": 2, "bracket": 1},
            {"number": 3, "bracket": 2},
            {"number": 4, "bracket": 2, "withdrawn": true}
        ])
    }

    #[actix_web::test]
    async fn test_place_bet_created() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .route("/bets", web::post().to(place_bet))
                .route("/bets/{id}", web::get().to(get_bet)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/bets")
            .set_json(json!({
                "wager_type": "exacta",
                "selection": {"method": "box", "entries": [1, 2, 3]},
                "unit_stake": 100,
                "roster": roster()
            }))
            .to_request();
        let resp: PlaceBetResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.bet_id, 1);
        assert_eq!(resp.bet.total_cost, 600);

        let req = test::TestRequest::get().uri("/bets/1").to_request();
        let bet: Bet = test::call_and_read_body_json(&app, req).await;
        assert_eq!(bet, resp.bet);
    }

    #[actix_web::test]
    async fn test_withdrawn_entry_is_unprocessable() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .route("/bets", web::post().to(place_bet)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/bets")
            .set_json(json!({
                "wager_type": "quinella",
                "selection": {"method": "box", "entries": [1, 4]},
                "unit_stake": 100,
                "roster": roster()
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_unknown_bet_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .route("/bets/{id}", web::get().to(get_bet)),
        )
        .await;

        let req = test::TestRequest::get().uri("/bets/9").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
