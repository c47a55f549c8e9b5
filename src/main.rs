use actix_web::{middleware, web, App, HttpServer};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod handlers;

use handlers::{bets, health, settlements};
use keiba::error::AppError;
use keiba::store::BetBook;
use keiba::{CombinationBuilder, HouseRules};

/// Application state shared across handlers
pub struct AppState {
    pub builder: CombinationBuilder,
    pub book: Mutex<BetBook>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("{}:{}", host, port);

    let rules = HouseRules::from_env();
    info!(
        "House rules: {} yen unit, {} yen max per combination",
        rules.min_unit, rules.max_stake
    );

    let app_state = Arc::new(AppState {
        builder: CombinationBuilder::new(rules),
        book: Mutex::new(BetBook::new()),
    });

    info!("Starting Keiba betting API at http://{}", addr);

    HttpServer::new(move || {
        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(json_config)
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/bets", web::post().to(bets::place_bet))
            .route("/bets/{id}", web::get().to(bets::get_bet))
            .route("/settlements", web::post().to(settlements::settle_bet))
    })
    .bind(&addr)?
    .run()
    .await
}
