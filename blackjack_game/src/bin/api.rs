use actix_web::{web, App, HttpServer};
use blackjack_game::api::{configure, SharedGame};
use std::sync::Mutex;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let address = "127.0.0.1";
    let port = 8080;
    log::info!("listening at {}:{}", address, port);

    let app_game: SharedGame = web::Data::new(Mutex::new(None));

    HttpServer::new(move || {
        App::new()
            .app_data(app_game.clone())
            .configure(configure)
    })
    .bind((address, port))?
    .run()
    .await
}
