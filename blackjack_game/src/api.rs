//! HTTP handlers for playing a shared game over JSON. The binary in `bin/api.rs` mounts them with
//! `configure`.

use crate::{BlackjackGame, GameConfigBuilder};
use actix_web::{
    body::BoxBody,
    error, get,
    http::{header::ContentType, StatusCode},
    post, web, HttpResponse,
};
use blackjack_lib::{BlackjackGameError, ErrorKind};
use serde::Deserialize;
use std::sync::{Mutex, MutexGuard};

/// The single game the server hosts.
pub type SharedGame = web::Data<Mutex<Option<BlackjackGame>>>;

/// Body of `/new-game`. `config` accepts the same fields as a config file.
#[derive(Debug, Deserialize)]
struct NewGame {
    players: Vec<String>,
    config: Option<GameConfigBuilder>,
}

#[derive(Debug, Deserialize)]
struct Bet {
    seat: usize,
    amount: u32,
}

#[derive(Debug, Deserialize)]
struct SeatAction {
    seat: usize,
}

/// An enum that will handle user facing errors
#[derive(Debug)]
pub enum UserError {
    InternalError,
    GameNotCreated,
    Game(BlackjackGameError),
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserError::InternalError => write!(f, "an internal error occured"),
            UserError::GameNotCreated => write!(f, "no game has been created, POST /new-game first"),
            UserError::Game(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for UserError {}

impl From<BlackjackGameError> for UserError {
    fn from(value: BlackjackGameError) -> Self {
        UserError::Game(value)
    }
}

impl error::ResponseError for UserError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            UserError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::GameNotCreated => StatusCode::BAD_REQUEST,
            UserError::Game(e) => match e.kind {
                ErrorKind::OutOfTurn | ErrorKind::InvalidPhase => StatusCode::CONFLICT,
                ErrorKind::OutOfCards => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }
}

fn lock(app_game: &SharedGame) -> Result<MutexGuard<'_, Option<BlackjackGame>>, UserError> {
    app_game.lock().map_err(|_| UserError::InternalError)
}

/// Runs `action` against the hosted game and answers with the resulting snapshot.
fn with_game<F>(app_game: &SharedGame, action: F) -> Result<HttpResponse, UserError>
where
    F: FnOnce(&mut BlackjackGame) -> Result<(), BlackjackGameError>,
{
    let mut guard = lock(app_game)?;
    let game = guard.as_mut().ok_or(UserError::GameNotCreated)?;
    action(game)?;
    Ok(HttpResponse::Ok().json(game.snapshot()))
}

/// A handler that creates a new game, replacing any game in progress
#[post("/new-game")]
async fn new_game(
    params: web::Json<NewGame>,
    app_game: SharedGame,
) -> Result<HttpResponse, UserError> {
    let params = params.into_inner();
    let config = params.config.unwrap_or_default().build();
    let game = BlackjackGame::new(config, &params.players)?;
    let snapshot = game.snapshot();

    *lock(&app_game)? = Some(game);
    Ok(HttpResponse::Ok().json(snapshot))
}

#[post("/bet")]
async fn bet(params: web::Json<Bet>, app_game: SharedGame) -> Result<HttpResponse, UserError> {
    with_game(&app_game, |game| game.place_bet(params.seat, params.amount))
}

#[post("/hit")]
async fn hit(params: web::Json<SeatAction>, app_game: SharedGame) -> Result<HttpResponse, UserError> {
    with_game(&app_game, |game| game.hit(params.seat).map(|_| ()))
}

#[post("/stand")]
async fn stand(
    params: web::Json<SeatAction>,
    app_game: SharedGame,
) -> Result<HttpResponse, UserError> {
    with_game(&app_game, |game| game.stand(params.seat))
}

#[post("/next-round")]
async fn next_round(app_game: SharedGame) -> Result<HttpResponse, UserError> {
    with_game(&app_game, |game| game.reset_round())
}

#[get("/state")]
async fn state(app_game: SharedGame) -> Result<HttpResponse, UserError> {
    with_game(&app_game, |_| Ok(()))
}

#[get("/stats")]
async fn stats(app_game: SharedGame) -> Result<HttpResponse, UserError> {
    let guard = lock(&app_game)?;
    let game = guard.as_ref().ok_or(UserError::GameNotCreated)?;
    Ok(HttpResponse::Ok().json(game.stats()))
}

/// Registers every handler on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(new_game)
        .service(bet)
        .service(hit)
        .service(stand)
        .service(next_round)
        .service(state)
        .service(stats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use actix_web::{test, App};
    use blackjack_lib::{Card, Deck, Rank, Suit};
    use serde_json::{json, Value};

    fn shared(game: Option<BlackjackGame>) -> SharedGame {
        web::Data::new(Mutex::new(game))
    }

    /// Ada is dealt 10 + 6 and draws a 2, the dealer holds 9 + 8.
    fn stacked_game() -> BlackjackGame {
        let cards = [Rank::Ten, Rank::Nine, Rank::Six, Rank::Eight, Rank::Two]
            .iter()
            .map(|r| Card::new(*r, Suit::Clubs))
            .collect();
        let config = GameConfig::new().min_bet(5).build();
        BlackjackGame::with_deck(config, &["Ada"], Deck::stacked(cards)).unwrap()
    }

    #[actix_web::test]
    async fn requires_a_game_first() {
        let app =
            test::init_service(App::new().app_data(shared(None)).configure(configure)).await;
        let req = test::TestRequest::get().uri("/state").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn creates_a_game_from_json() {
        let app =
            test::init_service(App::new().app_data(shared(None)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/new-game")
            .set_json(json!({ "players": ["Ada", ""], "config": { "seed": 11, "min_bet": 5 } }))
            .to_request();
        let snapshot: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot["phase"], "Betting");
        assert_eq!(snapshot["seats"][0]["name"], "Ada");
        assert_eq!(snapshot["seats"][1]["name"], "Player 2");
        assert_eq!(snapshot["seats"][0]["balance"], 1000);

        let req = test::TestRequest::post()
            .uri("/bet")
            .set_json(json!({ "seat": 0, "amount": 2 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn plays_a_round() {
        let app = test::init_service(
            App::new()
                .app_data(shared(Some(stacked_game())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/bet")
            .set_json(json!({ "seat": 0, "amount": 50 }))
            .to_request();
        let snapshot: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot["phase"]["PlayerTurn"], 0);
        assert_eq!(snapshot["seats"][0]["bet"], 50);
        assert_eq!(snapshot["seats"][0]["balance"], 950);
        assert_eq!(snapshot["dealer_cards"][0]["rank"], "Nine");
        assert!(snapshot["dealer_cards"][1].is_null());
        assert_eq!(snapshot["dealer_value"], 9);

        let req = test::TestRequest::post()
            .uri("/stand")
            .set_json(json!({ "seat": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/hit")
            .set_json(json!({ "seat": 0 }))
            .to_request();
        let snapshot: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot["phase"]["PlayerTurn"], 0);
        assert_eq!(snapshot["seats"][0]["hand"]["cards"][2]["rank"], "Two");

        let req = test::TestRequest::post()
            .uri("/stand")
            .set_json(json!({ "seat": 0 }))
            .to_request();
        let snapshot: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot["phase"], "RoundOver");
        assert_eq!(snapshot["dealer_value"], 17);
        assert_eq!(snapshot["last_result"]["seats"][0]["outcome"], "Win");
        assert_eq!(snapshot["seats"][0]["balance"], 1050);

        let req = test::TestRequest::post()
            .uri("/hit")
            .set_json(json!({ "seat": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post().uri("/next-round").to_request();
        let snapshot: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot["phase"], "Betting");
        assert_eq!(snapshot["round"], 2);

        let req = test::TestRequest::get().uri("/stats").to_request();
        let stats_body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats_body[0]["rounds"], 1);
        assert_eq!(stats_body[0]["wins"], 1);
        assert_eq!(stats_body[0]["winnings"], 50);
    }

    #[actix_web::test]
    async fn rejects_bad_tables() {
        let app =
            test::init_service(App::new().app_data(shared(None)).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/new-game")
            .set_json(json!({ "players": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
