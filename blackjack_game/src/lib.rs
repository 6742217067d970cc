pub mod api;
pub mod game;
pub mod write;

pub use game::prelude::*;

use blackjack_lib::{BlackjackGameError, ErrorKind, HandOutcome};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod prelude {
    pub use super::{game::prelude::*, GameConfig, GameConfigBuilder, SessionSummary};
}

/// Simple struct for recording all of the interesting data points accumulated by one seat over a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub label: String,
    pub wins: i32,
    pub pushes: i32,
    pub losses: i32,
    pub blackjacks: i32,
    pub rounds: u32,
    pub winnings: i64,
    pub starting_balance: u64,
    pub final_balance: u64,
}

impl SessionSummary {
    pub fn new(label: String, starting_balance: u64) -> Self {
        SessionSummary {
            label,
            wins: 0,
            pushes: 0,
            losses: 0,
            blackjacks: 0,
            rounds: 0,
            winnings: 0,
            starting_balance,
            final_balance: starting_balance,
        }
    }

    /// Records one settled hand. `payout` is what was returned to the balance, stake included.
    pub fn record(&mut self, outcome: HandOutcome, bet: u32, payout: u64, balance: u64) {
        match outcome {
            HandOutcome::Win => self.wins += 1,
            HandOutcome::Blackjack => {
                self.wins += 1;
                self.blackjacks += 1;
            }
            HandOutcome::Push => self.pushes += 1,
            HandOutcome::Loss => self.losses += 1,
        }
        self.rounds += 1;
        let net = i64::try_from(payout)
            .unwrap_or(i64::MAX)
            .saturating_sub(i64::from(bet));
        self.winnings = self.winnings.saturating_add(net);
        self.final_balance = balance;
    }

    fn pct(&self, n: i32) -> f32 {
        if self.rounds == 0 {
            0.0
        } else {
            (n as f32) / (self.rounds as f32)
        }
    }
}

impl Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WIDTH: usize = 80;
        const TEXT_WIDTH: usize = "number of player blackjacks".len() + 20;
        const NUM_WIDTH: usize = WIDTH - TEXT_WIDTH;
        let body = format!(
            "{}{}\n\
        {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
        {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
        {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
        {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
        {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
        {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
        {:<TEXT_WIDTH$}{:>NUM_WIDTH$}\n\
        {:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}\n\
        {:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}\n\
        {:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}\n",
            "player: ",
            self.label,
            "hands won",
            self.wins,
            "hands pushed",
            self.pushes,
            "hands lost",
            self.losses,
            "number of player blackjacks",
            self.blackjacks,
            "total hands played",
            self.rounds,
            "winnings",
            self.winnings,
            "final balance",
            self.final_balance,
            "win percentage",
            self.pct(self.wins),
            "push percentage",
            self.pct(self.pushes),
            "loss percentage",
            self.pct(self.losses),
        );
        write!(f, "{}", body)
    }
}

/// Struct for configuring a `BlackjackGame`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameConfig {
    pub starting_balance: u64,
    pub num_decks: usize,
    pub min_bet: u32,
    pub max_bet: Option<u32>,
    pub blackjack_payout: f64,
    pub soft_seventeen: bool,
    pub dealer_peek: bool,
    pub reshuffle_every_round: bool,
    pub penetration: f32,
    pub seed: Option<u64>,
    pub dealer_draw_delay_ms: u64,
}

impl GameConfig {
    /// Associated method for returning a new `GameConfigBuilder` object. Allows customization of the game
    /// i.e. the players starting balance, the table limits, how many decks are used and the dealer's rules.
    pub fn new() -> GameConfigBuilder {
        GameConfigBuilder::default()
    }

    /// Checks the configuration for values no table could be run with.
    pub fn validate(&self) -> Result<(), BlackjackGameError> {
        let invalid = |msg: &str| Err(BlackjackGameError::new(ErrorKind::Config, msg));
        if self.num_decks == 0 {
            return invalid("at least one deck is required");
        }
        if self.min_bet == 0 {
            return invalid("the minimum bet must be positive");
        }
        if self.max_bet.is_some_and(|max| max < self.min_bet) {
            return invalid("the maximum bet cannot be below the minimum bet");
        }
        if self.starting_balance < u64::from(self.min_bet) {
            return invalid("the starting balance must cover the minimum bet");
        }
        if !(self.blackjack_payout > 0.0) {
            return invalid("the blackjack payout must be positive");
        }
        if !(self.penetration > 0.0 && self.penetration <= 1.0) {
            return invalid("penetration must be in (0, 1]");
        }
        Ok(())
    }
}

impl Default for GameConfig {
    /// Returns the standard configurations for a game of blackjack.
    fn default() -> Self {
        GameConfig::new().build()
    }
}

/// Struct to implement builder pattern for `GameConfig`. Also the shape a JSON config file or
/// request body is read into: any field left out takes its default.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfigBuilder {
    starting_balance: Option<u64>,
    num_decks: Option<usize>,
    min_bet: Option<u32>,
    max_bet: Option<u32>,
    blackjack_payout: Option<f64>,
    soft_seventeen: Option<bool>,
    dealer_peek: Option<bool>,
    reshuffle_every_round: Option<bool>,
    penetration: Option<f32>,
    seed: Option<u64>,
    dealer_draw_delay_ms: Option<u64>,
}

impl GameConfigBuilder {
    /// Parses a builder from JSON, e.g. the contents of a config file.
    pub fn from_json(json: &str) -> Result<Self, BlackjackGameError> {
        serde_json::from_str(json).map_err(|e| {
            BlackjackGameError::new(ErrorKind::Config, format!("invalid game config: {e}"))
        })
    }

    /// Method for changing the starting balance of every player.
    pub fn starting_balance(&mut self, balance: u64) -> &mut Self {
        self.starting_balance = Some(balance);
        self
    }

    /// Method for choosing the number of decks used in the game
    pub fn num_decks(&mut self, decks: usize) -> &mut Self {
        self.num_decks = Some(decks);
        self
    }

    /// Method for setting the minimum bet for the game
    pub fn min_bet(&mut self, bet: u32) -> &mut Self {
        self.min_bet = Some(bet);
        self
    }

    /// Method for setting the table maximum, there is none by default
    pub fn max_bet(&mut self, bet: u32) -> &mut Self {
        self.max_bet = Some(bet);
        self
    }

    /// Method for setting what a natural pays, 1.5 (3:2) by default
    pub fn blackjack_payout(&mut self, payout: f64) -> &mut Self {
        self.blackjack_payout = Some(payout);
        self
    }

    /// Method for setting the flag that determines if the dealer must hit soft seventeens, default is false
    pub fn soft_seventeen(&mut self, seventeen: bool) -> &mut Self {
        self.soft_seventeen = Some(seventeen);
        self
    }

    /// Method for setting whether the dealer checks for blackjack before the players act, default is true
    pub fn dealer_peek(&mut self, peek: bool) -> &mut Self {
        self.dealer_peek = Some(peek);
        self
    }

    /// Method for setting whether the deck is collected and shuffled before every deal, default is true.
    /// When false the deck is only shuffled once the cut card is reached.
    pub fn reshuffle_every_round(&mut self, reshuffle: bool) -> &mut Self {
        self.reshuffle_every_round = Some(reshuffle);
        self
    }

    /// Method for setting the fraction of the deck dealt before the cut card comes out
    pub fn penetration(&mut self, fraction: f32) -> &mut Self {
        self.penetration = Some(fraction);
        self
    }

    /// Method for seeding the shuffle so a session can be replayed
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// Method for setting the pause between dealer draws shown by a front end
    pub fn dealer_draw_delay_ms(&mut self, delay: u64) -> &mut Self {
        self.dealer_draw_delay_ms = Some(delay);
        self
    }

    /// Method for building a `GameConfig` object from the given `GameConfigBuilder` object.
    pub fn build(&mut self) -> GameConfig {
        GameConfig {
            starting_balance: self.starting_balance.unwrap_or(1000),
            num_decks: self.num_decks.unwrap_or(1),
            min_bet: self.min_bet.unwrap_or(1),
            max_bet: self.max_bet,
            blackjack_payout: self.blackjack_payout.unwrap_or(1.5),
            soft_seventeen: self.soft_seventeen.unwrap_or(false),
            dealer_peek: self.dealer_peek.unwrap_or(true),
            reshuffle_every_round: self.reshuffle_every_round.unwrap_or(true),
            penetration: self.penetration.unwrap_or(0.75),
            seed: self.seed,
            dealer_draw_delay_ms: self.dealer_draw_delay_ms.unwrap_or(500),
        }
    }
}
