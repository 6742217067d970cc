//! Module that drives a round of blackjack for a handful of seats: betting, the deal, each seat's
//! turn, the dealer's turn and settlement.

pub mod player;
pub mod table;
pub mod prelude {
    pub use super::{BlackjackGame, GameSnapshot, Phase, RoundResult, SeatResult};
    pub use crate::game::player::{Seat, SeatStatus};
    pub use crate::game::table::Table;
    pub use blackjack_lib::{BlackjackGameError, BlackjackTable, Card, Deck, HandOutcome, Player};
}

pub use prelude::*;

use crate::{GameConfig, SessionSummary};
use blackjack_lib::{ErrorKind, Hand};
use serde::Serialize;
use std::fmt::Display;

/// The most seats a single table supports.
pub const MAX_SEATS: usize = 7;

/// Where the game currently is within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Betting,
    /// Waiting on the seat at this index to hit or stand.
    PlayerTurn(usize),
    DealerTurn,
    RoundOver,
    /// Every seat is out of chips.
    GameOver,
}

/// Settlement of one seat at the end of a round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatResult {
    pub seat: usize,
    pub name: String,
    pub bet: u32,
    pub outcome: HandOutcome,
    pub payout: u64,
    pub balance: u64,
    pub hand_value: u8,
}

/// Everything that happened when a round was settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundResult {
    pub round: u32,
    pub dealer_cards: Vec<Card>,
    pub dealer_value: u8,
    pub dealer_blackjack: bool,
    pub seats: Vec<SeatResult>,
}

impl Display for RoundResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dealer = if self.dealer_value > 21 {
            "dealer busts".to_string()
        } else {
            format!("dealer has {}", self.dealer_value)
        };
        let seats = self
            .seats
            .iter()
            .map(|s| format!("{} {}", s.name, s.outcome))
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "Round {}: {}. {}", self.round, dealer, seats)
    }
}

/// A serializable view of the table as the players see it. The hole card stays hidden until the
/// dealer reveals it.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub round: u32,
    pub phase: Phase,
    pub status: String,
    pub dealer_cards: Vec<Option<Card>>,
    pub dealer_value: u8,
    pub seats: Vec<Seat>,
    pub cards_remaining: usize,
    pub last_result: Option<RoundResult>,
}

/// Struct that drives a game of blackjack: owns the table, the seats and the round state, and
/// accumulates per seat statistics across rounds.
pub struct BlackjackGame {
    config: GameConfig,
    table: Table,
    seats: Vec<Seat>,
    phase: Phase,
    round: u32,
    stats: Vec<SessionSummary>,
    last_result: Option<RoundResult>,
}

impl BlackjackGame {
    /// Creates a game with one seat per entry of `names`, blank names become `Player N`.
    /// The deck is seeded from `config.seed` when one is given.
    pub fn new<S: AsRef<str>>(config: GameConfig, names: &[S]) -> Result<Self, BlackjackGameError> {
        let deck = match config.seed {
            Some(seed) => Deck::seeded(config.num_decks, seed),
            None => Deck::new(config.num_decks),
        };
        Self::with_deck(config, names, deck)
    }

    /// Creates a game that deals from `deck`.
    pub fn with_deck<S: AsRef<str>>(
        config: GameConfig,
        names: &[S],
        deck: Deck,
    ) -> Result<Self, BlackjackGameError> {
        config.validate()?;
        if names.is_empty() || names.len() > MAX_SEATS {
            return Err(BlackjackGameError::new(
                ErrorKind::InvalidPlayer,
                format!("a table seats between 1 and {} players", MAX_SEATS),
            ));
        }

        let seats = names
            .iter()
            .enumerate()
            .map(|(i, name)| Seat::new(name.as_ref(), i + 1, config.starting_balance))
            .collect::<Vec<Seat>>();
        let stats = seats
            .iter()
            .map(|s| SessionSummary::new(s.name.clone(), s.balance))
            .collect();
        let table = Table::new(&config, deck);

        log::info!(
            "new game with {} seat(s): {}",
            seats.len(),
            seats
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<&str>>()
                .join(", ")
        );

        Ok(BlackjackGame {
            config,
            table,
            seats,
            phase: Phase::Betting,
            round: 1,
            stats,
            last_result: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, seat: usize) -> Result<&Seat, BlackjackGameError> {
        self.seats.get(seat).ok_or_else(|| Self::no_such_seat(seat))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn stats(&self) -> &[SessionSummary] {
        &self.stats
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    /// The seat whose turn it is, if any.
    pub fn current_seat(&self) -> Option<usize> {
        match self.phase {
            Phase::PlayerTurn(i) => Some(i),
            _ => None,
        }
    }

    /// Seats that still need to bet before the cards are dealt.
    pub fn seats_awaiting_bet(&self) -> Vec<usize> {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.status == SeatStatus::Waiting)
            .map(|(i, _)| i)
            .collect()
    }

    /// Places `amount` for `seat`. Once every seat still in the game has bet, the cards are dealt.
    pub fn place_bet(&mut self, seat: usize, amount: u32) -> Result<(), BlackjackGameError> {
        self.expect_phase(Phase::Betting, "bets can only be placed before the deal")?;
        let player = self
            .seats
            .get_mut(seat)
            .ok_or_else(|| Self::no_such_seat(seat))?;

        if let Err(e) = self.table.place_bet(player, amount) {
            log::warn!("{}: {}", player.name, e);
            return Err(e);
        }
        log::info!("{} placed a bet of ${}", player.name, amount);

        if self.seats_awaiting_bet().is_empty() {
            self.deal()?;
        }
        Ok(())
    }

    /// Deals one more card to `seat`. Busting or reaching 21 ends that seat's turn.
    pub fn hit(&mut self, seat: usize) -> Result<Card, BlackjackGameError> {
        self.expect_turn(seat)?;
        let result = self.table.hit(&mut self.seats[seat]);
        let card = match result {
            Ok(card) => card,
            Err(e) => return Err(self.void_round(e)),
        };

        let player = &self.seats[seat];
        log::info!(
            "{} hits and receives {} ({})",
            player.name,
            card,
            player.hand.formatted_hand_values()
        );
        if !player.is_playing() {
            self.advance_turn()?;
        }
        Ok(card)
    }

    /// Ends `seat`'s turn.
    pub fn stand(&mut self, seat: usize) -> Result<(), BlackjackGameError> {
        self.expect_turn(seat)?;
        self.table.stand(&mut self.seats[seat]);
        log::info!("{} stands on {}", self.seats[seat].name, self.seats[seat].hand.optimal_value());
        self.advance_turn()
    }

    /// Clears the table for the next round. Seats that cannot cover the minimum bet sit out, and
    /// the game is over once nobody can.
    pub fn reset_round(&mut self) -> Result<(), BlackjackGameError> {
        self.expect_phase(Phase::RoundOver, "the round has not finished yet")?;

        self.table.reset();
        for seat in self.seats.iter_mut() {
            seat.reset(self.config.min_bet);
            if seat.status == SeatStatus::Out {
                log::info!("{} is out of chips", seat.name);
            }
        }
        self.round += 1;

        if self.seats.iter().all(|s| s.status == SeatStatus::Out) {
            log::info!("every player is out of chips, game over");
            self.phase = Phase::GameOver;
        } else {
            self.phase = Phase::Betting;
        }
        Ok(())
    }

    /// Short description of what the game is waiting for.
    pub fn status_text(&self) -> String {
        match self.phase {
            Phase::Betting => match self.seats_awaiting_bet().first() {
                Some(i) => format!("Place your bets: {}'s bet", self.seats[*i].name),
                None => "Place your bets".to_string(),
            },
            Phase::PlayerTurn(i) => format!("{}'s Turn", self.seats[i].name),
            Phase::DealerTurn => "Dealer's Turn...".to_string(),
            Phase::RoundOver => match &self.last_result {
                Some(result) => result.to_string(),
                None => "Round over".to_string(),
            },
            Phase::GameOver => "Game over, every player is out of chips".to_string(),
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            round: self.round,
            phase: self.phase,
            status: self.status_text(),
            dealer_cards: self.table.visible_dealer_cards(),
            dealer_value: self.table.visible_dealer_value(),
            seats: self.seats.clone(),
            cards_remaining: self.table.deck().remaining(),
            last_result: self.last_result.clone(),
        }
    }

    fn deal(&mut self) -> Result<(), BlackjackGameError> {
        log::info!("dealing round {}", self.round);
        let dealt = {
            let mut betting = self
                .seats
                .iter_mut()
                .filter(|s| s.has_bet())
                .collect::<Vec<&mut Seat>>();
            self.table.deal_hand(&mut betting)
        };
        if let Err(e) = dealt {
            return Err(self.void_round(e));
        }

        for seat in self.seats.iter().filter(|s| s.status == SeatStatus::Blackjack) {
            log::info!("{} has blackjack", seat.name);
        }

        if self.config.dealer_peek && self.table.dealer_has_blackjack() {
            log::info!("dealer has blackjack");
            for seat in self.seats.iter_mut().filter(|s| s.is_playing()) {
                seat.stand();
            }
            return self.finish_round();
        }

        self.phase = Phase::PlayerTurn(0);
        self.advance_turn()
    }

    /// Moves the turn to the next seat that still has a decision to make, or to the dealer.
    fn advance_turn(&mut self) -> Result<(), BlackjackGameError> {
        let start = match self.phase {
            Phase::PlayerTurn(i) => i,
            _ => 0,
        };
        match (start..self.seats.len()).find(|i| self.seats[*i].is_playing()) {
            Some(next) => {
                self.phase = Phase::PlayerTurn(next);
                log::debug!("{}'s turn", self.seats[next].name);
                Ok(())
            }
            None => self.finish_round(),
        }
    }

    /// Plays the dealer's hand then settles every seat with a bet.
    fn finish_round(&mut self) -> Result<(), BlackjackGameError> {
        self.phase = Phase::DealerTurn;

        let anyone_standing = self
            .seats
            .iter()
            .any(|s| s.has_bet() && !s.hand.busted());
        let dealer_value = if anyone_standing {
            match self.table.get_dealers_optimal_final_hand() {
                Ok(v) => v,
                Err(e) => return Err(self.void_round(e)),
            }
        } else {
            self.table.reveal_hole_card();
            self.table.dealers_hand.optimal_value()
        };

        let mut results = vec![];
        for (i, seat) in self.seats.iter_mut().enumerate() {
            if !seat.has_bet() {
                continue;
            }
            let bet = seat.bet;
            let outcome = self.table.finish_hand(seat);
            let payout = outcome.payout(bet, self.table.blackjack_payout());
            log::info!("{} {} (bet ${}, paid ${})", seat.name, outcome, bet, payout);
            self.stats[i].record(outcome, bet, payout, seat.balance);
            results.push(SeatResult {
                seat: i,
                name: seat.name.clone(),
                bet,
                outcome,
                payout,
                balance: seat.balance,
                hand_value: seat.hand.optimal_value(),
            });
        }

        let result = RoundResult {
            round: self.round,
            dealer_cards: self.table.dealers_hand.cards().to_vec(),
            dealer_value,
            dealer_blackjack: self.table.dealer_has_blackjack(),
            seats: results,
        };
        log::info!("{}", result);
        self.last_result = Some(result);
        self.phase = Phase::RoundOver;
        Ok(())
    }

    /// Called when the deck runs dry mid-round: every bet is returned, the deck is flagged for a
    /// shuffle and the round starts over.
    fn void_round(&mut self, err: BlackjackGameError) -> BlackjackGameError {
        log::warn!("round {} voided: {}", self.round, err);
        for seat in self.seats.iter_mut() {
            let bet = seat.bet;
            seat.collect(u64::from(bet));
            seat.reset(self.config.min_bet);
        }
        self.table.reset();
        self.table.request_shuffle();
        self.phase = Phase::Betting;
        err
    }

    fn expect_phase(&self, phase: Phase, message: &str) -> Result<(), BlackjackGameError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(BlackjackGameError::invalid_phase(message))
        }
    }

    fn expect_turn(&self, seat: usize) -> Result<(), BlackjackGameError> {
        if seat >= self.seats.len() {
            return Err(Self::no_such_seat(seat));
        }
        match self.phase {
            Phase::PlayerTurn(i) if i == seat => Ok(()),
            Phase::PlayerTurn(i) => Err(BlackjackGameError::new(
                ErrorKind::OutOfTurn,
                format!("it is {}'s turn", self.seats[i].name),
            )),
            _ => Err(BlackjackGameError::invalid_phase(
                "no player can act right now",
            )),
        }
    }

    fn no_such_seat(seat: usize) -> BlackjackGameError {
        BlackjackGameError::new(ErrorKind::InvalidPlayer, format!("no player at seat {}", seat))
    }

    /// The dealer's full hand, hole card included.
    pub fn dealers_hand(&self) -> &Hand {
        &self.table.dealers_hand
    }
}
