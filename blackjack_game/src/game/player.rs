use blackjack_lib::{Card, Hand, HandOutcome, Player};
use serde::Serialize;
use std::fmt::Display;

/// Where a seat is within the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeatStatus {
    /// Has not placed a bet this round.
    Waiting,
    /// Bet placed, waiting for the deal.
    Ready,
    /// Cards dealt, may still hit or stand.
    Playing,
    Stood,
    Busted,
    /// Dealt a natural, nothing left to decide.
    Blackjack,
    /// Cannot afford the minimum bet and sits out the rest of the session.
    Out,
}

/// A player's seat at the table: their name, chips, bet and cards.
#[derive(Debug, Clone, Serialize)]
pub struct Seat {
    pub name: String,
    pub balance: u64,
    pub bet: u32,
    pub hand: Hand,
    pub status: SeatStatus,
    pub last_outcome: Option<HandOutcome>,
}

impl Seat {
    /// Creates a seat, falling back to `Player N` when `name` is blank.
    pub fn new(name: &str, number: usize, starting_balance: u64) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            format!("Player {}", number)
        } else {
            name.to_string()
        };
        Seat {
            name,
            balance: starting_balance,
            bet: 0,
            hand: Hand::new(),
            status: SeatStatus::Waiting,
            last_outcome: None,
        }
    }

    /// True while the seat still has a decision to make this round.
    pub fn is_playing(&self) -> bool {
        self.status == SeatStatus::Playing
    }

    /// True if the seat has money on the table this round.
    pub fn has_bet(&self) -> bool {
        self.bet > 0
    }

    pub fn stand(&mut self) {
        self.status = SeatStatus::Stood;
    }

    /// Prepares the seat for the next round. Seats that cannot cover `min_bet` are marked `Out`.
    pub fn reset(&mut self, min_bet: u32) {
        self.clear_hand();
        self.bet = 0;
        self.last_outcome = None;
        self.status = if self.status == SeatStatus::Out || self.balance < u64::from(min_bet) {
            SeatStatus::Out
        } else {
            SeatStatus::Waiting
        };
    }
}

impl Player for Seat {
    fn name(&self) -> &str {
        &self.name
    }

    fn balance(&self) -> u64 {
        self.balance
    }

    fn current_bet(&self) -> u32 {
        self.bet
    }

    fn hand(&self) -> &Hand {
        &self.hand
    }

    fn receive_card(&mut self, card: Card) {
        self.hand.receive_card(card);
    }

    /// Assumes the bet was already validated against the balance.
    fn place_bet(&mut self, bet: u32) {
        self.balance -= u64::from(bet);
        self.bet = bet;
        self.status = SeatStatus::Ready;
    }

    fn collect(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
        self.bet = 0;
    }

    fn clear_hand(&mut self) {
        self.hand.clear();
    }
}

impl Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<21}{}\n\
                   {:<21}${}\n\
                   {:<21}${}\n\
                   {:<21}{}",
            "player:",
            self.name,
            "balance:",
            self.balance,
            "bet:",
            self.bet,
            "hand:",
            if self.hand.is_empty() {
                "-".to_string()
            } else {
                self.hand.to_string()
            },
        )
    }
}
