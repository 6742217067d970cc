//! Core blackjack types: cards, the deck, hand scoring and the traits a table and its players
//! implement.

pub mod card;
pub mod deck;
pub mod error;
pub mod hand;

pub use card::{Card, Rank, Suit};
pub use deck::Deck;
pub use error::{BlackjackGameError, ErrorKind};
pub use hand::Hand;

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Picks the best value out of a hand's hard and soft totals.
/// If both totals are 21 or under the larger wins, otherwise the smaller is returned.
pub fn compute_optimal_hand(hand_values: &[u8]) -> u8 {
    match hand_values {
        [] => 0,
        [value] => *value,
        [hard, soft, ..] => {
            if *hard <= 21 && *soft <= 21 {
                u8::max(*hard, *soft)
            } else {
                u8::min(*hard, *soft)
            }
        }
    }
}

/// How a single player's hand ended against the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    Win,
    Blackjack,
    Push,
    Loss,
}

impl HandOutcome {
    /// The amount returned to the player's balance, the original stake included.
    /// `blackjack_payout` is the ratio a natural pays, e.g. 1.5 for 3:2; fractions are rounded down.
    /// Balances are `u64` so any `u32` bet pays out without overflow.
    pub fn payout(&self, bet: u32, blackjack_payout: f64) -> u64 {
        let bet = u64::from(bet);
        match self {
            HandOutcome::Win => bet * 2,
            HandOutcome::Blackjack => {
                bet.saturating_add((bet as f64 * blackjack_payout).floor() as u64)
            }
            HandOutcome::Push => bet,
            HandOutcome::Loss => 0,
        }
    }
}

impl Display for HandOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandOutcome::Win => "wins",
            HandOutcome::Blackjack => "wins with blackjack",
            HandOutcome::Push => "pushes",
            HandOutcome::Loss => "loses",
        };
        write!(f, "{}", s)
    }
}

/// Settles a finished player hand against the dealer's final hand.
pub fn settle(player: &Hand, dealer: &Hand) -> HandOutcome {
    if player.busted() {
        return HandOutcome::Loss;
    }
    match (player.has_blackjack(), dealer.has_blackjack()) {
        (true, true) => return HandOutcome::Push,
        (true, false) => return HandOutcome::Blackjack,
        (false, true) => return HandOutcome::Loss,
        (false, false) => {}
    }
    if dealer.busted() {
        return HandOutcome::Win;
    }
    let (player_total, dealer_total) = (player.optimal_value(), dealer.optimal_value());
    if player_total > dealer_total {
        HandOutcome::Win
    } else if player_total == dealer_total {
        HandOutcome::Push
    } else {
        HandOutcome::Loss
    }
}

/// A participant seated at a `BlackjackTable`.
pub trait Player {
    fn name(&self) -> &str;

    fn balance(&self) -> u64;

    fn current_bet(&self) -> u32;

    fn hand(&self) -> &Hand;

    fn receive_card(&mut self, card: Card);

    /// Moves `bet` from the balance onto the table. Validation is the table's job.
    fn place_bet(&mut self, bet: u32);

    /// Credits `amount` to the balance and clears the bet.
    fn collect(&mut self, amount: u64);

    fn clear_hand(&mut self);
}

/// The dealer side of a blackjack game: owns the deck and the dealer's hand.
pub trait BlackjackTable<P: Player> {
    /// Validates `bet` for `player` and moves it onto the table.
    fn place_bet(&self, player: &mut P, bet: u32) -> Result<(), BlackjackGameError>;

    /// Deals the opening two cards to every player in `players` and to the dealer.
    fn deal_hand(&mut self, players: &mut [&mut P]) -> Result<(), BlackjackGameError>;

    /// Deals one more card to `player` and returns it.
    fn hit(&mut self, player: &mut P) -> Result<Card, BlackjackGameError>;

    fn stand(&self, player: &mut P);

    /// Reveals the hole card and plays out the dealer's hand, returning its final value.
    fn get_dealers_optimal_final_hand(&mut self) -> Result<u8, BlackjackGameError>;

    /// Settles `player`'s hand against the dealer and pays out.
    fn finish_hand(&mut self, player: &mut P) -> HandOutcome;
}
