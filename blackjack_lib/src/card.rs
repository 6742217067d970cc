use crate::error::{BlackjackGameError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    fn symbol(&self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    fn asset_name(&self) -> &'static str {
        match self {
            Suit::Clubs => "clubs",
            Suit::Diamonds => "diamonds",
            Suit::Hearts => "hearts",
            Suit::Spades => "spades",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Blackjack value of the rank, aces count as 1 and the hand decides whether to promote them.
    pub fn val(&self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 1,
        }
    }

    fn short_name(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    fn asset_name(&self) -> &'static str {
        match self {
            Rank::Jack => "jack",
            Rank::Queen => "queen",
            Rank::King => "king",
            Rank::Ace => "ace",
            other => other.short_name(),
        }
    }
}

/// A single playing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    pub fn val(&self) -> u8 {
        self.rank.val()
    }

    pub fn is_ace(&self) -> bool {
        self.rank == Rank::Ace
    }

    /// The name a card image asset carries, e.g. `ace_of_spades` or `10_of_hearts`.
    pub fn asset_name(&self) -> String {
        format!("{}_of_{}", self.rank.asset_name(), self.suit.asset_name())
    }

    /// Parses an asset name such as `queen_of_hearts` or `7_of_clubs`.
    /// Matching is case-insensitive; trailing variants such as `jack_of_spades2` are accepted.
    pub fn from_asset_name(name: &str) -> Result<Card, BlackjackGameError> {
        let lowered = name.trim().to_lowercase();
        let invalid = || {
            BlackjackGameError::new(
                ErrorKind::InvalidCard,
                format!("could not determine card from name: {name}"),
            )
        };

        let (rank_part, rest) = lowered.split_once('_').ok_or_else(invalid)?;
        let suit_part = rest.rsplit('_').next().ok_or_else(invalid)?;
        let suit_part = suit_part.trim_end_matches(|c: char| c.is_ascii_digit());

        let rank = match rank_part {
            "ace" | "a" | "1" => Rank::Ace,
            "king" | "k" => Rank::King,
            "queen" | "q" => Rank::Queen,
            "jack" | "j" => Rank::Jack,
            n => match n.parse::<u8>() {
                Ok(v @ 2..=10) => Rank::ALL[(v - 2) as usize],
                _ => return Err(invalid()),
            },
        };
        let suit = match suit_part {
            "clubs" => Suit::Clubs,
            "diamonds" => Suit::Diamonds,
            "hearts" => Suit::Hearts,
            "spades" => Suit::Spades,
            _ => return Err(invalid()),
        };

        Ok(Card::new(rank, suit))
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.short_name(), self.suit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_cards_are_worth_ten() {
        for rank in [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King] {
            assert_eq!(Card::new(rank, Suit::Hearts).val(), 10);
        }
        assert_eq!(Card::new(Rank::Ace, Suit::Hearts).val(), 1);
        assert_eq!(Card::new(Rank::Seven, Suit::Hearts).val(), 7);
    }

    #[test]
    fn parses_asset_names() {
        assert_eq!(
            Card::from_asset_name("ace_of_spades").unwrap(),
            Card::new(Rank::Ace, Suit::Spades)
        );
        assert_eq!(
            Card::from_asset_name("10_of_Hearts").unwrap(),
            Card::new(Rank::Ten, Suit::Hearts)
        );
        assert_eq!(
            Card::from_asset_name("king_of_clubs2").unwrap(),
            Card::new(Rank::King, Suit::Clubs)
        );
        assert_eq!(
            Card::new(Rank::Queen, Suit::Diamonds).asset_name(),
            "queen_of_diamonds"
        );
    }

    #[test]
    fn rejects_unknown_asset_names() {
        let err = Card::from_asset_name("joker").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCard);
        assert!(Card::from_asset_name("11_of_spades").is_err());
        assert!(Card::from_asset_name("ace_of_swords").is_err());
    }

    #[test]
    fn displays_short_form() {
        assert_eq!(Card::new(Rank::Ace, Suit::Spades).to_string(), "A♠");
        assert_eq!(Card::new(Rank::Ten, Suit::Hearts).to_string(), "10♥");
    }
}
