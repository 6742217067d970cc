use crate::card::Card;
use crate::compute_optimal_hand;
use serde::Serialize;
use std::fmt::Display;

/// Cards held by a player or the dealer.
///
/// `hand_value` holds the hard total (every ace counted as 1) and, when an ace arrived while it
/// could still count as 11, a second soft total. The hand's value is picked from these two by
/// `compute_optimal_hand`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
    hand_value: Vec<u8>,
}

impl Hand {
    pub fn new() -> Self {
        Hand {
            cards: Vec::new(),
            hand_value: Vec::new(),
        }
    }

    pub fn receive_card(&mut self, card: Card) {
        let card_val = card.val();
        self.cards.push(card);
        if self.hand_value.is_empty() {
            self.hand_value.push(card_val);
        } else {
            self.hand_value[0] += card_val;
            if self.hand_value.len() == 2 {
                self.hand_value[1] += card_val;
            }
        }

        // Check if we need to add an alternative hand value
        if self.hand_value.len() == 1 && self.hand_value[0] <= 11 && card.is_ace() {
            let alternative_hand_val = self.hand_value[0] + 10;
            self.hand_value.push(alternative_hand_val);
        }
    }

    /// The best total of the hand: the soft total if it does not bust, otherwise the hard one.
    pub fn optimal_value(&self) -> u8 {
        compute_optimal_hand(&self.hand_value)
    }

    /// True if the hand's value counts an ace as 11.
    pub fn is_soft(&self) -> bool {
        self.hand_value.len() == 2 && self.hand_value[1] <= 21
    }

    pub fn busted(&self) -> bool {
        self.optimal_value() > 21
    }

    pub fn has_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.optimal_value() == 21
    }

    /// Hand value for display, `7/17` while a soft total is live.
    pub fn formatted_hand_values(&self) -> String {
        match self.hand_value.as_slice() {
            [] => "0".to_string(),
            [hard, soft] if *soft < 21 => format!("{}/{}", hard, soft),
            _ => format!("{}", self.optimal_value()),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.hand_value.clear();
    }
}

impl Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cards = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "{} ({})", cards, self.formatted_hand_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    fn hand_of(ranks: &[Rank]) -> Hand {
        let mut hand = Hand::new();
        for rank in ranks {
            hand.receive_card(Card::new(*rank, Suit::Spades));
        }
        hand
    }

    #[test]
    fn ace_counts_high_when_it_fits() {
        let hand = hand_of(&[Rank::Ace, Rank::Six]);
        assert_eq!(hand.optimal_value(), 17);
        assert!(hand.is_soft());
        assert_eq!(hand.formatted_hand_values(), "7/17");
    }

    #[test]
    fn ace_drops_to_one_instead_of_busting() {
        let hand = hand_of(&[Rank::Ace, Rank::Six, Rank::Nine]);
        assert_eq!(hand.optimal_value(), 16);
        assert!(!hand.is_soft());
        assert!(!hand.busted());
        assert_eq!(hand.formatted_hand_values(), "16");
    }

    #[test]
    fn multiple_aces_only_one_counts_high() {
        let hand = hand_of(&[Rank::Ace, Rank::Ace, Rank::Nine]);
        assert_eq!(hand.optimal_value(), 21);

        let hand = hand_of(&[Rank::Ace, Rank::Ace, Rank::Ace, Rank::Ace]);
        assert_eq!(hand.optimal_value(), 14);
    }

    #[test]
    fn late_ace_after_high_total_stays_hard() {
        let hand = hand_of(&[Rank::King, Rank::Five, Rank::Ace]);
        assert_eq!(hand.optimal_value(), 16);
        assert!(!hand.is_soft());
    }

    #[test]
    fn blackjack_requires_two_cards() {
        assert!(hand_of(&[Rank::Ace, Rank::Queen]).has_blackjack());
        assert!(!hand_of(&[Rank::Seven, Rank::Seven, Rank::Seven]).has_blackjack());
        assert_eq!(hand_of(&[Rank::Ace, Rank::Queen]).formatted_hand_values(), "21");
    }

    #[test]
    fn busts_over_twenty_one() {
        let hand = hand_of(&[Rank::King, Rank::Queen, Rank::Two]);
        assert!(hand.busted());
        assert_eq!(hand.optimal_value(), 22);
    }

    #[test]
    fn clear_empties_the_hand() {
        let mut hand = hand_of(&[Rank::Two, Rank::Three]);
        hand.clear();
        assert!(hand.is_empty());
        assert_eq!(hand.optimal_value(), 0);
        assert_eq!(hand.formatted_hand_values(), "0");
    }
}
