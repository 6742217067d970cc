use crate::card::{Card, Rank, Suit};
use crate::error::{BlackjackGameError, ErrorKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// A shoe of one or more decks. Cards are never removed from `cards`; dealing advances
/// `current_card_index`, and `reset` puts every card back.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    current_card_index: usize,
    cut_card: usize,
    stacked: bool,
    rng: StdRng,
    pub shuffle_flag: bool,
}

impl Deck {
    /// Creates `n_decks` standard 52 card decks in order. The deck starts flagged for a shuffle.
    pub fn new(n_decks: usize) -> Self {
        Self::build(Self::standard_cards(n_decks), StdRng::from_entropy())
    }

    /// Same as `Deck::new` but with a deterministic shuffle order.
    pub fn seeded(n_decks: usize, seed: u64) -> Self {
        Self::build(Self::standard_cards(n_decks), StdRng::seed_from_u64(seed))
    }

    /// A deck that deals `cards` in exactly the order given and never asks to be shuffled.
    pub fn stacked(cards: Vec<Card>) -> Self {
        Deck {
            cards,
            current_card_index: 0,
            cut_card: 0,
            stacked: true,
            rng: StdRng::seed_from_u64(0),
            shuffle_flag: false,
        }
    }

    /// Builds a deck from card asset names such as `ace_of_spades`, skipping duplicates.
    pub fn from_asset_names<I, S>(names: I) -> Result<Self, BlackjackGameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut cards = vec![];
        for name in names {
            let card = Card::from_asset_name(name.as_ref())?;
            if seen.insert(card) {
                cards.push(card);
            } else {
                log::debug!("skipping duplicate card {}", card.asset_name());
            }
        }

        if cards.is_empty() {
            return Err(BlackjackGameError::new(
                ErrorKind::InvalidCard,
                "a deck needs at least one card",
            ));
        }

        log::info!("deck filled with {} cards", cards.len());
        Ok(Self::build(cards, StdRng::from_entropy()))
    }

    fn build(cards: Vec<Card>, rng: StdRng) -> Self {
        let cut_card = cards.len() / 4;
        Deck {
            cards,
            current_card_index: 0,
            cut_card,
            stacked: false,
            rng,
            shuffle_flag: true,
        }
    }

    fn standard_cards(n_decks: usize) -> Vec<Card> {
        let mut cards = Vec::with_capacity(52 * n_decks);
        for _ in 0..n_decks {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    cards.push(Card::new(rank, suit));
                }
            }
        }
        cards
    }

    /// Puts every dealt card back into the deck without changing the order.
    pub fn reset(&mut self) {
        self.current_card_index = 0;
    }

    /// Fisher-Yates shuffle over the whole deck, dealt cards included. Resets the deal position.
    pub fn shuffle(&mut self) {
        let n = self.cards.len();
        for i in 0..n {
            let j = self.rng.gen_range(i..n);
            self.cards.swap(i, j);
        }
        self.current_card_index = 0;
        self.shuffle_flag = false;
        log::info!("deck shuffled");
    }

    /// Deals the next card, or `None` once the deck is exhausted.
    pub fn get_next_card(&mut self) -> Option<Card> {
        let card = match self.cards.get(self.current_card_index) {
            Some(c) => *c,
            None => {
                log::warn!("out of cards in the deck");
                return None;
            }
        };
        self.current_card_index += 1;

        // an emptied shoe always asks for a shuffle
        if self.remaining() < self.cut_card || (self.remaining() == 0 && !self.stacked) {
            self.shuffle_flag = true;
        }

        Some(card)
    }

    /// Places the cut card so a shuffle is requested once `fraction` of the deck has been dealt.
    /// Has no effect on a stacked deck.
    pub fn set_penetration(&mut self, fraction: f32) {
        if self.stacked {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        let dealt_before_cut = (self.cards.len() as f32 * fraction).round() as usize;
        self.cut_card = self.cards.len() - dealt_before_cut.min(self.cards.len());
    }

    pub fn is_stacked(&self) -> bool {
        self.stacked
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.current_card_index
    }

    pub fn dealt(&self) -> usize {
        self.current_card_index
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
