use crate::game::player::{Seat, SeatStatus};
use crate::GameConfig;
use blackjack_lib::{
    settle, BlackjackGameError, BlackjackTable, Card, Deck, ErrorKind, Hand, HandOutcome, Player,
};

/// The dealer's side of the game: the deck, the dealer's hand and the house rules.
pub struct Table {
    deck: Deck,
    pub dealers_hand: Hand,
    hole_card_revealed: bool,
    min_bet: u32,
    max_bet: Option<u32>,
    blackjack_payout: f64,
    soft_seventeen: bool,
    reshuffle_every_round: bool,
}

impl Table {
    pub fn new(config: &GameConfig, mut deck: Deck) -> Self {
        deck.set_penetration(config.penetration);
        Table {
            deck,
            dealers_hand: Hand::new(),
            hole_card_revealed: false,
            min_bet: config.min_bet,
            max_bet: config.max_bet,
            blackjack_payout: config.blackjack_payout,
            soft_seventeen: config.soft_seventeen,
            reshuffle_every_round: config.reshuffle_every_round,
        }
    }

    fn draw(&mut self) -> Result<Card, BlackjackGameError> {
        self.deck
            .get_next_card()
            .ok_or_else(BlackjackGameError::out_of_cards)
    }

    /// Getter method for the dealers face up card.
    pub fn dealers_face_up_card(&self) -> Option<Card> {
        self.dealers_hand.cards().first().copied()
    }

    pub fn dealer_has_blackjack(&self) -> bool {
        self.dealers_hand.has_blackjack()
    }

    pub fn hole_card_revealed(&self) -> bool {
        self.hole_card_revealed
    }

    pub fn reveal_hole_card(&mut self) {
        if !self.hole_card_revealed {
            self.hole_card_revealed = true;
            if let Some(card) = self.dealers_hand.cards().get(1) {
                log::debug!("dealer reveals {}", card);
            }
        }
    }

    /// The dealer's cards as the players see them, `None` for the face down hole card.
    pub fn visible_dealer_cards(&self) -> Vec<Option<Card>> {
        self.dealers_hand
            .cards()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == 1 && !self.hole_card_revealed {
                    None
                } else {
                    Some(*c)
                }
            })
            .collect()
    }

    /// Value of the dealer's cards that are face up.
    pub fn visible_dealer_value(&self) -> u8 {
        if self.hole_card_revealed {
            return self.dealers_hand.optimal_value();
        }
        let mut shown = Hand::new();
        if let Some(card) = self.dealers_face_up_card() {
            shown.receive_card(card);
        }
        shown.optimal_value()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn blackjack_payout(&self) -> f64 {
        self.blackjack_payout
    }

    fn dealer_should_draw(&self) -> bool {
        let value = self.dealers_hand.optimal_value();
        value < 17 || (value == 17 && self.soft_seventeen && self.dealers_hand.is_soft())
    }

    /// Makes the next deal reshuffle, used when a round is abandoned part way through the deck.
    /// Stacked decks are left alone.
    pub fn request_shuffle(&mut self) {
        if !self.deck.is_stacked() {
            self.deck.shuffle_flag = true;
        }
    }

    /// Method for reseting the table for another round, does not reshuffle the deck.
    pub fn reset(&mut self) {
        self.dealers_hand.clear();
        self.hole_card_revealed = false;
    }
}

impl BlackjackTable<Seat> for Table {
    /// Takes a seat and a bet and handles the logic for placing a bet before a hand is dealt
    fn place_bet(&self, player: &mut Seat, bet: u32) -> Result<(), BlackjackGameError> {
        match player.status {
            SeatStatus::Waiting => {}
            SeatStatus::Out => {
                return Err(BlackjackGameError::new(
                    ErrorKind::InsufficientFunds,
                    format!("{} cannot cover the minimum bet", player.name),
                ))
            }
            _ => {
                return Err(BlackjackGameError::invalid_bet(format!(
                    "{} has already placed a bet",
                    player.name
                )))
            }
        }

        if bet == 0 {
            return Err(BlackjackGameError::invalid_bet(
                "bet must be a positive amount",
            ));
        } else if bet < self.min_bet {
            return Err(BlackjackGameError::invalid_bet(format!(
                "bet must be at least {}",
                self.min_bet
            )));
        } else if self.max_bet.is_some_and(|max| bet > max) {
            return Err(BlackjackGameError::invalid_bet(format!(
                "bet must be at most {}",
                self.max_bet.unwrap_or(bet)
            )));
        } else if u64::from(bet) > player.balance() {
            return Err(BlackjackGameError::new(
                ErrorKind::InsufficientFunds,
                format!("invalid bet amount, bet should be between 1 and {}", player.balance()),
            ));
        }

        player.place_bet(bet);
        Ok(())
    }

    /// Deals two cards to each seat in `players` and two to the dealer, the second one face down.
    /// A stacked deck is dealt as is.
    fn deal_hand(&mut self, players: &mut [&mut Seat]) -> Result<(), BlackjackGameError> {
        if !self.deck.is_stacked() && (self.reshuffle_every_round || self.deck.shuffle_flag) {
            self.deck.reset();
            self.deck.shuffle();
        }

        for _ in 0..2 {
            for player in players.iter_mut() {
                let card = self.draw()?;
                log::debug!("{} is dealt {}", player.name, card);
                player.receive_card(card);
            }
            let card = self.draw()?;
            self.dealers_hand.receive_card(card);
        }

        for player in players.iter_mut() {
            player.status = if player.hand.has_blackjack() {
                SeatStatus::Blackjack
            } else {
                SeatStatus::Playing
            };
        }

        Ok(())
    }

    /// Deals a card to the seat. A bust or a total of 21 ends the seat's turn.
    fn hit(&mut self, player: &mut Seat) -> Result<Card, BlackjackGameError> {
        let card = self.draw()?;
        player.receive_card(card);
        if player.hand.busted() {
            player.status = SeatStatus::Busted;
        } else if player.hand.optimal_value() == 21 {
            player.stand();
        }
        Ok(card)
    }

    fn stand(&self, player: &mut Seat) {
        player.stand();
    }

    /// Reveals the hole card then draws until the dealer reaches 17 (or passes a soft 17 when the
    /// table hits soft seventeens).
    fn get_dealers_optimal_final_hand(&mut self) -> Result<u8, BlackjackGameError> {
        self.reveal_hole_card();
        while self.dealer_should_draw() {
            let card = self.draw()?;
            log::debug!("dealer draws {}", card);
            self.dealers_hand.receive_card(card);
        }
        Ok(self.dealers_hand.optimal_value())
    }

    /// Settles the seat's hand against the dealer and credits the payout to its balance.
    fn finish_hand(&mut self, player: &mut Seat) -> HandOutcome {
        let outcome = settle(&player.hand, &self.dealers_hand);
        let payout = outcome.payout(player.bet, self.blackjack_payout);
        player.collect(payout);
        player.last_outcome = Some(outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_lib::{Rank, Suit};

    fn card(rank: Rank) -> Card {
        Card::new(rank, Suit::Hearts)
    }

    fn fixed_config() -> GameConfig {
        GameConfig::new()
            .reshuffle_every_round(false)
            .min_bet(5)
            .max_bet(500)
            .build()
    }

    #[test]
    fn rejects_invalid_bets() {
        let table = Table::new(&fixed_config(), Deck::stacked(vec![]));
        let mut seat = Seat::new("Ada", 1, 100);

        let err = table.place_bet(&mut seat, 0).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidBet);
        assert!(table.place_bet(&mut seat, 4).is_err());
        assert!(table.place_bet(&mut seat, 501).is_err());
        let err = table.place_bet(&mut seat, 101).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InsufficientFunds);
        assert_eq!(seat.balance, 100);

        table.place_bet(&mut seat, 100).unwrap();
        assert_eq!(seat.balance, 0);
        assert!(table.place_bet(&mut seat, 5).is_err());
    }

    #[test]
    fn deals_in_rounds_and_hides_hole_card() {
        let deck = Deck::stacked(vec![
            card(Rank::Two),
            card(Rank::Three),
            card(Rank::Four),
            card(Rank::Five),
            card(Rank::Six),
            card(Rank::Seven),
        ]);
        let mut table = Table::new(&fixed_config(), deck);
        let mut a = Seat::new("Ada", 1, 100);
        let mut b = Seat::new("Bob", 2, 100);
        table.place_bet(&mut a, 10).unwrap();
        table.place_bet(&mut b, 10).unwrap();
        table.deal_hand(&mut [&mut a, &mut b]).unwrap();

        assert_eq!(a.hand.cards(), &[card(Rank::Two), card(Rank::Five)]);
        assert_eq!(b.hand.cards(), &[card(Rank::Three), card(Rank::Six)]);
        assert_eq!(table.dealers_face_up_card(), Some(card(Rank::Four)));
        assert_eq!(
            table.visible_dealer_cards(),
            vec![Some(card(Rank::Four)), None]
        );
        assert_eq!(table.visible_dealer_value(), 4);
        assert_eq!(a.status, SeatStatus::Playing);

        table.reveal_hole_card();
        assert_eq!(table.visible_dealer_value(), 11);
    }

    #[test]
    fn dealer_stands_on_soft_seventeen_unless_configured() {
        let cards = vec![card(Rank::Ace), card(Rank::Six), card(Rank::Four)];

        let mut table = Table::new(&fixed_config(), Deck::stacked(cards.clone()));
        table.dealers_hand.receive_card(cards[0]);
        table.dealers_hand.receive_card(cards[1]);
        assert_eq!(table.get_dealers_optimal_final_hand().unwrap(), 17);

        let config = GameConfig::new()
            .reshuffle_every_round(false)
            .soft_seventeen(true)
            .build();
        let mut table = Table::new(&config, Deck::stacked(vec![card(Rank::Four)]));
        table.dealers_hand.receive_card(cards[0]);
        table.dealers_hand.receive_card(cards[1]);
        assert_eq!(table.get_dealers_optimal_final_hand().unwrap(), 21);
    }

    #[test]
    fn stacked_deck_is_not_reshuffled_between_rounds() {
        let deck = Deck::stacked(vec![
            card(Rank::Ten),
            card(Rank::Six),
            card(Rank::Nine),
            card(Rank::Five),
        ]);
        let mut table = Table::new(&GameConfig::default(), deck);
        let mut seat = Seat::new("Ada", 1, 100);
        table.place_bet(&mut seat, 10).unwrap();
        table.deal_hand(&mut [&mut seat]).unwrap();
        assert_eq!(seat.hand.cards(), &[card(Rank::Ten), card(Rank::Nine)]);
        assert_eq!(table.dealers_hand.cards(), &[card(Rank::Six), card(Rank::Five)]);

        table.request_shuffle();
        assert!(!table.deck().shuffle_flag);
    }

    #[test]
    fn request_shuffle_flags_a_shoe() {
        let mut table = Table::new(&fixed_config(), Deck::seeded(1, 5));
        table.deck.shuffle();
        assert!(!table.deck().shuffle_flag);
        table.request_shuffle();
        assert!(table.deck().shuffle_flag);
    }

    #[test]
    fn running_out_of_cards_is_an_error() {
        let mut table = Table::new(&fixed_config(), Deck::stacked(vec![card(Rank::Two)]));
        let mut seat = Seat::new("Ada", 1, 100);
        table.place_bet(&mut seat, 10).unwrap();
        let err = table.deal_hand(&mut [&mut seat]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::OutOfCards);
    }

    #[test]
    fn hitting_to_21_ends_the_turn() {
        let mut table = Table::new(&fixed_config(), Deck::stacked(vec![card(Rank::Nine)]));
        let mut seat = Seat::new("Ada", 1, 100);
        seat.receive_card(card(Rank::King));
        seat.receive_card(card(Rank::Two));
        seat.status = SeatStatus::Playing;
        table.hit(&mut seat).unwrap();
        assert_eq!(seat.status, SeatStatus::Stood);
    }

    #[test]
    fn finish_hand_pays_out() {
        let mut table = Table::new(&fixed_config(), Deck::stacked(vec![]));
        table.dealers_hand.receive_card(card(Rank::King));
        table.dealers_hand.receive_card(card(Rank::Eight));

        let mut seat = Seat::new("Ada", 1, 100);
        table.place_bet(&mut seat, 20).unwrap();
        seat.receive_card(card(Rank::Ace));
        seat.receive_card(card(Rank::Queen));
        assert_eq!(table.finish_hand(&mut seat), HandOutcome::Blackjack);
        assert_eq!(seat.balance, 130);
        assert_eq!(seat.last_outcome, Some(HandOutcome::Blackjack));
    }
}
