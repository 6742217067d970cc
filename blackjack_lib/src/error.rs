use std::error::Error;
use std::fmt::Display;

/// Broad category of a `BlackjackGameError`, useful for callers that need to react differently
/// to a rejected bet than to an exhausted deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidBet,
    InsufficientFunds,
    InvalidPlayer,
    OutOfTurn,
    InvalidPhase,
    OutOfCards,
    InvalidCard,
    Config,
}

/// The error type returned by every fallible operation of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackjackGameError {
    pub kind: ErrorKind,
    pub message: String,
}

impl BlackjackGameError {
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        BlackjackGameError {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_bet<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::InvalidBet, message)
    }

    pub fn invalid_phase<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::InvalidPhase, message)
    }

    pub fn out_of_cards() -> Self {
        Self::new(ErrorKind::OutOfCards, "out of cards in the deck")
    }
}

impl Display for BlackjackGameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for BlackjackGameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_message_only() {
        let err = BlackjackGameError::invalid_bet("bet must be a positive amount");
        assert_eq!(err.to_string(), "bet must be a positive amount");
        assert_eq!(err.kind, ErrorKind::InvalidBet);
    }
}
