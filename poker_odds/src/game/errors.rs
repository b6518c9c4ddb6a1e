//! Error types for card handling, classification and estimation.

use thiserror::Error;

use super::{entities::Card, state_machine::Street};

/// Errors raised when caller input breaks a card-accounting precondition.
///
/// None of these are transient: the caller is expected to reject whatever
/// action produced the bad input instead of retrying it.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GameError {
    /// No card left to deal, or fewer cards left than the board still needs.
    #[error("deck exhausted")]
    DeckExhausted,

    /// A card is placed twice within one hand.
    #[error("duplicate card {0}")]
    DuplicateCard(Card),

    /// Classification needs at least five cards.
    #[error("need >= 5 cards to classify a hand, got {count}")]
    UnderspecifiedHand { count: usize },

    /// A card string that doesn't parse, or a value outside 2..=14.
    #[error("invalid card: {0}")]
    InvalidCard(String),

    #[error("need exactly 2 hole cards, got {0}")]
    InvalidHoleCards(usize),

    #[error("at most 5 community cards, got {0}")]
    TooManyCommunityCards(usize),

    /// Hole cards, board and deck must account for all 52 cards.
    #[error("cards account for {accounted} of 52")]
    DeckAccounting { accounted: usize },

    /// The river has been dealt; there's no next street.
    #[error("hand is complete")]
    HandComplete,

    #[error("can't deal the {requested} during the {current}")]
    OutOfOrderDeal { current: Street, requested: Street },

    /// A board must hold 0, 3, 4 or 5 cards.
    #[error("invalid board size {0}")]
    InvalidBoardSize(usize),

    #[error("slot {slot} out of bounds for {len} cards")]
    InvalidSlot { slot: usize, len: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for card and estimator operations
pub type GameResult<T> = Result<T, GameError>;
