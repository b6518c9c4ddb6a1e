//! Hand classification.
//!
//! Classification looks at the whole card set at once rather than picking
//! the best five cards, so it only reports a category, never kickers.

use serde::{Deserialize, Serialize};

use super::{
    entities::{ACE, Card, HandCategory, Value},
    errors::{GameError, GameResult},
};

/// Fewest cards [`classify`] accepts.
pub const MIN_CLASSIFY_CARDS: usize = 5;

/// How a straight flush is recognised in 6 and 7 card sets.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StraightFlushRule {
    /// Any flush together with any straight is a straight flush, even when
    /// the two are made from different cards.
    #[default]
    AnySuit,
    /// The straight has to be made from cards of the flush suit.
    SameSuit,
}

/// Classify at least five cards using [`StraightFlushRule::AnySuit`].
///
/// # Errors
///
/// [`GameError::UnderspecifiedHand`] for fewer than five cards and
/// [`GameError::InvalidCard`] for values outside 2..=14.
///
/// # Examples
///
/// ```
/// use poker_odds::game::{
///     entities::{Card, HandCategory, Suit},
///     functional::classify,
/// };
///
/// let wheel = [
///     Card(14, Suit::Spade),
///     Card(2, Suit::Spade),
///     Card(3, Suit::Spade),
///     Card(4, Suit::Spade),
///     Card(5, Suit::Spade),
/// ];
/// assert_eq!(classify(&wheel), Ok(HandCategory::StraightFlush));
/// ```
pub fn classify(cards: &[Card]) -> GameResult<HandCategory> {
    classify_with(cards, StraightFlushRule::AnySuit)
}

/// Classify at least five cards under the given straight flush rule.
pub fn classify_with(cards: &[Card], rule: StraightFlushRule) -> GameResult<HandCategory> {
    if cards.len() < MIN_CLASSIFY_CARDS {
        return Err(GameError::UnderspecifiedHand { count: cards.len() });
    }
    validate_values(cards)?;
    Ok(categorize(cards, rule))
}

/// The category the cards already make, for any number of cards.
///
/// Below five cards no straight or flush can exist, so the result only
/// reflects pairs, trips and quads. Used for the "current hand" before the
/// flop, where [`classify`] refuses to answer.
pub fn classify_made_hand(cards: &[Card], rule: StraightFlushRule) -> GameResult<HandCategory> {
    validate_values(cards)?;
    Ok(categorize(cards, rule))
}

fn validate_values(cards: &[Card]) -> GameResult<()> {
    match cards.iter().find(|card| !card.is_valid()) {
        Some(card) => Err(GameError::InvalidCard(format!("{card:?}"))),
        None => Ok(()),
    }
}

/// Rule chain shared by every entry point. Callers guarantee card values
/// are in range.
pub(crate) fn categorize(cards: &[Card], rule: StraightFlushRule) -> HandCategory {
    let mut value_counts = [0u8; ACE as usize + 1];
    let mut suit_counts = [0u8; 4];
    for card in cards {
        value_counts[card.0 as usize] += 1;
        suit_counts[card.1.index()] += 1;
    }

    let has_flush = suit_counts.iter().any(|&count| count >= 5);
    let has_straight = is_straight(value_mask(cards));
    let has_straight_flush = match rule {
        StraightFlushRule::AnySuit => has_flush && has_straight,
        StraightFlushRule::SameSuit => suit_counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count >= 5)
            .any(|(suit, _)| {
                is_straight(value_mask(
                    cards.iter().filter(|card| card.1.index() == suit),
                ))
            }),
    };

    let count_of = |n: u8| value_counts.iter().filter(|&&count| count == n).count();
    let pairs = count_of(2);
    let threes = count_of(3);
    let fours = count_of(4);

    if has_straight_flush {
        HandCategory::StraightFlush
    } else if fours >= 1 {
        HandCategory::FourOfAKind
    } else if threes >= 1 && pairs >= 1 {
        HandCategory::FullHouse
    } else if has_flush {
        HandCategory::Flush
    } else if has_straight {
        HandCategory::Straight
    } else if threes >= 1 {
        HandCategory::ThreeOfAKind
    } else if pairs == 2 {
        HandCategory::TwoPair
    } else if pairs == 1 {
        HandCategory::OnePair
    } else {
        HandCategory::HighCard
    }
}

/// Bit `v` is set when a card of value `v` is present. Aces also set bit 1
/// so the wheel is an ordinary five-bit window.
fn value_mask<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u16 {
    cards.into_iter().fold(0u16, |mask, card| {
        let mask = mask | 1 << card.0;
        if card.0 == ACE { mask | 1 << 1 } else { mask }
    })
}

fn is_straight(mask: u16) -> bool {
    (5..=ACE).any(|high: Value| {
        let window = 0b1_1111u16 << (high - 4);
        mask & window == window
    })
}
