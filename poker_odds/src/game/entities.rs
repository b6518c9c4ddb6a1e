use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};

use super::errors::{GameError, GameResult};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Heart,
    Diamond,
    Club,
    Spade,
}

impl Suit {
    /// Suits in canonical deck order.
    pub const ALL: [Self; 4] = [Self::Heart, Self::Diamond, Self::Club, Self::Spade];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

pub const LOWEST_VALUE: Value = 2;
pub const ACE: Value = 14;

/// A card is a tuple of a uInt8 value (two=2u8 ... ace=14u8) and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (LOWEST_VALUE..=ACE).contains(&self.0)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            14 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        write!(f, "{value}{}", self.1)
    }
}

/// Parses the short form used at the command line: `As`, `10h`, `Th`, `Kd`.
impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let suit = match chars.next_back() {
            Some('h' | 'H' | '♥') => Suit::Heart,
            Some('d' | 'D' | '♦') => Suit::Diamond,
            Some('c' | 'C' | '♣') => Suit::Club,
            Some('s' | 'S' | '♠') => Suit::Spade,
            _ => return Err(GameError::InvalidCard(s.to_string())),
        };
        let value = match chars.as_str().to_ascii_uppercase().as_str() {
            "A" => ACE,
            "K" => 13,
            "Q" => 12,
            "J" => 11,
            "T" | "10" => 10,
            v => v
                .parse::<Value>()
                .ok()
                .filter(|v| (LOWEST_VALUE..=9).contains(v))
                .ok_or_else(|| GameError::InvalidCard(s.to_string()))?,
        };
        Ok(Self(value, suit))
    }
}

/// Parse a comma or whitespace separated list of cards.
pub fn parse_cards(s: &str) -> GameResult<Vec<Card>> {
    s.split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

/// Poker hand categories, weakest first.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl HandCategory {
    pub const COUNT: usize = 10;

    pub const ALL: [Self; Self::COUNT] = [
        Self::HighCard,
        Self::OnePair,
        Self::TwoPair,
        Self::ThreeOfAKind,
        Self::Straight,
        Self::Flush,
        Self::FullHouse,
        Self::FourOfAKind,
        Self::StraightFlush,
        Self::RoyalFlush,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Ordinal strength score out of [`HandCategory::MAX_SCORE`].
    ///
    /// Straight flushes and royal flushes share the top score.
    #[must_use]
    pub fn score(self) -> u8 {
        match self {
            Self::StraightFlush | Self::RoyalFlush => Self::MAX_SCORE,
            category => category as u8 + 1,
        }
    }

    pub const MAX_SCORE: u8 = 10;
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "high card",
            Self::OnePair => "one pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "straight",
            Self::Flush => "flush",
            Self::FullHouse => "full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "straight flush",
            Self::RoyalFlush => "royal flush",
        };
        write!(f, "{repr}")
    }
}

/// An ordered, duplicate-free sequence of cards.
///
/// Dealing pops from the back, so a deck plus every card dealt from it
/// always accounts for the same set of cards it started with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The 52 cards in suit-major, value-minor order.
    #[must_use]
    pub fn canonical() -> Self {
        let cards = Suit::ALL
            .into_iter()
            .flat_map(|suit| (LOWEST_VALUE..=ACE).map(move |value| Card(value, suit)))
            .collect();
        Self { cards }
    }

    /// A freshly shuffled 52-card deck.
    pub fn create<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::canonical();
        deck.shuffle(rng);
        deck
    }

    /// Build a deck from arbitrary cards, rejecting duplicates and
    /// out-of-range values.
    pub fn from_cards(cards: Vec<Card>) -> GameResult<Self> {
        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !card.is_valid() {
                return Err(GameError::InvalidCard(format!("{card:?}")));
            }
            if !seen.insert(*card) {
                return Err(GameError::DuplicateCard(*card));
            }
        }
        Ok(Self { cards })
    }

    /// Fisher-Yates shuffle: walk from the last index down to 1, swapping
    /// each slot with a uniformly chosen slot in `0..=i`.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in (1..self.cards.len()).rev() {
            let j = rng.random_range(0..=i);
            self.cards.swap(i, j);
        }
    }

    /// The cards of this deck that aren't in `used`, order preserved.
    #[must_use]
    pub fn exclude(&self, used: &[Card]) -> Self {
        let cards = self
            .cards
            .iter()
            .filter(|card| !used.contains(card))
            .copied()
            .collect();
        Self { cards }
    }

    pub fn deal_card(&mut self) -> GameResult<Card> {
        self.cards.pop().ok_or(GameError::DeckExhausted)
    }

    /// Deal `n` cards at once. The deck is left untouched if it holds
    /// fewer than `n` cards.
    pub fn deal_n(&mut self, n: usize) -> GameResult<Vec<Card>> {
        if n > self.cards.len() {
            return Err(GameError::DeckExhausted);
        }
        let start = self.cards.len() - n;
        let mut dealt = self.cards.split_off(start);
        dealt.reverse();
        Ok(dealt)
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Type alias for whole chips. All bets and player stacks are represented
/// as whole chips.
pub type Usd = u32;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "action", content = "amount", rename_all = "lowercase")]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise(Usd),
}

impl Action {
    /// Chips attached to the action, only present for raises.
    #[must_use]
    pub fn amount(&self) -> Option<Usd> {
        match self {
            Self::Raise(amount) => Some(*amount),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Call => "calls",
            Self::Check => "checks",
            Self::Fold => "folds",
            Self::Raise(amount) => &format!("raises ${amount}"),
        };
        write!(f, "{repr}")
    }
}
