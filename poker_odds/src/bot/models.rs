//! Player and table context models consumed by the decision heuristic.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::game::entities::{Card, Usd};
use crate::game::errors::GameError;

/// Named seating positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Dealer,
    Cutoff,
    Hijack,
    Lojack,
    BigBlind,
    SmallBlind,
    #[default]
    Normal,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Dealer => write!(f, "dealer"),
            Position::Cutoff => write!(f, "cutoff"),
            Position::Hijack => write!(f, "hijack"),
            Position::Lojack => write!(f, "lojack"),
            Position::BigBlind => write!(f, "big-blind"),
            Position::SmallBlind => write!(f, "small-blind"),
            Position::Normal => write!(f, "normal"),
        }
    }
}

impl FromStr for Position {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dealer" | "button" | "btn" => Ok(Position::Dealer),
            "cutoff" | "co" => Ok(Position::Cutoff),
            "hijack" | "hj" => Ok(Position::Hijack),
            "lojack" | "lj" => Ok(Position::Lojack),
            "big-blind" | "bigblind" | "bb" => Ok(Position::BigBlind),
            "small-blind" | "smallblind" | "sb" => Ok(Position::SmallBlind),
            "normal" => Ok(Position::Normal),
            other => Err(GameError::InvalidConfig(format!("unknown position {other}"))),
        }
    }
}

/// The acting player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Private cards
    pub hole_cards: Vec<Card>,

    /// Chips behind
    pub chips: Usd,

    /// Chips already committed this betting round
    pub current_bet: Usd,

    pub position: Position,
}

/// Betting context the player acts in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableContext {
    /// Community cards revealed so far
    pub community_cards: Vec<Card>,

    /// Chips in the pot
    pub pot: Usd,

    /// Highest bet this betting round
    pub current_bet: Usd,

    /// Smallest legal raise
    pub min_raise: Usd,
}

impl TableContext {
    /// Chips `player` must add to stay in, zero when already matched.
    #[must_use]
    pub fn call_amount(&self, player: &PlayerState) -> Usd {
        self.current_bet.saturating_sub(player.current_bet)
    }
}
