//! # Poker Odds
//!
//! Texas Hold'em hand categories and their odds for a single player.
//!
//! The library classifies a card set into one of the hand categories,
//! estimates by Monte Carlo simulation the distribution over the category
//! the player holds now and the one they will hold once the board is
//! complete, and walks a hand from the preflop to the river while keeping
//! those estimates current. A small heuristic turns the same inputs into a
//! betting decision.
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, deck, classifier, estimator and street transitions
//! - [`bot`]: Fold/check/call/raise heuristic
//!
//! ## Example
//!
//! ```
//! use poker_odds::{Estimator, EstimatorConfig, HandState, Street};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let estimator = Estimator::new(EstimatorConfig {
//!     trials: 2_000,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let hand = HandState::deal_initial(&estimator, &mut rng).unwrap();
//! let flop = hand.deal_flop(&estimator, &mut rng).unwrap();
//! assert_eq!(flop.street(), Street::Flop);
//! assert_eq!(flop.community_cards().len(), 3);
//! assert!((flop.probabilities().future.total() - 100.0).abs() < 1e-6);
//! ```

/// Cards, classification, estimation and street progression.
pub mod game;
pub use game::{
    GameError, GameResult,
    entities::{self, Action, Card, Deck, HandCategory, Suit, Usd, parse_cards},
    functional::{self, StraightFlushRule, classify, classify_with},
    odds::{self, Estimator, EstimatorConfig, HandProbability, Probabilities, estimate},
    state_machine::{self, HandState, Street},
};

/// Betting heuristic.
pub mod bot;
pub use bot::{BotDecisionMaker, DecisionConfig, PlayerState, Position, TableContext, decide};
