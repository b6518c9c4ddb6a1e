//! Card model, hand classification, odds estimation and street progression.
//!
//! - [`entities`]: cards, deck, hand categories, actions
//! - [`functional`]: hand category classifier
//! - [`odds`]: Monte Carlo estimation of current and future categories
//! - [`state_machine`]: preflop through river transitions

pub mod entities;
pub mod errors;
pub mod functional;
pub mod odds;
pub mod state_machine;

pub use errors::{GameError, GameResult};
