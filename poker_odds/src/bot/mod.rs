//! Single-player betting heuristic.
//!
//! [`decision::decide`] blends the classified hand, the seat and the stack
//! depth into an effective strength and maps it to fold, check, call or a
//! sized raise. The only random input is an occasional bluff.

pub mod decision;
pub mod models;

pub use decision::{BotDecisionMaker, DecisionConfig, Evaluation, decide};
pub use models::{PlayerState, Position, TableContext};
