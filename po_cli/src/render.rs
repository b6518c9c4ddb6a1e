//! Text and JSON output for hand states and decisions.

use poker_odds::{Action, Card, HandProbability, HandState, Street};
use serde::Serialize;
use std::fmt;

/// Everything printed for one street, in the shape written by `--json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub street: Street,
    pub hole_cards: Vec<String>,
    pub community_cards: Vec<String>,
    pub current: HandProbability,
    pub future: HandProbability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Action>,
}

impl Report {
    #[must_use]
    pub fn new(state: &HandState, decision: Option<Action>) -> Self {
        Self {
            street: state.street(),
            hole_cards: card_strings(state.hole_cards()),
            community_cards: card_strings(state.community_cards()),
            current: state.probabilities().current,
            future: state.probabilities().future,
            decision,
        }
    }
}

fn card_strings(cards: &[Card]) -> Vec<String> {
    cards.iter().map(ToString::to_string).collect()
}

/// Two-column table of current and future percentages per category.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = if self.community_cards.is_empty() {
            "-".to_string()
        } else {
            self.community_cards.join(" ")
        };

        writeln!(
            f,
            "{}  hole: {}  board: {}",
            self.street.to_string().to_uppercase(),
            self.hole_cards.join(" "),
            board
        )?;
        writeln!(f, "  {:<16} {:>8} {:>8}", "category", "current", "future")?;
        for ((category, current), (_, future)) in self.current.iter().zip(self.future.iter()) {
            writeln!(
                f,
                "  {:<16} {:>7.2}% {:>7.2}%",
                category.to_string(),
                current,
                future
            )?;
        }
        writeln!(f, "  most likely by the river: {}", self.future.most_likely())?;
        if let Some(action) = self.decision {
            writeln!(f, "  decision: player {action}")?;
        }
        Ok(())
    }
}
