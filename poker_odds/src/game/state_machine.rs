//! Hand progression as immutable state transitions.
//!
//! A [`HandState`] is never mutated once built. Dealing the next street or
//! overriding a card returns a new state with a freshly estimated
//! [`Probabilities`], leaving the previous state intact.
//!
//! ```text
//! deal_initial -> Preflop -> deal_flop -> Flop -> deal_turn -> Turn -> deal_river -> River
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    entities::{Card, Deck},
    errors::{GameError, GameResult},
    odds::{BOARD_SIZE, Estimator, HOLE_SIZE, Probabilities},
};

/// Betting rounds that reveal community cards.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// Community cards on the table during this street.
    #[must_use]
    pub fn board_size(self) -> usize {
        match self {
            Self::Preflop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River => 5,
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Preflop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River => None,
        }
    }

    fn from_board_size(size: usize) -> GameResult<Self> {
        match size {
            0 => Ok(Self::Preflop),
            3 => Ok(Self::Flop),
            4 => Ok(Self::Turn),
            5 => Ok(Self::River),
            n if n > BOARD_SIZE => Err(GameError::TooManyCommunityCards(n)),
            n => Err(GameError::InvalidBoardSize(n)),
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

/// One player's view of a hand: hole cards, the board so far, the cards
/// still undealt and the distributions computed for them.
#[derive(Clone, Debug, PartialEq)]
pub struct HandState {
    street: Street,
    hole_cards: [Card; HOLE_SIZE],
    community_cards: Vec<Card>,
    deck: Deck,
    probabilities: Probabilities,
}

impl HandState {
    /// Shuffle a new deck, deal two hole cards and estimate with the whole
    /// board still to come.
    pub fn deal_initial<R: Rng + ?Sized>(estimator: &Estimator, rng: &mut R) -> GameResult<Self> {
        let mut deck = Deck::create(rng);
        let hole_cards = [deck.deal_card()?, deck.deal_card()?];
        let probabilities = estimator.estimate(&hole_cards, &[], &deck, rng)?;
        Ok(Self {
            street: Street::Preflop,
            hole_cards,
            community_cards: Vec::with_capacity(BOARD_SIZE),
            deck,
            probabilities,
        })
    }

    /// Build a state from cards the caller picked. The deck is rebuilt as a
    /// shuffled deck minus every placed card.
    ///
    /// # Errors
    ///
    /// [`GameError::DuplicateCard`] when a card is placed twice, and
    /// [`GameError::InvalidBoardSize`] for board sizes other than 0, 3, 4 or 5.
    pub fn from_cards<R: Rng + ?Sized>(
        hole_cards: [Card; HOLE_SIZE],
        community_cards: &[Card],
        estimator: &Estimator,
        rng: &mut R,
    ) -> GameResult<Self> {
        let street = Street::from_board_size(community_cards.len())?;
        let mut placed = Vec::with_capacity(HOLE_SIZE + BOARD_SIZE);
        for card in hole_cards.iter().chain(community_cards) {
            if !card.is_valid() {
                return Err(GameError::InvalidCard(format!("{card:?}")));
            }
            if placed.contains(card) {
                return Err(GameError::DuplicateCard(*card));
            }
            placed.push(*card);
        }

        let deck = Deck::create(rng).exclude(&placed);
        let probabilities = estimator.estimate(&hole_cards, community_cards, &deck, rng)?;
        Ok(Self {
            street,
            hole_cards,
            community_cards: community_cards.to_vec(),
            deck,
            probabilities,
        })
    }

    pub fn deal_flop<R: Rng + ?Sized>(&self, estimator: &Estimator, rng: &mut R) -> GameResult<Self> {
        self.deal_street(Street::Flop, estimator, rng)
    }

    pub fn deal_turn<R: Rng + ?Sized>(&self, estimator: &Estimator, rng: &mut R) -> GameResult<Self> {
        self.deal_street(Street::Turn, estimator, rng)
    }

    pub fn deal_river<R: Rng + ?Sized>(&self, estimator: &Estimator, rng: &mut R) -> GameResult<Self> {
        self.deal_street(Street::River, estimator, rng)
    }

    /// Deal whichever street follows the current one.
    ///
    /// # Errors
    ///
    /// [`GameError::HandComplete`] once the river is out.
    pub fn next_street<R: Rng + ?Sized>(&self, estimator: &Estimator, rng: &mut R) -> GameResult<Self> {
        let next = self.street.next().ok_or(GameError::HandComplete)?;
        self.deal_street(next, estimator, rng)
    }

    fn deal_street<R: Rng + ?Sized>(
        &self,
        target: Street,
        estimator: &Estimator,
        rng: &mut R,
    ) -> GameResult<Self> {
        if self.street.next() != Some(target) {
            return Err(match self.street {
                Street::River => GameError::HandComplete,
                current => GameError::OutOfOrderDeal {
                    current,
                    requested: target,
                },
            });
        }

        let mut deck = self.deck.clone();
        let mut community_cards = self.community_cards.clone();
        community_cards.extend(deck.deal_n(target.board_size() - self.community_cards.len())?);
        let probabilities = estimator.estimate(&self.hole_cards, &community_cards, &deck, rng)?;

        Ok(Self {
            street: target,
            hole_cards: self.hole_cards,
            community_cards,
            deck,
            probabilities,
        })
    }

    /// Force `card` into hole slot `slot` (0 or 1) and re-estimate.
    pub fn with_hole_card<R: Rng + ?Sized>(
        &self,
        slot: usize,
        card: Card,
        estimator: &Estimator,
        rng: &mut R,
    ) -> GameResult<Self> {
        let mut hole_cards = self.hole_cards;
        *hole_cards.get_mut(slot).ok_or(GameError::InvalidSlot {
            slot,
            len: HOLE_SIZE,
        })? = card;
        Self::from_cards(hole_cards, &self.community_cards, estimator, rng)
    }

    /// Force `card` into board slot `slot` and re-estimate.
    pub fn with_board_card<R: Rng + ?Sized>(
        &self,
        slot: usize,
        card: Card,
        estimator: &Estimator,
        rng: &mut R,
    ) -> GameResult<Self> {
        let mut community_cards = self.community_cards.clone();
        let len = community_cards.len();
        *community_cards
            .get_mut(slot)
            .ok_or(GameError::InvalidSlot { slot, len })? = card;
        Self::from_cards(self.hole_cards, &community_cards, estimator, rng)
    }

    #[must_use]
    pub fn street(&self) -> Street {
        self.street
    }

    #[must_use]
    pub fn hole_cards(&self) -> &[Card; HOLE_SIZE] {
        &self.hole_cards
    }

    #[must_use]
    pub fn community_cards(&self) -> &[Card] {
        &self.community_cards
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn probabilities(&self) -> &Probabilities {
        &self.probabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        entities::{HandCategory, Suit},
        odds::EstimatorConfig,
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn estimator() -> Estimator {
        Estimator::new(EstimatorConfig {
            trials: 500,
            ..Default::default()
        })
        .unwrap()
    }

    fn accounted(state: &HandState) -> usize {
        HOLE_SIZE + state.community_cards().len() + state.deck().len()
    }

    #[test]
    fn test_deal_initial() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = HandState::deal_initial(&estimator(), &mut rng).unwrap();
        assert_eq!(state.street(), Street::Preflop);
        assert!(state.community_cards().is_empty());
        assert_eq!(state.deck().len(), 50);
        assert_eq!(accounted(&state), 52);
    }

    #[test]
    fn test_full_progression_keeps_accounting() {
        let estimator = estimator();
        let mut rng = StdRng::seed_from_u64(2);
        let preflop = HandState::deal_initial(&estimator, &mut rng).unwrap();
        let flop = preflop.deal_flop(&estimator, &mut rng).unwrap();
        let turn = flop.deal_turn(&estimator, &mut rng).unwrap();
        let river = turn.deal_river(&estimator, &mut rng).unwrap();

        for (state, street, board) in [
            (&preflop, Street::Preflop, 0),
            (&flop, Street::Flop, 3),
            (&turn, Street::Turn, 4),
            (&river, Street::River, 5),
        ] {
            assert_eq!(state.street(), street);
            assert_eq!(state.community_cards().len(), board);
            assert_eq!(accounted(state), 52);
            assert_eq!(state.hole_cards(), preflop.hole_cards());
        }
        assert_eq!(&turn.community_cards()[..3], flop.community_cards());
        assert_eq!(
            river.probabilities().current,
            river.probabilities().future
        );
    }

    #[test]
    fn test_transitions_do_not_mutate_input() {
        let estimator = estimator();
        let mut rng = StdRng::seed_from_u64(3);
        let preflop = HandState::deal_initial(&estimator, &mut rng).unwrap();
        let snapshot = preflop.clone();
        let _flop = preflop.deal_flop(&estimator, &mut rng).unwrap();
        assert_eq!(preflop, snapshot);
    }

    #[test]
    fn test_out_of_order_deal_rejected() {
        let estimator = estimator();
        let mut rng = StdRng::seed_from_u64(4);
        let preflop = HandState::deal_initial(&estimator, &mut rng).unwrap();
        assert_eq!(
            preflop.deal_turn(&estimator, &mut rng),
            Err(GameError::OutOfOrderDeal {
                current: Street::Preflop,
                requested: Street::Turn,
            })
        );
        assert!(preflop.deal_river(&estimator, &mut rng).is_err());
    }

    #[test]
    fn test_next_street_after_river() {
        let estimator = estimator();
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = HandState::deal_initial(&estimator, &mut rng).unwrap();
        for _ in 0..3 {
            state = state.next_street(&estimator, &mut rng).unwrap();
        }
        assert_eq!(state.street(), Street::River);
        assert_eq!(
            state.next_street(&estimator, &mut rng),
            Err(GameError::HandComplete)
        );
        assert_eq!(
            state.deal_river(&estimator, &mut rng),
            Err(GameError::HandComplete)
        );
    }

    #[test]
    fn test_override_hole_card() {
        let estimator = estimator();
        let mut rng = StdRng::seed_from_u64(6);
        let state = HandState::from_cards(
            [Card(14, Suit::Spade), Card(13, Suit::Spade)],
            &[Card(2, Suit::Heart), Card(7, Suit::Club), Card(9, Suit::Diamond)],
            &estimator,
            &mut rng,
        )
        .unwrap();

        let paired = state
            .with_hole_card(1, Card(9, Suit::Spade), &estimator, &mut rng)
            .unwrap();
        assert_eq!(paired.hole_cards()[1], Card(9, Suit::Spade));
        assert!(paired.deck().contains(&Card(13, Suit::Spade)));
        assert!(!paired.deck().contains(&Card(9, Suit::Spade)));
        assert_eq!(accounted(&paired), 52);
        assert_eq!(
            paired.probabilities().current,
            crate::game::odds::HandProbability::certain(HandCategory::OnePair)
        );
    }

    #[test]
    fn test_override_collision_rejected() {
        let estimator = estimator();
        let mut rng = StdRng::seed_from_u64(7);
        let state = HandState::from_cards(
            [Card(14, Suit::Spade), Card(13, Suit::Spade)],
            &[Card(2, Suit::Heart), Card(7, Suit::Club), Card(9, Suit::Diamond)],
            &estimator,
            &mut rng,
        )
        .unwrap();

        assert_eq!(
            state.with_board_card(0, Card(14, Suit::Spade), &estimator, &mut rng),
            Err(GameError::DuplicateCard(Card(14, Suit::Spade)))
        );
        assert_eq!(
            state.with_hole_card(2, Card(3, Suit::Club), &estimator, &mut rng),
            Err(GameError::InvalidSlot { slot: 2, len: 2 })
        );
        assert_eq!(
            state.with_board_card(3, Card(3, Suit::Club), &estimator, &mut rng),
            Err(GameError::InvalidSlot { slot: 3, len: 3 })
        );
    }

    #[test]
    fn test_override_same_card_back_is_allowed() {
        let estimator = estimator();
        let mut rng = StdRng::seed_from_u64(8);
        let state = HandState::deal_initial(&estimator, &mut rng).unwrap();
        let card = state.hole_cards()[0];
        let again = state.with_hole_card(0, card, &estimator, &mut rng).unwrap();
        assert_eq!(again.hole_cards(), state.hole_cards());
    }

    #[test]
    fn test_from_cards_rejects_partial_flop() {
        let mut rng = StdRng::seed_from_u64(9);
        let result = HandState::from_cards(
            [Card(14, Suit::Spade), Card(13, Suit::Spade)],
            &[Card(2, Suit::Heart)],
            &estimator(),
            &mut rng,
        );
        assert_eq!(result, Err(GameError::InvalidBoardSize(1)));
    }
}
