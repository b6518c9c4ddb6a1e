//! Monte Carlo estimation of the final hand category.
//!
//! The estimator reports two distributions for a partially revealed hand:
//!
//! - **current**: the category the known cards already make. This is an
//!   exact classification, so one category holds 100 and the rest 0.
//! - **future**: empirical frequencies of the category reached once the
//!   board is complete, sampled over `trials` random run-outs.
//!
//! Trials are split into slices, each with its own generator seeded from
//! the caller's. Counts only depend on the seed, the trial count and the
//! slice count; with the `parallel` feature the slices run on rayon.

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{
    entities::{Card, Deck, HandCategory},
    errors::{GameError, GameResult},
    functional::{MIN_CLASSIFY_CARDS, StraightFlushRule, categorize, classify_made_hand, classify_with},
};

pub const DEFAULT_TRIALS: usize = 10_000;
pub const HOLE_SIZE: usize = 2;
pub const BOARD_SIZE: usize = 5;
pub const DECK_SIZE: usize = 52;

/// Estimator settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Number of sampled run-outs.
    pub trials: usize,

    /// Number of independently seeded trial slices.
    pub workers: usize,

    pub straight_flush_rule: StraightFlushRule,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            workers: 1,
            straight_flush_rule: StraightFlushRule::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> GameResult<()> {
        if self.trials == 0 {
            return Err(GameError::InvalidConfig("trials must be > 0".to_string()));
        }
        if self.workers == 0 {
            return Err(GameError::InvalidConfig("workers must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Per-category tallies from a batch of trials.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CategoryCounts([u64; HandCategory::COUNT]);

impl CategoryCounts {
    pub fn record(&mut self, category: HandCategory) {
        self.0[category.index()] += 1;
    }

    #[must_use]
    pub fn get(&self, category: HandCategory) -> u64 {
        self.0[category.index()]
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (count, other) in self.0.iter_mut().zip(other.0) {
            *count += other;
        }
        self
    }
}

/// Percentage (0..=100) for each hand category.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandProbability {
    pub high_card: f64,
    pub one_pair: f64,
    pub two_pair: f64,
    pub three_of_a_kind: f64,
    pub straight: f64,
    pub flush: f64,
    pub full_house: f64,
    pub four_of_a_kind: f64,
    pub straight_flush: f64,
    pub royal_flush: f64,
}

impl HandProbability {
    /// 100 on `category`, 0 everywhere else.
    #[must_use]
    pub fn certain(category: HandCategory) -> Self {
        let mut probability = Self::default();
        *probability.get_mut(category) = 100.0;
        probability
    }

    /// Each count divided by `trials`, times 100.
    #[must_use]
    pub fn from_counts(counts: &CategoryCounts, trials: u64) -> Self {
        let mut probability = Self::default();
        if trials == 0 {
            return probability;
        }
        for category in HandCategory::ALL {
            *probability.get_mut(category) = counts.get(category) as f64 / trials as f64 * 100.0;
        }
        probability
    }

    #[must_use]
    pub fn get(&self, category: HandCategory) -> f64 {
        match category {
            HandCategory::HighCard => self.high_card,
            HandCategory::OnePair => self.one_pair,
            HandCategory::TwoPair => self.two_pair,
            HandCategory::ThreeOfAKind => self.three_of_a_kind,
            HandCategory::Straight => self.straight,
            HandCategory::Flush => self.flush,
            HandCategory::FullHouse => self.full_house,
            HandCategory::FourOfAKind => self.four_of_a_kind,
            HandCategory::StraightFlush => self.straight_flush,
            HandCategory::RoyalFlush => self.royal_flush,
        }
    }

    fn get_mut(&mut self, category: HandCategory) -> &mut f64 {
        match category {
            HandCategory::HighCard => &mut self.high_card,
            HandCategory::OnePair => &mut self.one_pair,
            HandCategory::TwoPair => &mut self.two_pair,
            HandCategory::ThreeOfAKind => &mut self.three_of_a_kind,
            HandCategory::Straight => &mut self.straight,
            HandCategory::Flush => &mut self.flush,
            HandCategory::FullHouse => &mut self.full_house,
            HandCategory::FourOfAKind => &mut self.four_of_a_kind,
            HandCategory::StraightFlush => &mut self.straight_flush,
            HandCategory::RoyalFlush => &mut self.royal_flush,
        }
    }

    /// Categories paired with their percentage, weakest first.
    pub fn iter(&self) -> impl Iterator<Item = (HandCategory, f64)> + '_ {
        HandCategory::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, percent)| percent).sum()
    }

    /// Highest-percentage category; ties go to the stronger category.
    #[must_use]
    pub fn most_likely(&self) -> HandCategory {
        self.iter()
            .fold((HandCategory::HighCard, f64::MIN), |best, (category, percent)| {
                if percent >= best.1 { (category, percent) } else { best }
            })
            .0
    }
}

/// Current and future distributions for one evaluation context.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Probabilities {
    pub current: HandProbability,
    pub future: HandProbability,
}

/// Check the evaluation context: two hole cards, at most five board cards,
/// and hole cards, board and remaining deck together holding each of the
/// 52 cards exactly once.
pub fn validate_context(hole_cards: &[Card], community_cards: &[Card], remaining: &Deck) -> GameResult<()> {
    if hole_cards.len() != HOLE_SIZE {
        return Err(GameError::InvalidHoleCards(hole_cards.len()));
    }
    if community_cards.len() > BOARD_SIZE {
        return Err(GameError::TooManyCommunityCards(community_cards.len()));
    }

    let mut seen = HashSet::with_capacity(DECK_SIZE);
    for card in hole_cards
        .iter()
        .chain(community_cards)
        .chain(remaining.cards())
    {
        if !card.is_valid() {
            return Err(GameError::InvalidCard(format!("{card:?}")));
        }
        if !seen.insert(*card) {
            return Err(GameError::DuplicateCard(*card));
        }
    }
    if seen.len() != DECK_SIZE {
        return Err(GameError::DeckAccounting {
            accounted: seen.len(),
        });
    }
    Ok(())
}

/// Monte Carlo hand estimator.
#[derive(Clone, Debug, Default)]
pub struct Estimator {
    config: EstimatorConfig,
}

impl Estimator {
    pub fn new(config: EstimatorConfig) -> GameResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the current and future category distributions.
    ///
    /// # Arguments
    ///
    /// * `hole_cards` - The player's two private cards
    /// * `community_cards` - Board cards revealed so far (0..=5)
    /// * `remaining` - Every card not in the hole or on the board
    /// * `rng` - Source for per-slice seeds
    ///
    /// # Errors
    ///
    /// Fails when the context doesn't account for the 52 cards exactly once.
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        hole_cards: &[Card],
        community_cards: &[Card],
        remaining: &Deck,
        rng: &mut R,
    ) -> GameResult<Probabilities> {
        validate_context(hole_cards, community_cards, remaining)?;

        let rule = self.config.straight_flush_rule;
        let mut known = Vec::with_capacity(HOLE_SIZE + BOARD_SIZE);
        known.extend_from_slice(hole_cards);
        known.extend_from_slice(community_cards);

        let current = if known.len() >= MIN_CLASSIFY_CARDS {
            classify_with(&known, rule)?
        } else {
            classify_made_hand(&known, rule)?
        };

        let to_come = BOARD_SIZE - community_cards.len();
        if remaining.len() < to_come {
            return Err(GameError::DeckExhausted);
        }

        let slices = self.slices(rng);
        debug!(
            "estimating {} trials over {} slice(s), {} board card(s) to come",
            self.config.trials,
            slices.len(),
            to_come
        );

        let run = |&(trials, seed): &(usize, u64)| {
            run_trials(&known, remaining.cards(), to_come, trials, rule, seed)
        };

        #[cfg(feature = "parallel")]
        let counts = slices
            .par_iter()
            .map(run)
            .reduce(CategoryCounts::default, CategoryCounts::merge);

        #[cfg(not(feature = "parallel"))]
        let counts = slices
            .iter()
            .map(run)
            .fold(CategoryCounts::default(), CategoryCounts::merge);

        Ok(Probabilities {
            current: HandProbability::certain(current),
            future: HandProbability::from_counts(&counts, self.config.trials as u64),
        })
    }

    /// Split the trial count into `workers` slices and seed each one. The
    /// first `trials % workers` slices take one extra trial.
    fn slices<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<(usize, u64)> {
        let workers = self.config.workers;
        let base = self.config.trials / workers;
        let extra = self.config.trials % workers;
        (0..workers)
            .map(|i| (base + usize::from(i < extra), rng.random()))
            .filter(|&(trials, _)| trials > 0)
            .collect()
    }
}

/// Estimate with the default configuration.
pub fn estimate<R: Rng + ?Sized>(
    hole_cards: &[Card],
    community_cards: &[Card],
    remaining: &Deck,
    rng: &mut R,
) -> GameResult<Probabilities> {
    Estimator::default().estimate(hole_cards, community_cards, remaining, rng)
}

fn run_trials(
    known: &[Card],
    remaining: &[Card],
    to_come: usize,
    trials: usize,
    rule: StraightFlushRule,
    seed: u64,
) -> CategoryCounts {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut deck = remaining.to_vec();
    let mut hand = Vec::with_capacity(known.len() + to_come);
    let mut counts = CategoryCounts::default();

    for _ in 0..trials {
        partial_shuffle(&mut deck, to_come, &mut rng);
        hand.clear();
        hand.extend_from_slice(known);
        hand.extend_from_slice(&deck[..to_come]);
        counts.record(categorize(&hand, rule));
    }
    counts
}

/// Run the first `k` steps of a Fisher-Yates shuffle so that `cards[..k]`
/// is a uniformly random ordered sample of the whole slice, whatever order
/// the slice started in.
pub fn partial_shuffle<R: Rng + ?Sized>(cards: &mut [Card], k: usize, rng: &mut R) {
    let n = cards.len();
    for i in 0..k.min(n) {
        let j = rng.random_range(i..n);
        cards.swap(i, j);
    }
}
