//! Heuristic betting decisions.
//!
//! Hand strength, seat position and stack depth are blended into a single
//! effective strength, which is then compared against pot odds to pick an
//! action. The heuristic is deliberately simple; every constant lives in
//! [`DecisionConfig`].

use log::{trace, warn};
use rand::{Rng, rngs::ThreadRng};
use serde::{Deserialize, Serialize};

use super::models::{PlayerState, Position, TableContext};
use crate::game::{
    entities::{Action, Card, HandCategory, Usd},
    errors::{GameError, GameResult},
    functional::{StraightFlushRule, classify_made_hand},
};

/// Strength credited for each seating position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionStrength {
    pub dealer: f64,
    pub cutoff: f64,
    pub hijack: f64,
    pub lojack: f64,
    pub big_blind: f64,
    pub small_blind: f64,
    pub normal: f64,
}

impl PositionStrength {
    #[must_use]
    pub fn get(&self, position: Position) -> f64 {
        match position {
            Position::Dealer => self.dealer,
            Position::Cutoff => self.cutoff,
            Position::Hijack => self.hijack,
            Position::Lojack => self.lojack,
            Position::BigBlind => self.big_blind,
            Position::SmallBlind => self.small_blind,
            Position::Normal => self.normal,
        }
    }
}

impl Default for PositionStrength {
    fn default() -> Self {
        Self {
            dealer: 1.0,
            cutoff: 0.9,
            hijack: 0.8,
            lojack: 0.7,
            big_blind: 0.4,
            small_blind: 0.3,
            normal: 0.6,
        }
    }
}

/// Configuration for decision thresholds, weights and sizing.
///
/// # Examples
///
/// ```
/// use poker_odds::bot::decision::DecisionConfig;
///
/// let config = DecisionConfig::default();
/// assert_eq!(config.hand_weight, 0.6);
/// assert_eq!(config.bluff_probability, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Weight of the classified hand strength in the blend.
    pub hand_weight: f64,

    /// Weight of the position strength in the blend.
    pub position_weight: f64,

    /// Weight of the inverse stack-to-call ratio in the blend.
    ///
    /// **Effect**: short stacks relative to the call push the blend up
    pub stack_weight: f64,

    /// Effective strength above this = bet when nobody has bet.
    pub open_threshold: f64,

    /// Opening bet as a fraction of the pot, scaled by effective strength.
    pub open_sizing: f64,

    /// Effective strength must beat `pot_odds * pot_odds_margin` to continue.
    ///
    /// **Range**: 1.0-1.5 (typical: 1.2)
    /// **Higher** = folds more often facing bets
    pub pot_odds_margin: f64,

    /// Effective strength above this (with enough stack) = raise instead of call.
    pub raise_threshold: f64,

    /// Stack-to-call ratio must exceed this to raise over a bet.
    pub min_stack_to_call: f64,

    /// Raise as a fraction of the pot, scaled by effective strength.
    pub raise_sizing: f64,

    /// Chance of bluff-raising instead of folding.
    ///
    /// **Range**: 0.0-1.0 (typical: 0.2)
    pub bluff_probability: f64,

    /// Effective strength must exceed this before a bluff is considered.
    pub bluff_threshold: f64,

    /// Bluff raise as a fraction of the pot.
    pub bluff_sizing: f64,

    pub position_strength: PositionStrength,

    /// Rule used when classifying the player's cards.
    pub straight_flush_rule: StraightFlushRule,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            // Blend
            hand_weight: 0.6,
            position_weight: 0.3,
            stack_weight: 0.1,
            // Unopened pot
            open_threshold: 0.5,
            open_sizing: 0.8,
            // Facing a bet
            pot_odds_margin: 1.2,
            raise_threshold: 0.6,
            min_stack_to_call: 2.0,
            raise_sizing: 1.2,
            // Bluffing
            bluff_probability: 0.2,
            bluff_threshold: 0.3,
            bluff_sizing: 0.5,
            position_strength: PositionStrength::default(),
            straight_flush_rule: StraightFlushRule::default(),
        }
    }
}

impl DecisionConfig {
    pub fn validate(&self) -> GameResult<()> {
        if !(0.0..=1.0).contains(&self.bluff_probability) {
            return Err(GameError::InvalidConfig(format!(
                "bluff_probability {} outside 0..=1",
                self.bluff_probability
            )));
        }
        Ok(())
    }
}

/// Intermediate values behind a decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub category: HandCategory,
    pub hand_strength: f64,
    pub position_strength: f64,
    pub call_amount: Usd,
    pub pot_odds: f64,
    pub stack_to_call_ratio: f64,
    pub effective_strength: f64,
}

/// Classified category score over the maximum score, in (0, 1].
///
/// Fewer than five cards are scored on the pairs/trips/quads they make.
pub fn hand_strength(
    hole_cards: &[Card],
    community_cards: &[Card],
    rule: StraightFlushRule,
) -> GameResult<(HandCategory, f64)> {
    let mut all_cards = Vec::with_capacity(hole_cards.len() + community_cards.len());
    all_cards.extend_from_slice(hole_cards);
    all_cards.extend_from_slice(community_cards);

    for (i, card) in all_cards.iter().enumerate() {
        if all_cards[..i].contains(card) {
            return Err(GameError::DuplicateCard(*card));
        }
    }

    let category = classify_made_hand(&all_cards, rule)?;
    let strength = f64::from(category.score()) / f64::from(HandCategory::MAX_SCORE);
    Ok((category, strength))
}

/// `min(max(x, lo), hi)`. Unlike [`Ord::clamp`] this doesn't panic when
/// `lo > hi`; the upper bound wins.
fn clamp(x: Usd, lo: Usd, hi: Usd) -> Usd {
    x.max(lo).min(hi)
}

fn sized(pot: Usd, fraction: f64) -> Usd {
    (f64::from(pot) * fraction).floor() as Usd
}

/// Evaluate the inputs to a decision without drawing any randomness.
pub fn evaluate(
    player: &PlayerState,
    ctx: &TableContext,
    config: &DecisionConfig,
) -> GameResult<Evaluation> {
    let (category, hand_strength) = hand_strength(
        &player.hole_cards,
        &ctx.community_cards,
        config.straight_flush_rule,
    )?;
    let position_strength = config.position_strength.get(player.position);

    let call_amount = ctx.call_amount(player);
    let pot_odds = if call_amount == 0 {
        0.0
    } else {
        f64::from(call_amount) / (f64::from(ctx.pot) + f64::from(call_amount))
    };
    let stack_to_call_ratio = f64::from(player.chips) / f64::from(call_amount.max(1));

    let effective_strength = config.hand_weight * hand_strength
        + config.position_weight * position_strength
        + config.stack_weight * (1.0 / stack_to_call_ratio);

    Ok(Evaluation {
        category,
        hand_strength,
        position_strength,
        call_amount,
        pot_odds,
        stack_to_call_ratio,
        effective_strength,
    })
}

/// Choose an action for `player`.
///
/// The only randomness is the bluff coin, drawn from `rng` exactly once
/// whenever the player would otherwise fold to a bet.
///
/// # Errors
///
/// Fails on duplicated or out-of-range cards, and with
/// [`GameError::InvalidConfig`] when `config` doesn't validate.
pub fn decide<R: Rng + ?Sized>(
    player: &PlayerState,
    ctx: &TableContext,
    config: &DecisionConfig,
    rng: &mut R,
) -> GameResult<Action> {
    config.validate()?;
    let eval = evaluate(player, ctx, config)?;
    trace!("decision inputs: {eval:?}");

    // Nothing to act with: check if free, otherwise give up the hand.
    if player.chips == 0 {
        warn!("player with no chips asked to act; skipping heuristic");
        return Ok(if eval.call_amount == 0 {
            Action::Check
        } else {
            Action::Fold
        });
    }

    let effective = eval.effective_strength;

    if eval.call_amount == 0 {
        if effective > config.open_threshold {
            let amount = sized(ctx.pot, effective * config.open_sizing);
            return Ok(Action::Raise(clamp(amount, ctx.min_raise, player.chips)));
        }
        return Ok(Action::Check);
    }

    if effective > eval.pot_odds * config.pot_odds_margin {
        if effective > config.raise_threshold && eval.stack_to_call_ratio > config.min_stack_to_call {
            let amount = sized(ctx.pot, effective * config.raise_sizing);
            return Ok(Action::Raise(clamp(amount, ctx.min_raise, player.chips)));
        }
        return Ok(Action::Call);
    }

    let bluff = rng.random_bool(config.bluff_probability);
    if bluff && effective > config.bluff_threshold {
        let amount = sized(ctx.pot, config.bluff_sizing);
        return Ok(Action::Raise(clamp(amount, ctx.min_raise, player.chips)));
    }
    Ok(Action::Fold)
}

/// Decision maker owning its configuration and random source.
pub struct BotDecisionMaker<R = ThreadRng> {
    /// Random number generator
    rng: R,
    /// Configuration for decision-making
    config: DecisionConfig,
}

impl<R: Rng> BotDecisionMaker<R> {
    /// Create a new decision maker with default config
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            config: DecisionConfig::default(),
        }
    }

    /// Create a new decision maker with custom config
    pub fn with_config(rng: R, config: DecisionConfig) -> GameResult<Self> {
        config.validate()?;
        Ok(Self { rng, config })
    }

    #[must_use]
    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn decide_action(&mut self, player: &PlayerState, ctx: &TableContext) -> GameResult<Action> {
        decide(player, ctx, &self.config, &mut self.rng)
    }
}

impl Default for BotDecisionMaker<ThreadRng> {
    fn default() -> Self {
        Self::new(rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::parse_cards;
    use rand::{SeedableRng, rngs::StdRng};

    fn player(hole: &str, chips: Usd, current_bet: Usd, position: Position) -> PlayerState {
        PlayerState {
            hole_cards: parse_cards(hole).unwrap(),
            chips,
            current_bet,
            position,
        }
    }

    fn table(board: &str, pot: Usd, current_bet: Usd, min_raise: Usd) -> TableContext {
        TableContext {
            community_cards: parse_cards(board).unwrap(),
            pot,
            current_bet,
            min_raise,
        }
    }

    #[test]
    fn test_hand_strength_scores() {
        let rule = StraightFlushRule::AnySuit;
        let (category, strength) = hand_strength(
            &parse_cards("7c 2d").unwrap(),
            &[],
            rule,
        )
        .unwrap();
        assert_eq!(category, HandCategory::HighCard);
        assert!((strength - 0.1).abs() < 1e-12);

        let (category, strength) = hand_strength(
            &parse_cards("9s Ts").unwrap(),
            &parse_cards("Js Qs Ks").unwrap(),
            rule,
        )
        .unwrap();
        assert_eq!(category, HandCategory::StraightFlush);
        assert_eq!(strength, 1.0);
    }

    #[test]
    fn test_hand_strength_rejects_duplicates() {
        let result = hand_strength(
            &parse_cards("As Kd").unwrap(),
            &parse_cards("As 2c 3d").unwrap(),
            StraightFlushRule::AnySuit,
        );
        assert!(matches!(result, Err(GameError::DuplicateCard(_))));
    }

    #[test]
    fn test_evaluate_values() {
        // Pair of sevens from the cutoff facing 50 into 150 with 500 behind.
        let p = player("7c 7d", 500, 0, Position::Cutoff);
        let ctx = table("2h 9s Kd", 150, 50, 100);
        let eval = evaluate(&p, &ctx, &DecisionConfig::default()).unwrap();
        assert_eq!(eval.call_amount, 50);
        assert!((eval.pot_odds - 0.25).abs() < 1e-12);
        assert!((eval.stack_to_call_ratio - 10.0).abs() < 1e-12);
        // 0.6 * 0.2 + 0.3 * 0.9 + 0.1 * 0.1
        assert!((eval.effective_strength - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_unopened_weak_hand_checks() {
        // 0.6 * 0.1 + 0.3 * 0.3 + 0.1 / 1000 < 0.5
        let p = player("7c 2d", 1000, 0, Position::SmallBlind);
        let ctx = table("", 30, 0, 20);
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(
                decide(&p, &ctx, &DecisionConfig::default(), &mut rng),
                Ok(Action::Check)
            );
        }
    }

    #[test]
    fn test_unopened_strong_hand_raises() {
        // Flush from the dealer seat: 0.6 * 0.6 + 0.3 * 1.0 + 0.1 / 1000 = 0.6601
        let p = player("Ah 2h", 1000, 0, Position::Dealer);
        let ctx = table("5h 9h Kh", 100, 0, 20);
        let mut rng = StdRng::seed_from_u64(0);
        // floor(100 * 0.6601 * 0.8) = 52
        assert_eq!(
            decide(&p, &ctx, &DecisionConfig::default(), &mut rng),
            Ok(Action::Raise(52))
        );
    }

    #[test]
    fn test_raise_clamped_to_min_raise_and_stack() {
        let p = player("Ah 2h", 1000, 0, Position::Dealer);
        let mut rng = StdRng::seed_from_u64(0);

        let ctx = table("5h 9h Kh", 10, 0, 40);
        assert_eq!(
            decide(&p, &ctx, &DecisionConfig::default(), &mut rng),
            Ok(Action::Raise(40))
        );

        // Minimum raise above the stack: the stack wins.
        let short = player("Ah 2h", 30, 0, Position::Dealer);
        let ctx = table("5h 9h Kh", 10, 0, 40);
        assert_eq!(
            decide(&short, &ctx, &DecisionConfig::default(), &mut rng),
            Ok(Action::Raise(30))
        );
    }

    #[test]
    fn test_facing_bet_calls() {
        // effective 0.4 > 0.25 * 1.2 but below the raise threshold
        let p = player("7c 7d", 500, 0, Position::Cutoff);
        let ctx = table("2h 9s Kd", 150, 50, 100);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            decide(&p, &ctx, &DecisionConfig::default(), &mut rng),
            Ok(Action::Call)
        );
    }

    #[test]
    fn test_facing_bet_raises_with_strong_hand() {
        // Full house from the dealer: 0.6 * 0.7 + 0.3 + 0.1 * 0.1 = 0.73
        let p = player("9c 9d", 500, 0, Position::Dealer);
        let ctx = table("9h Ks Kd", 150, 50, 100);
        let mut rng = StdRng::seed_from_u64(0);
        // floor(150 * 0.73 * 1.2) = 131
        assert_eq!(
            decide(&p, &ctx, &DecisionConfig::default(), &mut rng),
            Ok(Action::Raise(131))
        );
    }

    #[test]
    fn test_short_stack_calls_instead_of_raising() {
        // Stack-to-call ratio 2 is not above 2.
        let p = player("9c 9d", 100, 0, Position::Dealer);
        let ctx = table("9h Ks Kd", 150, 50, 100);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            decide(&p, &ctx, &DecisionConfig::default(), &mut rng),
            Ok(Action::Call)
        );
    }

    #[test]
    fn test_weak_hand_facing_big_bet_folds_or_bluffs() {
        // Pot odds 500 / 600, effective 0.06 + 0.18 + 0.1 / 1.2 ~ 0.32
        let p = player("7c 2d", 600, 0, Position::Normal);
        let ctx = table("", 100, 500, 100);
        let mut rng = StdRng::seed_from_u64(42);
        let mut bluffs = 0;
        for _ in 0..1000 {
            match decide(&p, &ctx, &DecisionConfig::default(), &mut rng).unwrap() {
                Action::Fold => {}
                Action::Raise(amount) => {
                    // floor(100 * 0.5) = 50, lifted to the min raise
                    assert_eq!(amount, 100);
                    bluffs += 1;
                }
                other => panic!("unexpected {other}"),
            }
        }
        assert!((140..260).contains(&bluffs), "bluffed {bluffs} times");
    }

    #[test]
    fn test_never_bluffs_below_threshold() {
        // 0.6 * 0.1 + 0.3 * 0.3 + 0.1 / 2 = 0.2 <= 0.3
        let p = player("7c 2d", 1000, 0, Position::SmallBlind);
        let ctx = table("", 100, 500, 100);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            assert_eq!(
                decide(&p, &ctx, &DecisionConfig::default(), &mut rng),
                Ok(Action::Fold)
            );
        }
    }

    #[test]
    fn test_bluff_sequence_reproducible_with_seed() {
        let p = player("7c 2d", 600, 0, Position::Normal);
        let ctx = table("", 100, 500, 100);
        let run = |seed| {
            let mut maker =
                BotDecisionMaker::with_config(StdRng::seed_from_u64(seed), DecisionConfig::default())
                    .unwrap();
            (0..200)
                .map(|_| maker.decide_action(&p, &ctx).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
        assert!(run(7).contains(&Action::Fold));
        assert!(run(7).iter().any(|a| matches!(a, Action::Raise(_))));
    }

    #[test]
    fn test_zero_chips_checks_or_folds_without_sizing() {
        // The blended formulas would divide by a zero stack here; an empty
        // stack short-circuits to a free check or a fold instead.
        let p = player("Ah Ad", 0, 0, Position::Dealer);
        let mut rng = StdRng::seed_from_u64(0);
        let config = DecisionConfig::default();
        assert_eq!(
            decide(&p, &table("", 100, 0, 20), &config, &mut rng),
            Ok(Action::Check)
        );
        assert_eq!(
            decide(&p, &table("", 100, 50, 20), &config, &mut rng),
            Ok(Action::Fold)
        );
    }

    #[test]
    fn test_decide_rejects_invalid_bluff_probability() {
        let p = player("7c 2d", 600, 0, Position::Normal);
        let ctx = table("", 100, 500, 100);
        let mut rng = StdRng::seed_from_u64(0);
        for bluff_probability in [1.5, -0.1, f64::NAN] {
            let config = DecisionConfig {
                bluff_probability,
                ..Default::default()
            };
            assert!(matches!(
                decide(&p, &ctx, &config, &mut rng),
                Err(GameError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_config_validation() {
        let config = DecisionConfig {
            bluff_probability: 1.5,
            ..Default::default()
        };
        assert!(BotDecisionMaker::with_config(StdRng::seed_from_u64(0), config).is_err());
    }

    #[test]
    fn test_custom_weights_change_decision() {
        // Ignore position and stack entirely: pair scores 0.2, never opens.
        let config = DecisionConfig {
            hand_weight: 1.0,
            position_weight: 0.0,
            stack_weight: 0.0,
            ..Default::default()
        };
        let p = player("7c 7d", 1000, 0, Position::Dealer);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            decide(&p, &table("2h 9s Kd", 100, 0, 20), &config, &mut rng),
            Ok(Action::Check)
        );
    }
}
