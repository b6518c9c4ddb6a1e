//! Hand Probabilities Example
//!
//! Deals a hand street by street and prints how the odds of each hand
//! category move as the board fills in, then asks the betting heuristic
//! what to do on the river.

use poker_odds::{
    DecisionConfig, Estimator, EstimatorConfig, GameError, HandState, PlayerState, Position, TableContext,
    classify, decide, parse_cards,
};
use rand::{SeedableRng, rngs::StdRng};

fn main() -> Result<(), GameError> {
    println!("=== Poker Hand Probabilities Example ===\n");

    // Example 1: Classify a few fixed hands
    println!("Example 1: Classifying hands");
    for hand in ["Ah Kh Qh Jh Th", "7c 7d 7h Ks Kc 2d 3s", "Ah 2d 3c 4s 5h 9c Kd"] {
        let category = classify(&parse_cards(hand)?)?;
        println!("{hand:<22} -> {category}");
    }
    println!();

    // Example 2: Walk a seeded hand to the river
    println!("Example 2: Dealing street by street");
    let mut rng = StdRng::seed_from_u64(42);
    let estimator = Estimator::new(EstimatorConfig {
        trials: 20_000,
        ..Default::default()
    })?;

    let mut state = HandState::deal_initial(&estimator, &mut rng)?;
    loop {
        let board: Vec<String> = state.community_cards().iter().map(ToString::to_string).collect();
        println!(
            "{:<8} hole {} {}  board [{}]",
            state.street().to_string(),
            state.hole_cards()[0],
            state.hole_cards()[1],
            board.join(" ")
        );
        for (category, percent) in state.probabilities().future.iter() {
            if percent > 0.0 {
                println!("    {:<16} {percent:6.2}%", category.to_string());
            }
        }
        match state.next_street(&estimator, &mut rng) {
            Ok(next) => state = next,
            Err(GameError::HandComplete) => break,
            Err(e) => return Err(e),
        }
    }
    println!();

    // Example 3: Decide on the river
    println!("Example 3: Betting decision");
    let player = PlayerState {
        hole_cards: state.hole_cards().to_vec(),
        chips: 1_000,
        current_bet: 0,
        position: Position::Dealer,
    };
    let ctx = TableContext {
        community_cards: state.community_cards().to_vec(),
        pot: 200,
        current_bet: 50,
        min_raise: 100,
    };
    let action = decide(&player, &ctx, &DecisionConfig::default(), &mut rng)?;
    println!("Facing $50 into $200 from the dealer seat: {action}");

    Ok(())
}
