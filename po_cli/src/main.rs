//! Command-line hand odds explorer.
//!
//! Deals (or takes) a hand, prints the current and future hand category
//! distributions, optionally walks it to the river and asks the betting
//! heuristic for a decision.

mod config;
mod render;

use anyhow::{Context, Error, bail};
use log::{debug, info};
use pico_args::Arguments;
use poker_odds::{
    Card, DecisionConfig, Estimator, GameError, HandState, PlayerState, Position, TableContext,
    Usd, decide, parse_cards,
};
use rand::{SeedableRng, rngs::StdRng};

use config::{CliConfig, CliOverrides, ConfigError};
use render::Report;

const HELP: &str = "\
Estimate Texas Hold'em hand category odds

USAGE:
  po_cli [OPTIONS]

OPTIONS:
  --hole       CARDS       Two hole cards, e.g. \"As Kd\"  [default: dealt at random]
  --board      CARDS       0, 3, 4 or 5 board cards, e.g. \"Qh 7h 2c\"  [requires --hole]
  --set        SLOT=CARD   Override a card after dealing; SLOT is h0, h1 or b0..b4 (repeatable)
  --trials     N           Monte Carlo trials per estimate  [default: env PO_TRIALS or 10000]
  --workers    N           Independently seeded trial slices  [default: env PO_WORKERS or 1]
  --seed       N           Seed for every random draw  [default: env PO_SEED or random]
  --rule       RULE        any-suit or same-suit straight flushes  [default: env PO_STRAIGHT_FLUSH_RULE or any-suit]

DECISION OPTIONS (a decision is printed when --pot is given):
  --pot        CHIPS       Chips in the pot
  --to-call    CHIPS       Highest bet this round  [default: 0]
  --committed  CHIPS       Chips the player already put in this round  [default: 0]
  --chips      CHIPS       Chips behind  [default: 1000]
  --min-raise  CHIPS       Smallest legal raise  [default: 0]
  --position   SEAT        dealer, cutoff, hijack, lojack, big-blind, small-blind or normal  [default: normal]

FLAGS:
  --walk                   Deal every remaining street up to the river
  --json                   Print reports as JSON lines
  -h, --help               Print help information

ENVIRONMENT:
  PO_TRIALS, PO_WORKERS, PO_SEED, PO_STRAIGHT_FLUSH_RULE
  RUST_LOG                 Log filter, e.g. debug
  (A .env file in the working directory is loaded first)
";

struct Args {
    hole: Option<String>,
    board: Option<String>,
    overrides: Vec<Override>,
    walk: bool,
    json: bool,
    betting: Option<Betting>,
}

struct Betting {
    pot: Usd,
    current_bet: Usd,
    committed: Usd,
    chips: Usd,
    min_raise: Usd,
    position: Position,
}

/// Manual card placement into a hole or board slot.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Override {
    Hole(usize, Card),
    Board(usize, Card),
}

impl std::str::FromStr for Override {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidCard(s.to_string());
        let (slot, card) = s.split_once('=').ok_or_else(invalid)?;
        let card: Card = card.parse()?;
        let slot = slot.trim().to_lowercase();
        let index = |rest: &str| rest.parse::<usize>().map_err(|_| invalid());
        match slot.split_at_checked(1) {
            Some(("h", rest)) => Ok(Self::Hole(index(rest)?, card)),
            Some(("b", rest)) => Ok(Self::Board(index(rest)?, card)),
            _ => Err(invalid()),
        }
    }
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let cli_overrides = CliOverrides {
        trials: pargs.opt_value_from_str("--trials")?,
        workers: pargs.opt_value_from_str("--workers")?,
        seed: pargs.opt_value_from_str("--seed")?,
        straight_flush_rule: pargs.opt_value_from_str("--rule")?,
    };

    let betting = match pargs.opt_value_from_str("--pot")? {
        Some(pot) => Some(Betting {
            pot,
            current_bet: pargs.opt_value_from_str("--to-call")?.unwrap_or(0),
            committed: pargs.opt_value_from_str("--committed")?.unwrap_or(0),
            chips: pargs.opt_value_from_str("--chips")?.unwrap_or(1000),
            min_raise: pargs.opt_value_from_str("--min-raise")?.unwrap_or(0),
            position: pargs
                .opt_value_from_str("--position")?
                .unwrap_or_default(),
        }),
        None => None,
    };

    let args = Args {
        hole: pargs.opt_value_from_str("--hole")?,
        board: pargs.opt_value_from_str("--board")?,
        overrides: pargs.values_from_str("--set")?,
        walk: pargs.contains("--walk"),
        json: pargs.contains("--json"),
        betting,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        bail!("unexpected arguments: {remaining:?}");
    }

    env_logger::builder().format_target(false).init();

    let config = CliConfig::from_env(cli_overrides)?;
    config.validate()?;
    info!(
        "estimating with {} trials over {} worker(s), {:?} straight flushes",
        config.trials, config.workers, config.straight_flush_rule
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let estimator = Estimator::new(config.estimator())?;

    let mut state = initial_state(&args, &estimator, &mut rng)?;
    for edit in &args.overrides {
        debug!("applying override {edit:?}");
        state = match *edit {
            Override::Hole(slot, card) => state.with_hole_card(slot, card, &estimator, &mut rng),
            Override::Board(slot, card) => state.with_board_card(slot, card, &estimator, &mut rng),
        }
        .with_context(|| format!("override {edit:?} rejected"))?;
    }

    let decision_config = DecisionConfig {
        straight_flush_rule: config.straight_flush_rule,
        ..Default::default()
    };

    loop {
        let decision = match &args.betting {
            Some(betting) => Some(decide_for(&state, betting, &decision_config, &mut rng)?),
            None => None,
        };
        let report = Report::new(&state, decision);
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print!("{report}");
        }

        if !args.walk {
            break;
        }
        match state.next_street(&estimator, &mut rng) {
            Ok(next) => state = next,
            Err(GameError::HandComplete) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn initial_state(args: &Args, estimator: &Estimator, rng: &mut StdRng) -> Result<HandState, Error> {
    let Some(hole) = &args.hole else {
        if args.board.is_some() {
            return Err(ConfigError::MissingRequired {
                var: "--hole".to_string(),
                hint: "A fixed board needs fixed hole cards, e.g. --hole \"As Kd\"".to_string(),
            }
            .into());
        }
        return Ok(HandState::deal_initial(estimator, rng)?);
    };

    let hole = parse_cards(hole)?;
    let hole: [Card; 2] = hole
        .as_slice()
        .try_into()
        .map_err(|_| GameError::InvalidHoleCards(hole.len()))?;
    let board = match &args.board {
        Some(board) => parse_cards(board)?,
        None => Vec::new(),
    };
    Ok(HandState::from_cards(hole, &board, estimator, rng)?)
}

fn decide_for(
    state: &HandState,
    betting: &Betting,
    config: &DecisionConfig,
    rng: &mut StdRng,
) -> Result<poker_odds::Action, Error> {
    let player = PlayerState {
        hole_cards: state.hole_cards().to_vec(),
        chips: betting.chips,
        current_bet: betting.committed,
        position: betting.position,
    };
    let ctx = TableContext {
        community_cards: state.community_cards().to_vec(),
        pot: betting.pot,
        current_bet: betting.current_bet,
        min_raise: betting.min_raise,
    };
    Ok(decide(&player, &ctx, config, rng)?)
}
