use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use paper_soccer::core::{AppConfig, PlayerId};
use paper_soccer::engine::{AnalysisState, SoccerEngine};
use paper_soccer::game::{Match, MoveOutcome};
use paper_soccer::search::{Difficulty, SearchConfig, SearchDriver};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Play a computer-vs-computer game of paper soccer.
#[derive(Parser)]
struct Args {
    /// Difficulty of both players: easy, medium or hard (defaults to the config file)
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// RNG seed of the tie-breaking
    #[arg(long)]
    seed: Option<u64>,

    /// End the game at the first goal
    #[arg(short, long, default_value_t = false)]
    first_goal_wins: bool,

    /// Stop after this many turns
    #[arg(short, long, default_value_t = 200)]
    max_turns: usize,

    /// Preferences file (defaults to ~/.ossoccer/config.txt)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);

    let mut config = match args.config.clone().or_else(AppConfig::default_path) {
        Some(path) => AppConfig::load(&path).with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(difficulty) = args.difficulty {
        config = config.with_difficulty(difficulty);
    }
    if args.first_goal_wins {
        config = config.with_first_goal_wins(true);
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, difficulty = %config.difficulty, first_goal_wins = config.first_goal_wins);

    let search = SearchConfig::for_difficulty(config.difficulty).with_seed(seed);
    let engine = SoccerEngine::with_search_config(search.clone(), PlayerId::Player2);
    let mut home = SearchDriver::new(search.with_seed(seed.wrapping_add(1)), PlayerId::Player1);
    let mut game = Match::new(engine, &config);

    for turn in 0..args.max_turns {
        let player = game.current_player();
        let path = match player {
            PlayerId::Player1 => {
                let mut scratch = game.engine().board().clone();
                home.best_path(&mut scratch)
            }
            PlayerId::Player2 => {
                let engine = game.engine_mut();
                let ticket = engine.start_analysis()?;
                loop {
                    match engine.poll_analysis(&ticket)? {
                        AnalysisState::Running => thread::sleep(Duration::from_millis(10)),
                        AnalysisState::Finished(path) => break path,
                    }
                }
            }
        };

        let Some(path) = path else {
            warn!(%player, turn, "no move found");
            break;
        };
        debug!(%player, turn, %path);

        match game.play(&path)? {
            MoveOutcome::Goal { scorer } => info!(turn, %scorer, "goal"),
            MoveOutcome::GameOver { winner } => {
                info!(turn, ?winner, "game over");
                break;
            }
            MoveOutcome::Continue | MoveOutcome::TurnPassed => {}
        }
    }

    println!("{}", game.engine().board().render());
    println!(
        "Player 1: {}  Player 2: {}",
        game.score(PlayerId::Player1),
        game.score(PlayerId::Player2)
    );
    match game.winner() {
        Some(Some(winner)) => println!("{winner} wins"),
        Some(None) => println!("Draw"),
        None => println!("Stopped after {} turns", args.max_turns),
    }
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .event_format(format),
        )
        .with(filter)
        .init();
}
