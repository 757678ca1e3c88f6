//! Housechess: a two-player chess variant with a minimax opponent.
//!
//! ## Usage
//!
//! - `housechess` - Start the text protocol (same as `play`)
//! - `housechess play` - Start the text protocol on stdin/stdout
//! - `housechess demo` - Watch random Black moves against the engine
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use housechess::board::{Color, Square};
use housechess::constants::{AI_DELAY_MS, AI_ENABLED, SEARCH_DEPTH};
use housechess::game::{AiOutcome, ClickOutcome, Game, GameConfig};
use housechess::movegen::moves_for;
use housechess::protocol::Session;
use housechess::search::Pruning;

/// Housechess: a two-player chess variant with a minimax opponent
#[derive(Parser)]
#[command(name = "housechess")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Settings {
    /// Play both sides by hand
    #[arg(long, global = true)]
    no_ai: bool,

    /// Side played by the engine
    #[arg(long, global = true, default_value_t = Color::White)]
    ai_color: Color,

    /// Plies searched below each candidate move
    #[arg(long, global = true, default_value_t = SEARCH_DEPTH)]
    depth: u32,

    /// Pause before the engine replies, in milliseconds
    #[arg(long, global = true, default_value_t = AI_DELAY_MS)]
    delay_ms: u64,

    /// Alpha-beta cut-off style: full, per-piece, or none
    #[arg(long, global = true, default_value_t = Pruning::Full)]
    pruning: Pruning,

    /// Keep the finished board after a king capture instead of starting over
    #[arg(long, global = true)]
    no_auto_reset: bool,
}

impl Settings {
    fn config(&self) -> GameConfig {
        GameConfig {
            ai_enabled: AI_ENABLED && !self.no_ai,
            ai_color: self.ai_color,
            search_depth: self.depth,
            ai_delay: Duration::from_millis(self.delay_ms),
            pruning: self.pruning,
            auto_reset: !self.no_auto_reset,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text protocol on stdin/stdout
    Play,
    /// Random Black moves against the engine
    Demo {
        /// Number of Black moves to play
        #[arg(long, default_value_t = 10)]
        plies: usize,
        /// Seed for the random Black player
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.settings.config();

    match cli.command {
        Some(Commands::Play) | None => {
            let mut session = Session::new(config);
            session.run().context("protocol loop failed")?;
        }
        Some(Commands::Demo { plies, seed }) => {
            run_demo(config, plies, seed)?;
        }
    }
    Ok(())
}

fn run_demo(config: GameConfig, plies: usize, seed: Option<u64>) -> Result<()> {
    println!("Housechess: random Black against the engine\n");

    let config = GameConfig {
        ai_enabled: true,
        ai_color: Color::White,
        ai_delay: Duration::ZERO,
        auto_reset: false,
        ..config
    };
    let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    info!(seed = rng.get_seed(), "demo started");
    let mut game = Game::new(config);

    for _ in 0..plies {
        if game.is_over() {
            break;
        }

        let moves = moves_for(game.board(), Color::Black);
        let Some(&mv) = rng.choice(moves.iter()) else {
            println!("Black has no moves left");
            break;
        };
        click(&mut game, mv.from)?;
        if let ClickOutcome::Moved(report) = click(&mut game, mv.to)? {
            println!("Black: {}", report.record);
            if let Some(announcement) = report.announcement {
                println!("{announcement}");
            }
        }

        match game.play_ai_move()? {
            AiOutcome::Moved(report) => {
                println!("White: {}", report.record);
                if let Some(announcement) = report.announcement {
                    println!("{announcement}");
                }
            }
            AiOutcome::NoMove(announcement) => println!("{announcement}"),
            AiOutcome::Idle => {}
        }
    }

    println!("\n{}", game.board());
    println!("{}", game.status());
    Ok(())
}

fn click(game: &mut Game, sq: Square) -> Result<ClickOutcome> {
    game.click(sq)
        .with_context(|| format!("click on {sq} failed"))
}
