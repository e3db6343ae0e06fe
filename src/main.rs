//! Bullet Tac Toe entry point
//!
//! The native build runs headless: the autopilot plays the human's side
//! against the configured computer while a recording surface stands in for
//! the canvas.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use bullet_tac_toe::input::Key;
use bullet_tac_toe::renderer::Recorder;
use bullet_tac_toe::settings::SettingsError;
use bullet_tac_toe::{AiDifficulty, ObstacleDifficulty, Runner, Settings};

/// Headless Bullet Tac Toe demo
#[derive(Parser, Debug)]
#[command(name = "bullet-tac-toe")]
#[command(about = "Tic-tac-toe inside a bullet-hell arena (headless demo)", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Run seed (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of games to play
    #[arg(short, long, default_value = "3")]
    games: u32,

    /// Give up on a game after this much simulated time
    #[arg(long, default_value = "60")]
    max_seconds: f32,

    /// Override the computer's difficulty (easy, medium, hard, impossible)
    #[arg(long)]
    ai: Option<String>,

    /// Override the obstacle difficulty (easy, medium, hard)
    #[arg(long)]
    obstacles: Option<String>,
}

/// Real-time frame length the demo pretends to render at
const FRAME_DT: f32 = 1.0 / 60.0;

fn load_settings(cli: &Cli) -> Result<Settings, SettingsError> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(name) = &cli.ai {
        settings.ai_difficulty = AiDifficulty::from_name(name)?;
    }
    if let Some(name) = &cli.obstacles {
        settings.obstacle_difficulty = ObstacleDifficulty::from_name(name)?;
    }
    Ok(settings)
}

fn main() -> Result<(), SettingsError> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let seed = cli.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    });
    log::info!("Bullet Tac Toe (headless) starting with seed: {seed}");

    let mut runner = Runner::new(settings, seed);
    runner.autopilot = true;
    let mut surface = Recorder::new();

    for game in 1..=cli.games {
        let mut elapsed = 0.0;
        while !runner.session().is_ended() && elapsed < cli.max_seconds {
            runner.update(FRAME_DT, &mut surface);
            elapsed += FRAME_DT;
        }

        let session = runner.session();
        if session.is_ended() {
            log::info!("Game {game}: {:?} after {} frames", session.phase, session.frame);
        } else {
            log::warn!("Game {game}: still running after {elapsed:.0}s, abandoning");
        }

        if game < cli.games {
            if session.is_ended() {
                runner.keyboard_mut().press(Key::Pause);
                runner.update(0.0, &mut surface);
                runner.keyboard_mut().release(Key::Pause);
            } else {
                runner.restart();
            }
        }
    }

    let scores = runner.scoreboard().borrow();
    println!("{} games: {}", scores.games(), scores.summary());
    println!("Frames drawn: {}", surface.frames());
    Ok(())
}
