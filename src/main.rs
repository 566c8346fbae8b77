use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use power_snake::game::GameConfig;
use power_snake::session::{Session, SessionRunner};
use power_snake::storage::HighScoreStore;

#[derive(Parser)]
#[command(name = "power_snake")]
#[command(version, about = "Snake on a wrap-around grid with timed power-ups")]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value = "20")]
    cols: usize,

    /// Grid height in cells
    #[arg(long, default_value = "20")]
    rows: usize,

    /// Base speed, 1 (leisurely) to 25 (frantic)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u16).range(1..=25))]
    difficulty: u16,

    /// Obstacles placed at the start of every game
    #[arg(long, default_value = "6")]
    obstacles: usize,

    /// Where the high score is kept
    #[arg(long, default_value = "power_snake_save.json")]
    save_file: PathBuf,

    /// Log file (the terminal itself is taken over by the game)
    #[arg(long, default_value = "power_snake.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to a file; the terminal belongs to the renderer
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(LevelFilter::Info, LogConfig::default(), log_file)
        .context("Failed to initialize logger")?;

    // Build the game configuration from CLI arguments
    let mut config = GameConfig::new(cli.cols, cli.rows);
    config.difficulty = cli.difficulty;
    config.initial_obstacles = cli.obstacles;

    let store = HighScoreStore::new(cli.save_file);
    let session = Session::new(config, store)?;

    let mut runner = SessionRunner::new(session);
    runner.run().await?;

    Ok(())
}
