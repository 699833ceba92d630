use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use q_snake::game::GameConfig;
use q_snake::modes::{HumanMode, TrainConfig, TrainMode, VisualizeMode};
use q_snake::rl::{default_device, InferenceBackend, TrainingBackend};

#[derive(Parser)]
#[command(name = "q_snake")]
#[command(version, about = "Snake with a deep Q-learning agent")]
struct Cli {
    /// What to run
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Grid width
    #[arg(long, default_value = "32")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "20")]
    height: usize,

    /// Episodes to train before exiting; omit to train until killed
    #[arg(long)]
    episodes: Option<usize>,

    /// Model file for training output and visualization input
    #[arg(long, default_value = "models/q_snake.mpk")]
    model: PathBuf,

    /// Seed for food placement, for reproducible training runs
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Train the Q-learning agent
    Train,
    /// Watch a trained model play
    Visualize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GameConfig::new(cli.width, cli.height);

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config);
            human_mode.run().await?;
        }
        Mode::Train => {
            let mut train_config = TrainConfig::new(cli.model);
            train_config.game_config = config;
            train_config.num_episodes = cli.episodes;
            train_config.seed = cli.seed;

            let mut train_mode = TrainMode::<TrainingBackend>::new(train_config, default_device());
            train_mode.run()?;
        }
        Mode::Visualize => {
            let mut visualize_mode =
                VisualizeMode::<InferenceBackend>::new(&cli.model, config, default_device())?;
            visualize_mode.run().await?;
        }
    }

    Ok(())
}
