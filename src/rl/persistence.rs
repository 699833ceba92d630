//! Model persistence for saving and loading trained agents
//!
//! Saves the Q-network weights through Burn's Record system plus a JSON
//! metadata sidecar describing how the model was trained, so a loaded
//! network can be reconstructed and sanity-checked without guessing.

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::agent::QAgent;
use super::config::AgentConfig;
use super::network::{QNetwork, QNetworkConfig};
use crate::game::GameConfig;

/// Metadata saved with the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Network architecture, needed to rebuild the module before loading
    pub network_config: QNetworkConfig,

    /// Hyperparameters used during training
    pub agent_config: AgentConfig,

    /// Game rules the model was trained under
    pub game_config: GameConfig,

    /// Episodes completed when this snapshot was taken
    pub games_played: u32,

    /// Best score achieved up to this snapshot
    pub best_score: u32,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl ModelMetadata {
    pub fn new(
        network_config: QNetworkConfig,
        agent_config: AgentConfig,
        game_config: GameConfig,
        games_played: u32,
        best_score: u32,
    ) -> Self {
        Self {
            network_config,
            agent_config,
            game_config,
            games_played,
            best_score,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Save a trained agent's network to a file
///
/// Two files are written: the weights at `<path>` (Burn record format) and
/// the metadata at `<path>.meta.json`. Parent directories are created as
/// needed.
pub fn save_model<B: AutodiffBackend>(
    agent: &QAgent<B>,
    game_config: &GameConfig,
    best_score: u32,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let record = agent.network().clone().into_record();
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(record, path.to_path_buf())
        .context("Failed to save network weights")?;

    let metadata = ModelMetadata::new(
        agent.network_config().clone(),
        agent.config().clone(),
        game_config.clone(),
        agent.games_played(),
        best_score,
    );

    let meta_path = path.with_extension("meta.json");
    let meta_json =
        serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

/// Load a trained network from a file
///
/// Reads the metadata first to rebuild the module with the right
/// architecture, then loads the recorded weights into it.
pub fn load_network<B: AutodiffBackend>(
    path: &Path,
    device: &B::Device,
) -> Result<(QNetwork<B>, ModelMetadata)> {
    let meta_path = path.with_extension("meta.json");
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    let metadata: ModelMetadata =
        serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

    let mut network = metadata.network_config.init::<B>(device);

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", path))?;

    network = network.load_record(record);

    Ok((network, metadata))
}
