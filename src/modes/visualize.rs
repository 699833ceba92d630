//! Visualization mode for watching trained agents
//!
//! Loads a saved model and replays its greedy policy in the TUI: every tick
//! the current state is encoded, the network picks its arg-max action, and
//! the environment advances. No exploration and no learning happen here.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Reset episode
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use burn::module::AutodiffModule;
use burn::tensor::{backend::Backend, Tensor, TensorData};
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{stderr, Stderr},
    path::Path,
    time::Duration,
};
use tokio::time::{interval, Interval};

use crate::game::{Action, GameConfig};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::rl::{load_network, ModelMetadata, QNetwork, SnakeEnvironment, STATE_DIM};

/// Visualization speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationSpeed {
    /// Slow: 2 Hz (500ms per step)
    Slow,
    /// Normal: 8 Hz (125ms per step) - same as human mode
    Normal,
    /// Fast: 20 Hz (50ms per step)
    Fast,
    /// Very Fast: 60 Hz (16ms per step)
    VeryFast,
}

impl VisualizationSpeed {
    fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(125),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }
}

/// Visualization mode for watching trained agents
pub struct VisualizeMode<B: Backend> {
    /// Trained Q-network (inference mode)
    network: QNetwork<B>,

    /// Snake environment the policy plays in
    env: SnakeEnvironment,

    /// Renderer for TUI display
    renderer: Renderer,

    /// Session metrics shown in the header
    metrics: GameMetrics,

    /// Metadata loaded with the model
    metadata: ModelMetadata,

    /// Device for tensor operations
    device: B::Device,

    should_quit: bool,
    paused: bool,
    speed: VisualizationSpeed,
}

impl<B: Backend> VisualizeMode<B> {
    /// Load a trained model and set up the playback environment
    pub fn new(model_path: &Path, config: GameConfig, device: B::Device) -> Result<Self> {
        use burn::backend::Autodiff;
        let (network, metadata) = load_network::<Autodiff<B>>(model_path, &device)
            .with_context(|| format!("Failed to load model from {:?}", model_path))?;

        // Strip the autodiff wrapper for inference
        let network = network.valid();

        println!("{}", "=".repeat(60));
        println!("Loaded Model Information");
        println!("{}", "=".repeat(60));
        println!("Model path: {:?}", model_path);
        println!("Games played: {}", metadata.games_played);
        println!("Best score: {}", metadata.best_score);
        println!(
            "Trained on: {}x{} grid",
            metadata.game_config.grid_width, metadata.game_config.grid_height
        );
        println!("Version: {}", metadata.version);
        println!("{}", "=".repeat(60));
        println!();

        let env = SnakeEnvironment::new(config);

        Ok(Self {
            network,
            env,
            renderer: Renderer::new(),
            metrics: GameMetrics::new(),
            metadata,
            device,
            should_quit: false,
            paused: false,
            speed: VisualizationSpeed::Normal,
        })
    }

    /// Metadata of the loaded model
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Run the visualization loop
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_visualization_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_visualization_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks based on speed
        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        self.env.reset();

        loop {
            tokio::select! {
                // Handle keyboard input
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if !self.paused {
                        if self.env.state().is_alive {
                            self.step_agent();
                        } else {
                            // Auto-restart
                            self.env.reset();
                            self.metrics.on_game_start();
                        }
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.env.state(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Advance the environment one tick with the greedy action
    fn step_agent(&mut self) {
        let features = self.env.observe();
        let input = Tensor::<B, 2>::from_data(
            TensorData::new(features.to_vec(), [1, STATE_DIM]),
            &self.device,
        );

        let values = self.network.forward(input).into_data();
        let values = values
            .as_slice::<f32>()
            .expect("Q-values convert to f32 slice");
        let action = Action::from_index(argmax(values))
            .expect("argmax stays inside the action space");

        let result = self.env.step(action);
        if result.terminated {
            self.metrics.on_game_over(result.score);
        }
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            // Only process key press events
            if key.kind != KeyEventKind::Press {
                return;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char(' ') => {
                    self.paused = !self.paused;
                }
                KeyCode::Char('r') => {
                    self.env.reset();
                    self.metrics.on_game_start();
                }
                KeyCode::Char('1') => {
                    self.change_speed(VisualizationSpeed::Slow, tick_timer);
                }
                KeyCode::Char('2') => {
                    self.change_speed(VisualizationSpeed::Normal, tick_timer);
                }
                KeyCode::Char('3') => {
                    self.change_speed(VisualizationSpeed::Fast, tick_timer);
                }
                KeyCode::Char('4') => {
                    self.change_speed(VisualizationSpeed::VeryFast, tick_timer);
                }
                _ => {}
            }
        }
    }

    fn change_speed(&mut self, new_speed: VisualizationSpeed, tick_timer: &mut Interval) {
        self.speed = new_speed;
        tick_timer.reset_after(self.speed.tick_interval());
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Index of the largest value, ties to the first occurrence
///
/// Matches the agent's tie-breaking during training, so playback picks the
/// same actions the agent would have.
fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{
        default_device, save_model, AgentConfig, InferenceBackend, QAgent, QNetworkConfig,
        TrainingBackend,
    };
    use tempfile::TempDir;

    #[test]
    fn test_visualization_speed() {
        assert_eq!(
            VisualizationSpeed::Slow.tick_interval(),
            Duration::from_millis(500)
        );
        assert_eq!(
            VisualizationSpeed::Normal.tick_interval(),
            Duration::from_millis(125)
        );
        assert_eq!(
            VisualizationSpeed::Fast.tick_interval(),
            Duration::from_millis(50)
        );
        assert_eq!(
            VisualizationSpeed::VeryFast.tick_interval(),
            Duration::from_millis(16)
        );
    }

    #[test]
    fn test_argmax_first_max_wins() {
        assert_eq!(argmax(&[0.1, 0.6, 0.2]), 1);
        assert_eq!(argmax(&[0.5, 0.5, 0.1]), 0); // tie goes to the first
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), 1);
    }

    #[test]
    fn test_visualize_mode_creation() {
        let temp_dir = TempDir::new().unwrap();
        let model_path = temp_dir.path().join("test_model.mpk");

        // Create and save a test model
        let device = default_device();
        let network_config = QNetworkConfig::new();
        let network = network_config.init::<TrainingBackend>(&device);
        let agent = QAgent::new(
            network,
            network_config,
            AgentConfig::default(),
            device.clone(),
        );

        save_model(&agent, &GameConfig::default(), 5, &model_path).unwrap();

        // Load in visualize mode
        let config = GameConfig::small();
        let visualize_mode =
            VisualizeMode::<InferenceBackend>::new(&model_path, config, device);

        assert!(visualize_mode.is_ok());
        let mode = visualize_mode.unwrap();
        assert!(!mode.paused);
        assert_eq!(mode.speed, VisualizationSpeed::Normal);
        assert_eq!(mode.metadata().best_score, 5);
    }

    #[test]
    fn test_step_agent_advances_environment() {
        let temp_dir = TempDir::new().unwrap();
        let model_path = temp_dir.path().join("test_model.mpk");

        let device = default_device();
        let network_config = QNetworkConfig::new();
        let network = network_config.init::<TrainingBackend>(&device);
        let agent = QAgent::new(
            network,
            network_config,
            AgentConfig::default(),
            device.clone(),
        );
        save_model(&agent, &GameConfig::default(), 0, &model_path).unwrap();

        let mut mode =
            VisualizeMode::<InferenceBackend>::new(&model_path, GameConfig::small(), device)
                .unwrap();

        let frame_before = mode.env.state().frame;
        mode.step_agent();
        assert_ne!(mode.env.state().frame, frame_before);
    }
}
