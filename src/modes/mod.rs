//! Execution modes: training, human play, and trained-policy playback

pub mod human;
pub mod train;
pub mod visualize;

pub use human::HumanMode;
pub use train::{TrainConfig, TrainMode};
pub use visualize::VisualizeMode;
