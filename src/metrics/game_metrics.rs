use std::time::{Duration, Instant};

/// Session metrics for the interactive modes
///
/// Tracks wall-clock time of the current game plus the record and game count
/// across the session. Purely for display; the training loop keeps its own
/// statistics.
pub struct GameMetrics {
    start_time: Instant,
    elapsed_time: Duration,
    pub record: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            record: 0,
            games_played: 0,
        }
    }

    /// Refresh the elapsed-time reading
    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    /// Restart the clock for a new game
    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    /// Close out a finished game, keeping the record up to date
    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.record {
            self.record = final_score;
        }
    }

    /// Elapsed time as mm:ss
    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
