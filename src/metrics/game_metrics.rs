use std::time::Duration;

/// Counters shown in the header across games
pub struct GameMetrics {
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self { games_played: 0 }
    }

    pub fn on_game_over(&mut self) {
        self.games_played += 1;
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a duration as mm:ss
pub fn format_duration(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}
