use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Quiet period after a drag or zoom before `MoveEnd` fires.
    pub move_end_wait_ms: u64,
    /// Pointer travel below which an unscaled gesture is still a click.
    pub min_move_px: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            move_end_wait_ms: 1000,
            min_move_px: 4.0,
        }
    }
}

impl GestureConfig {
    pub fn move_end_wait(&self) -> Duration {
        Duration::from_millis(self.move_end_wait_ms)
    }
}
