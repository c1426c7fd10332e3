use std::time::Duration;

use runtime::SliceSchedule;
use serde::{Deserialize, Serialize};

/// Tunables for an interpolation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Work time per slice before yielding.
    pub task_budget_ms: u64,
    /// Pause between slices.
    pub sleep_ms: u64,
    /// Overlay opacity in `[0, 1]`.
    pub overlay_alpha: f64,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            task_budget_ms: 100,
            sleep_ms: 25,
            overlay_alpha: 0.4,
        }
    }
}

impl InterpolationConfig {
    pub fn schedule(&self) -> SliceSchedule {
        SliceSchedule::new(
            Duration::from_millis(self.task_budget_ms),
            Duration::from_millis(self.sleep_ms),
        )
    }

    pub fn overlay_alpha_byte(&self) -> u8 {
        let a = if self.overlay_alpha.is_finite() {
            self.overlay_alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };
        (a * 255.0).floor() as u8
    }
}
