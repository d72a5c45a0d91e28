use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when DAYPLAN_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

/// Pointer gesture thresholds, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Movement below this on both axes is still a tap
    #[serde(default = "default_tap_threshold")]
    pub tap_threshold: f32,
    /// Leftward swipe needed to reveal the delete button
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f32,
    /// How far past the threshold the row may be pulled
    #[serde(default = "default_swipe_overshoot")]
    pub swipe_overshoot: f32,
    /// Horizontal displacement must exceed vertical by this factor to count as a swipe
    #[serde(default = "default_direction_ratio")]
    pub direction_ratio: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            tap_threshold: default_tap_threshold(),
            swipe_threshold: default_swipe_threshold(),
            swipe_overshoot: default_swipe_overshoot(),
            direction_ratio: default_direction_ratio(),
        }
    }
}

fn default_tap_threshold() -> f32 {
    5.0
}

fn default_swipe_threshold() -> f32 {
    60.0
}

fn default_swipe_overshoot() -> f32 {
    20.0
}

fn default_direction_ratio() -> f32 {
    1.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Width of one terminal cell in pointer pixels
    #[serde(default = "default_cell_px_width")]
    pub cell_px_width: f32,
    /// Height of one terminal cell in pointer pixels (one timeline hour)
    #[serde(default = "default_cell_px_height")]
    pub cell_px_height: f32,
    /// Share of the screen width given to the task list
    #[serde(default = "default_tasks_width_percent")]
    pub tasks_width_percent: u16,
    /// Theme overrides, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            cell_px_width: default_cell_px_width(),
            cell_px_height: default_cell_px_height(),
            tasks_width_percent: default_tasks_width_percent(),
            colors: HashMap::new(),
        }
    }
}

fn default_cell_px_width() -> f32 {
    8.0
}

fn default_cell_px_height() -> f32 {
    16.0
}

fn default_tasks_width_percent() -> u16 {
    40
}
