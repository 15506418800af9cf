use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tuning constants of the layouting, caching and input engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Attempts a failing layout item gets within a single pass.
    pub max_layouting_tries: u32,
    /// Passes a failing layout item may be deferred to before it is dropped.
    pub max_discard_count: u32,
    /// A cached widget whose slot exceeds this on either axis loses its cache.
    pub max_cache_size: i32,
    /// Maximum delay between two presses recognised as a double click.
    pub double_click_ms: u64,
    /// Scroll speed given to new scrollers by the built-in style.
    pub default_scroll_speed: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_layouting_tries: 3,
            max_discard_count: 5,
            max_cache_size: 2048,
            double_click_ms: 250,
            default_scroll_speed: 50,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The double-click threshold as a duration.
    pub fn double_click_delay(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }
}
