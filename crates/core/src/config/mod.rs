use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    effects::{EffectOptions, DEFAULT_CHAR_SPACING},
    Canvas, Layout, Message, Result, ShadesError,
};

/// Messages shown by the three scrolling-text effects when none are configured.
pub const DEFAULT_MESSAGES: [&str; 3] = ["RGB SHADES", "SOUND REACTIVE ♥", "HELLO WORLD!"];

/// Smallest display the effects are laid out for.
pub const MIN_WIDTH: usize = 8;
pub const MIN_HEIGHT: usize = 5;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
    pub text: TextConfig,
    /// Seed for effect randomness; a fresh seed is drawn when absent.
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            width = config.display.width,
            height = config.display.height,
            "loaded configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.display.width < MIN_WIDTH || self.display.height < MIN_HEIGHT {
            return Err(ShadesError::InvalidInput("display must be at least 8x5 pixels"));
        }
        self.effect_options().map(|_| ())
    }

    /// Validated messages and spacing for the effect registry.
    pub fn effect_options(&self) -> Result<EffectOptions> {
        let messages = self
            .text
            .messages
            .iter()
            .map(|text| Message::new(text))
            .collect::<Result<Vec<_>>>()?;
        EffectOptions::new(messages, self.text.char_spacing)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.display.width, self.display.height, self.display.layout)
    }
}

/// Configuration of the pixel grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub layout: Layout,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 5,
            layout: Layout::RowMajor,
        }
    }
}

/// Timing of the engine's housekeeping tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Period of the hue / fade tick.
    pub hue_interval_ms: u64,
    /// How far the hue cursor moves per tick.
    pub hue_step: u8,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            hue_interval_ms: 30,
            hue_step: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub messages: Vec<String>,
    pub char_spacing: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            messages: DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect(),
            char_spacing: DEFAULT_CHAR_SPACING,
        }
    }
}
