//! Core library for the RGB shades effect engine.
//!
//! Effects draw into a small [`Canvas`] one frame at a time. The
//! [`Engine`] owns the canvas and the [`SharedContext`], advances the hue
//! cursor, applies fading and calls the active effect whenever its
//! self-declared cadence has elapsed. Audio capture, the LED driver and
//! effect selection live outside this crate; they talk to it through
//! [`AudioFeed`], [`Canvas::pixels`] and [`Engine::switch_to`].

pub mod audio;
pub mod canvas;
pub mod color;
pub mod config;
pub mod context;
pub mod effects;
pub mod engine;
pub mod error;
pub mod fade;
pub mod font;
pub mod math;
pub mod palette;
pub mod random;
pub mod record;
pub mod timeline;

pub use audio::{
    AudioFeed, AudioFrame, AudioTrace, ScriptedAudio, SilentAudio, SyntheticAudio, BAND_COUNT,
};
pub use canvas::{Canvas, Layout, Lens, LensPair, Outline};
pub use color::{Hsv, Rgb};
pub use config::{AppConfig, DisplayConfig, TextConfig, TimingConfig, DEFAULT_MESSAGES};
pub use context::SharedContext;
pub use effects::{Effect, EffectKind, EffectOptions, EffectSlot, Frame, Setup};
pub use engine::Engine;
pub use error::{Result, ShadesError};
pub use fade::FadeProcessor;
pub use font::{Glyph, Message, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use palette::{Palette, PaletteFamily, PaletteLibrary, PaletteProvider};
pub use random::{Entropy, SeededEntropy};
pub use record::{RecordedFrame, Recorder, Recording, RecordingSettings};
pub use timeline::{FrameClock, IntervalTimer};
