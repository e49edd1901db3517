//! The effect contract and the registry of every built-in effect.
//!
//! An effect is set up once, then asked for exactly one frame per
//! invocation. It owns all of its counters and tells the engine how long
//! to wait before calling it again.

mod growth;
mod meters;
mod patterns;
mod rings;
mod text;

use std::{fmt, str::FromStr};

use crate::{
    AudioFrame, Canvas, Entropy, Message, PaletteFamily, PaletteProvider, Result, ShadesError,
    SharedContext,
};

pub use growth::{BeatEdge, Expansion, GrowthStages, MAX_STAGE};
pub use meters::{
    Analyzer, AudioCirc, AudioOutline, AudioPlasma, AudioStripes, LensStripes, RgbPulse, Vu,
};
pub use patterns::{
    ColorFill, Confetti, Glitter, OutlineChase, Plasma, Rider, SideRain, SlantBars, ThreeDee,
    ThreeSine,
};
pub use rings::{clamp_radius, Rings, MAX_RING_RADIUS};
pub use text::{ScrollText, TextStyle, DEFAULT_CHAR_SPACING};

/// Everything an effect may touch during its one-time setup.
pub struct Setup<'a> {
    pub ctx: &'a mut SharedContext,
    pub canvas: &'a mut Canvas,
    pub palettes: &'a mut dyn PaletteProvider,
    pub rng: &'a mut dyn Entropy,
}

impl Setup<'_> {
    /// Asks the palette provider for a fresh palette and makes it current.
    pub fn select_palette(&mut self, family: PaletteFamily) {
        self.ctx.palette = self.palettes.select(family, &mut *self.rng);
    }
}

/// Inputs and output of a single frame step.
pub struct Frame<'a> {
    pub canvas: &'a mut Canvas,
    pub ctx: &'a SharedContext,
    pub audio: &'a AudioFrame,
    pub rng: &'a mut dyn Entropy,
    cadence_ms: u32,
}

impl<'a> Frame<'a> {
    pub fn new(
        canvas: &'a mut Canvas,
        ctx: &'a SharedContext,
        audio: &'a AudioFrame,
        rng: &'a mut dyn Entropy,
        cadence_ms: u32,
    ) -> Self {
        Self {
            canvas,
            ctx,
            audio,
            rng,
            cadence_ms,
        }
    }

    pub fn cadence_ms(&self) -> u32 {
        self.cadence_ms
    }

    /// Changes the delay before the next invocation.
    pub fn set_cadence(&mut self, cadence_ms: u32) {
        self.cadence_ms = cadence_ms;
    }

    pub fn now_ms(&self) -> u64 {
        self.ctx.clock_ms
    }
}

/// One animation generator.
pub trait Effect {
    fn name(&self) -> &'static str;

    /// One-time initialisation. Returns the initial cadence in milliseconds.
    fn setup(&mut self, setup: &mut Setup<'_>) -> u32;

    /// Draws one frame and advances internal state by one step.
    fn step(&mut self, frame: &mut Frame<'_>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Running,
}

/// Owns an effect instance and enforces its lifecycle.
pub struct EffectSlot {
    effect: Box<dyn Effect>,
    phase: Phase,
    cadence_ms: u32,
}

impl EffectSlot {
    pub fn new(effect: Box<dyn Effect>) -> Self {
        Self {
            effect,
            phase: Phase::Uninitialized,
            cadence_ms: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.effect.name()
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Declared delay before the next invocation.
    pub fn cadence_ms(&self) -> u32 {
        self.cadence_ms
    }

    /// Runs setup if needed, then exactly one frame step.
    pub fn run(
        &mut self,
        canvas: &mut Canvas,
        ctx: &mut SharedContext,
        audio: &AudioFrame,
        palettes: &mut dyn PaletteProvider,
        rng: &mut dyn Entropy,
    ) {
        if self.phase == Phase::Uninitialized {
            let mut setup = Setup {
                ctx: &mut *ctx,
                canvas: &mut *canvas,
                palettes,
                rng: &mut *rng,
            };
            self.cadence_ms = self.effect.setup(&mut setup);
            self.phase = Phase::Running;
            tracing::debug!(
                effect = self.effect.name(),
                cadence_ms = self.cadence_ms,
                fade = ctx.fade,
                audio = ctx.audio_active,
                "effect initialised"
            );
        }

        let mut frame = Frame::new(canvas, ctx, audio, rng, self.cadence_ms);
        self.effect.step(&mut frame);
        self.cadence_ms = frame.cadence_ms();
    }
}

impl fmt::Debug for EffectSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectSlot")
            .field("effect", &self.effect.name())
            .field("phase", &self.phase)
            .field("cadence_ms", &self.cadence_ms)
            .finish()
    }
}

/// Construction-time options shared by the effects that need them.
#[derive(Debug, Clone)]
pub struct EffectOptions {
    pub messages: Vec<Message>,
    pub char_spacing: usize,
}

impl EffectOptions {
    pub fn new(messages: Vec<Message>, char_spacing: usize) -> Result<Self> {
        if messages.is_empty() {
            return Err(ShadesError::InvalidInput("at least one scroll message is required"));
        }
        Ok(Self {
            messages,
            char_spacing,
        })
    }

    fn message(&self, slot: usize) -> Message {
        self.messages[slot % self.messages.len()].clone()
    }
}

impl Default for EffectOptions {
    fn default() -> Self {
        Self {
            messages: crate::config::DEFAULT_MESSAGES
                .iter()
                .map(|text| Message::lossy(text))
                .collect(),
            char_spacing: DEFAULT_CHAR_SPACING,
        }
    }
}

macro_rules! effect_kinds {
    ($($variant:ident => $name:literal,)*) => {
        /// Every registered effect, selectable by name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EffectKind {
            $($variant,)*
        }

        impl EffectKind {
            pub const ALL: &'static [EffectKind] = &[$(EffectKind::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(EffectKind::$variant => $name,)*
                }
            }
        }

        impl FromStr for EffectKind {
            type Err = ShadesError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($name => Ok(EffectKind::$variant),)*
                    other => Err(ShadesError::UnknownEffect(other.to_string())),
                }
            }
        }
    };
}

effect_kinds! {
    ThreeSine => "three_sine",
    Plasma => "plasma",
    Rider => "rider",
    Glitter => "glitter",
    ColorFill => "color_fill",
    ThreeDee => "three_dee",
    SideRain => "side_rain",
    Confetti => "confetti",
    SlantBars => "slant_bars",
    ScrollText0 => "scroll_text_0",
    ScrollText1 => "scroll_text_1",
    ScrollText2 => "scroll_text_2",
    Analyzer => "analyzer",
    Vu => "vu",
    RgbPulse => "rgb_pulse",
    AudioPlasma => "audio_plasma",
    AudioCirc => "audio_circ",
    AudioStripes => "audio_stripes",
    LensStripes => "audio_stripes_lens",
    Outline => "outline",
    AudioOutline => "audio_outline",
    Growth => "growth",
    Expansion => "expansion",
    Rings => "rings",
}

impl EffectKind {
    /// Instantiates a fresh, uninitialised effect of this kind.
    pub fn build(self, options: &EffectOptions) -> Box<dyn Effect> {
        use crate::Rgb;

        let spacing = options.char_spacing;
        match self {
            EffectKind::ThreeSine => Box::new(ThreeSine::default()),
            EffectKind::Plasma => Box::new(Plasma::default()),
            EffectKind::Rider => Box::new(Rider::default()),
            EffectKind::Glitter => Box::new(Glitter),
            EffectKind::ColorFill => Box::new(ColorFill::default()),
            EffectKind::ThreeDee => Box::new(ThreeDee),
            EffectKind::SideRain => Box::new(SideRain),
            EffectKind::Confetti => Box::new(Confetti),
            EffectKind::SlantBars => Box::new(SlantBars::default()),
            EffectKind::ScrollText0 => Box::new(ScrollText::new(
                "scroll_text_0",
                options.message(0),
                TextStyle::Solid {
                    foreground: Rgb::RED,
                },
                Rgb::BLACK,
                spacing,
            )),
            EffectKind::ScrollText1 => Box::new(ScrollText::new(
                "scroll_text_1",
                options.message(1),
                TextStyle::PaletteSweep,
                Rgb::BLACK,
                spacing,
            )),
            EffectKind::ScrollText2 => Box::new(ScrollText::new(
                "scroll_text_2",
                options.message(2),
                TextStyle::Solid {
                    foreground: Rgb::GREEN,
                },
                Rgb::new(0, 0, 8),
                spacing,
            )),
            EffectKind::Analyzer => Box::new(Analyzer),
            EffectKind::Vu => Box::new(Vu),
            EffectKind::RgbPulse => Box::new(RgbPulse::default()),
            EffectKind::AudioPlasma => Box::new(AudioPlasma::default()),
            EffectKind::AudioCirc => Box::new(AudioCirc),
            EffectKind::AudioStripes => Box::new(AudioStripes),
            EffectKind::LensStripes => Box::new(LensStripes),
            EffectKind::Outline => Box::new(OutlineChase::default()),
            EffectKind::AudioOutline => Box::new(AudioOutline::default()),
            EffectKind::Growth => Box::new(GrowthStages::default()),
            EffectKind::Expansion => Box::new(Expansion::default()),
            EffectKind::Rings => Box::new(Rings::default()),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
