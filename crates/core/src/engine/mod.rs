//! The frame loop: hue and fade housekeeping plus cadence-gated effect steps.

use crate::{
    config::TimingConfig,
    effects::{EffectKind, EffectOptions, EffectSlot},
    AppConfig, AudioFrame, Canvas, Entropy, FadeProcessor, FrameClock, IntervalTimer,
    PaletteLibrary, PaletteProvider, Result, SeededEntropy, SharedContext,
};

/// Owns everything one display needs and runs exactly one effect on it.
pub struct Engine {
    canvas: Canvas,
    ctx: SharedContext,
    slot: EffectSlot,
    kind: EffectKind,
    options: EffectOptions,
    timing: TimingConfig,
    rng: Box<dyn Entropy>,
    palettes: Box<dyn PaletteProvider>,
    fade: FadeProcessor,
    clock: FrameClock,
    hue_timer: IntervalTimer,
    effect_timer: IntervalTimer,
    /// Beat onsets seen since the effect last stepped.
    pending_beat: bool,
}

impl Engine {
    /// Builds an engine from a validated configuration.
    pub fn from_config(config: &AppConfig, kind: EffectKind) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => SeededEntropy::with_seed(seed),
            None => SeededEntropy::new(),
        };
        Ok(Self::new(
            config.canvas(),
            config.timing.clone(),
            config.effect_options()?,
            Box::new(rng),
            Box::new(PaletteLibrary::default()),
            kind,
        ))
    }

    pub fn new(
        canvas: Canvas,
        timing: TimingConfig,
        options: EffectOptions,
        rng: Box<dyn Entropy>,
        palettes: Box<dyn PaletteProvider>,
        kind: EffectKind,
    ) -> Self {
        let slot = EffectSlot::new(kind.build(&options));
        Self {
            canvas,
            ctx: SharedContext::new(),
            slot,
            kind,
            options,
            timing,
            rng,
            palettes,
            fade: FadeProcessor::new(),
            clock: FrameClock::new(),
            hue_timer: IntervalTimer::new(0),
            effect_timer: IntervalTimer::new(0),
            pending_beat: false,
        }
    }

    /// Advances the engine to `now_ms`. Returns `true` when the effect drew
    /// a new frame that should be presented.
    ///
    /// A freshly switched effect runs on the first tick; afterwards it runs
    /// once strictly more than its cadence has passed since its last step.
    /// A beat reported on a tick where the effect is not due is held until
    /// its next step.
    pub fn tick(&mut self, now_ms: u64, audio: &AudioFrame) -> bool {
        let now = self.clock.observe(now_ms);
        self.ctx.clock_ms = now;
        self.pending_beat |= audio.beat;

        if self.hue_timer.ready(now, self.timing.hue_interval_ms) {
            self.ctx.advance_hue(self.timing.hue_step);
            self.fade.apply(&mut self.canvas, self.ctx.fade);
        }

        let due = if self.slot.is_running() {
            self.effect_timer
                .ready(now, u64::from(self.slot.cadence_ms()))
        } else {
            self.effect_timer.restart(now);
            true
        };
        if !due {
            return false;
        }

        let audio = AudioFrame {
            beat: std::mem::take(&mut self.pending_beat),
            ..*audio
        };
        self.slot.run(
            &mut self.canvas,
            &mut self.ctx,
            &audio,
            self.palettes.as_mut(),
            self.rng.as_mut(),
        );
        true
    }

    /// Replaces the running effect with a fresh instance of `kind`.
    pub fn switch_to(&mut self, kind: EffectKind) {
        tracing::info!(from = self.kind.name(), to = kind.name(), "switching effect");
        self.ctx.reset_requirements();
        self.pending_beat = false;
        self.slot = EffectSlot::new(kind.build(&self.options));
        self.kind = kind;
    }

    /// Whether the running effect declared that it listens to audio.
    pub fn audio_active(&self) -> bool {
        self.ctx.audio_active
    }

    /// Whether the driver should poll the audio feed before the next tick.
    /// An effect that has not been set up yet may turn out to listen, so
    /// its first step is always fed.
    pub fn wants_audio(&self) -> bool {
        self.ctx.audio_active || !self.slot.is_running()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn context(&self) -> &SharedContext {
        &self.ctx
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn fade_passes(&self) -> u64 {
        self.fade.applied()
    }
}
