//! Beat-driven growth of concentric footprints around both lens centers.

use crate::{math::map_range, Canvas, Rgb, BAND_COUNT};

use super::{Effect, Frame, Setup};

/// Largest stage; stage 0 is dark.
pub const MAX_STAGE: u8 = 4;

/// Turns a beat signal into a single-tick rising edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BeatEdge {
    last: bool,
}

impl BeatEdge {
    pub fn rising(&mut self, level: bool) -> bool {
        let edge = level && !self.last;
        self.last = level;
        edge
    }
}

/// Paints every lens pixel within `reach` of its center for which `keep`
/// holds, clipped to the lens.
fn paint_lenses(canvas: &mut Canvas, reach: i32, color: Rgb, keep: impl Fn(i32, i32) -> bool) {
    let lenses = canvas.lenses();
    for lens in lenses.iter() {
        for dx in -reach..=reach {
            for dy in -reach..=reach {
                if !keep(dx, dy) {
                    continue;
                }
                if let Some((x, y)) = lens.offset(dx, dy, lenses.center_y, lenses.height) {
                    canvas.set(x, y, color);
                }
            }
        }
    }
}

/// Offset large enough to cover a whole lens from its center.
fn full_reach(canvas: &Canvas) -> i32 {
    canvas.width().max(canvas.height()) as i32
}

mod stages {
    pub const CADENCE_MS: u32 = 25;
    pub const RESET_AFTER_MS: u64 = 2_000;
    pub const INITIAL_HOLD_MS: u64 = 100;
    pub const HOLD_RANGE_MS: (i64, i64) = (50, 200);
    pub const BRIGHTNESS_RANGE: (i64, i64) = (50, 255);
    pub const BASS_FULL_SCALE: i64 = 400;
    pub const RED_BASS: f32 = 150.0;
}

/// Advances one stage per beat edge, holding each stage for a time that
/// shrinks as the bass gets louder, and falls dark after a silent spell.
#[derive(Debug, Clone)]
pub struct GrowthStages {
    stage: u8,
    last_change_ms: u64,
    hold_ms: u64,
    beat: BeatEdge,
}

impl Default for GrowthStages {
    fn default() -> Self {
        Self {
            stage: 0,
            last_change_ms: 0,
            hold_ms: stages::INITIAL_HOLD_MS,
            beat: BeatEdge::default(),
        }
    }
}

impl GrowthStages {
    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn hold_ms(&self) -> u64 {
        self.hold_ms
    }

    fn hold_for(bass: f32) -> u64 {
        let (min, max) = stages::HOLD_RANGE_MS;
        map_range(bass as i64, 0, stages::BASS_FULL_SCALE, max, min).clamp(min, max) as u64
    }

    fn brightness(bass: f32) -> u8 {
        let (min, max) = stages::BRIGHTNESS_RANGE;
        map_range(bass as i64, 0, stages::BASS_FULL_SCALE, min, max).clamp(min, max) as u8
    }

    fn stage_color(stage: u8, bass: f32) -> Rgb {
        match stage {
            0 => Rgb::BLACK,
            1 => Rgb::CRIMSON,
            2 if bass > stages::RED_BASS => Rgb::RED,
            2 => Rgb::CRIMSON,
            _ => Rgb::RED,
        }
    }

    fn draw(canvas: &mut Canvas, stage: u8, color: Rgb) {
        match stage {
            0 => {}
            1 => paint_lenses(canvas, 0, color, |_, _| true),
            2 => paint_lenses(canvas, 1, color, |_, _| true),
            3 => paint_lenses(canvas, 2, color, |_, _| true),
            _ => {
                let reach = full_reach(canvas);
                paint_lenses(canvas, reach, color, |_, _| true);
            }
        }
    }
}

impl Effect for GrowthStages {
    fn name(&self) -> &'static str {
        "growth"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.ctx.audio_active = true;
        setup.ctx.fade = 0;
        self.last_change_ms = setup.ctx.clock_ms;
        stages::CADENCE_MS
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let now = frame.now_ms();
        let bass = frame.audio.decayed_sum(0..3) / 3.0;
        let triggered = self.beat.rising(frame.audio.beat);

        frame.canvas.clear();
        let color = Self::stage_color(self.stage, bass).scale(Self::brightness(bass));
        Self::draw(frame.canvas, self.stage, color);

        if triggered && now.saturating_sub(self.last_change_ms) > self.hold_ms {
            self.stage = if self.stage >= MAX_STAGE { 0 } else { self.stage + 1 };
            self.last_change_ms = now;
            self.hold_ms = Self::hold_for(bass);
            tracing::trace!(stage = self.stage, hold_ms = self.hold_ms, "growth stage advanced");
        }

        if now.saturating_sub(self.last_change_ms) > stages::RESET_AFTER_MS {
            self.stage = 0;
            self.last_change_ms = now;
        }
    }
}

mod expansion {
    pub const CADENCE_MS: u32 = 20;
    pub const SMOOTHING: f32 = 0.15;
    pub const BEAT_BOOST: u8 = 80;
    pub const BOOST_DECAY: u8 = 3;
    pub const MIN_STEP_MS: u64 = 50;
    pub const TRANSITION_DIM: u8 = 50;
    pub const BASE_MAX: i64 = 200;
    pub const ENERGY_FULL_SCALE: i64 = 400;
    pub const TARGET_FULL_SCALE: i64 = 500;
    pub const DARK_BELOW: f32 = 30.0;
    pub const DIM_RED_BELOW: f32 = 200.0;
    pub const RED_BELOW: f32 = 300.0;
}

/// Rings that grow toward a target derived from smoothed overall energy
/// plus a decaying beat boost, moving at most one ring per step interval.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    smoothed: f32,
    expansion: u8,
    target: u8,
    last_change_ms: u64,
    boost: u8,
    beat: BeatEdge,
}

impl Expansion {
    pub fn expansion(&self) -> u8 {
        self.expansion
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    pub fn boost(&self) -> u8 {
        self.boost
    }

    fn ring_color(smoothed: f32, brightness: u8) -> Rgb {
        if smoothed < expansion::DARK_BELOW {
            Rgb::BLACK
        } else if smoothed < expansion::DIM_RED_BELOW {
            Rgb::new(brightness / 2, 0, 0)
        } else if smoothed < expansion::RED_BELOW {
            Rgb::new(brightness, 0, 0)
        } else {
            Rgb::new(brightness, 0, brightness / 8)
        }
    }

    fn draw(canvas: &mut Canvas, rings: u8, color: Rgb) {
        if rings >= 1 {
            paint_lenses(canvas, 0, color, |_, _| true);
        }
        if rings >= 2 {
            paint_lenses(canvas, 1, color, |dx, dy| dx != 0 || dy != 0);
        }
        if rings >= 3 {
            paint_lenses(canvas, 2, color, |dx, dy| dx.abs() == 2 || dy.abs() == 2);
        }
        if rings >= 4 {
            let reach = full_reach(canvas);
            paint_lenses(canvas, reach, color, |dx, dy| dx.abs() > 1 || dy.abs() > 1);
        }
    }
}

impl Effect for Expansion {
    fn name(&self) -> &'static str {
        "expansion"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.ctx.audio_active = true;
        setup.ctx.fade = 0;
        self.last_change_ms = setup.ctx.clock_ms;
        expansion::CADENCE_MS
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let now = frame.now_ms();
        let total = frame.audio.decayed.iter().sum::<f32>() / BAND_COUNT as f32;
        self.smoothed =
            self.smoothed * (1.0 - expansion::SMOOTHING) + total * expansion::SMOOTHING;

        frame.canvas.clear();

        if self.beat.rising(frame.audio.beat) {
            self.boost = expansion::BEAT_BOOST;
        }
        self.boost = self.boost.saturating_sub(expansion::BOOST_DECAY);

        let base = map_range(
            self.smoothed as i64,
            0,
            expansion::ENERGY_FULL_SCALE,
            0,
            expansion::BASE_MAX,
        )
        .clamp(0, expansion::BASE_MAX);
        let brightness = (base + i64::from(self.boost)).min(255) as u8;
        let color = Self::ring_color(self.smoothed, brightness);

        self.target = map_range(
            (self.smoothed + f32::from(self.boost)) as i64,
            0,
            expansion::TARGET_FULL_SCALE,
            0,
            i64::from(MAX_STAGE),
        )
        .clamp(0, i64::from(MAX_STAGE)) as u8;

        if self.target != self.expansion
            && now.saturating_sub(self.last_change_ms) > expansion::MIN_STEP_MS
        {
            if self.target > self.expansion {
                self.expansion += 1;
            } else {
                self.expansion -= 1;
            }
            self.last_change_ms = now;
        }

        let color = if self.expansion != self.target {
            color.scale(255 - expansion::TRANSITION_DIM)
        } else {
            color
        };
        Self::draw(frame.canvas, self.expansion, color);
    }
}
