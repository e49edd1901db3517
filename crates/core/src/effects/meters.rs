//! Audio meters and other effects that redraw straight from band energy.

use crate::{
    math::{clamp_trunc, cos8, sin8, wrap8},
    Hsv, Outline, Palette, PaletteFamily, Rgb,
};

use super::{Effect, Frame, Setup};

const METER_FADE_FACTOR: i32 = 5;
const MAX_METER_INDEX: i32 = 240;

/// Palette index and brightness for one meter cell.
fn meter_color(palette: &Palette, sense: i32, index: i32) -> Rgb {
    let brightness = (sense * METER_FADE_FACTOR).clamp(0, 255);
    let index = index.clamp(0, MAX_METER_INDEX);
    palette.color(index as u8, brightness as u8)
}

fn audio_setup(setup: &mut Setup<'_>, palette: bool) {
    if palette {
        setup.select_palette(PaletteFamily::Audio);
    }
    setup.ctx.audio_active = true;
    setup.ctx.fade = 0;
}

/// Mirrored spectrum analyser: one column per band, bass in the outer
/// columns, the two lens halves mirrored around the bridge.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer;

impl Analyzer {
    const SCALE: f32 = 1.5;
    const PALETTE_FACTOR: i32 = 2;
    const LAST_BAND_COLUMN: usize = 6;
}

impl Effect for Analyzer {
    fn name(&self) -> &'static str {
        "analyzer"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        audio_setup(setup, true);
        10
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let (width, height) = (frame.canvas.width(), frame.canvas.height());
        let row_scale = 255.0 / height as f32;
        let palette = &frame.ctx.palette;

        for x in 0..width / 2 {
            // The first band is spread at half strength over two columns.
            let level = if x < 2 {
                (frame.audio.decayed[0] / 2.0) as i32
            } else if x <= Self::LAST_BAND_COLUMN {
                frame.audio.decayed[x - 1] as i32
            } else {
                0
            };

            for y in 0..height {
                let color = if x > Self::LAST_BAND_COLUMN {
                    Rgb::BLACK
                } else {
                    let sense = (level as f32 / Self::SCALE
                        - row_scale * (height - 1 - y) as f32) as i32;
                    meter_color(palette, sense, sense / Self::PALETTE_FACTOR - 15)
                };
                frame.canvas.set(x, y, color);
                frame.canvas.set(width - x - 1, y, color);
            }
        }
    }
}

/// Horizontal VU meter growing outward from both edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vu;

impl Vu {
    const SCALE: f32 = 2.0;
    const PALETTE_FACTOR: f32 = 1.5;
}

impl Effect for Vu {
    fn name(&self) -> &'static str {
        "vu"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        audio_setup(setup, true);
        10
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let (width, height) = (frame.canvas.width(), frame.canvas.height());
        let column_scale = 255.0 / (width / 2) as f32;
        let level = frame.audio.decayed_sum(0..4) / 4.0;

        for x in 0..width / 2 {
            let sense = (level / Self::SCALE - column_scale * x as f32) as i32;
            let index = (sense as f32 / Self::PALETTE_FACTOR - 15.0) as i32;
            let color = meter_color(&frame.ctx.palette, sense, index);
            for y in 0..height {
                frame.canvas.set(x, y, color);
                frame.canvas.set(width - x - 1, y, color);
            }
        }
    }
}

const PULSE_COLORS: [Rgb; 3] = [Rgb::RED, Rgb::LIME, Rgb::BLUE];

/// Floods the display with red, lime or blue on every beat.
#[derive(Debug, Clone, Default)]
pub struct RgbPulse {
    cycle: usize,
}

impl Effect for RgbPulse {
    fn name(&self) -> &'static str {
        "rgb_pulse"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.ctx.audio_active = true;
        setup.ctx.fade = 1;
        1
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        if frame.audio.beat {
            frame.canvas.fill(PULSE_COLORS[self.cycle]);
            self.cycle = (self.cycle + 1) % PULSE_COLORS.len();
        }
    }
}

/// Plasma whose orbit speed follows the bass energy.
#[derive(Debug, Clone, Default)]
pub struct AudioPlasma {
    offset: u8,
    orbit: u16,
}

impl Effect for AudioPlasma {
    fn name(&self) -> &'static str {
        "audio_plasma"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        audio_setup(setup, true);
        10
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let (cx, cy) = frame.canvas.center();
        let orbit = (self.orbit >> 8) as u8;
        let ox = ((i32::from(cos8(orbit)) - 127) / 2) as f32;
        let oy = ((i32::from(sin8(orbit)) - 127) / 2) as f32;

        for x in 0..frame.canvas.width() {
            for y in 0..frame.canvas.height() {
                let dx = (x as f32 - cx) * 12.0 + ox;
                let dy = (y as f32 - cy) * 12.0 + oy;
                let index = sin8(wrap8(dx.hypot(dy) + f32::from(self.offset)));
                frame.canvas.set(x, y, frame.ctx.palette.color(index, 255));
            }
        }

        self.offset = self.offset.wrapping_add(1);
        let bass = frame.audio.decayed_sum(0..3);
        self.orbit = self.orbit.wrapping_add((bass as i64) as u16);
    }
}

/// Red, green and blue halos around the display center, sized by the
/// bass, mid and high bands.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioCirc;

impl AudioCirc {
    /// Energy divided by the scaled distance; anything under `floor` is
    /// cut to black.
    fn halo(energy: f32, distance: f32, falloff: f32, floor: i32) -> u8 {
        let level = (energy / (distance * falloff)) as i32;
        if level < floor {
            0
        } else {
            level.min(255) as u8
        }
    }
}

impl Effect for AudioCirc {
    fn name(&self) -> &'static str {
        "audio_circ"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        audio_setup(setup, false);
        10
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let (cx, cy) = frame.canvas.center();
        let audio = frame.audio;

        for x in 0..frame.canvas.width() {
            for y in 0..frame.canvas.height() {
                let distance = (x as f32 - cx).hypot(y as f32 - cy);
                let color = Rgb::new(
                    Self::halo(audio.raw[0], distance, 1.5, 90),
                    Self::halo(audio.decayed[2], distance, 1.1, 60),
                    Self::halo(audio.decayed[5], distance, 1.2, 60),
                );
                frame.canvas.set(x, y, color);
            }
        }
    }
}

const STRIPE_ROWS: usize = 5;
const STRIPE_DIVISOR: f32 = 1.8;
const STRIPE_FALLOFF: f32 = 20.0;
const MAX_STRIPE_LEVEL: i32 = 239;
const MAX_STRIPE_BRIGHTNESS: i32 = 254;

fn stripe_brightness(level: i32, distance: f32, gain: f32) -> u8 {
    clamp_trunc(
        (level as f32 - distance * STRIPE_FALLOFF) * gain,
        0,
        MAX_STRIPE_BRIGHTNESS,
    ) as u8
}

/// One horizontal stripe per band, widest in the middle when loud.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioStripes;

impl Effect for AudioStripes {
    fn name(&self) -> &'static str {
        "audio_stripes"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        audio_setup(setup, true);
        25
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let (width, height) = (frame.canvas.width(), frame.canvas.height());
        let (cx, _) = frame.canvas.center();
        frame.canvas.clear();

        for row in 0..STRIPE_ROWS.min(height) {
            let mut level = (frame.audio.peaks[row + 1] / STRIPE_DIVISOR) as i32;
            if row == 0 {
                level /= 2;
            }
            let level = level.clamp(0, MAX_STRIPE_LEVEL);

            for x in 0..width {
                let brightness = stripe_brightness(level, (cx - x as f32).abs(), 3.0);
                let color = frame.ctx.palette.color(level as u8, brightness);
                frame.canvas.set(x, height - 1 - row, color);
            }
        }
    }
}

/// Bands mapped to stripe rows, bottom to top.
const LENS_STRIPE_BANDS: [usize; STRIPE_ROWS] = [5, 1, 0, 2, 5];

/// Band stripes centered on each lens, dark across the bridge.
#[derive(Debug, Clone, Copy, Default)]
pub struct LensStripes;

impl Effect for LensStripes {
    fn name(&self) -> &'static str {
        "audio_stripes_lens"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        audio_setup(setup, true);
        20
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let height = frame.canvas.height();
        let lenses = frame.canvas.lenses();
        frame.canvas.clear();

        for (row, &band) in LENS_STRIPE_BANDS.iter().enumerate().take(height) {
            let mut level = (frame.audio.peaks[band] / STRIPE_DIVISOR) as i32;
            if row == 2 {
                level /= 2;
            }
            if row == 0 || row == STRIPE_ROWS - 1 {
                // High bands are quiet; lift them so they stay visible.
                level = (level as f32 * 2.5) as i32;
            }
            let level = level.clamp(0, MAX_STRIPE_LEVEL);
            let y = height - 1 - row;

            for lens in lenses.iter() {
                for x in lens.columns.clone() {
                    let distance = (lens.center_x as f32 - x as f32).abs();
                    let brightness = stripe_brightness(level, distance, 2.0);
                    frame
                        .canvas
                        .set(x, y, frame.ctx.palette.color(level as u8, brightness));
                }
            }
        }
    }
}

const OUTLINE_BEAT_CYCLE: u8 = 32;
const OUTLINE_TAPS: usize = 4;

/// Four dots chasing each other around the border. Speed follows the
/// bass; the direction flips every sixteen beats.
#[derive(Debug, Clone, Default)]
pub struct AudioOutline {
    outline: Option<Outline>,
    position: f32,
    beats: u8,
}

impl AudioOutline {
    pub fn position(&self) -> f32 {
        self.position
    }
}

impl Effect for AudioOutline {
    fn name(&self) -> &'static str {
        "audio_outline"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.canvas.clear();
        self.outline = Some(Outline::perimeter(setup.canvas));
        self.position = 0.0;
        self.beats = 0;
        setup.ctx.palette = Palette::rainbow();
        setup.ctx.fade = 10;
        setup.ctx.audio_active = true;
        15
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let Some(outline) = &self.outline else {
            return;
        };
        let len = outline.len();
        let bass = frame.audio.decayed_sum(0..2);

        let brightness = clamp_trunc(bass, 0, 255) as u8;
        let color = Hsv::new(frame.ctx.hue, 255, brightness);
        let spacing = (len / OUTLINE_TAPS).saturating_sub(1);
        for tap in 0..OUTLINE_TAPS {
            let position = (self.position as usize + spacing * tap) % len;
            frame.canvas.add_index(outline.index(position), color);
        }

        let increment = (bass / 600.0).max(0.1).min(1.0);
        if frame.audio.beat {
            self.beats = (self.beats + 1) % OUTLINE_BEAT_CYCLE;
        }
        if self.beats < OUTLINE_BEAT_CYCLE / 2 {
            self.position += increment;
        } else {
            self.position -= increment;
        }

        // Wrap after the move; the next step reads the corrected value.
        let last = (len - 1) as f32;
        if self.position > last {
            self.position = 0.0;
        }
        if self.position < 0.0 {
            self.position = last;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{effects::testing::Harness, AudioFrame, BAND_COUNT};

    fn steady(decayed: f32, peaks: f32) -> AudioFrame {
        AudioFrame {
            raw: [decayed; BAND_COUNT],
            decayed: [decayed; BAND_COUNT],
            peaks: [peaks; BAND_COUNT],
            beat: false,
        }
    }

    fn beat() -> AudioFrame {
        AudioFrame {
            beat: true,
            ..AudioFrame::silent()
        }
    }

    fn run(harness: &mut Harness, audio: &AudioFrame) {
        let now = harness.ctx.clock_ms + 10;
        harness.step(now, audio);
    }

    fn assert_mirrored(harness: &Harness) {
        for x in 0..8 {
            for y in 0..5 {
                assert_eq!(harness.canvas.get(x, y), harness.canvas.get(15 - x, y));
            }
        }
    }

    #[test]
    fn analyzer_is_mirrored_and_dark_when_silent() {
        let mut harness = Harness::new(Box::new(Analyzer));
        run(&mut harness, &AudioFrame::silent());
        assert!(harness.canvas.pixels().iter().all(|p| p.is_black()));
        assert!(harness.ctx.audio_active);

        run(&mut harness, &steady(600.0, 0.0));
        assert_mirrored(&harness);
        // Loud bands fill from the bottom row upward.
        assert!(!harness.canvas.get(3, 4).is_black());
        assert!(harness.canvas.get(7, 4).is_black());
    }

    #[test]
    fn vu_meter_grows_with_level() {
        let mut harness = Harness::new(Box::new(Vu));
        let lit = |harness: &Harness| {
            (0..8)
                .filter(|&x| !harness.canvas.get(x, 2).is_black())
                .count()
        };

        run(&mut harness, &steady(100.0, 0.0));
        let quiet = lit(&harness);
        run(&mut harness, &steady(500.0, 0.0));
        let loud = lit(&harness);
        assert!(loud > quiet, "{loud} <= {quiet}");
        assert_mirrored(&harness);
    }

    #[test]
    fn rgb_pulse_cycles_on_beats_only() {
        let mut harness = Harness::new(Box::new(RgbPulse::default()));
        run(&mut harness, &AudioFrame::silent());
        assert!(harness.canvas.get(0, 0).is_black());
        assert_eq!(harness.ctx.fade, 1);

        let mut seen = Vec::new();
        for _ in 0..4 {
            run(&mut harness, &beat());
            seen.push(harness.canvas.get(5, 2));
            run(&mut harness, &AudioFrame::silent());
        }
        assert_eq!(seen, vec![Rgb::RED, Rgb::LIME, Rgb::BLUE, Rgb::RED]);
    }

    #[test]
    fn audio_circ_cuts_quiet_halos() {
        let mut harness = Harness::new(Box::new(AudioCirc));
        run(&mut harness, &steady(30.0, 0.0));
        assert!(harness.canvas.pixels().iter().all(|p| p.is_black()));

        run(&mut harness, &steady(400.0, 0.0));
        let near = harness.canvas.get(7, 2);
        assert_eq!(near.r, 255);
        assert!(harness.canvas.get(0, 0).r < 90);
    }

    #[test]
    fn audio_halo_handles_a_pixel_on_the_center() {
        assert_eq!(AudioCirc::halo(10.0, 0.0, 1.5, 90), 255);
        assert_eq!(AudioCirc::halo(0.0, 0.0, 1.5, 90), 0);
    }

    #[test]
    fn stripes_fade_toward_the_edges() {
        let mut harness = Harness::new(Box::new(AudioStripes));
        run(&mut harness, &steady(0.0, 200.0));
        let middle = harness.canvas.get(7, 2);
        let edge = harness.canvas.get(0, 2);
        assert!(!middle.is_black());
        assert!(edge.is_black());
    }

    #[test]
    fn lens_stripes_keep_the_bridge_dark() {
        let mut harness = Harness::new(Box::new(LensStripes));
        run(&mut harness, &steady(0.0, 300.0));
        for y in 0..5 {
            assert!(harness.canvas.get(7, y).is_black());
            assert!(harness.canvas.get(8, y).is_black());
        }
        assert!(!harness.canvas.get(3, 2).is_black());
        assert!(!harness.canvas.get(12, 2).is_black());
    }

    #[test]
    fn audio_outline_speed_is_clamped() {
        let mut outline = AudioOutline::default();
        let mut harness = Harness::new(Box::new(AudioOutline::default()));
        let canvas = harness.canvas.clone();
        outline.outline = Some(Outline::perimeter(&canvas));

        let mut drive = |outline: &mut AudioOutline, audio: &AudioFrame| {
            let mut frame = Frame::new(
                &mut harness.canvas,
                &harness.ctx,
                audio,
                &mut harness.rng,
                15,
            );
            outline.step(&mut frame);
        };

        drive(&mut outline, &AudioFrame::silent());
        assert!((outline.position() - 0.1).abs() < 1e-6);
        drive(&mut outline, &steady(5_000.0, 0.0));
        assert!((outline.position() - 1.1).abs() < 1e-5);
    }

    #[test]
    fn audio_outline_reverses_after_sixteen_beats() {
        let mut outline = AudioOutline::default();
        let mut harness = Harness::new(Box::new(AudioOutline::default()));
        let canvas = harness.canvas.clone();
        outline.outline = Some(Outline::perimeter(&canvas));

        let loud_beat = AudioFrame {
            decayed: [300.0; BAND_COUNT],
            beat: true,
            ..AudioFrame::silent()
        };
        for _ in 0..15 {
            let mut frame =
                Frame::new(&mut harness.canvas, &harness.ctx, &loud_beat, &mut harness.rng, 15);
            outline.step(&mut frame);
        }
        let forward = outline.position();
        assert!((forward - 15.0).abs() < 1e-3);

        let mut frame =
            Frame::new(&mut harness.canvas, &harness.ctx, &loud_beat, &mut harness.rng, 15);
        outline.step(&mut frame);
        assert!((outline.position() - 14.0).abs() < 1e-3);
    }

    #[test]
    fn audio_outline_wraps_below_zero_to_the_last_step() {
        let mut outline = AudioOutline {
            beats: 16,
            ..AudioOutline::default()
        };
        let mut harness = Harness::new(Box::new(AudioOutline::default()));
        let canvas = harness.canvas.clone();
        outline.outline = Some(Outline::perimeter(&canvas));

        let silent = AudioFrame::silent();
        let mut frame = Frame::new(
            &mut harness.canvas,
            &harness.ctx,
            &silent,
            &mut harness.rng,
            15,
        );
        outline.step(&mut frame);
        assert_eq!(outline.position(), 37.0);
    }
}
