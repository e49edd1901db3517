//! Three audio-driven rings orbiting the display center.

use crate::{
    math::{clamp_trunc, cos16, sin16},
    Canvas, Rgb,
};

use super::{Effect, Frame, Setup};

/// Upper bound for any ring radius, in pixels.
pub const MAX_RING_RADIUS: f32 = 13.0;

const CADENCE_MS: u32 = 10;
const SUBPIXEL: f32 = 256.0;
const RING_SHARPNESS: f32 = 192.0;
const ORBIT_STEP: u16 = 256;
const ORBIT_DIVISOR: i32 = 24;
const PHASES: [u16; 3] = [0, 21_845, 43_690];
const COLORS: [Rgb; 3] = [Rgb::RED, Rgb::GREEN, Rgb::BLUE];

const GAIN_SMOOTHING: f32 = 0.01;
const INITIAL_AVERAGE: f32 = 500.0;
const MAX_GAIN: f32 = 0.05;
const GAIN_TARGETS: [f32; 3] = [6.0, 6.0, 5.0];

/// Clamps a derived radius into `0..=MAX_RING_RADIUS`; NaN collapses to 0.
pub fn clamp_radius(radius: f32) -> f32 {
    if radius.is_nan() {
        0.0
    } else {
        radius.clamp(0.0, MAX_RING_RADIUS)
    }
}

/// Adds a ring of `color` to the canvas. `offset` moves the center away
/// from the canvas center in 1/256 pixel units.
pub fn draw_ring(canvas: &mut Canvas, offset: (i32, i32), radius: f32, color: Rgb) {
    let radius = clamp_radius(radius);
    let (cx, cy) = canvas.center();
    let ox = cx + offset.0 as f32 / SUBPIXEL;
    let oy = cy + offset.1 as f32 / SUBPIXEL;

    for x in 0..canvas.width() {
        for y in 0..canvas.height() {
            let distance = (x as f32 - ox).hypot(y as f32 - oy);
            let brightness =
                clamp_trunc(255.0 - ((distance - radius) * RING_SHARPNESS).abs(), 0, 255);
            canvas.add(x, y, color.scale(brightness as u8));
        }
    }
}

/// Slow running average of one band group and the gain derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RingGain {
    average: f32,
    target: f32,
}

impl RingGain {
    fn new(target: f32) -> Self {
        Self {
            average: INITIAL_AVERAGE,
            target,
        }
    }

    fn gain(&self) -> f32 {
        if self.average > 0.0 {
            (self.target / self.average).min(MAX_GAIN)
        } else {
            MAX_GAIN
        }
    }

    fn radius_for(&mut self, energy: f32) -> f32 {
        self.average = self.average * (1.0 - GAIN_SMOOTHING) + energy * GAIN_SMOOTHING;
        if !self.average.is_finite() {
            self.average = INITIAL_AVERAGE;
        }
        clamp_radius(energy * self.gain())
    }
}

#[derive(Debug, Clone)]
pub struct Rings {
    orbit: u16,
    gains: [RingGain; 3],
    radii: [f32; 3],
}

impl Default for Rings {
    fn default() -> Self {
        Self {
            orbit: 0,
            gains: GAIN_TARGETS.map(RingGain::new),
            radii: [0.0; 3],
        }
    }
}

impl Rings {
    /// Radii drawn on the most recent frame.
    pub fn radii(&self) -> [f32; 3] {
        self.radii
    }
}

impl Effect for Rings {
    fn name(&self) -> &'static str {
        "rings"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.ctx.fade = 0;
        setup.ctx.audio_active = true;
        CADENCE_MS
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        frame.canvas.clear();

        let audio = frame.audio;
        let energies = [
            audio.decayed_sum(0..3),
            audio.decayed_sum(3..5),
            audio.decayed_sum(5..7),
        ];

        for ring in 0..3 {
            let radius = self.gains[ring].radius_for(energies[ring]);
            self.radii[ring] = radius;

            let phase = self.orbit.wrapping_add(PHASES[ring]);
            let offset = (
                i32::from(cos16(phase)) / ORBIT_DIVISOR,
                i32::from(sin16(phase)) / ORBIT_DIVISOR,
            );
            draw_ring(frame.canvas, offset, radius, COLORS[ring]);
        }

        self.orbit = self.orbit.wrapping_add(ORBIT_STEP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{effects::testing::Harness, AudioFrame, Entropy, Layout, SeededEntropy};

    #[test]
    fn radius_clamp_holds_for_arbitrary_inputs() {
        let inputs = [
            -1.0e30,
            -1.0,
            0.0,
            5.0,
            13.0,
            13.5,
            1.0e30,
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::NAN,
        ];
        for input in inputs {
            let r = clamp_radius(input);
            assert!((0.0..=MAX_RING_RADIUS).contains(&r), "{input} -> {r}");
        }
    }

    #[test]
    fn radius_stays_bounded_for_wild_energy_sequences() {
        let mut gain = RingGain::new(6.0);
        let mut rng = SeededEntropy::with_seed(5);
        let specials = [f32::INFINITY, f32::NAN, -1.0e9, 1.0e12];
        for step in 0..5_000 {
            let energy = if step % 97 == 0 {
                specials[step / 97 % specials.len()]
            } else {
                (f32::from(rng.below16(60_000)) - 30_000.0) * 3.0
            };
            let r = gain.radius_for(energy);
            assert!((0.0..=MAX_RING_RADIUS).contains(&r));
        }
    }

    #[test]
    fn gain_normalises_toward_a_steady_radius() {
        for level in [300.0, 2_000.0] {
            let mut gain = RingGain::new(6.0);
            let mut radius = 0.0;
            for _ in 0..3_000 {
                radius = gain.radius_for(level);
            }
            assert!((radius - 6.0).abs() < 0.01, "level {level} settled at {radius}");
        }
    }

    #[test]
    fn gain_is_capped_on_quiet_passages() {
        let mut gain = RingGain::new(6.0);
        let mut radius = 0.0;
        for _ in 0..3_000 {
            radius = gain.radius_for(50.0);
        }
        assert!((gain.gain() - MAX_GAIN).abs() < f32::EPSILON);
        assert!((radius - 2.5).abs() < 1e-4);
    }

    #[test]
    fn ring_is_brightest_on_its_radius() {
        let mut canvas = Canvas::new(16, 5, Layout::RowMajor);
        draw_ring(&mut canvas, (0, 0), 0.5, Rgb::WHITE);
        assert_eq!(canvas.get(7, 2), Rgb::WHITE);
        assert_eq!(canvas.get(8, 2), Rgb::WHITE);
        assert!(canvas.get(7, 1).r < 255);
        assert_eq!(canvas.get(0, 0), Rgb::BLACK);
    }

    #[test]
    fn overlapping_rings_saturate() {
        let mut canvas = Canvas::new(16, 5, Layout::RowMajor);
        for _ in 0..4 {
            draw_ring(&mut canvas, (0, 0), 0.5, Rgb::new(100, 100, 100));
        }
        assert_eq!(canvas.get(7, 2), Rgb::WHITE);
    }

    #[test]
    fn each_frame_starts_from_a_cleared_canvas() {
        let mut harness = Harness::new(Box::new(Rings::default()));
        harness.step_silent();
        harness.canvas.fill(Rgb::WHITE);
        harness.step_silent();
        assert_eq!(harness.canvas.get(0, 0), Rgb::BLACK);
        assert_eq!(harness.canvas.get(15, 4), Rgb::BLACK);
    }

    #[test]
    fn ring_radii_follow_their_band_groups() {
        let mut rings = Rings::default();
        let mut harness = Harness::new(Box::new(Rings::default()));
        let mut audio = AudioFrame::silent();
        audio.decayed = [100.0, 100.0, 100.0, 0.0, 0.0, 50.0, 50.0];
        let mut frame = Frame::new(
            &mut harness.canvas,
            &harness.ctx,
            &audio,
            &mut harness.rng,
            CADENCE_MS,
        );
        rings.step(&mut frame);

        let [bass, mid, high] = rings.radii();
        let expected_bass = 300.0 * (6.0 / (500.0 * 0.99 + 3.0));
        assert!((bass - expected_bass).abs() < 1e-3);
        assert_eq!(mid, 0.0);
        assert!((high - 100.0 * (5.0 / (500.0 * 0.99 + 1.0))).abs() < 1e-3);
        assert!(rings.radii().iter().all(|r| *r <= MAX_RING_RADIUS));
    }
}
