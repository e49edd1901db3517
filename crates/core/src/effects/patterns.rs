//! Ambient patterns that ignore the audio feed.

use crate::{
    math::{cos8, qmul8, sin8, triwave8, wrap8},
    Hsv, Outline, Palette, PaletteFamily, Rgb,
};

use super::{Effect, Frame, Setup};

/// Three sine waves, one per color channel, with slightly different speeds.
#[derive(Debug, Clone, Default)]
pub struct ThreeSine {
    offset: u8,
}

impl Effect for ThreeSine {
    fn name(&self) -> &'static str {
        "three_sine"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.ctx.fade = 0;
        20
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let canvas = &mut *frame.canvas;
        let row_step = (255 / canvas.height()) as i32;

        for x in 0..canvas.width() {
            let column = (x as u8).wrapping_mul(16);
            for y in 0..canvas.height() {
                let row = y as i32 * row_step;
                let distance = |speed: u8| {
                    let wave = sin8(self.offset.wrapping_mul(speed).wrapping_add(column));
                    255 - qmul8((row - i32::from(wave)).unsigned_abs() as u8, 2)
                };
                canvas.set(x, y, Rgb::new(distance(9), distance(10), distance(11)));
            }
        }

        self.offset = self.offset.wrapping_add(1);
    }
}

/// Radial hue waves around a slowly orbiting center.
#[derive(Debug, Clone, Default)]
pub struct Plasma {
    offset: u8,
    orbit: u16,
}

impl Effect for Plasma {
    fn name(&self) -> &'static str {
        "plasma"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.ctx.fade = 0;
        10
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let canvas = &mut *frame.canvas;
        let (cx, cy) = canvas.center();
        let orbit = (self.orbit >> 8) as u8;
        let ox = f32::from(cos8(orbit)) - 127.0;
        let oy = f32::from(sin8(orbit)) - 127.0;

        for x in 0..canvas.width() {
            for y in 0..canvas.height() {
                let dx = (x as f32 - cx) * 10.0 + ox;
                let dy = (y as f32 - cy) * 10.0 + oy;
                let hue = sin8(wrap8(dx.hypot(dy) + f32::from(self.offset)));
                canvas.set(x, y, Hsv::new(hue, 255, 255));
            }
        }

        self.offset = self.offset.wrapping_add(1);
        self.orbit = self.orbit.wrapping_add(16);
    }
}

/// A soft vertical bar scanning left and right in the current hue.
#[derive(Debug, Clone, Default)]
pub struct Rider {
    position: u8,
}

impl Effect for Rider {
    fn name(&self) -> &'static str {
        "rider"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        self.position = 0;
        setup.ctx.fade = 0;
        5
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let canvas = &mut *frame.canvas;
        let column_step = (256 / canvas.width()) as i32;
        let sweep = i32::from(triwave8(self.position)) * 2;

        for x in 0..canvas.width() {
            let spread = ((x as i32 * column_step - sweep + 127).abs() * 3).min(255);
            let color = Hsv::new(frame.ctx.hue, 255, (255 - spread) as u8);
            for y in 0..canvas.height() {
                canvas.set(x, y, color);
            }
        }

        self.position = self.position.wrapping_add(1);
    }
}

/// Random shimmer in the current hue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Glitter;

impl Effect for Glitter {
    fn name(&self) -> &'static str {
        "glitter"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.ctx.fade = 0;
        15
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        for x in 0..frame.canvas.width() {
            for y in 0..frame.canvas.height() {
                let value = frame.rng.below(5) * 63;
                frame.canvas.set(x, y, Hsv::new(frame.ctx.hue, 255, value));
            }
        }
    }
}

const FILL_ENTRIES: usize = 16;
const FILL_ROW_MS: u32 = 45;
const FILL_COLUMN_MS: u32 = 20;
const FILL_PAUSE_MS: u32 = 300;

/// Wipes saturated colors across the display, rotating through
/// down, right, up and left.
#[derive(Debug, Clone, Default)]
pub struct ColorFill {
    color: usize,
    line: usize,
    direction: u8,
}

impl Effect for ColorFill {
    fn name(&self) -> &'static str {
        "color_fill"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        self.color = 0;
        self.line = 0;
        self.direction = 0;
        setup.ctx.palette = Palette::rainbow();
        setup.ctx.fade = 0;
        FILL_ROW_MS
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let (width, height) = (frame.canvas.width(), frame.canvas.height());
        let color = frame.ctx.palette.entry(self.color, FILL_ENTRIES);
        let horizontal = self.direction & 1 == 1;

        if horizontal {
            frame.set_cadence(FILL_COLUMN_MS);
            let x = if self.direction == 3 {
                width - 1 - self.line
            } else {
                self.line
            };
            for y in 0..height {
                frame.canvas.set(x, y, color);
            }
        } else {
            frame.set_cadence(FILL_ROW_MS);
            let y = if self.direction == 2 {
                height - 1 - self.line
            } else {
                self.line
            };
            for x in 0..width {
                frame.canvas.set(x, y, color);
            }
        }

        self.line += 1;
        let span = if horizontal { width } else { height };
        if self.line >= span {
            self.line = 0;
            self.color = (self.color + usize::from(frame.rng.between(3, 6))) % FILL_ENTRIES;
            self.direction = (self.direction + 1) % 4;
            frame.set_cadence(FILL_PAUSE_MS);
        }
    }
}

/// Blue left lens, red right lens, like anaglyph glasses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeDee;

impl Effect for ThreeDee {
    fn name(&self) -> &'static str {
        "three_dee"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.ctx.fade = 0;
        50
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let canvas = &mut *frame.canvas;
        let lenses = canvas.lenses();

        let bridge = lenses.bridge();
        for x in 0..canvas.width() {
            let color = if bridge.contains(&x) {
                Rgb::BLACK
            } else if x < bridge.start {
                Rgb::BLUE
            } else {
                Rgb::RED
            };
            for y in 0..canvas.height() {
                canvas.set(x, y, color);
            }
        }

        // Nose bridge corners.
        if let Some(x) = bridge.start.checked_sub(1) {
            canvas.set(x, 0, Rgb::BLACK);
        }
        if bridge.end < canvas.width() {
            canvas.set(bridge.end, 0, Rgb::BLACK);
        }
    }
}

/// Random drops entering on the left edge and drifting right.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideRain;

impl Effect for SideRain {
    fn name(&self) -> &'static str {
        "side_rain"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.ctx.fade = 0;
        30
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let canvas = &mut *frame.canvas;
        canvas.shift_right();
        let drop = usize::from(frame.rng.below(canvas.height() as u8));
        for y in 0..canvas.height() {
            canvas.set(0, y, Rgb::BLACK);
        }
        canvas.set(0, drop, Hsv::new(frame.ctx.hue, 255, 255));
    }
}

const CONFETTI_PER_STEP: usize = 4;

/// Palette colored sparks at random positions, left to fade out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Confetti;

impl Effect for Confetti {
    fn name(&self) -> &'static str {
        "confetti"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.select_palette(PaletteFamily::Ambient);
        setup.ctx.fade = 1;
        10
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let (width, height) = (frame.canvas.width() as u16, frame.canvas.height() as u16);
        for _ in 0..CONFETTI_PER_STEP {
            let x = usize::from(frame.rng.below16(width));
            let y = usize::from(frame.rng.below16(height));
            let index = frame.rng.below16(255) as u8;
            frame.canvas.set(x, y, frame.ctx.palette.color(index, 255));
        }
    }
}

/// Diagonal bars of the current hue sliding across the display.
#[derive(Debug, Clone, Default)]
pub struct SlantBars {
    position: u8,
}

impl Effect for SlantBars {
    fn name(&self) -> &'static str {
        "slant_bars"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.ctx.fade = 0;
        5
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        for x in 0..frame.canvas.width() {
            for y in 0..frame.canvas.height() {
                let phase = (x as u8)
                    .wrapping_mul(32)
                    .wrapping_add((y as u8).wrapping_mul(32))
                    .wrapping_add(self.position);
                frame
                    .canvas
                    .set(x, y, Hsv::new(frame.ctx.hue, 255, sin8(phase)));
            }
        }
        self.position = self.position.wrapping_sub(4);
    }
}

/// One pixel running around the display border, leaving a fading trail.
#[derive(Debug, Clone, Default)]
pub struct OutlineChase {
    outline: Option<Outline>,
    position: usize,
}

impl Effect for OutlineChase {
    fn name(&self) -> &'static str {
        "outline"
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        setup.canvas.clear();
        self.outline = Some(Outline::perimeter(setup.canvas));
        self.position = 0;
        setup.ctx.palette = Palette::rainbow();
        setup.ctx.fade = 2;
        25
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let Some(outline) = &self.outline else {
            return;
        };
        let index = outline.index(self.position);
        frame
            .canvas
            .set_index(index, Hsv::new(frame.ctx.hue, 255, 255));
        self.position = (self.position + 1) % outline.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{effects::testing::Harness, Canvas};

    fn frames(harness: &mut Harness, count: usize) -> Vec<Canvas> {
        (0..count)
            .map(|_| {
                harness.step_silent();
                harness.canvas.clone()
            })
            .collect()
    }

    #[test]
    fn three_sine_loops_after_one_counter_period() {
        let mut harness = Harness::new(Box::new(ThreeSine::default()));
        let first = frames(&mut harness, 3);
        let _ = frames(&mut harness, 253);
        let again = frames(&mut harness, 3);
        assert_eq!(first, again);
    }

    #[test]
    fn slant_bars_loop_after_sixty_four_steps() {
        let mut harness = Harness::new(Box::new(SlantBars::default()));
        let first = frames(&mut harness, 1);
        let _ = frames(&mut harness, 63);
        assert_eq!(frames(&mut harness, 1), first);
    }

    #[test]
    fn rider_paints_whole_columns() {
        let mut harness = Harness::new(Box::new(Rider::default()));
        for _ in 0..40 {
            harness.step_silent();
            for x in 0..16 {
                let top = harness.canvas.get(x, 0);
                assert!((1..5).all(|y| harness.canvas.get(x, y) == top));
            }
        }
    }

    #[test]
    fn glitter_uses_five_brightness_levels() {
        let mut harness = Harness::new(Box::new(Glitter));
        harness.step_silent();
        for pixel in harness.canvas.pixels() {
            assert_eq!(pixel.r % 63, 0);
            assert_eq!((pixel.g, pixel.b), (0, 0));
        }
    }

    #[test]
    fn color_fill_pauses_after_each_wipe() {
        let mut harness = Harness::new(Box::new(ColorFill::default()));
        let mut cadences = Vec::new();
        for _ in 0..21 {
            harness.step_silent();
            cadences.push(harness.slot.cadence_ms());
        }

        let mut expected = vec![FILL_ROW_MS; 4];
        expected.push(FILL_PAUSE_MS);
        expected.extend(std::iter::repeat(FILL_COLUMN_MS).take(15));
        expected.push(FILL_PAUSE_MS);
        assert_eq!(cadences, expected);
    }

    #[test]
    fn color_fill_starts_with_the_first_palette_entry() {
        let mut harness = Harness::new(Box::new(ColorFill::default()));
        harness.step_silent();
        for x in 0..16 {
            assert_eq!(harness.canvas.get(x, 0), Rgb::new(255, 0, 0));
            assert_eq!(harness.canvas.get(x, 1), Rgb::BLACK);
        }
    }

    #[test]
    fn three_dee_colors_each_lens() {
        let mut harness = Harness::new(Box::new(ThreeDee));
        harness.step_silent();
        assert_eq!(harness.canvas.get(0, 2), Rgb::BLUE);
        assert_eq!(harness.canvas.get(6, 2), Rgb::BLUE);
        assert_eq!(harness.canvas.get(7, 2), Rgb::BLACK);
        assert_eq!(harness.canvas.get(8, 2), Rgb::BLACK);
        assert_eq!(harness.canvas.get(9, 2), Rgb::RED);
        assert_eq!(harness.canvas.get(6, 0), Rgb::BLACK);
        assert_eq!(harness.canvas.get(9, 0), Rgb::BLACK);
    }

    #[test]
    fn side_rain_drops_one_pixel_per_step_and_drifts() {
        let mut harness = Harness::new(Box::new(SideRain));
        harness.step_silent();
        let lit = (0..5).filter(|&y| !harness.canvas.get(0, y).is_black()).count();
        assert_eq!(lit, 1);

        let entering: Vec<Rgb> = (0..5).map(|y| harness.canvas.get(0, y)).collect();
        harness.step_silent();
        let shifted: Vec<Rgb> = (0..5).map(|y| harness.canvas.get(1, y)).collect();
        assert_eq!(entering, shifted);
    }

    #[test]
    fn confetti_scatters_at_most_four_sparks() {
        let mut harness = Harness::new(Box::new(Confetti));
        harness.step_silent();
        let lit = harness.canvas.pixels().iter().filter(|p| !p.is_black()).count();
        assert!((1..=CONFETTI_PER_STEP).contains(&lit));
        assert_eq!(harness.ctx.fade, 1);
    }

    #[test]
    fn outline_walks_the_border_and_wraps() {
        let mut harness = Harness::new(Box::new(OutlineChase::default()));
        harness.step_silent();
        assert_eq!(harness.ctx.fade, 2);
        assert_eq!(harness.canvas.get(0, 0), Rgb::RED);
        assert_eq!(harness.canvas.get(1, 0), Rgb::BLACK);

        for _ in 1..38 {
            harness.step_silent();
        }
        // The last step before wrapping lands at (0, 1).
        assert_eq!(harness.canvas.get(0, 1), Rgb::RED);
        assert!(harness.canvas.get(2, 2).is_black());
    }
}
