use crate::{Glyph, Message, Palette, Rgb, GLYPH_HEIGHT, GLYPH_WIDTH};

use super::{Effect, Frame, Setup};

/// Blank columns between two characters.
pub const DEFAULT_CHAR_SPACING: usize = 2;

const CADENCE_MS: u32 = 35;
const SWEEP_STEP: u8 = 15;
const SWEEP_ROW_OFFSET: u8 = 16;

/// How lit glyph pixels are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Solid { foreground: Rgb },
    /// Palette colors that drift every tick and shift per row.
    PaletteSweep,
}

/// Scrolls a message right to left, one pixel column per tick.
///
/// The visible image is a circular buffer holding the last `width` columns
/// shifted in; the write slot trails the read origin by one so the newest
/// column lands on the rightmost pixel.
#[derive(Debug, Clone)]
pub struct ScrollText {
    name: &'static str,
    message: Message,
    style: TextStyle,
    background: Rgb,
    spacing: usize,
    char_index: usize,
    column: usize,
    glyph: Glyph,
    palette_cycle: u8,
    columns: Vec<u8>,
    origin: usize,
}

impl ScrollText {
    pub fn new(
        name: &'static str,
        message: Message,
        style: TextStyle,
        background: Rgb,
        spacing: usize,
    ) -> Self {
        Self {
            name,
            message,
            style,
            background,
            spacing,
            char_index: 0,
            column: 0,
            glyph: Glyph::default(),
            palette_cycle: 0,
            columns: Vec::new(),
            origin: 0,
        }
    }

    /// Current `(character index, column within glyph)` cursor.
    pub fn cursor(&self) -> (usize, usize) {
        (self.char_index, self.column)
    }

    /// Columns emitted per character, glyph plus gap.
    pub fn columns_per_char(&self) -> usize {
        GLYPH_WIDTH + self.spacing
    }

    fn next_column(&self) -> u8 {
        if self.column < GLYPH_WIDTH {
            self.glyph.column(self.column)
        } else {
            0
        }
    }

    fn advance_cursor(&mut self) {
        self.column += 1;
        if self.column < self.columns_per_char() {
            return;
        }
        self.column = 0;
        self.char_index += 1;
        self.glyph = match self.message.glyph(self.char_index) {
            Some(glyph) => glyph,
            None => {
                self.char_index = 0;
                self.message.glyph(0).unwrap_or_default()
            }
        };
    }
}

impl Effect for ScrollText {
    fn name(&self) -> &'static str {
        self.name
    }

    fn setup(&mut self, setup: &mut Setup<'_>) -> u32 {
        assert!(
            setup.canvas.height() >= GLYPH_HEIGHT,
            "text needs a canvas at least {GLYPH_HEIGHT} rows tall"
        );
        self.char_index = 0;
        self.column = 0;
        self.glyph = self.message.glyph(0).unwrap_or_default();
        self.columns = vec![0; setup.canvas.width()];
        self.origin = 0;
        setup.ctx.palette = Palette::rainbow();
        setup.ctx.fade = 0;
        CADENCE_MS
    }

    fn step(&mut self, frame: &mut Frame<'_>) {
        let width = self.columns.len();
        self.palette_cycle = self.palette_cycle.wrapping_add(SWEEP_STEP);

        self.columns[(self.origin + width - 1) % width] = self.next_column();

        for x in 0..width {
            let bits = self.columns[(self.origin + x) % width];
            for y in 0..GLYPH_HEIGHT {
                let color = if bits >> y & 1 == 1 {
                    match self.style {
                        TextStyle::Solid { foreground } => foreground,
                        TextStyle::PaletteSweep => frame.ctx.palette.color(
                            self.palette_cycle
                                .wrapping_add(y as u8 * SWEEP_ROW_OFFSET),
                            255,
                        ),
                    }
                } else {
                    self.background
                };
                frame.canvas.set(x, y, color);
            }
        }

        self.advance_cursor();
        self.origin = (self.origin + 1) % width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::Harness;

    fn scroller(text: &str, style: TextStyle) -> ScrollText {
        ScrollText::new(
            "scroll_text_test",
            Message::new(text).unwrap(),
            style,
            Rgb::BLACK,
            DEFAULT_CHAR_SPACING,
        )
    }

    fn column_bits(harness: &Harness, x: usize) -> u8 {
        (0..GLYPH_HEIGHT).fold(0u8, |bits, y| {
            if harness.canvas.get(x, y).is_black() {
                bits
            } else {
                bits | 1 << y
            }
        })
    }

    #[test]
    fn newest_column_follows_glyphs_and_gaps_without_skips() {
        let text = "HI";
        let solid = TextStyle::Solid { foreground: Rgb::RED };
        let mut harness = Harness::new(Box::new(scroller(text, solid)));

        let mut expected = Vec::new();
        for _ in 0..3 {
            for c in text.chars() {
                let glyph = Glyph::for_char(c).unwrap();
                expected.extend((0..GLYPH_WIDTH).map(|x| glyph.column(x)));
                expected.extend(std::iter::repeat(0).take(DEFAULT_CHAR_SPACING));
            }
        }

        let emitted: Vec<u8> = (0..expected.len())
            .map(|_| {
                harness.step_silent();
                column_bits(&harness, 15)
            })
            .collect();
        assert_eq!(emitted, expected);
    }

    #[test]
    fn image_scrolls_left_by_one_column_per_tick() {
        let solid = TextStyle::Solid { foreground: Rgb::RED };
        let mut harness = Harness::new(Box::new(scroller("AB", solid)));
        for _ in 0..20 {
            harness.step_silent();
        }
        let before: Vec<u8> = (0..16).map(|x| column_bits(&harness, x)).collect();
        harness.step_silent();
        let after: Vec<u8> = (0..16).map(|x| column_bits(&harness, x)).collect();
        assert_eq!(&before[1..], &after[..15]);
    }

    #[test]
    fn message_loop_closes_after_every_character_is_emitted() {
        let text = "SHADES 42";
        let solid = TextStyle::Solid { foreground: Rgb::RED };
        let effect = scroller(text, solid);
        let period = text.len() * effect.columns_per_char();
        let mut harness = Harness::new(Box::new(effect));

        for _ in 0..16 {
            harness.step_silent();
        }
        let reference = harness.canvas.clone();
        for _ in 0..period {
            harness.step_silent();
        }
        assert_eq!(harness.canvas, reference);
    }

    #[test]
    fn cursor_wraps_to_the_first_character() {
        let mut effect = scroller("OK", TextStyle::PaletteSweep);
        effect.glyph = effect.message.glyph(0).unwrap();
        for _ in 0..effect.columns_per_char() * 2 {
            effect.advance_cursor();
        }
        assert_eq!(effect.cursor(), (0, 0));
        assert_eq!(Some(effect.glyph), Glyph::for_char('O'));
    }

    #[test]
    fn palette_sweep_offsets_each_row() {
        let mut harness = Harness::new(Box::new(scroller("I", TextStyle::PaletteSweep)));
        harness.step_silent();

        // The first column of 'I' lights row 0 and row 4.
        let cycle = SWEEP_STEP;
        let palette = Palette::rainbow();
        assert_eq!(harness.canvas.get(15, 0), palette.color(cycle, 255));
        assert_eq!(
            harness.canvas.get(15, 4),
            palette.color(cycle.wrapping_add(4 * SWEEP_ROW_OFFSET), 255)
        );
        assert_eq!(harness.canvas.get(15, 2), Rgb::BLACK);
    }

    #[test]
    fn background_fills_unlit_pixels() {
        let mut effect = scroller(" ", TextStyle::Solid { foreground: Rgb::RED });
        effect.background = Rgb::new(0, 0, 8);
        let mut harness = Harness::new(Box::new(effect));
        harness.step_silent();
        for y in 0..GLYPH_HEIGHT {
            for x in 0..16 {
                assert_eq!(harness.canvas.get(x, y), Rgb::new(0, 0, 8));
            }
        }
    }
}
