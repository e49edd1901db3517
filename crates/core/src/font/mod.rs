//! Built-in 5x5 bitmap font.

use crate::{Result, ShadesError};

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 5;

/// Column-packed glyph: bit `y` of `columns[x]` lights row `y` of column `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Glyph {
    columns: [u8; GLYPH_WIDTH],
}

impl Glyph {
    /// Packs row bitmaps where the most significant of the low five bits is
    /// the leftmost column.
    const fn from_rows(rows: [u8; GLYPH_HEIGHT]) -> Self {
        let mut columns = [0u8; GLYPH_WIDTH];
        let mut x = 0;
        while x < GLYPH_WIDTH {
            let mut y = 0;
            while y < GLYPH_HEIGHT {
                if rows[y] & (0b10000 >> x) != 0 {
                    columns[x] |= 1 << y;
                }
                y += 1;
            }
            x += 1;
        }
        Self { columns }
    }

    pub fn column(&self, x: usize) -> u8 {
        self.columns[x]
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.columns[x] >> y & 1 == 1
    }

    /// Looks up the glyph for `c`; lower case folds to upper case.
    pub fn for_char(c: char) -> Option<Glyph> {
        let rows = match c.to_ascii_uppercase() {
            ' ' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
            'A' => [0b01110, 0b10001, 0b11111, 0b10001, 0b10001],
            'B' => [0b11110, 0b10001, 0b11110, 0b10001, 0b11110],
            'C' => [0b01111, 0b10000, 0b10000, 0b10000, 0b01111],
            'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b11110],
            'E' => [0b11111, 0b10000, 0b11110, 0b10000, 0b11111],
            'F' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000],
            'G' => [0b01111, 0b10000, 0b10011, 0b10001, 0b01111],
            'H' => [0b10001, 0b10001, 0b11111, 0b10001, 0b10001],
            'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b11111],
            'J' => [0b00111, 0b00010, 0b00010, 0b10010, 0b01100],
            'K' => [0b10010, 0b10100, 0b11000, 0b10100, 0b10010],
            'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
            'M' => [0b10001, 0b11011, 0b10101, 0b10001, 0b10001],
            'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001],
            'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
            'P' => [0b11110, 0b10001, 0b11110, 0b10000, 0b10000],
            'Q' => [0b01110, 0b10001, 0b10101, 0b10010, 0b01101],
            'R' => [0b11110, 0b10001, 0b11110, 0b10010, 0b10001],
            'S' => [0b01111, 0b10000, 0b01110, 0b00001, 0b11110],
            'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100],
            'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
            'V' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
            'W' => [0b10001, 0b10001, 0b10101, 0b11011, 0b10001],
            'X' => [0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
            'Y' => [0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
            'Z' => [0b11111, 0b00010, 0b00100, 0b01000, 0b11111],
            '0' => [0b01110, 0b10011, 0b10101, 0b11001, 0b01110],
            '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b01110],
            '2' => [0b11110, 0b00001, 0b01110, 0b10000, 0b11111],
            '3' => [0b11110, 0b00001, 0b00110, 0b00001, 0b11110],
            '4' => [0b10010, 0b10010, 0b11111, 0b00010, 0b00010],
            '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b11110],
            '6' => [0b01110, 0b10000, 0b11110, 0b10001, 0b01110],
            '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b00100],
            '8' => [0b01110, 0b10001, 0b01110, 0b10001, 0b01110],
            '9' => [0b01110, 0b10001, 0b01111, 0b00001, 0b01110],
            '!' => [0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
            '?' => [0b01110, 0b00001, 0b00110, 0b00000, 0b00100],
            '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00100],
            ',' => [0b00000, 0b00000, 0b00000, 0b00100, 0b01000],
            '-' => [0b00000, 0b00000, 0b01110, 0b00000, 0b00000],
            ':' => [0b00000, 0b00100, 0b00000, 0b00100, 0b00000],
            '\'' => [0b00100, 0b00100, 0b00000, 0b00000, 0b00000],
            '+' => [0b00000, 0b00100, 0b01110, 0b00100, 0b00000],
            '/' => [0b00001, 0b00010, 0b00100, 0b01000, 0b10000],
            '=' => [0b00000, 0b11111, 0b00000, 0b11111, 0b00000],
            '<' => [0b00010, 0b00100, 0b01000, 0b00100, 0b00010],
            '>' => [0b01000, 0b00100, 0b00010, 0b00100, 0b01000],
            '#' => [0b01010, 0b11111, 0b01010, 0b11111, 0b01010],
            '♥' => [0b01010, 0b11111, 0b11111, 0b01110, 0b00100],
            _ => return None,
        };
        Some(Glyph::from_rows(rows))
    }
}

/// Validated text, stored as the glyphs it renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
    glyphs: Vec<Glyph>,
}

impl Message {
    pub fn new(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(ShadesError::InvalidInput("message text must not be empty"));
        }
        let glyphs = text
            .chars()
            .map(|c| Glyph::for_char(c).ok_or(ShadesError::UnsupportedGlyph(c)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            text: text.to_string(),
            glyphs,
        })
    }

    /// Builds a message from `text`, dropping characters without a glyph.
    /// Text with nothing drawable becomes a single space.
    pub fn lossy(text: &str) -> Self {
        let mut kept = String::new();
        let mut glyphs = Vec::new();
        for c in text.chars() {
            if let Some(glyph) = Glyph::for_char(c) {
                kept.push(c);
                glyphs.push(glyph);
            }
        }
        if glyphs.is_empty() {
            kept.push(' ');
            glyphs.push(Glyph::default());
        }
        Self { text: kept, glyphs }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters, excluding the end-of-message sentinel.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph at `index`, or `None` once the end of the message is reached.
    pub fn glyph(&self, index: usize) -> Option<Glyph> {
        self.glyphs.get(index).copied()
    }
}
