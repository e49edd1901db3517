//! Pixel grid plus the coordinate systems effects address it through.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Physical wiring order of the pixels behind the logical `(x, y)` grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Every row runs left to right.
    #[default]
    RowMajor,
    /// Odd rows run right to left, as strips snaking back and forth.
    Serpentine,
}

impl Layout {
    pub fn index(self, x: usize, y: usize, width: usize) -> usize {
        match self {
            Layout::RowMajor => y * width + x,
            Layout::Serpentine if y % 2 == 1 => y * width + (width - 1 - x),
            Layout::Serpentine => y * width + x,
        }
    }
}

/// Fixed-size grid of colors addressed by logical coordinates.
///
/// Coordinates outside `[0, width) x [0, height)` are a caller bug and
/// panic rather than being clipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    layout: Layout,
    pixels: Vec<Rgb>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, layout: Layout) -> Self {
        assert!(width > 0 && height > 0, "canvas must have at least one pixel");
        Self {
            width,
            height,
            layout,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Maps logical coordinates to the linear pixel index.
    pub fn xy(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} canvas",
            self.width,
            self.height
        );
        self.layout.index(x, y, self.width)
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[self.xy(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, color: impl Into<Rgb>) {
        let index = self.xy(x, y);
        self.pixels[index] = color.into();
    }

    /// Saturating additive blend into the existing pixel.
    pub fn add(&mut self, x: usize, y: usize, color: impl Into<Rgb>) {
        let index = self.xy(x, y);
        self.pixels[index] += color.into();
    }

    pub fn get_index(&self, index: usize) -> Rgb {
        self.pixels[index]
    }

    pub fn set_index(&mut self, index: usize, color: impl Into<Rgb>) {
        self.pixels[index] = color.into();
    }

    pub fn add_index(&mut self, index: usize, color: impl Into<Rgb>) {
        self.pixels[index] += color.into();
    }

    pub fn fill(&mut self, color: impl Into<Rgb>) {
        let color = color.into();
        self.pixels.iter_mut().for_each(|pixel| *pixel = color);
    }

    pub fn clear(&mut self) {
        self.fill(Rgb::BLACK);
    }

    /// Dims every pixel toward black by `amount`.
    pub fn fade_all(&mut self, amount: u8) {
        for pixel in &mut self.pixels {
            *pixel = pixel.fade_to_black_by(amount);
        }
    }

    /// Moves every column one step to the right; column 0 keeps its content.
    pub fn shift_right(&mut self) {
        for x in (1..self.width).rev() {
            for y in 0..self.height {
                let color = self.get(x - 1, y);
                self.set(x, y, color);
            }
        }
    }

    /// Pixels in physical (linear index) order, as handed to the driver.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Geometric center in pixel units.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.width as f32 - 1.0) / 2.0,
            (self.height as f32 - 1.0) / 2.0,
        )
    }

    pub fn lenses(&self) -> LensPair {
        LensPair::for_canvas(self.width, self.height)
    }
}

/// Ordinal walk around the display border, for outline-only effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    indices: Vec<usize>,
}

impl Outline {
    /// Clockwise rectangular perimeter starting at the top-left pixel.
    pub fn perimeter(canvas: &Canvas) -> Self {
        let (w, h) = (canvas.width(), canvas.height());
        let mut coords = Vec::with_capacity(2 * (w + h));
        coords.extend((0..w).map(|x| (x, 0)));
        coords.extend((1..h).map(|y| (w - 1, y)));
        if h > 1 {
            coords.extend((0..w - 1).rev().map(|x| (x, h - 1)));
        }
        if w > 1 {
            coords.extend((1..h.saturating_sub(1)).rev().map(|y| (0, y)));
        }
        Self::from_coords(canvas, &coords)
    }

    /// Builds the lookup table from an explicit coordinate walk.
    pub fn from_coords(canvas: &Canvas, coords: &[(usize, usize)]) -> Self {
        Self {
            indices: coords.iter().map(|&(x, y)| canvas.xy(x, y)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Linear pixel index of the `position`-th outline step.
    pub fn index(&self, position: usize) -> usize {
        assert!(
            position < self.indices.len(),
            "outline position {position} outside table of {}",
            self.indices.len()
        );
        self.indices[position]
    }
}

/// One eyepiece region of the eyewear-shaped display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lens {
    pub columns: Range<usize>,
    pub center_x: usize,
}

impl Lens {
    /// Coordinates at `(dx, dy)` from the lens center, if they land inside it.
    pub fn offset(
        &self,
        dx: i32,
        dy: i32,
        center_y: usize,
        height: usize,
    ) -> Option<(usize, usize)> {
        let x = self.center_x as i32 + dx;
        let y = center_y as i32 + dy;
        let inside = x >= self.columns.start as i32
            && x < self.columns.end as i32
            && y >= 0
            && y < height as i32;
        inside.then_some((x as usize, y as usize))
    }
}

/// The two symmetric lens regions, separated by a dark bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LensPair {
    pub left: Lens,
    pub right: Lens,
    pub center_y: usize,
    pub height: usize,
}

impl LensPair {
    pub fn for_canvas(width: usize, height: usize) -> Self {
        let lens_width = width.saturating_sub(2) / 2;
        let right_start = width - lens_width;
        Self {
            left: Lens {
                columns: 0..lens_width,
                center_x: lens_width / 2,
            },
            right: Lens {
                columns: right_start..width,
                center_x: right_start + lens_width / 2,
            },
            center_y: height / 2,
            height,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lens> {
        [&self.left, &self.right].into_iter()
    }

    /// Columns between the lenses.
    pub fn bridge(&self) -> Range<usize> {
        self.left.columns.end..self.right.columns.start
    }
}
