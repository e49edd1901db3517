use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::math::scale8;

/// 8-bit RGB triple, the unit every canvas cell stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const LIME: Rgb = Rgb::new(0, 255, 0);
    pub const GREEN: Rgb = Rgb::new(0, 128, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const CRIMSON: Rgb = Rgb::new(220, 20, 60);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Scales every channel by `scale / 256`, keeping the channel intact at 255.
    pub fn scale(self, scale: u8) -> Self {
        Self::new(
            scale8(self.r, scale),
            scale8(self.g, scale),
            scale8(self.b, scale),
        )
    }

    /// Dims the color toward black by `amount` (0 leaves it unchanged).
    pub fn fade_to_black_by(self, amount: u8) -> Self {
        self.scale(255 - amount)
    }

    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Channel-wise saturating addition.
impl Add for Rgb {
    type Output = Rgb;

    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(
            self.r.saturating_add(rhs.r),
            self.g.saturating_add(rhs.g),
            self.b.saturating_add(rhs.b),
        )
    }
}

impl AddAssign for Rgb {
    fn add_assign(&mut self, rhs: Rgb) {
        *self = *self + rhs;
    }
}

impl From<Hsv> for Rgb {
    fn from(value: Hsv) -> Self {
        value.to_rgb()
    }
}

/// Hue/saturation/value color with all channels in `0..=255`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Six-sector conversion around the color wheel.
    pub fn to_rgb(self) -> Rgb {
        if self.s == 0 {
            return Rgb::new(self.v, self.v, self.v);
        }

        let v = u16::from(self.v);
        let s = u16::from(self.s);
        let region = self.h / 43;
        let remainder = u16::from(self.h - region * 43) * 6;

        let p = ((v * (255 - s)) >> 8) as u8;
        let q = ((v * (255 - ((s * remainder) >> 8))) >> 8) as u8;
        let t = ((v * (255 - ((s * (255 - remainder)) >> 8))) >> 8) as u8;
        let v = self.v;

        match region {
            0 => Rgb::new(v, t, p),
            1 => Rgb::new(q, v, p),
            2 => Rgb::new(p, v, t),
            3 => Rgb::new(p, q, v),
            4 => Rgb::new(t, p, v),
            _ => Rgb::new(v, p, q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_blend_saturates() {
        let mut pixel = Rgb::new(200, 10, 255);
        for _ in 0..20 {
            pixel += Rgb::new(90, 30, 1);
        }
        assert_eq!(pixel, Rgb::new(255, 255, 255));
    }

    #[test]
    fn add_is_exact_below_saturation() {
        assert_eq!(Rgb::new(1, 2, 3) + Rgb::new(10, 20, 30), Rgb::new(11, 22, 33));
    }

    #[test]
    fn scale_keeps_full_brightness_and_blacks_out_at_zero() {
        let c = Rgb::new(255, 128, 7);
        assert_eq!(c.scale(255), c);
        assert_eq!(c.scale(0), Rgb::BLACK);
        assert_eq!(c.scale(127), Rgb::new(127, 64, 3));
    }

    #[test]
    fn fade_to_black_by_zero_is_identity() {
        let c = Rgb::CRIMSON;
        assert_eq!(c.fade_to_black_by(0), c);
        assert_eq!(c.fade_to_black_by(255), Rgb::BLACK);
    }

    #[test]
    fn primary_hues() {
        assert_eq!(Hsv::new(0, 255, 255).to_rgb(), Rgb::RED);
        let green = Hsv::new(86, 255, 255).to_rgb();
        assert_eq!(green.g, 255);
        assert_eq!(green.r, 0);
        let blue = Hsv::new(172, 255, 255).to_rgb();
        assert_eq!(blue.b, 255);
        assert_eq!(blue.g, 0);
    }

    #[test]
    fn zero_value_is_black_for_any_hue() {
        for h in 0..=255u8 {
            assert!(Hsv::new(h, 255, 0).to_rgb().is_black());
        }
    }

    #[test]
    fn hex_literals() {
        assert_eq!(Rgb::from_hex(0xDC143C), Rgb::CRIMSON);
    }
}
