use serde::{Deserialize, Serialize};

use crate::{Entropy, Result, Rgb, ShadesError};

/// Ordered color stops addressed by a continuous `0..=255` index.
///
/// Index 0 lands on the first stop, 255 on the last, and everything in
/// between is linearly blended from the two nearest stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    stops: Vec<Rgb>,
}

impl Palette {
    pub fn new(stops: Vec<Rgb>) -> Result<Self> {
        if stops.is_empty() {
            return Err(ShadesError::InvalidInput("palette needs at least one stop"));
        }
        Ok(Self { stops })
    }

    fn from_hex(stops: &[u32]) -> Self {
        Self {
            stops: stops.iter().copied().map(Rgb::from_hex).collect(),
        }
    }

    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    /// Interpolated color at `index`, scaled by `brightness`.
    pub fn color(&self, index: u8, brightness: u8) -> Rgb {
        let last = self.stops.len() - 1;
        let position = u32::from(index) * last as u32;
        let segment = (position / 255) as usize;
        let frac = position % 255;

        let base = if segment >= last {
            self.stops[last]
        } else {
            lerp(self.stops[segment], self.stops[segment + 1], frac)
        };
        base.scale(brightness)
    }

    /// The `i`-th of `count` evenly spaced full-brightness samples.
    pub fn entry(&self, i: usize, count: usize) -> Rgb {
        let span = count.saturating_sub(1).max(1);
        let index = (i.min(span) * 255 / span) as u8;
        self.color(index, 255)
    }

    pub fn rainbow() -> Self {
        Self::from_hex(&[
            0xFF0000, 0xD52A00, 0xAB5500, 0xAB7F00, 0xABAB00, 0x56D500, 0x00FF00, 0x00D52A,
            0x00AB55, 0x0056AA, 0x0000FF, 0x2A00D5, 0x5500AB, 0x7F0081, 0xAB0055, 0xD5002B,
        ])
    }

    pub fn party() -> Self {
        Self::from_hex(&[
            0x5500AB, 0x84007C, 0xB5004B, 0xE5001B, 0xE81700, 0xB84700, 0xAB7700, 0xABAB00,
            0xAB5500, 0xDD2200, 0xF2000E, 0xC2003E, 0x8F0071, 0x5F00A1, 0x2F00D0, 0x0007F9,
        ])
    }

    pub fn heat() -> Self {
        Self::from_hex(&[
            0x000000, 0x330000, 0x660000, 0x990000, 0xCC0000, 0xFF0000, 0xFF3300, 0xFF6600,
            0xFF9900, 0xFFCC00, 0xFFFF00, 0xFFFF33, 0xFFFF66, 0xFFFF99, 0xFFFFCC, 0xFFFFFF,
        ])
    }

    pub fn lava() -> Self {
        Self::from_hex(&[
            0x000000, 0x800000, 0x000000, 0x800000, 0x8B0000, 0x800000, 0x8B0000, 0x8B0000,
            0x8B0000, 0xFF0000, 0xFFA500, 0xFFFFFF, 0xFFA500, 0xFF0000, 0x8B0000, 0x000000,
        ])
    }

    pub fn ocean() -> Self {
        Self::from_hex(&[
            0x191970, 0x00008B, 0x191970, 0x000080, 0x00008B, 0x0000CD, 0x2E8B57, 0x008080,
            0x5F9EA0, 0x0000FF, 0x008B8B, 0x6495ED, 0x7FFFD4, 0x2E8B57, 0x00FFFF, 0x87CEFA,
        ])
    }

    pub fn forest() -> Self {
        Self::from_hex(&[
            0x006400, 0x006400, 0x556B2F, 0x006400, 0x008000, 0x228B22, 0x6B8E23, 0x008000,
            0x2E8B57, 0x66CDAA, 0x32CD32, 0x9ACD32, 0x90EE90, 0x7CFC00, 0x66CDAA, 0x228B22,
        ])
    }

    pub fn cloud() -> Self {
        Self::from_hex(&[
            0x0000FF, 0x00008B, 0x00008B, 0x00008B, 0x00008B, 0x00008B, 0x00008B, 0x00008B,
            0x0000FF, 0x00008B, 0x87CEEB, 0x87CEEB, 0xADD8E6, 0xFFFFFF, 0xADD8E6, 0x87CEEB,
        ])
    }

    /// Dark-to-hot gradient used by the level meters.
    pub fn ember() -> Self {
        Self::from_hex(&[0x000000, 0x400000, 0xDC143C, 0xFF0000, 0xFF8000, 0xFFFF00])
    }

    pub fn ice() -> Self {
        Self::from_hex(&[0x000000, 0x000040, 0x0000FF, 0x00FFFF, 0xFFFFFF])
    }

    pub fn violet() -> Self {
        Self::from_hex(&[0x000000, 0x2A0055, 0x8000FF, 0xFF00FF, 0xFFC0E0])
    }

    pub fn crimson() -> Self {
        Self::from_hex(&[0x000000, 0xDC143C, 0xFF0000])
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::rainbow()
    }
}

fn lerp(a: Rgb, b: Rgb, frac: u32) -> Rgb {
    let channel = |from: u8, to: u8| {
        ((u32::from(from) * (255 - frac) + u32::from(to) * frac + 127) / 255) as u8
    };
    Rgb::new(channel(a.r, b.r), channel(a.g, b.g), channel(a.b, b.b))
}

/// Groups palettes by the kind of effect requesting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteFamily {
    /// General purpose, saturated palettes.
    Ambient,
    /// Palettes that start dark so low audio levels stay dim.
    Audio,
}

/// Hands out palettes when an effect asks for a fresh one.
pub trait PaletteProvider {
    fn select(&mut self, family: PaletteFamily, rng: &mut dyn Entropy) -> Palette;
}

/// Default provider: a uniform pick from a fixed list per family.
#[derive(Debug, Clone)]
pub struct PaletteLibrary {
    ambient: Vec<Palette>,
    audio: Vec<Palette>,
}

impl PaletteLibrary {
    pub fn new(ambient: Vec<Palette>, audio: Vec<Palette>) -> Result<Self> {
        if ambient.is_empty() || audio.is_empty() {
            return Err(ShadesError::InvalidInput(
                "palette library needs at least one palette per family",
            ));
        }
        Ok(Self { ambient, audio })
    }
}

impl Default for PaletteLibrary {
    fn default() -> Self {
        Self {
            ambient: vec![
                Palette::rainbow(),
                Palette::party(),
                Palette::heat(),
                Palette::lava(),
                Palette::ocean(),
                Palette::forest(),
                Palette::cloud(),
            ],
            audio: vec![
                Palette::heat(),
                Palette::ember(),
                Palette::ice(),
                Palette::violet(),
            ],
        }
    }
}

impl PaletteProvider for PaletteLibrary {
    fn select(&mut self, family: PaletteFamily, rng: &mut dyn Entropy) -> Palette {
        let options = match family {
            PaletteFamily::Ambient => &self.ambient,
            PaletteFamily::Audio => &self.audio,
        };
        let pick = usize::from(rng.below16(options.len() as u16));
        options[pick].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeededEntropy;

    #[test]
    fn boundaries_hit_first_and_last_stop() {
        for palette in [Palette::rainbow(), Palette::heat(), Palette::crimson(), Palette::ice()] {
            let stops = palette.stops();
            assert_eq!(palette.color(0, 255), stops[0]);
            assert_eq!(palette.color(255, 255), stops[stops.len() - 1]);
        }
    }

    #[test]
    fn midpoint_is_the_mean_of_neighbouring_stops() {
        let palette = Palette::new(vec![Rgb::new(0, 200, 10), Rgb::new(255, 100, 30)]).unwrap();
        let mid = palette.color(128, 255);
        assert!((i32::from(mid.r) - 128).abs() <= 1);
        assert!((i32::from(mid.g) - 150).abs() <= 1);
        assert!((i32::from(mid.b) - 20).abs() <= 1);
    }

    #[test]
    fn interior_stops_are_hit_exactly() {
        let palette = Palette::new(vec![Rgb::RED, Rgb::LIME, Rgb::BLUE, Rgb::WHITE]).unwrap();
        assert_eq!(palette.color(85, 255), Rgb::LIME);
        assert_eq!(palette.color(170, 255), Rgb::BLUE);
    }

    #[test]
    fn brightness_scales_result() {
        let palette = Palette::rainbow();
        assert_eq!(palette.color(0, 0), Rgb::BLACK);
        assert_eq!(palette.color(0, 127), Rgb::new(127, 0, 0));
    }

    #[test]
    fn single_stop_palette_is_constant() {
        let palette = Palette::new(vec![Rgb::CRIMSON]).unwrap();
        assert_eq!(palette.color(0, 255), Rgb::CRIMSON);
        assert_eq!(palette.color(200, 255), Rgb::CRIMSON);
    }

    #[test]
    fn empty_palette_is_rejected() {
        assert!(Palette::new(Vec::new()).is_err());
        assert!(PaletteLibrary::new(Vec::new(), vec![Palette::heat()]).is_err());
    }

    #[test]
    fn entry_spans_the_whole_palette() {
        let palette = Palette::rainbow();
        assert_eq!(palette.entry(0, 16), palette.stops()[0]);
        assert_eq!(palette.entry(15, 16), palette.stops()[15]);
    }

    #[test]
    fn library_selects_from_requested_family() {
        let mut library = PaletteLibrary::default();
        let mut rng = SeededEntropy::with_seed(3);
        let audio = [Palette::heat(), Palette::ember(), Palette::ice(), Palette::violet()];
        for _ in 0..20 {
            let picked = library.select(PaletteFamily::Audio, &mut rng);
            assert!(audio.contains(&picked));
        }
    }
}
