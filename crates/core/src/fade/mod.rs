use crate::Canvas;

/// Canvas-wide attenuation for effects that only add light.
///
/// Runs on the engine's hue tick, after the hue cursor moves and before the
/// next effect step draws, so trails decay at the same rate regardless of
/// how often the effect itself runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FadeProcessor {
    applied: u64,
}

impl FadeProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dims every pixel by `strength`. Returns whether anything was done;
    /// a strength of 0 leaves the canvas untouched.
    pub fn apply(&mut self, canvas: &mut Canvas, strength: u8) -> bool {
        if strength == 0 {
            return false;
        }
        canvas.fade_all(strength);
        self.applied += 1;
        true
    }

    /// Number of fade passes performed so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Layout, Rgb};

    #[test]
    fn zero_strength_keeps_content() {
        let mut canvas = Canvas::new(8, 5, Layout::RowMajor);
        canvas.fill(Rgb::new(120, 40, 7));
        let mut fade = FadeProcessor::new();
        assert!(!fade.apply(&mut canvas, 0));
        assert_eq!(canvas.get(3, 3), Rgb::new(120, 40, 7));
        assert_eq!(fade.applied(), 0);
    }

    #[test]
    fn fade_scales_every_pixel() {
        let mut canvas = Canvas::new(8, 5, Layout::RowMajor);
        canvas.fill(Rgb::WHITE);
        let mut fade = FadeProcessor::new();
        assert!(fade.apply(&mut canvas, 10));
        let expected = Rgb::WHITE.scale(245);
        assert!(canvas.pixels().iter().all(|p| *p == expected));
    }

    #[test]
    fn weakest_fade_still_reaches_black() {
        let mut canvas = Canvas::new(8, 5, Layout::RowMajor);
        canvas.fill(Rgb::WHITE);
        let mut fade = FadeProcessor::new();
        for _ in 0..255 {
            fade.apply(&mut canvas, 1);
        }
        assert!(canvas.pixels().iter().all(|p| p.is_black()));
        assert_eq!(fade.applied(), 255);
    }
}
