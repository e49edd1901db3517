use crate::Palette;

/// Process-wide values every effect can see.
///
/// The engine mutates this once per tick. Effects only read it while
/// drawing; during their one-time setup they may declare `fade`,
/// `audio_active` and the palette they want.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedContext {
    /// Monotonic frame clock in milliseconds.
    pub clock_ms: u64,
    /// Wrapping hue cursor, advanced by the engine rather than by effects.
    pub hue: u8,
    /// Currently selected palette.
    pub palette: Palette,
    /// Per-tick attenuation of retained canvas content; 0 disables it.
    pub fade: u8,
    /// Whether the driver should poll the audio feed.
    pub audio_active: bool,
}

impl SharedContext {
    pub fn new() -> Self {
        Self {
            clock_ms: 0,
            hue: 0,
            palette: Palette::default(),
            fade: 0,
            audio_active: false,
        }
    }

    pub fn advance_hue(&mut self, step: u8) {
        self.hue = self.hue.wrapping_add(step);
    }

    /// Clears the requirements declared by the previous effect.
    pub fn reset_requirements(&mut self) {
        self.fade = 0;
        self.audio_active = false;
    }
}

impl Default for SharedContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_cursor_wraps() {
        let mut ctx = SharedContext::new();
        ctx.hue = 250;
        ctx.advance_hue(10);
        assert_eq!(ctx.hue, 4);
    }

    #[test]
    fn reset_clears_declared_requirements() {
        let mut ctx = SharedContext::new();
        ctx.fade = 10;
        ctx.audio_active = true;
        ctx.hue = 9;
        ctx.reset_requirements();
        assert_eq!(ctx.fade, 0);
        assert!(!ctx.audio_active);
        assert_eq!(ctx.hue, 9);
    }
}
