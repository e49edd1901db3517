use super::{AudioFeed, AudioFrame, BAND_COUNT};

const DECAY_SMOOTHING: f32 = 0.08;
const PEAK_RELEASE: f32 = 0.97;
const KICK_TAU_MS: f32 = 120.0;

/// Relative loudness of each band on a kick.
const KICK_PROFILE: [f32; BAND_COUNT] = [700.0, 620.0, 480.0, 260.0, 180.0, 140.0, 110.0];

/// Tempo-locked synthetic music: a decaying kick on every beat over a
/// slowly swaying mid/high bed.
#[derive(Debug, Clone)]
pub struct SyntheticAudio {
    bpm: f32,
    decayed: [f32; BAND_COUNT],
    peaks: [f32; BAND_COUNT],
    last_beat: Option<u64>,
}

impl SyntheticAudio {
    pub fn new(bpm: f32) -> Self {
        Self {
            bpm: bpm.max(1.0),
            decayed: [0.0; BAND_COUNT],
            peaks: [0.0; BAND_COUNT],
            last_beat: None,
        }
    }

    fn period_ms(&self) -> u64 {
        ((60_000.0 / self.bpm) as u64).max(1)
    }
}

impl AudioFeed for SyntheticAudio {
    fn next_frame(&mut self, now_ms: u64) -> AudioFrame {
        let period = self.period_ms();
        let beat_index = now_ms / period;
        let phase_ms = (now_ms % period) as f32;

        let beat = self.last_beat.map_or(true, |last| beat_index > last);
        if beat {
            self.last_beat = Some(beat_index);
        }

        let kick = (-phase_ms / KICK_TAU_MS).exp();
        let sway = (now_ms as f32 / 900.0).sin() * 0.5 + 0.5;

        let mut raw = [0.0; BAND_COUNT];
        for (band, value) in raw.iter_mut().enumerate() {
            let bed = 40.0 + 60.0 * sway * (band as f32 / BAND_COUNT as f32);
            *value = KICK_PROFILE[band] * kick + bed;
        }

        for band in 0..BAND_COUNT {
            self.decayed[band] =
                self.decayed[band] * (1.0 - DECAY_SMOOTHING) + raw[band] * DECAY_SMOOTHING;
            self.peaks[band] = if raw[band] > self.peaks[band] {
                raw[band]
            } else {
                self.peaks[band] * PEAK_RELEASE
            };
        }

        AudioFrame {
            raw,
            decayed: self.decayed,
            peaks: self.peaks,
            beat,
        }
    }
}
