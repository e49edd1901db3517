//! Consumer-side audio contract.
//!
//! Capture and spectral analysis happen outside the engine; effects only
//! see one [`AudioFrame`] per tick.

mod synth;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, ShadesError};

pub use synth::SyntheticAudio;

/// Number of frequency bands reported by the analyser.
pub const BAND_COUNT: usize = 7;

/// Per-band energy snapshot for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFrame {
    /// Instantaneous band magnitudes.
    pub raw: [f32; BAND_COUNT],
    /// Exponentially decayed band magnitudes.
    pub decayed: [f32; BAND_COUNT],
    /// Peak-held band magnitudes.
    pub peaks: [f32; BAND_COUNT],
    /// True only on the tick a beat onset was detected.
    #[serde(default)]
    pub beat: bool,
}

impl AudioFrame {
    pub fn silent() -> Self {
        Self::default()
    }

    /// Sum of the decayed energy over `bands`.
    pub fn decayed_sum(&self, bands: std::ops::Range<usize>) -> f32 {
        self.decayed[bands].iter().sum()
    }
}

/// Anything that can hand the engine one audio frame per tick.
pub trait AudioFeed {
    fn next_frame(&mut self, now_ms: u64) -> AudioFrame;
}

/// Feed used when no audio source is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioFeed for SilentAudio {
    fn next_frame(&mut self, _now_ms: u64) -> AudioFrame {
        AudioFrame::silent()
    }
}

/// Serialised form of a recorded or synthesised audio trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrace {
    /// Milliseconds covered by each frame.
    pub step_ms: u64,
    pub frames: Vec<AudioFrame>,
}

impl AudioTrace {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let trace: AudioTrace = serde_json::from_str(&text)?;
        if trace.step_ms == 0 {
            return Err(ShadesError::InvalidInput("audio trace step must be positive"));
        }
        Ok(trace)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, serde_json::to_vec(self)?)?;
        Ok(())
    }

    /// Samples `feed` every `step_ms` for `duration_ms`.
    pub fn capture(feed: &mut dyn AudioFeed, step_ms: u64, duration_ms: u64) -> Result<Self> {
        if step_ms == 0 {
            return Err(ShadesError::InvalidInput("audio trace step must be positive"));
        }
        let frames = (0..duration_ms / step_ms)
            .map(|i| feed.next_frame(i * step_ms))
            .collect();
        Ok(Self { step_ms, frames })
    }
}

/// Replays an [`AudioTrace`]; beyond its end the feed is silent.
#[derive(Debug, Clone)]
pub struct ScriptedAudio {
    trace: AudioTrace,
    last_slot: Option<u64>,
}

impl ScriptedAudio {
    pub fn new(trace: AudioTrace) -> Self {
        Self {
            trace,
            last_slot: None,
        }
    }
}

impl AudioFeed for ScriptedAudio {
    fn next_frame(&mut self, now_ms: u64) -> AudioFrame {
        let slot = now_ms / self.trace.step_ms.max(1);
        let Some(mut frame) = usize::try_from(slot)
            .ok()
            .and_then(|index| self.trace.frames.get(index).copied())
        else {
            return AudioFrame::silent();
        };

        // A frame sampled twice must not report its onset twice.
        if self.last_slot == Some(slot) {
            frame.beat = false;
        }
        self.last_slot = Some(slot);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_beat(level: f32, beat: bool) -> AudioFrame {
        AudioFrame {
            raw: [level; BAND_COUNT],
            decayed: [level; BAND_COUNT],
            peaks: [level; BAND_COUNT],
            beat,
        }
    }

    #[test]
    fn scripted_feed_follows_the_clock_then_goes_silent() {
        let trace = AudioTrace {
            step_ms: 10,
            frames: vec![frame_with_beat(1.0, false), frame_with_beat(2.0, true)],
        };
        let mut feed = ScriptedAudio::new(trace);

        assert_eq!(feed.next_frame(0).raw[0], 1.0);
        assert_eq!(feed.next_frame(12).raw[0], 2.0);
        assert_eq!(feed.next_frame(25), AudioFrame::silent());
    }

    #[test]
    fn beat_is_reported_once_per_slot() {
        let trace = AudioTrace {
            step_ms: 10,
            frames: vec![frame_with_beat(1.0, true)],
        };
        let mut feed = ScriptedAudio::new(trace);
        assert!(feed.next_frame(1).beat);
        assert!(!feed.next_frame(5).beat);
    }

    #[test]
    fn decayed_sum_covers_the_requested_bands() {
        let mut frame = AudioFrame::silent();
        frame.decayed = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert_eq!(frame.decayed_sum(0..3), 6.0);
        assert_eq!(frame.decayed_sum(5..7), 13.0);
    }

    #[test]
    fn trace_round_trips_through_disk() {
        let mut feed = SyntheticAudio::new(120.0);
        let trace = AudioTrace::capture(&mut feed, 10, 200).unwrap();
        let path = std::env::temp_dir().join("shades-trace-roundtrip.json");
        trace.save(&path).unwrap();
        let loaded = AudioTrace::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.frames.len(), 20);
        assert_eq!(loaded.step_ms, 10);
    }

    #[test]
    fn zero_step_is_rejected() {
        let mut feed = SilentAudio;
        assert!(AudioTrace::capture(&mut feed, 0, 100).is_err());
    }
}
