use serde::{Deserialize, Serialize};

use crate::{Canvas, Result, ShadesError};

/// Configuration options for the recording subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingSettings {
    pub output_path: String,
    /// Frames beyond this count are dropped; `None` keeps everything.
    pub max_frames: Option<usize>,
}

/// Pixels of one presented frame, in physical index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub time_ms: u64,
    pub pixels: Vec<[u8; 3]>,
}

/// File layout written by [`Recorder::finish`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub width: usize,
    pub height: usize,
    pub frames: Vec<RecordedFrame>,
}

/// Collects presented frames and writes them out as JSON.
#[derive(Debug, Default)]
pub struct Recorder {
    settings: RecordingSettings,
    dimensions: Option<(usize, usize)>,
    frames: Vec<RecordedFrame>,
    is_recording: bool,
}

impl Recorder {
    pub fn new(settings: RecordingSettings) -> Self {
        Self {
            settings,
            dimensions: None,
            frames: Vec::new(),
            is_recording: false,
        }
    }

    pub fn start(&mut self) -> Result<()> {
        if self.settings.output_path.is_empty() {
            return Err(ShadesError::InvalidInput("recording needs an output path"));
        }
        self.is_recording = true;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<()> {
        self.is_recording = false;
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    /// Stores a copy of `canvas`. Returns `false` when the frame was
    /// dropped because recording is stopped or the frame limit is reached.
    pub fn capture(&mut self, time_ms: u64, canvas: &Canvas) -> bool {
        if !self.is_recording {
            return false;
        }
        if let Some(max) = self.settings.max_frames {
            if self.frames.len() >= max {
                return false;
            }
        }
        self.dimensions = Some((canvas.width(), canvas.height()));
        self.frames.push(RecordedFrame {
            time_ms,
            pixels: canvas.pixels().iter().map(|p| p.to_array()).collect(),
        });
        true
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Stops recording and writes everything captured so far. Returns the
    /// number of frames written.
    pub fn finish(mut self) -> Result<usize> {
        self.stop()?;
        let (width, height) = self.dimensions.unwrap_or_default();
        let recording = Recording {
            width,
            height,
            frames: self.frames,
        };
        let file = std::fs::File::create(&self.settings.output_path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), &recording)?;
        tracing::info!(
            path = %self.settings.output_path,
            frames = recording.frames.len(),
            "recording written"
        );
        Ok(recording.frames.len())
    }
}
