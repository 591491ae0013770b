use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
}

/// A short synthesized tone, rendered by whichever surface shows the alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudioCue {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    /// Starting gain, ramped exponentially to `end_gain` over `duration_ms`.
    pub gain: f32,
    pub end_gain: f32,
    pub duration_ms: u64,
}

/// A4, quiet, half a second.
pub const NOTIFICATION_CUE: AudioCue = AudioCue {
    waveform: Waveform::Sine,
    frequency_hz: 440.0,
    gain: 0.1,
    end_gain: 0.00001,
    duration_ms: 500,
};
