//! WAV reading, channel conversion and resampling.

use crate::error::{Result, TalkdubError};
use std::path::Path;

/// Decoded 16-bit PCM audio with its format.
#[derive(Debug, Clone, PartialEq)]
pub struct WavClip {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples.
    pub samples: Vec<i16>,
}

impl WavClip {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Convert to the given rate and channel count.
    ///
    /// Clips that already match are returned unchanged. Others are down-mixed
    /// to mono, linearly resampled, then duplicated across channels.
    pub fn conform(self, sample_rate: u32, channels: u16) -> WavClip {
        if self.sample_rate == sample_rate && self.channels == channels {
            return self;
        }

        let mono = downmix(&self.samples, self.channels);
        let resampled = resample(&mono, self.sample_rate, sample_rate);
        let samples = if channels > 1 {
            resampled
                .iter()
                .flat_map(|&s| std::iter::repeat_n(s, channels as usize))
                .collect()
        } else {
            resampled
        };

        WavClip {
            sample_rate,
            channels,
            samples,
        }
    }
}

/// Read a WAV file of any integer or float format into 16-bit PCM.
pub fn read_wav(path: &Path) -> Result<WavClip> {
    let mut reader = hound::WavReader::open(path).map_err(|e| invalid(path, e))?;
    let spec = reader.spec();

    let samples: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| invalid(path, e))?,
        (hound::SampleFormat::Int, bits) => {
            let shift = bits as i32 - 16;
            reader
                .samples::<i32>()
                .map(|s| {
                    s.map(|v| {
                        if shift > 0 {
                            (v >> shift) as i16
                        } else {
                            (v << -shift) as i16
                        }
                    })
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| invalid(path, e))?
        }
        (hound::SampleFormat::Float, _) => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| invalid(path, e))?,
    };

    Ok(WavClip {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        samples,
    })
}

/// Duration of a WAV file from its header, without decoding samples.
pub fn wav_duration_secs(path: &Path) -> Result<f64> {
    let reader = hound::WavReader::open(path).map_err(|e| invalid(path, e))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(TalkdubError::InvalidAudio {
            path: path.display().to_string(),
            message: "sample rate is zero".to_string(),
        });
    }
    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

/// Write 16-bit PCM samples.
pub fn write_wav(path: &Path, clip: &WavClip) -> Result<()> {
    let spec = hound::WavSpec {
        channels: clip.channels,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in &clip.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

fn invalid(path: &Path, e: hound::Error) -> TalkdubError {
    TalkdubError::InvalidAudio {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Average interleaved channels into mono.
pub fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Simple linear interpolation resampling.
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = (source_pos.floor() as usize).min(samples.len() - 1);
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}
