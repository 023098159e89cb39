use std::path::Path;

use super::frame::StereoFrame;
use crate::error::{Result, SoundboardError};

#[derive(Clone, Debug, Default)]
pub struct SampleBuffer {
    pub data: Vec<StereoFrame>, // the audio data array
    pub sample_rate: u32,
}

impl SampleBuffer {
    // Load a WAV file from disk into a stereo buffer at the output rate
    pub fn load_wav(path: &Path, target_rate: u32) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let file_rate = spec.sample_rate;
        let file_channels = spec.channels as usize;
        if file_channels == 0 {
            return Err(SoundboardError::UnsupportedWav(format!("{path:?} has no channels")));
        }

        // Read the samples from the WAV file
        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader // float, just pass it through
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => { // int, scale to -1..1
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        let mut frames: Vec<StereoFrame> = if file_channels == 1 {
            samples
                .into_iter()
                .map(|x| StereoFrame { // mono, duplicate
                    left: x,
                    right: x,
                })
                .collect()
        } else {
            // anything past the first two channels is dropped
            samples
                .chunks_exact(file_channels)
                .map(|c| StereoFrame {
                    left: c[0],
                    right: c[1],
                })
                .collect()
        };

        if file_rate != target_rate {
            frames = resample_linear(&frames, file_rate, target_rate);
        }

        Ok(Self {
            data: frames,
            sample_rate: target_rate,
        })
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.data.len() as f64 / self.sample_rate as f64
    }
}

fn resample_linear(frames: &[StereoFrame], source_rate: u32, target_rate: u32) -> Vec<StereoFrame> {
    // Plain linear interpolation; clips are short one-shots so quality is fine
    if source_rate == target_rate || source_rate == 0 {
        return frames.to_vec();
    }
    let ratio = target_rate as f64 / source_rate as f64;
    let out_len = (frames.len() as f64 * ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        // fractional position in the source buffer
        let src_pos = i as f64 / ratio; // ex. 3.7
        let idx = src_pos.floor() as usize; // ex. 3
        let frac = (src_pos - idx as f64) as f32; // ex. 0.7
        if idx >= frames.len().saturating_sub(1) { // edge case
            out.push(*frames.last().unwrap_or(&StereoFrame::zero()));
        } else {
            let a = frames[idx]; // ex. frame 3
            let b = frames[idx + 1]; // ex. frame 4
            out.push(StereoFrame { // blend via frac and linear interpolation
                left: a.left * (1.0 - frac) + b.left * frac,
                right: a.right * (1.0 - frac) + b.right * frac,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_fixture::write_wav;

    #[test]
    fn mono_is_duplicated_to_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_wav(&path, 1, 8000, 100);

        let buf = SampleBuffer::load_wav(&path, 8000).unwrap();
        assert_eq!(buf.data.len(), 100);
        assert_eq!(buf.data[0].left, buf.data[0].right);
        assert!((buf.data[0].left - 0.25).abs() < 1e-4);
    }

    #[test]
    fn extra_channels_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.wav");
        write_wav(&path, 4, 8000, 50);

        let buf = SampleBuffer::load_wav(&path, 8000).unwrap();
        assert_eq!(buf.data.len(), 50);
        assert!(buf.data[0].left > 0.0);
        assert!(buf.data[0].right < 0.0);
    }

    #[test]
    fn resampling_keeps_the_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slow.wav");
        write_wav(&path, 2, 22050, 22050);

        let buf = SampleBuffer::load_wav(&path, 44100).unwrap();
        assert_eq!(buf.data.len(), 44100);
        assert!((buf.duration_secs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn resample_of_empty_input_is_empty() {
        assert!(resample_linear(&[], 22050, 44100).is_empty());
    }
}
