use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::sample_id::SampleId;
use super::voice::Voice;
use crate::audio_api::{AudioCommand, MixerChannel, NUM_CHANNELS};

const VOICE_GAIN: f32 = 0.8;

// "still playing" per mixer channel, written by the audio thread after every
// block and read by the UI thread
#[derive(Debug, Default)]
pub struct ChannelFlags {
    busy: [AtomicBool; NUM_CHANNELS],
}

impl ChannelFlags {
    pub fn is_busy(&self, channel: MixerChannel) -> bool {
        self.busy[channel.index()].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> [bool; NUM_CHANNELS] {
        MixerChannel::ALL.map(|c| self.is_busy(c))
    }

    fn set(&self, index: usize, busy: bool) {
        self.busy[index].store(busy, Ordering::Relaxed);
    }
}

pub struct Engine {
    samples: HashMap<SampleId, SampleBuffer>,
    voices: [Option<Voice>; NUM_CHANNELS], // one voice slot per mixer channel
    flags: Arc<ChannelFlags>,
    scratch: Vec<StereoFrame>,
}

impl Engine {
    pub fn new(flags: Arc<ChannelFlags>) -> Self {
        Self {
            samples: HashMap::with_capacity(64),
            voices: std::array::from_fn(|_| None),
            flags,
            scratch: vec![StereoFrame::zero(); 4096],
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::RegisterSample { id, buffer } => {
                self.samples.insert(id, buffer);
            }
            AudioCommand::Play { channel, sample } => {
                // unknown ids are dropped; the channel just stays idle
                if self.samples.contains_key(&sample) {
                    self.voices[channel.index()] = Some(Voice::new(sample, VOICE_GAIN));
                }
            }
            AudioCommand::StopChannel(channel) => {
                self.voices[channel.index()] = None;
            }
            AudioCommand::StopAll => {
                self.voices.iter_mut().for_each(|v| *v = None);
            }
        }
        self.publish();
    }

    pub fn render_block(&mut self, frames: &mut [StereoFrame]) {
        frames.fill(StereoFrame::zero());
        for slot in self.voices.iter_mut() {
            let finished = match slot {
                Some(voice) => match self.samples.get(&voice.sample_id) {
                    Some(buffer) => {
                        voice.render_into(buffer, frames);
                        !voice.active
                    }
                    None => true,
                },
                None => false,
            };
            if finished {
                *slot = None;
            }
        }
        for f in frames.iter_mut() {
            *f = f.clamped();
        }
        self.publish();
    }

    // Renders into an interleaved device buffer of any channel count:
    // left/right go to the first two channels, the rest stay silent.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        let n_frames = data.len() / channels;
        if self.scratch.len() < n_frames {
            self.scratch.resize(n_frames, StereoFrame::zero());
        }
        let mut scratch = std::mem::take(&mut self.scratch);
        self.render_block(&mut scratch[..n_frames]);
        for (out, frame) in data.chunks_exact_mut(channels).zip(&scratch[..n_frames]) {
            out.fill(0.0);
            if channels == 1 {
                out[0] = frame.mono();
            } else {
                out[0] = frame.left;
                out[1] = frame.right;
            }
        }
        self.scratch = scratch;
    }

    fn publish(&self) {
        for (i, slot) in self.voices.iter().enumerate() {
            self.flags.set(i, slot.is_some());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_sample(len: usize) -> (Engine, Arc<ChannelFlags>) {
        let flags = Arc::new(ChannelFlags::default());
        let mut engine = Engine::new(Arc::clone(&flags));
        engine.handle_cmd(AudioCommand::RegisterSample {
            id: SampleId(7),
            buffer: SampleBuffer {
                data: vec![StereoFrame { left: 0.5, right: 0.5 }; len],
                sample_rate: 8000,
            },
        });
        (engine, flags)
    }

    #[test]
    fn play_marks_the_channel_busy_until_the_clip_ends() {
        let (mut engine, flags) = engine_with_sample(100);
        engine.handle_cmd(AudioCommand::Play { channel: MixerChannel::Track2, sample: SampleId(7) });
        assert!(flags.is_busy(MixerChannel::Track2));
        assert!(!flags.is_busy(MixerChannel::Track1));

        let mut block = vec![StereoFrame::zero(); 64];
        engine.render_block(&mut block);
        assert!(flags.is_busy(MixerChannel::Track2));
        engine.render_block(&mut block);
        assert!(!flags.is_busy(MixerChannel::Track2));
    }

    #[test]
    fn unknown_sample_leaves_the_channel_idle() {
        let (mut engine, flags) = engine_with_sample(100);
        engine.handle_cmd(AudioCommand::Play { channel: MixerChannel::Preview, sample: SampleId(99) });
        assert!(!flags.is_busy(MixerChannel::Preview));
    }

    #[test]
    fn stop_all_silences_every_channel() {
        let (mut engine, flags) = engine_with_sample(1000);
        for channel in MixerChannel::ALL {
            engine.handle_cmd(AudioCommand::Play { channel, sample: SampleId(7) });
        }
        assert_eq!(flags.snapshot(), [true; NUM_CHANNELS]);

        engine.handle_cmd(AudioCommand::StopAll);
        assert_eq!(flags.snapshot(), [false; NUM_CHANNELS]);

        let mut block = vec![StereoFrame { left: 1.0, right: 1.0 }; 8];
        engine.render_block(&mut block);
        assert!(block.iter().all(|f| f.left == 0.0 && f.right == 0.0));
    }

    #[test]
    fn channels_mix_and_clip() {
        let (mut engine, _) = engine_with_sample(100);
        for channel in MixerChannel::ALL {
            engine.handle_cmd(AudioCommand::Play { channel, sample: SampleId(7) });
        }
        let mut block = vec![StereoFrame::zero(); 4];
        engine.render_block(&mut block);
        // 3 * 0.5 * 0.8 = 1.2, clamped
        assert_eq!(block[0].left, 1.0);
    }

    #[test]
    fn interleaved_output_handles_extra_channels() {
        let (mut engine, _) = engine_with_sample(100);
        engine.handle_cmd(AudioCommand::Play { channel: MixerChannel::Track1, sample: SampleId(7) });
        let mut data = vec![9.0f32; 4 * 3];
        engine.render_interleaved(&mut data, 4);
        assert_eq!(&data[0..4], &[0.4, 0.4, 0.0, 0.0]);
    }
}
