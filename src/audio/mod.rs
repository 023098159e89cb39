use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio_api::{AudioCommand, NUM_CHANNELS};
use crate::error::{Result, SoundboardError};

mod engine;
mod frame;
pub mod sample_buffer;
mod sample_id;
mod voice;

pub use engine::ChannelFlags;
pub use sample_buffer::SampleBuffer;
pub use sample_id::{next_sample_id, SampleId};

use engine::Engine;

pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    flags: Arc<ChannelFlags>,
    sample_rate: u32,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    /// Queues a command for the engine. `false` means it was dropped.
    pub fn send(&self, cmd: AudioCommand) -> bool {
        forward(&self.tx, cmd)
    }

    pub fn busy_snapshot(&self) -> [bool; NUM_CHANNELS] {
        self.flags.snapshot()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

pub fn start_audio() -> Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(1024);

    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(SoundboardError::NoOutputDevice)?;
    let config = device
        .default_output_config()
        .map_err(|e| SoundboardError::AudioStream(format!("no default output config: {e}")))?;

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    if let Ok(name) = device.name() {
        log::info!("audio output: {name}, {sample_rate} Hz, {channels} channels");
    }

    let flags = Arc::new(ChannelFlags::default());

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let output_stream =
                build_output_stream_f32(&device, &config.into(), rx, Arc::clone(&flags), channels)?;
            output_stream
                .play()
                .map_err(|e| SoundboardError::AudioStream(format!("failed to play output stream: {e}")))?;

            Ok(AudioHandle {
                tx,
                flags,
                sample_rate,
                _output_stream: output_stream,
            })
        }
        other => Err(SoundboardError::UnsupportedSampleFormat(format!("{other:?}"))),
    }
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    flags: Arc<ChannelFlags>,
    channels: usize,
) -> Result<cpal::Stream> {
    let mut engine = Engine::new(flags);

    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                while let Ok(cmd) = rx.try_recv() { // set up command handling
                    engine.handle_cmd(cmd);
                }
                engine.render_interleaved(data, channels);
            },
            err_fn,
            None,
        )
        .map_err(|e| SoundboardError::AudioStream(format!("failed to build output stream: {e}")))?;

    Ok(stream)
}

fn forward(tx: &Sender<AudioCommand>, cmd: AudioCommand) -> bool {
    match tx.try_send(cmd) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("audio command dropped: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_api::MixerChannel;

    #[test]
    fn forward_reports_a_full_queue() {
        let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(1);
        assert!(forward(&tx, AudioCommand::StopAll));
        assert!(!forward(&tx, AudioCommand::StopChannel(MixerChannel::Preview)));
        assert_eq!(rx.try_recv().ok(), Some(AudioCommand::StopAll));
        assert!(rx.try_recv().is_err());
    }
}
