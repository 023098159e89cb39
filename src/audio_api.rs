pub use crate::audio::{SampleBuffer, SampleId};

use crate::shared::TrackId;

pub const NUM_CHANNELS: usize = 3;

// Each mixer channel plays at most one clip at a time; a new Play on a busy
// channel cuts the previous clip off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MixerChannel {
    Track1,
    Track2,
    Preview,
}

impl MixerChannel {
    pub const ALL: [MixerChannel; NUM_CHANNELS] =
        [MixerChannel::Track1, MixerChannel::Track2, MixerChannel::Preview];

    pub fn index(self) -> usize {
        match self {
            MixerChannel::Track1 => 0,
            MixerChannel::Track2 => 1,
            MixerChannel::Preview => 2,
        }
    }

    pub fn for_track(track: TrackId) -> Self {
        match track {
            TrackId::One => MixerChannel::Track1,
            TrackId::Two => MixerChannel::Track2,
        }
    }
}

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't load files (blocks the audio thread), so a decoded
    // buffer is registered first (see sample_loader.rs) and played by id after
    RegisterSample { id: SampleId, buffer: SampleBuffer },

    Play { channel: MixerChannel, sample: SampleId },
    StopChannel(MixerChannel),
    StopAll,
}

// Manual PartialEq: buffers are compared by id only, which is all tests need
impl PartialEq for AudioCommand {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::RegisterSample { id: a, .. }, Self::RegisterSample { id: b, .. }) => a == b,
            (
                Self::Play { channel: ca, sample: sa },
                Self::Play { channel: cb, sample: sb },
            ) => ca == cb && sa == sb,
            (Self::StopChannel(a), Self::StopChannel(b)) => a == b,
            (Self::StopAll, Self::StopAll) => true,
            _ => false,
        }
    }
}
