use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::sample_id::SampleId;

// One clip playing on one mixer channel, start to end at the buffer's rate
#[derive(Clone, Debug)]
pub struct Voice {
    pub sample_id: SampleId,
    pub pos: usize,
    pub gain: f32,
    pub active: bool,
}

impl Voice {
    pub fn new(sample_id: SampleId, gain: f32) -> Self {
        Self {
            sample_id,
            pos: 0,
            gain,
            active: true,
        }
    }

    // mixes this voice into `out`, goes inactive once the buffer runs out
    pub fn render_into(&mut self, buffer: &SampleBuffer, out: &mut [StereoFrame]) {
        if !self.active {
            return;
        }
        let remaining = buffer.data.get(self.pos..).unwrap_or(&[]);
        let n = remaining.len().min(out.len());
        for (frame, sample) in out.iter_mut().zip(&remaining[..n]) {
            frame.left += sample.left * self.gain;
            frame.right += sample.right * self.gain;
        }
        self.pos += n;
        if self.pos >= buffer.data.len() {
            self.active = false;
        }
    }
}
