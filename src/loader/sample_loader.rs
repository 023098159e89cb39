use std::path::Path;

use crate::audio::sample_buffer::SampleBuffer;
use crate::audio::{next_sample_id, SampleId};
use crate::error::Result;

// Load a WAV from disk, prepare for registration with the engine
pub fn load(path: &Path, target_rate: u32) -> Result<(SampleId, SampleBuffer)> {
    let buffer = SampleBuffer::load_wav(path, target_rate)?;
    let id = next_sample_id();
    Ok((id, buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_fixture::write_clip;

    #[test]
    fn each_load_gets_a_fresh_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_clip(dir.path(), "a.wav", 0.1);

        let (a, buf) = load(&path, 8000).unwrap();
        let (b, _) = load(&path, 8000).unwrap();
        assert_ne!(a, b);
        assert_eq!(buf.data.len(), 800);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.wav");
        std::fs::write(&path, "junk").unwrap();
        assert!(load(&path, 8000).is_err());
    }
}
