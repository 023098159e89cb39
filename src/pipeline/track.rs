// The two user-built sequences. A track is only an ordered list of catalog
// indices; durations and colors are looked up in the catalog when needed.

use crate::error::{Result, SoundboardError};
use crate::loader::catalog::Catalog;
use crate::shared::{ClipId, NUM_TRACKS, TrackId};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Track {
    clips: Vec<ClipId>, // insertion order = playback order, duplicates allowed
}

impl Track {
    pub fn append(&mut self, clip: ClipId) {
        self.clips.push(clip);
    }

    pub fn remove(&mut self, index: usize) -> Option<ClipId> {
        (index < self.clips.len()).then(|| self.clips.remove(index))
    }

    /// Moves the block at `from` so that it lands before the block currently
    /// at `to` (`to == len` moves it to the end). Returns false when `from`
    /// is out of range.
    pub fn move_block(&mut self, from: usize, to: usize) -> bool {
        if from >= self.clips.len() {
            return false;
        }
        let clip = self.clips.remove(from);
        let to = if to > from { to - 1 } else { to };
        self.clips.insert(to.min(self.clips.len()), clip);
        true
    }

    pub fn clear(&mut self) {
        self.clips.clear();
    }

    pub fn get(&self, index: usize) -> Option<ClipId> {
        self.clips.get(index).copied()
    }

    pub fn clips(&self) -> &[ClipId] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn total_duration(&self, catalog: &Catalog) -> f64 {
        self.clips.iter().map(|&c| catalog.duration(c)).sum()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Tracks {
    tracks: [Track; NUM_TRACKS],
}

impl Tracks {
    pub fn get(&self, id: TrackId) -> &Track {
        &self.tracks[id.index()]
    }

    pub fn get_mut(&mut self, id: TrackId) -> &mut Track {
        &mut self.tracks[id.index()]
    }

    // bounds-checked delete of a single block
    pub fn remove(&mut self, id: TrackId, index: usize) -> Result<ClipId> {
        let track = self.get_mut(id);
        let len = track.len();
        track
            .remove(index)
            .ok_or(SoundboardError::BlockOutOfRange { track: id, index, len })
    }

    pub fn clear_all(&mut self) {
        self.tracks.iter_mut().for_each(Track::clear);
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.iter().all(Track::is_empty)
    }

    pub fn max_duration(&self, catalog: &Catalog) -> f64 {
        self.tracks
            .iter()
            .map(|t| t.total_duration(catalog))
            .fold(0.0, f64::max)
    }
}
