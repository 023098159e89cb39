//! The clip catalog: every playable file in the sounds directory, with its
//! cached display color and its duration.

use std::path::{Path, PathBuf};

use rand::Rng;

use super::color_cache::{self, ClipColor};
use crate::audio::SampleId;
use crate::error::{Result, SoundboardError};
use crate::pipeline::persistence;
use crate::shared::ClipId;

#[derive(Clone, Debug)]
pub struct Clip {
    pub name: String, // file name, the color map key
    pub path: PathBuf,
    pub color: ClipColor,
    pub duration: f64, // seconds

    // set once the decoded buffer is registered with the engine
    pub sample_id: Option<SampleId>,
}

impl Clip {
    // pad label, the file name without its extension
    pub fn label(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    pub fn is_loaded(&self) -> bool {
        self.sample_id.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    clips: Vec<Clip>,
}

impl Catalog {
    pub fn from_clips(clips: Vec<Clip>) -> Self {
        Self { clips }
    }

    /// Scans `dir`, assigns every clip its cached color (writing the color map
    /// back when new colors were generated) and reads every clip's duration.
    pub fn load(dir: &Path, extension: &str, color_map_path: &Path) -> Result<Self> {
        Self::load_with_rng(dir, extension, color_map_path, &mut rand::thread_rng())
    }

    pub fn load_with_rng<R: Rng>(
        dir: &Path,
        extension: &str,
        color_map_path: &Path,
        rng: &mut R,
    ) -> Result<Self> {
        let mut clips = Vec::new();
        for path in scan_dir(dir, extension)? {
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    log::warn!("skipping {path:?}: file name is not valid UTF-8");
                    continue;
                }
            };
            match read_duration(&path) {
                Ok(duration) => clips.push(Clip {
                    name,
                    path,
                    color: ClipColor::default(),
                    duration,
                    sample_id: None,
                }),
                Err(e) => log::warn!("skipping {path:?}: {e}"),
            }
        }

        let mut map = persistence::load_color_map(color_map_path);
        let (colors, updated) = color_cache::resolve(&mut map, clips.iter().map(|c| c.name.as_str()), rng);
        for (clip, color) in clips.iter_mut().zip(colors) {
            clip.color = color;
        }
        if updated {
            persistence::save_color_map(color_map_path, &map)?;
        }

        log::info!("catalog: {} clips from {dir:?}", clips.len());
        Ok(Self { clips })
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn get(&self, id: ClipId) -> Option<&Clip> {
        self.clips.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClipId, &Clip)> {
        self.clips.iter().enumerate().map(|(i, c)| (ClipId(i), c))
    }

    // unknown ids count as silence
    pub fn duration(&self, id: ClipId) -> f64 {
        self.get(id).map_or(0.0, |c| c.duration)
    }

    pub fn set_sample_id(&mut self, id: ClipId, sample_id: SampleId) {
        if let Some(clip) = self.clips.get_mut(id.0) {
            clip.sample_id = Some(sample_id);
        }
    }
}

/// Every regular file in `dir` with the given extension (case-insensitive),
/// sorted by file name so the pad grid is stable between runs.
pub fn scan_dir(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| SoundboardError::SoundsDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let wanted = extension.trim_start_matches('.');
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
        if matches && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

// Duration from the header alone, no decoding
pub fn read_duration(path: &Path) -> Result<f64> {
    let reader = hound::WavReader::open(path)?;
    let rate = reader.spec().sample_rate;
    if rate == 0 {
        return Err(SoundboardError::UnsupportedWav(format!("{path:?} has a zero sample rate")));
    }
    Ok(reader.duration() as f64 / rate as f64)
}
