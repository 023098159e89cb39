// Purely for testing: fixture WAVs on disk and in-memory catalogs with known durations.

use std::path::{Path, PathBuf};

use crate::loader::catalog::{Catalog, Clip};
use crate::loader::color_cache::ClipColor;

// 16-bit PCM, a square-ish pattern so the data isn't silent
pub fn write_wav(path: &Path, channels: u16, rate: u32, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut w = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        for ch in 0..channels {
            let v: i16 = if ch == 0 { 8192 } else { -8192 };
            w.write_sample(if i % 2 == 0 { v } else { 0 }).unwrap();
        }
    }
    w.finalize().unwrap();
}

// mono clip of `secs` seconds at 8 kHz
pub fn write_clip(dir: &Path, name: &str, secs: f64) -> PathBuf {
    let path = dir.join(name);
    write_wav(&path, 1, 8000, (secs * 8000.0).round() as usize);
    path
}

pub fn catalog_with(durations: &[(&str, f64)]) -> Catalog {
    let clips = durations
        .iter()
        .enumerate()
        .map(|(i, (name, duration))| Clip {
            name: name.to_string(),
            path: PathBuf::from(name),
            color: ClipColor::from_u32(0x444444 + i as u32 * 0x101010),
            duration: *duration,
            sample_id: None,
        })
        .collect();
    Catalog::from_clips(clips)
}
