// Loads and saves the color map; the only state that outlives a session.
use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::loader::color_cache::ColorMap;

// A missing file is an empty map. A file that can't be read or parsed is
// logged and replaced on the next save.
pub fn load_color_map(path: &Path) -> ColorMap {
    match try_load_color_map(path) {
        Ok(Some(map)) => map,
        Ok(None) => {
            log::info!("no color map at {path:?}, starting a new one");
            ColorMap::new()
        }
        Err(e) => {
            log::warn!("ignoring unreadable color map {path:?}: {e}");
            ColorMap::new()
        }
    }
}

pub fn try_load_color_map(path: &Path) -> Result<Option<ColorMap>> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let raw: BTreeMap<String, Value> = serde_json::from_str(&data)?;
    let map = raw
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::String(hex) => Some((name, hex)),
            other => {
                // dropped here, regenerated when the catalog resolves colors
                log::warn!("color map entry for {name:?} is not a string ({other}), dropping it");
                None
            }
        })
        .collect();
    Ok(Some(map))
}

// Save the color map, making the parent directories if they don't exist already
pub fn save_color_map(path: &Path, map: &ColorMap) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(map)?;
    std::fs::write(path, json)?;
    log::debug!("saved {} colors to {path:?}", map.len());
    Ok(())
}
