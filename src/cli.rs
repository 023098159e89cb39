use std::path::PathBuf;

pub use clap::Parser;

use crate::config::Config;

/// soundboard - preview clips and sequence them on two tracks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Folder of clips (default: the config's sounds_dir, ./sounds)
    sounds_dir: Option<PathBuf>,
    /// JSON file holding the clip colors
    #[arg(long)]
    color_map: Option<PathBuf>,
    /// Config file (default: ~/.config/soundboard/config.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Log filter, e.g. "debug" or "soundboard=trace" (RUST_LOG also works)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
    /// Where log output goes; the terminal belongs to the UI
    #[arg(long, default_value = "soundboard.log")]
    pub log_file: PathBuf,
    /// Write the effective config to the config path and exit
    #[arg(long)]
    pub write_config: bool,
}

impl Args {
    // command line values win over the config file
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.sounds_dir {
            config.sounds_dir = dir.clone();
        }
        if let Some(path) = &self.color_map {
            config.color_map = path.clone();
        }
    }
}
