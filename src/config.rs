use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::clock::DEFAULT_GRANULARITY;

/// Fixed relative path of the optional backdrop image asset.
pub const IMAGE_PATH: &str = "./images/clockface.png";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Minute step for random quiz times.
    pub granularity: u8,
    /// Snap hands to whole units instead of fractional creep.
    pub easy: bool,
    /// Skip the minute-hand sweep before each question.
    pub instant: bool,
    /// Event loop tick interval in milliseconds.
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            granularity: DEFAULT_GRANULARITY,
            easy: false,
            instant: false,
            tick_ms: 50,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "klok") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("klok_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

/// Whether the backdrop image exists on disk, resolved once at startup.
/// Every image-dependent operation checks this flag; absence silently
/// disables the feature.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub present: bool,
}

impl ImageAsset {
    pub fn detect() -> Self {
        Self::detect_at(IMAGE_PATH)
    }

    pub fn detect_at<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let present = path.exists();
        Self { path, present }
    }
}
