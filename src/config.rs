use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::typewriter::Pacing;
use crate::words::default_words;

/// Persisted marquee settings. CLI flags override whatever the file
/// carries; `--save-config` writes the merged result back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub base_text: String,
    pub words: Vec<String>,
    pub name: Option<String>,
    pub type_interval_ms: u64,
    /// Half the type interval when absent.
    pub delete_interval_ms: Option<u64>,
    pub post_type_pause_ms: u64,
    pub post_delete_pause_ms: u64,
    pub caret_blink_ms: u64,
    pub font: String,
    pub in_order: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_text: String::new(),
            words: default_words(),
            name: None,
            type_interval_ms: 100,
            delete_interval_ms: None,
            post_type_pause_ms: 1500,
            post_delete_pause_ms: 750,
            caret_blink_ms: 500,
            font: "standard".to_string(),
            in_order: false,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    NoWords,
    ZeroDuration(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWords => write!(f, "the rotating-word pool must not be empty"),
            Self::ZeroDuration(what) => write!(f, "{} must be greater than zero", what),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.words.is_empty() {
            return Err(ConfigError::NoWords);
        }
        let fields = [
            ("type interval", Some(self.type_interval_ms)),
            ("delete interval", self.delete_interval_ms),
            ("post-type pause", Some(self.post_type_pause_ms)),
            ("post-delete pause", Some(self.post_delete_pause_ms)),
            ("caret blink period", Some(self.caret_blink_ms)),
        ];
        for (what, ms) in fields {
            if ms == Some(0) {
                return Err(ConfigError::ZeroDuration(what));
            }
        }
        Ok(())
    }

    /// Millisecond fields as session pacing. Deletion runs at twice the
    /// typing speed unless set explicitly.
    pub fn pacing(&self) -> Pacing {
        let delete_ms = self
            .delete_interval_ms
            .unwrap_or_else(|| (self.type_interval_ms / 2).max(1));
        Pacing {
            type_interval: Duration::from_millis(self.type_interval_ms),
            delete_interval: Duration::from_millis(delete_ms),
            post_type_pause: Duration::from_millis(self.post_type_pause_ms),
            post_delete_pause: Duration::from_millis(self.post_delete_pause_ms),
            caret_blink: Duration::from_millis(self.caret_blink_ms),
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
        let path = if let Some(pd) = ProjectDirs::from("", "", "marquee") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("marquee_config.json")
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
