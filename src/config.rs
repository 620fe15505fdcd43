use crate::app_dirs::AppDirs;
use crate::wordlist::Difficulty;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Duration choices the results screen cycles through, in seconds.
pub const DURATION_CHOICES: [u64; 5] = [15, 30, 60, 120, 300];
/// Word-count choices the results screen cycles through.
pub const WORD_COUNT_CHOICES: [usize; 4] = [50, 100, 200, 500];

/// Persisted test settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub duration_secs: u64,
    pub word_count: usize,
    pub difficulty: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            word_count: 200,
            difficulty: "medium".to_string(),
        }
    }
}

impl From<&TestSettings> for Config {
    fn from(settings: &TestSettings) -> Self {
        Self {
            duration_secs: settings.duration_secs,
            word_count: settings.word_count,
            difficulty: settings.difficulty.to_string().to_lowercase(),
        }
    }
}

/// In-memory form of the settings, with the difficulty resolved to its enum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestSettings {
    pub duration_secs: u64,
    pub word_count: usize,
    pub difficulty: Difficulty,
}

impl From<&Config> for TestSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            duration_secs: cfg.duration_secs,
            word_count: cfg.word_count,
            difficulty: Difficulty::from_name(&cfg.difficulty).unwrap_or(Difficulty::Medium),
        }
    }
}

impl TestSettings {
    /// Advance a numeric setting to the next entry of its choice list,
    /// wrapping. Values outside the list land on the first entry.
    pub fn cycle_duration(&mut self) {
        self.duration_secs = next_choice(&DURATION_CHOICES, self.duration_secs);
    }

    pub fn cycle_word_count(&mut self) {
        self.word_count = next_choice(&WORD_COUNT_CHOICES, self.word_count);
    }

    pub fn cycle_difficulty(&mut self) {
        self.difficulty = self.difficulty.cycled();
    }
}

fn next_choice<T: Copy + PartialEq>(choices: &[T], current: T) -> T {
    match choices.iter().position(|c| *c == current) {
        Some(idx) => choices[(idx + 1) % choices.len()],
        None => choices[0],
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
        let path = if let Some(dir) = AppDirs::config_dir() {
            dir.join("config.json")
        } else {
            PathBuf::from("keystroke_config.json")
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
