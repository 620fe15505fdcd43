use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "keystroke").map(|pd| pd.config_dir().to_path_buf())
    }

    /// CSV history of completed tests.
    pub fn history_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("log.csv"))
    }

    /// Directory for JSON result exports.
    pub fn export_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "keystroke").map(|pd| pd.data_local_dir().to_path_buf())
    }

    /// JSON dump of the in-process event log.
    pub fn event_log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("keystroke");
            Some(state_dir.join("events.json"))
        } else {
            ProjectDirs::from("", "", "keystroke")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("events.json"))
        }
    }
}
