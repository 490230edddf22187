// src/infra/paths.rs — XDG-compliant path management
//
// All paths respect the TUTORCHAT_HOME environment variable for isolation.
// When TUTORCHAT_HOME is set, config and state live under that directory.
// When unset, config uses ~/.tutorchat/ and state uses XDG_DATA_HOME/tutorchat.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Returns the TUTORCHAT_HOME override, if set.
fn tutorchat_home() -> Option<PathBuf> {
    std::env::var_os("TUTORCHAT_HOME").map(PathBuf::from)
}

/// Home directory, or the current directory when none can be determined.
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $TUTORCHAT_HOME/ or ~/.tutorchat/
pub fn config_dir() -> PathBuf {
    if let Some(home) = tutorchat_home() {
        return home;
    }
    dirs_home().join(".tutorchat")
}

/// Data directory: $TUTORCHAT_HOME/data/ or ~/.local/share/tutorchat/
pub fn data_dir() -> PathBuf {
    if let Some(home) = tutorchat_home() {
        return home.join("data");
    }
    ProjectDirs::from("", "", "tutorchat")
        .map(|p| p.data_local_dir().to_path_buf())
        .unwrap_or_else(|| config_dir().join("data"))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Auth token file
pub fn auth_file_path() -> PathBuf {
    config_dir().join("auth.json")
}

/// State directory (persisted active session id)
pub fn state_dir() -> PathBuf {
    data_dir().join("state")
}

pub fn active_session_path() -> PathBuf {
    state_dir().join("active-session.json")
}

/// Log file used while the full-screen UI owns the terminal
pub fn log_file_path() -> PathBuf {
    data_dir().join("tutorchat.log")
}
