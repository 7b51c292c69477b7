// Cache path utilities.
// Resolves the platform cache and config locations used by the app.

use std::path::PathBuf;

use directories::ProjectDirs;

/// File name of the payment-status snapshot. Renaming it invalidates old snapshots.
pub const SNAPSHOT_FILE: &str = "payment_status_cache.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "clubdues")
}

/// Get the base cache directory (~/.cache/clubdues on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory (~/.config/clubdues on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the payment-status snapshot.
pub fn snapshot_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(SNAPSHOT_FILE))
}

/// Path to the optional config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Path to the log file. The terminal belongs to the TUI.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("clubdues.log"))
}

/// Default directory for exported reports.
pub fn reports_dir() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("reports"))
}
