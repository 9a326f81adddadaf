// ABOUTME: Platform config and data directories for tux
// ABOUTME: Falls back to paths relative to the working directory when no home is available

use directories::ProjectDirs;
use std::path::PathBuf;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "tux", "tux")
}

/// e.g. ~/.local/share/tux, or ./data
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(|| PathBuf::from("./data"), |d| d.data_dir().to_path_buf())
}

/// Rolling log files live here
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

/// e.g. ~/.config/tux, or .
pub fn config_dir() -> PathBuf {
    project_dirs().map_or_else(|| PathBuf::from("."), |d| d.config_dir().to_path_buf())
}

/// Last place `Config::load` looks
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
