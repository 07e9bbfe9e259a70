use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

pub fn app_root() -> PathBuf {
    if let Some(project_dirs) = ProjectDirs::from("", "", "askline") {
        return project_dirs.config_dir().to_path_buf();
    }

    if let Some(base_dirs) = BaseDirs::new() {
        return base_dirs.config_dir().join("askline");
    }

    std::env::temp_dir().join("askline")
}

pub fn default_config_path() -> String {
    app_root().join("config.json").to_string_lossy().to_string()
}
