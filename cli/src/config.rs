use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct Config {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve where the shopping list database lives, creating the directory
    /// if needed. `db_override` replaces the platform data directory.
    pub fn load(db_override: Option<PathBuf>) -> Result<Self> {
        let (data_dir, db_path) = if let Some(db_path) = db_override {
            let data_dir = db_path
                .parent()
                .map(std::path::Path::to_path_buf)
                .unwrap_or_default();
            (data_dir, db_path)
        } else {
            let proj_dirs = ProjectDirs::from("", "", "flavour-flip")
                .context("Could not determine home directory")?;
            let data_dir = proj_dirs.data_dir().to_path_buf();
            let db_path = data_dir.join("flavour.db");
            (data_dir, db_path)
        };

        if !data_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(&data_dir).with_context(|| {
                format!("Failed to create data directory: {}", data_dir.display())
            })?;
        }

        Ok(Config { db_path, data_dir })
    }
}
