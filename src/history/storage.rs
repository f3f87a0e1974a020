use super::types::{History, HISTORY_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Get the default history file path (~/.config/reality-check/history.json)
pub fn get_history_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("history.json"))
}

/// Load assessment history from a JSON file
///
/// If the file doesn't exist, returns an empty history.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_history(path: &Path) -> Result<History> {
    if !path.exists() {
        return Ok(History::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open history file at {}", path.display()))?;

    let history: History = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load history from {}", path.display()))?;

    if history.version != HISTORY_VERSION {
        anyhow::bail!("Unsupported history version: {}", history.version);
    }

    Ok(history)
}

/// Save history to a JSON file atomically, creating the parent directory if needed.
pub fn save_history(path: &Path, history: &History) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, history).context("Failed to serialize history")?;

    file.commit().context("Failed to save history")?;

    info!(path = %path.display(), records = history.len(), "saved history");
    Ok(())
}
