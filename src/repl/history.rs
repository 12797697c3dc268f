//! Persistent line history for the REPL.

use rustyline::Editor;
use rustyline::history::DefaultHistory;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::repl::highlighter::ReplHelper;

const HISTORY_FILE_NAME: &str = "history.txt";

/// The platform data directory for the history file, e.g.
/// `~/.local/share/vesp/history.txt` on Linux.
pub(crate) fn history_path() -> Option<PathBuf> {
    let crate_name = env!("CARGO_PKG_NAME");
    dirs::data_dir().or_else(dirs::config_dir).map(|mut path| {
        path.push(crate_name);
        path.push(HISTORY_FILE_NAME);
        path
    })
}

/// Loads persisted history, creating the parent directory so the save on
/// exit can succeed.
pub(crate) fn load(rl: &mut Editor<ReplHelper, DefaultHistory>, path: &Path) {
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.exists() {
            if let Err(error) = fs::create_dir_all(parent_dir) {
                warn!(
                    "Failed to create history directory {}: {}",
                    parent_dir.display(),
                    error
                );
            }
        }
    }

    if !path.exists() {
        info!(
            "History file {} does not exist. Will create on exit.",
            path.display()
        );
        return;
    }
    match rl.load_history(path) {
        Ok(()) => info!("Loaded history from {}", path.display()),
        Err(error) => warn!("Could not load history from {}: {}", path.display(), error),
    }
}

/// Persists history. Failures are logged, never fatal.
pub(crate) fn save(rl: &mut Editor<ReplHelper, DefaultHistory>, path: &Path) {
    match rl.save_history(path) {
        Ok(()) => info!("Saved history to {}", path.display()),
        Err(error) => warn!("Could not save history to {}: {}", path.display(), error),
    }
}
